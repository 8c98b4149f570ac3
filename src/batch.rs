//! Batch driver: convert every PDF in a directory, isolating failures.
//!
//! One bad document must never stop the run. Each document's conversion is
//! wrapped into a [`DocumentReport`] — success with its output paths, or
//! failure with the reason — and the batch always completes with a
//! [`BatchSummary`]. This replaces exception-style control flow with an
//! explicit per-document result type the caller can render, serialise, or
//! aggregate.
//!
//! Documents are converted up to `config.concurrency` at a time. Output
//! paths are distinct by construction (see
//! [`crate::convert::page_output_path`]), so parallel documents never race
//! on a file.

use crate::config::LabelConfig;
use crate::convert;
use crate::error::Pdf2ZplError;
use crate::pipeline::input;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// The outcome of converting one document in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// The source PDF.
    pub input: PathBuf,
    /// Output files written, one per successful page.
    pub outputs: Vec<PathBuf>,
    /// Pages that failed within an otherwise-converted document.
    pub pages_failed: usize,
    /// Set when the document as a whole failed; `outputs` is empty then.
    pub error: Option<String>,
}

impl DocumentReport {
    /// True when the document produced at least one label and no fatal error.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// The aggregate result of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// One report per discovered PDF, in file-name order.
    pub documents: Vec<DocumentReport>,
    /// Wall-clock time for the whole batch.
    pub total_duration_ms: u64,
}

impl BatchSummary {
    /// Documents that converted (possibly with some failed pages).
    pub fn succeeded(&self) -> usize {
        self.documents.iter().filter(|d| d.succeeded()).count()
    }

    /// Documents that failed outright.
    pub fn failed(&self) -> usize {
        self.documents.len() - self.succeeded()
    }

    /// Total label files written.
    pub fn labels_written(&self) -> usize {
        self.documents.iter().map(|d| d.outputs.len()).sum()
    }
}

/// Convert every PDF in `input_dir`, writing labels into `output_dir`.
///
/// Creates `output_dir` if it does not exist. An empty input directory is a
/// successful, empty batch. Per-document failures (bad PDF, wrong password,
/// all pages failed) are recorded in their [`DocumentReport`] and do not
/// abort the run.
///
/// # Errors
/// Fatal only for batch-level setup: a missing input directory, or an
/// output directory that cannot be created. An invalid label geometry
/// fails each document's conversion, not the batch.
pub async fn run_batch(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &LabelConfig,
) -> Result<BatchSummary, Pdf2ZplError> {
    let start = Instant::now();
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    let pdfs = input::discover_pdfs(input_dir)?;
    info!(
        "Batch: {} PDFs in {} → {}",
        pdfs.len(),
        input_dir.display(),
        output_dir.display()
    );

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| Pdf2ZplError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let mut documents: Vec<DocumentReport> = stream::iter(pdfs.into_iter().map(|pdf| {
        let config = config.clone();
        let output_dir = output_dir.to_path_buf();
        async move { convert_document(pdf, &output_dir, &config).await }
    }))
    .buffer_unordered(config.concurrency)
    .collect()
    .await;

    // buffer_unordered yields in completion order; restore discovery order
    // so the summary is stable between runs.
    documents.sort_by(|a, b| a.input.cmp(&b.input));

    let summary = BatchSummary {
        documents,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Batch complete: {}/{} documents, {} labels, {}ms",
        summary.succeeded(),
        summary.documents.len(),
        summary.labels_written(),
        summary.total_duration_ms
    );
    Ok(summary)
}

/// Convert one document, folding any fatal error into its report.
async fn convert_document(
    pdf: PathBuf,
    output_dir: &Path,
    config: &LabelConfig,
) -> DocumentReport {
    info!("Processing: {}", pdf.display());
    match convert::convert_to_files(&pdf, output_dir, config).await {
        Ok(output) => DocumentReport {
            input: pdf,
            outputs: output
                .pages
                .iter()
                .filter_map(|p| p.output_path.clone())
                .collect(),
            pages_failed: output.stats.failed_pages,
            error: None,
        },
        Err(e) => {
            warn!("Failed to process {}: {}", pdf.display(), e);
            DocumentReport {
                input: pdf,
                outputs: Vec::new(),
                pages_failed: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(input: &str, outputs: usize, error: Option<&str>) -> DocumentReport {
        DocumentReport {
            input: PathBuf::from(input),
            outputs: (0..outputs)
                .map(|i| PathBuf::from(format!("{input}.{i}.zpl")))
                .collect(),
            pages_failed: 0,
            error: error.map(String::from),
        }
    }

    #[test]
    fn summary_accounting() {
        let summary = BatchSummary {
            documents: vec![
                report("a.pdf", 1, None),
                report("b.pdf", 3, None),
                report("c.pdf", 0, Some("not a PDF")),
            ],
            total_duration_ms: 10,
        };
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.labels_written(), 4);
    }

    #[tokio::test]
    async fn missing_input_dir_is_fatal() {
        let out = tempfile::TempDir::new().unwrap();
        let err = run_batch("/no/such/dir", out.path(), &LabelConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2ZplError::InputDirNotFound { .. }));
    }

    #[tokio::test]
    async fn empty_input_dir_is_successful_empty_batch() {
        let input = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        let summary = run_batch(input.path(), out.path(), &LabelConfig::default())
            .await
            .unwrap();
        assert!(summary.documents.is_empty());
        assert_eq!(summary.labels_written(), 0);
    }

    #[tokio::test]
    async fn junk_pdf_fails_its_document_not_the_batch() {
        let input = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        std::fs::write(input.path().join("junk.pdf"), b"definitely not a pdf").unwrap();

        let summary = run_batch(input.path(), out.path(), &LabelConfig::default())
            .await
            .unwrap();
        assert_eq!(summary.documents.len(), 1);
        assert_eq!(summary.failed(), 1);
        let report = &summary.documents[0];
        assert!(report.error.as_deref().unwrap().contains("not a valid PDF"));
        assert!(report.outputs.is_empty());
    }

    #[tokio::test]
    async fn bad_geometry_fails_each_document_not_the_batch() {
        let input = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        std::fs::write(input.path().join("a.pdf"), b"%PDF-1.4 stub").unwrap();
        std::fs::write(input.path().join("b.pdf"), b"%PDF-1.4 stub").unwrap();

        let mut config = LabelConfig::default();
        config.width_cm = -1.0;
        let summary = run_batch(input.path(), out.path(), &config)
            .await
            .unwrap();
        assert_eq!(summary.documents.len(), 2);
        assert_eq!(summary.failed(), 2);
        for report in &summary.documents {
            assert!(report
                .error
                .as_deref()
                .unwrap()
                .contains("Invalid configuration"));
            assert!(report.outputs.is_empty());
        }
    }
}
