//! Input resolution: validate a user-supplied PDF path, or enumerate a
//! directory of PDFs for batch mode.
//!
//! We validate the PDF magic bytes (`%PDF`) before handing a path to pdfium
//! so callers get a meaningful error rather than a pdfium parse failure on a
//! file that was never a PDF at all. Batch discovery is non-recursive and
//! sorted by file name, which keeps output naming and status reporting
//! deterministic between runs.

use crate::error::Pdf2ZplError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local PDF file path: existence, readability, and magic bytes.
pub fn resolve_pdf(path: impl AsRef<Path>) -> Result<PathBuf, Pdf2ZplError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(Pdf2ZplError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
                return Err(Pdf2ZplError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2ZplError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2ZplError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Enumerate the PDF files directly inside `dir`, sorted by file name.
///
/// Matching is by case-insensitive `.pdf` extension only; the files' magic
/// bytes are validated later, per document, so one mislabelled file fails
/// its own document instead of the whole discovery step.
pub fn discover_pdfs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, Pdf2ZplError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|_| Pdf2ZplError::InputDirNotFound {
        path: dir.to_path_buf(),
    })?;

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    pdfs.sort();
    debug!("Discovered {} PDFs in {}", pdfs.len(), dir.display());
    Ok(pdfs)
}
