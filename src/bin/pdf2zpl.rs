//! CLI binary for pdf2zpl.
//!
//! A thin shim over the library crate that maps CLI flags to `LabelConfig`
//! and prints results. A file argument converts one document; a directory
//! argument runs the batch driver over every PDF in it.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2zpl::{
    convert, convert_to_files, inspect, run_batch, EncodeProgress, LabelConfig, PageSelection,
    ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-page log
/// lines using [indicatif].
struct CliProgress {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Count of pages that errored out.
    errors: AtomicUsize,
}

impl CliProgress {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_convert_start` (called before any pages are processed).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_convert_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Encoding");
    }
}

/// Truncate very long error messages to keep progress output tidy.
fn truncate_error(error: &str) -> String {
    if error.chars().count() > 80 {
        let head: String = error.chars().take(79).collect();
        format!("{head}\u{2026}")
    } else {
        error.to_string()
    }
}

impl EncodeProgress for CliProgress {
    fn on_convert_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, zpl_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{zpl_len:>7} bytes ZPL")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg = truncate_error(error);

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_convert_complete(&self, total_pages: usize, success_count: usize) {
        let failed = total_pages.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} pages encoded successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages encoded  ({} failed)",
                if failed == total_pages {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one PDF; single-page output goes to stdout
  pdf2zpl shipping_label.pdf

  # Convert one PDF into a directory of .zpl files
  pdf2zpl manual.pdf -o labels/

  # Batch-convert every PDF in a folder
  pdf2zpl pdf_input/ -o zpl_output/

  # 4x6 inch stock on a 300 DPI printer
  pdf2zpl label.pdf --width-cm 10.16 --height-cm 15.24 --dpi 300

  # Specific pages, darker threshold
  pdf2zpl --pages 1-5 --threshold 160 manual.pdf -o labels/

  # Inspect PDF metadata, no conversion
  pdf2zpl --inspect-only document.pdf

  # JSON batch report
  pdf2zpl pdf_input/ -o zpl_output/ --json > report.json

OUTPUT NAMING:
  Single-page documents write <name>.zpl; multi-page documents write
  <name>_p<N>.zpl with a 1-based page number.

LABEL GEOMETRY:
  Pixel size is trunc(cm / 2.54 * dpi) per axis. The defaults
  (10 cm x 15 cm at 203 DPI) give a 799 x 1198 px raster. Match --dpi to
  the printer head or the label prints at the wrong physical size.

ENVIRONMENT VARIABLES:
  PDF2ZPL_WIDTH_CM    Label width in centimetres
  PDF2ZPL_HEIGHT_CM   Label height in centimetres
  PDF2ZPL_DPI         Printer resolution
  PDFIUM_LIB_PATH     Path to an existing libpdfium shared library
"#;

/// Convert PDF documents to ZPL label-printer graphics.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2zpl",
    version,
    about = "Convert PDF documents to ZPL label-printer graphics",
    long_about = "Convert PDF documents into ZPL (Zebra Programming Language) label graphics. \
Each page is rasterised via pdfium, resized to the physical label geometry, thresholded to \
monochrome, and packed into a ^GFA graphic field. A directory argument batch-converts every \
PDF in it, continuing past per-document failures.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file, or a directory of PDFs for batch mode.
    input: PathBuf,

    /// Output directory for .zpl files. Batch default: zpl_output.
    /// In single-file mode, omitting this prints the ZPL to stdout.
    #[arg(short, long, env = "PDF2ZPL_OUTPUT")]
    output: Option<PathBuf>,

    /// Physical label width in centimetres.
    #[arg(long, env = "PDF2ZPL_WIDTH_CM", default_value_t = 10.0)]
    width_cm: f64,

    /// Physical label height in centimetres.
    #[arg(long, env = "PDF2ZPL_HEIGHT_CM", default_value_t = 15.0)]
    height_cm: f64,

    /// Printer resolution in dots per inch.
    #[arg(long, env = "PDF2ZPL_DPI", default_value_t = 203)]
    dpi: u32,

    /// Luma cut-off below which a pixel prints dark (0-255).
    #[arg(long, env = "PDF2ZPL_THRESHOLD", default_value_t = 128)]
    threshold: u8,

    /// Flip dark/light polarity for inverted sources.
    #[arg(long, env = "PDF2ZPL_INVERT")]
    invert: bool,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2ZPL_PAGES", default_value = "all")]
    pages: String,

    /// Number of documents converted concurrently in batch mode.
    #[arg(short, long, env = "PDF2ZPL_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2ZPL_PASSWORD")]
    password: Option<String>,

    /// Output a structured JSON report instead of plain text.
    #[arg(long, env = "PDF2ZPL_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2ZPL_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2ZPL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2ZPL_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let batch_mode = cli.input.is_dir();
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !batch_mode;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgress::new_dynamic() as ProgressCallback)
    } else {
        None
    };
    let config = build_config(&cli, progress)?;

    if batch_mode {
        run_batch_mode(&cli, &config).await
    } else {
        run_single_mode(&cli, &config).await
    }
}

/// Batch mode: convert every PDF in the input directory.
async fn run_batch_mode(cli: &Cli, config: &LabelConfig) -> Result<()> {
    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("zpl_output"));

    let summary = run_batch(&cli.input, &output_dir, config)
        .await
        .context("Batch conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
        return Ok(());
    }

    if !cli.quiet {
        for doc in &summary.documents {
            let name = doc.input.file_name().unwrap_or_default().to_string_lossy();
            match &doc.error {
                None => {
                    let pages_note = if doc.pages_failed > 0 {
                        red(&format!("  ({} pages failed)", doc.pages_failed))
                    } else {
                        String::new()
                    };
                    eprintln!(
                        "{} {}  {}{}",
                        green("✓"),
                        name,
                        dim(&format!("{} labels", doc.outputs.len())),
                        pages_note
                    );
                }
                Some(err) => {
                    let first_line = err.lines().next().unwrap_or(err);
                    eprintln!("{} {}  {}", red("✗"), name, red(first_line));
                }
            }
        }
        eprintln!(
            "{}  {}/{} documents  {} labels  {}ms  →  {}",
            if summary.failed() == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            summary.succeeded(),
            summary.documents.len(),
            summary.labels_written(),
            summary.total_duration_ms,
            bold(&output_dir.display().to_string()),
        );
    }

    Ok(())
}

/// Single-file mode: convert one document to files or stdout.
async fn run_single_mode(cli: &Cli, config: &LabelConfig) -> Result<()> {
    if let Some(ref output_dir) = cli.output {
        let output = convert_to_files(&cli.input, output_dir, config)
            .await
            .context("Conversion failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?
            );
        } else if !cli.quiet {
            eprintln!(
                "{}  {}/{} pages  {}ms  →  {}",
                if output.stats.failed_pages == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                output.stats.processed_pages,
                output.stats.processed_pages + output.stats.failed_pages,
                output.stats.total_duration_ms,
                bold(&output_dir.display().to_string()),
            );
        }
    } else {
        let output = convert(&cli.input, config)
            .await
            .context("Conversion failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?
            );
        } else {
            // ZPL labels concatenate cleanly; a printer runs each ^XA…^XZ
            // block in sequence.
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            for page in output.successful_pages() {
                handle
                    .write_all(page.zpl.as_bytes())
                    .context("Failed to write to stdout")?;
                handle.write_all(b"\n").context("Failed to write to stdout")?;
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "   {} pages  {}  {}ms total",
                output.stats.processed_pages,
                dim(&format!("{} bytes ZPL", output.stats.zpl_bytes)),
                output.stats.total_duration_ms,
            );
        }
    }

    Ok(())
}

/// Map CLI args to `LabelConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<LabelConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = LabelConfig::builder()
        .label_size_cm(cli.width_cm, cli.height_cm)
        .dpi(cli.dpi)
        .threshold(cli.threshold)
        .invert(cli.invert)
        .pages(pages)
        .concurrency(cli.concurrency);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!("Invalid page range '{}-{}': start must be <= end", start, end);
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}
