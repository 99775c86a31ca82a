//! CLI binary for aeroscribe.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `BatchConfig` and prints results.

use aeroscribe::{
    describe_to_file, BatchConfig, BatchProgressCallback, ExportFormat, ProgressCallback,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
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

/// Terminal progress callback: renders a live progress bar plus a per-image
/// log line using [indicatif].
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Count of images whose backend call failed.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by
    /// `on_batch_start` (called after the scan, before any backend call).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Listing folder…");
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
             [{bar:42.green/238}] {pos:>3}/{len} images  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Describing");
        self.bar.reset_eta();
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_images: usize) {
        self.activate_bar(total_images);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Describing {total_images} image(s)…"))
        ));
    }

    fn on_image_start(&self, _index: usize, _total: usize, file_name: &str) {
        self.bar.set_message(file_name.to_string());
    }

    fn on_image_complete(
        &self,
        index: usize,
        total: usize,
        file_name: &str,
        description_len: usize,
    ) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<30}  {}",
            green("✓"),
            index + 1,
            total,
            file_name,
            dim(&format!("{description_len:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_image_error(&self, index: usize, total: usize, file_name: &str, error: String) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg = truncate_error(&error);

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<30}  {}",
            red("✗"),
            index + 1,
            total,
            file_name,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_images: usize, described: usize) {
        let failed = total_images.saturating_sub(described);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} image(s) described successfully",
                green("✔"),
                bold(&described.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} images described  ({} failed)",
                if failed == total_images {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&described.to_string()),
                total_images,
                red(&failed.to_string()),
            );
        }
    }
}

/// Truncate very long error messages to keep output tidy.
///
/// Counts characters rather than bytes so multi-byte text (a non-ASCII
/// file name inside an error message) never splits mid-character.
fn truncate_error(error: &str) -> String {
    if error.chars().count() > 80 {
        let head: String = error.chars().take(79).collect();
        format!("{head}\u{2026}")
    } else {
        error.to_string()
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Describe a folder, write descriptions.csv next to the current directory
  aeroscribe ./flight7

  # Spreadsheet output
  aeroscribe ./flight7 -f xlsx -o flight7.xlsx

  # PDF report with embedded thumbnails
  aeroscribe ./flight7 -f pdf -o flight7.pdf

  # Different model and prompt
  aeroscribe --model llava --prompt "Describe the terrain" ./flight7

  # Remote daemon
  aeroscribe --host http://gpu-box:11434 ./flight7

  # Keep .tif files as-is (no PNG conversion)
  aeroscribe --no-raster-convert ./flight7

  # Structured JSON on stdout (records + stats), in addition to the file
  aeroscribe --json ./flight7 > run.json

ENVIRONMENT VARIABLES:
  OLLAMA_HOST             Daemon base URL (default http://localhost:11434)
  AEROSCRIBE_MODEL        Override model ID
  AEROSCRIBE_PROMPT       Override the prompt

SETUP:
  1. Install Ollama and pull a vision model:
       ollama pull llama3.2-vision
  2. Describe a folder:
       aeroscribe ./photos -f csv -o descriptions.csv
"#;

/// Describe a folder of images with a local vision LLM and export the results.
#[derive(Parser, Debug)]
#[command(
    name = "aeroscribe",
    version,
    about = "Describe folders of aerial images with a local vision LLM",
    long_about = "Scan a folder of images, describe each one with a local vision language \
model served by Ollama, and export the (file name, description) pairs as a spreadsheet, \
CSV file, plain-text report, or paginated PDF.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder of images to describe.
    folder: PathBuf,

    /// Output file. Defaults to descriptions.<ext> for the chosen format.
    #[arg(short, long, env = "AEROSCRIBE_OUTPUT")]
    output: Option<PathBuf>,

    /// Export format.
    #[arg(short, long, env = "AEROSCRIBE_FORMAT", value_enum, default_value = "csv")]
    format: FormatArg,

    /// Vision model ID (e.g. llama3.2-vision, llava).
    #[arg(long, env = "AEROSCRIBE_MODEL")]
    model: Option<String>,

    /// Ollama daemon base URL. Falls back to OLLAMA_HOST, then localhost.
    #[arg(long)]
    host: Option<String>,

    /// Prompt sent with every image.
    #[arg(long, env = "AEROSCRIBE_PROMPT", conflicts_with = "prompt_file")]
    prompt: Option<String>,

    /// Path to a text file containing the prompt.
    #[arg(long, env = "AEROSCRIBE_PROMPT_FILE")]
    prompt_file: Option<PathBuf>,

    /// Per-image backend call timeout in seconds.
    #[arg(long, env = "AEROSCRIBE_API_TIMEOUT", default_value_t = 300)]
    api_timeout: u64,

    /// Keep .tif/.tiff files as-is instead of converting them to PNG.
    #[arg(long, env = "AEROSCRIBE_NO_RASTER_CONVERT")]
    no_raster_convert: bool,

    /// Print structured JSON (records + stats) to stdout as well.
    #[arg(long, env = "AEROSCRIBE_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "AEROSCRIBE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "AEROSCRIBE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "AEROSCRIBE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Xlsx,
    Csv,
    Txt,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Xlsx => ExportFormat::Spreadsheet,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Txt => ExportFormat::PlainText,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    let format: ExportFormat = cli.format.into();
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("descriptions.{}", format.default_extension())));

    // ── Run batch ────────────────────────────────────────────────────────
    let (output, written) = describe_to_file(&cli.folder, format, &output_path, &config)
        .await
        .context("Batch description failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    }

    // Summary line (the callback already printed the per-image log).
    if !cli.quiet {
        eprintln!(
            "{}  {}/{} images  {}ms  →  {}",
            if output.stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            output.stats.described,
            output.stats.total_images,
            output.stats.total_duration_ms,
            bold(&written.display().to_string()),
        );
    }

    if output.stats.failed > 0 && output.stats.described == 0 && output.stats.total_images > 0 {
        eprintln!(
            "{}",
            red("All backend calls failed. Is the Ollama daemon running?")
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Map CLI args to `BatchConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let prompt = if let Some(ref path) = cli.prompt_file {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read prompt from {:?}", path))?
                .trim()
                .to_string(),
        )
    } else {
        cli.prompt.clone()
    };

    let mut builder = BatchConfig::builder()
        .api_timeout_secs(cli.api_timeout)
        .convert_rasters(!cli.no_raster_convert);

    if let Some(model) = &cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(host) = &cli.host {
        builder = builder.host(host.clone());
    }
    if let Some(prompt) = prompt {
        builder = builder.prompt(prompt);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
