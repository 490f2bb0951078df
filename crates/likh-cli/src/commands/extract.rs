//! Extract command - run one extraction on a captured or uploaded image.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use likh_core::models::flags::UPLOAD_EXTENSIONS;
use likh_core::present::download_file_name;
use likh_core::{
    ActionReport, Credential, ImageNormalizer, LikhConfig, OpenAiBackend, OutputFlags, Pipeline,
    PresentationOutcome, Source, check_invoice_csv,
};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input image file
    #[arg(required = true)]
    input: PathBuf,

    /// How the image was acquired
    #[arg(short, long, value_enum, default_value = "upload")]
    source: SourceArg,

    /// Format output as CSV
    #[arg(long)]
    csv: bool,

    /// Treat the image as a structured bill/invoice (only with --csv)
    #[arg(long)]
    structured: bool,

    /// Directory the CSV download is written to (default: output.directory from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Check structured invoice output against the 16-column schema
    #[arg(long)]
    validate: bool,

    /// Show the prompt and encoded payload without calling the API
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SourceArg {
    /// Picture taken with a camera
    Camera,
    /// Image file chosen from disk
    Upload,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Camera => Source::Camera,
            SourceArg::Upload => Source::Upload,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    // No credential, no extraction: fail before touching the input.
    let credential = if args.dry_run {
        None
    } else {
        Some(Credential::from_env(&config.api.api_key_env)?)
    };

    let source = Source::from(args.source);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if !source.accepts(&args.input) {
        let extension = args
            .input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        anyhow::bail!(
            "Unsupported file format for upload: '{}' (expected one of: {})",
            extension,
            UPLOAD_EXTENSIONS.join(", ")
        );
    }

    if args.structured && !args.csv {
        warn!("--structured only applies together with --csv; ignoring it");
    }
    let flags = OutputFlags::new(args.csv, args.structured);

    let bytes = fs::read(&args.input)?;
    info!(
        "Read {} bytes from {} ({} source)",
        bytes.len(),
        args.input.display(),
        source
    );

    let Some(credential) = credential else {
        return dry_run(&bytes, flags, source, &config);
    };

    let backend = OpenAiBackend::new(credential, config.api.backend_options())?;
    let pipeline = Pipeline::from_config(backend, &config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")?);
    pb.set_message(match source {
        Source::Camera => "Processing camera image...",
        Source::Upload => "Processing uploaded image...",
    });
    pb.enable_steady_tick(Duration::from_millis(100));

    let report = pipeline.process(&bytes, flags, source).await;

    pb.finish_and_clear();
    debug!("Action took {}ms", report.metadata.processing_time_ms);

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.directory.clone());

    render(&report, &args, flags, &output_dir)
}

fn render(
    report: &ActionReport,
    args: &ExtractArgs,
    flags: OutputFlags,
    output_dir: &std::path::Path,
) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    }

    match &report.outcome {
        PresentationOutcome::Extracted { text, download, .. } => {
            if !args.json {
                println!("{}", text);
            }

            if let Some(download) = download {
                let path = download.write_to(output_dir)?;
                eprintln!(
                    "{} CSV written to {}",
                    style("✓").green(),
                    path.display()
                );
            }

            if args.validate {
                if flags.want_structured_invoice() {
                    let issues = check_invoice_csv(text);
                    if issues.is_empty() {
                        eprintln!("{} Output matches the invoice schema", style("✓").green());
                    } else {
                        eprintln!("{}", style("Schema issues:").yellow());
                        for issue in &issues {
                            eprintln!("  - {}", issue);
                        }
                    }
                } else {
                    warn!("--validate only checks structured invoice output (--csv --structured)");
                }
            }

            Ok(())
        }
        PresentationOutcome::Failed { failure, .. } => {
            anyhow::bail!("{} error: {}", failure.kind, failure.message)
        }
    }
}

fn dry_run(bytes: &[u8], flags: OutputFlags, source: Source, config: &LikhConfig) -> anyhow::Result<()> {
    let payload = ImageNormalizer::from_config(&config.image).normalize_bytes(bytes)?;
    let (width, height) = payload.dimensions();

    println!("{} Dry run, no request sent", style("ℹ").blue());
    println!("Model:   {}", config.api.model);
    println!("Source:  {}", source);
    println!("Prompt:  {:?}", flags.prompt_kind());
    println!(
        "Payload: {} {}x{}, {} bytes",
        payload.mime_type(),
        width,
        height,
        payload.len()
    );
    if flags.want_csv() {
        println!("Download: {}", download_file_name(flags, source));
    }
    println!();
    println!("{}", flags.prompt());

    Ok(())
}
