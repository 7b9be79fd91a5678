//! Scan Splitter - Entry point

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use scan_splitter::config::install_dir;
use scan_splitter::{run_source_dir, IdentifierKeying, SplitPipeline, SplitterConfig};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "scan-splitter",
    version,
    about = "Split scanned PDFs into CoA and pilot report files using OCR"
)]
struct Cli {
    /// JSON config file (defaults are used for missing fields)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory scanned for input PDFs
    #[arg(short, long, global = true, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Output directory for both CoA and pilot report splits
    #[arg(short, long, global = true, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Number of files processed concurrently
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// How pilot report pages are grouped
    #[arg(long, global = true, value_enum)]
    keying: Option<Keying>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Split every PDF in the source directory (default)
    Batch,
    /// Split a single PDF, prompting for the path if omitted
    Single {
        /// Path to the PDF
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Keying {
    NumberAndVersion,
    NumberOnly,
}

impl From<Keying> for IdentifierKeying {
    fn from(k: Keying) -> Self {
        match k {
            Keying::NumberAndVersion => IdentifierKeying::NumberAndVersion,
            Keying::NumberOnly => IdentifierKeying::NumberOnly,
        }
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<SplitterConfig> {
    let mut config = match &cli.config {
        Some(path) => SplitterConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SplitterConfig::default(),
    };

    if let Some(source) = &cli.source {
        config.source_dir = source.clone();
    }
    if let Some(output) = &cli.output {
        config.coa_output_dir = output.clone();
        config.pilot_output_dir = output.clone();
    }
    if let Some(workers) = cli.workers {
        config.max_workers = workers;
    }
    if let Some(keying) = cli.keying {
        config.identifier_keying = keying.into();
    }

    Ok(config.resolve(&install_dir()?))
}

fn prompt_for_path() -> anyhow::Result<PathBuf> {
    print!("Enter the full path to your test PDF: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim().trim_matches('"')))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scan_splitter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    tracing::debug!(?config, "resolved configuration");

    let command = cli.command.unwrap_or(Command::Batch);
    if matches!(command, Command::Batch) && config.coa_names_may_collide() {
        tracing::warn!(
            template = %config.coa_file_template,
            workers = config.worker_count(),
            "CoA outputs from different files share one directory; \
             add {{stem}} to coa_file_template to keep them apart"
        );
    }

    let pipeline = Arc::new(SplitPipeline::from_config(config).context("OCR preflight failed")?);

    match command {
        Command::Batch => {
            let outcomes = run_source_dir(Arc::clone(&pipeline)).await?;
            if outcomes.is_empty() {
                println!("No PDFs Found");
                return Ok(());
            }

            for outcome in &outcomes {
                println!("{}: {}", outcome.source.display(), outcome);
            }

            let failed = outcomes.iter().filter(|o| !o.is_success()).count();
            if failed > 0 {
                anyhow::bail!("{} of {} files failed", failed, outcomes.len());
            }
        }
        Command::Single { path } => {
            let path = match path {
                Some(p) => p,
                None => prompt_for_path()?,
            };

            let worker = Arc::clone(&pipeline);
            let report = tokio::task::spawn_blocking(move || worker.process_file(&path)).await?;
            match report {
                Ok(report) => {
                    println!("PDF has {} pages", report.page_count);
                    for written in &report.written {
                        println!("  {}", written.display());
                    }
                    println!("PDF Split Successfully");
                }
                Err(e) => {
                    println!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
