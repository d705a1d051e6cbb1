// Main entry point - Dependency injection and command dispatch
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use vehicle_diagnostics::application::device_service::DeviceService;
use vehicle_diagnostics::application::diagnostic_service::DiagnosticService;
use vehicle_diagnostics::domain::batch::AnalysisWindow;
use vehicle_diagnostics::domain::catalog::Catalog;
use vehicle_diagnostics::infrastructure::config::{load_config, threshold_table};
use vehicle_diagnostics::infrastructure::file_repository::FileRepository;
use vehicle_diagnostics::presentation::report_writer::{render_catalog, render_json, render_table};

#[derive(Parser, Debug)]
#[command(name = "vehicle-diagnostics")]
#[command(about = "Decode vehicle telemetry and report abnormal parameter spikes")]
struct Args {
    /// Config file (defaults to config/diagnostics.* when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding one <device>.jsonl telemetry file per device
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one device's telemetry and print a diagnostic report
    Diagnose {
        /// Device identifier
        #[arg(long)]
        device: String,

        /// Window start (RFC 3339)
        #[arg(long)]
        from: Option<DateTime<Utc>>,

        /// Window end (RFC 3339)
        #[arg(long)]
        to: Option<DateTime<Utc>>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// List devices with stored telemetry
    Devices,
    /// Print the parameter catalog
    Catalog,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Load configuration
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let data_dir = args.data_dir.unwrap_or_else(|| config.source.data_dir.clone());

    // Create repository (infrastructure layer)
    let repository = Arc::new(FileRepository::new(data_dir));

    match args.command {
        Command::Diagnose {
            device,
            from,
            to,
            format,
        } => {
            let window = (from.is_some() || to.is_some()).then(|| {
                AnalysisWindow::new(
                    from.unwrap_or(DateTime::<Utc>::MIN_UTC),
                    to.unwrap_or(DateTime::<Utc>::MAX_UTC),
                )
            });

            let service = DiagnosticService::new(
                repository,
                threshold_table(&config),
                config.analysis.clone(),
            );
            let report = service.diagnose(&device, window).await?;

            match format {
                OutputFormat::Json => println!("{}", render_json(&report)?),
                OutputFormat::Table => print!("{}", render_table(&report)),
            }
        }
        Command::Devices => {
            let service = DeviceService::new(repository);
            for id in service.list_devices().await? {
                println!("{id}");
            }
        }
        Command::Catalog => {
            print!("{}", render_catalog(Catalog::global().definitions()));
        }
    }

    Ok(())
}
