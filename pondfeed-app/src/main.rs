use anyhow::Result;
use clap::{Parser, Subcommand};
use pondfeed_core::{diagnostics::DiagnosticAnalyzer, report, FeedingService};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod plotting;
mod workflow;

#[derive(Parser, Debug)]
#[command(name = "pondfeed")]
#[command(about = "Feeding recommendations and diagnostics for shrimp ponds", long_about = None)]
#[command(version)]
struct Cli {
    /// Log pipeline steps and rule evaluation
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute feeding recommendations for one sample or a batch
    Run {
        /// JSON or YAML file holding a sample, or `{"samples": [...]}`
        sample: PathBuf,

        /// Directory with harvest_table, terrain and yield_table documents
        #[arg(short, long)]
        reference_dir: Option<PathBuf>,

        /// Threshold and calculation overrides
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Where run folders are created
        #[arg(short, long, default_value = "./data/runs")]
        output_dir: PathBuf,

        /// Write a CSV trace of every pipeline step
        #[arg(long)]
        trace: bool,

        /// Skip chart rendering
        #[arg(long)]
        no_plots: bool,
    },
    /// Re-run the diagnostics on a saved result record
    Analyze {
        /// A saved analysis, a response envelope, or a bare result record
        results: PathBuf,

        /// Threshold overrides
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pondfeed=debug,pondfeed_core=debug,info"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            sample,
            reference_dir,
            settings,
            output_dir,
            trace,
            no_plots,
        } => {
            let config = config::AppConfig::load(reference_dir.as_deref(), settings.as_deref())?;
            let samples = config::load_samples(&sample)?;
            let service = FeedingService::new(
                config.reference,
                config.settings.thresholds,
                config.settings.calculation,
            )?;

            let options = workflow::RunOptions {
                output_dir,
                trace,
                plots: !no_plots,
            };
            let summary = workflow::run_samples(&service, &samples, &options)?;
            info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                dir = %summary.run_dir.display(),
                "run complete"
            );
        }
        Commands::Analyze { results, settings } => {
            let settings = config::load_settings(settings.as_deref())?;
            let analyzer = DiagnosticAnalyzer::new(settings.thresholds)
                .with_lbs_to_kg(settings.calculation.lbs_to_kg);
            let analysis = workflow::analyze_saved(&results, &analyzer)?;
            println!("{}", report::generate_report(&analysis));
        }
    }

    Ok(())
}
