use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod batch;
mod report;

/// Run every reconfiguration scenario under a directory tree and write
/// result files plus per-folder execution time logs.
#[derive(Debug, Parser)]
#[command(name = "reconf-runner", version, about)]
struct Args {
    /// Root directory containing one folder of scenario files per map.
    #[arg(long, default_value = "scenarios")]
    scenarios: PathBuf,

    /// Root directory for result files and time logs.
    #[arg(long, default_value = "results")]
    results: PathBuf,

    /// Worker threads; defaults to the number of CPUs.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reconf_runner=info,reconf_pivot=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Workers poll this flag between scenarios; Ctrl-C is a clean exit.
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst)) {
            tracing::warn!("could not install interrupt handler: {e}");
        }
    }

    match batch::run(&args.scenarios, &args.results, args.threads, stop.clone()) {
        Ok(summary) => {
            if stop.load(Ordering::SeqCst) {
                tracing::info!(
                    completed = summary.completed,
                    "interrupted by user, partial results are on disk"
                );
            } else {
                tracing::info!(
                    completed = summary.completed,
                    unsafe_instances = summary.unsafe_instances,
                    failed = summary.failed,
                    "batch finished"
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}
