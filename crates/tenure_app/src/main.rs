mod cli;
mod inputs;
mod report;
mod run;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use tenure_engine::ensure_dir;
use tenure_logging::{tenure_error, LogDestination};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    ensure_dir(&cli.store).context("preparing store directory")?;
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    tenure_logging::initialize(LogDestination::Both, level, &cli.store.join("tenure.log"));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("starting runtime")?;
    let outcome = runtime.block_on(run::run(cli));
    if let Err(err) = &outcome {
        tenure_error!("Run failed: {:#}", err);
    }
    outcome
}
