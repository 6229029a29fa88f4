//! traffic-gen: polls the podscope backend on a fixed interval.
//!
//! # Usage
//!
//! ```text
//! BACKEND_URL=http://backend-prod:80 INTERVAL=5s traffic-gen
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use podscope_traffic::{Cli, GeneratorConfig, PollScheduler, TrafficGenerator};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = podscope_core::logging::init(cli.log_format, "info") {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    // Fatal errors are logged where they happen; only the exit code is left.
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    info!("starting traffic generator");

    let config = GeneratorConfig::resolve(cli).inspect_err(|e| {
        error!(error = %e, "invalid INTERVAL");
    })?;

    info!(
        backend_url = %config.backend_url,
        interval = %humantime::format_duration(config.interval),
        endpoints = ?config.endpoints,
        request_timeout_ms = config.request_timeout.as_millis() as u64,
        cycle_timeout_ms = config.cycle_timeout.as_millis() as u64,
        "traffic generator configuration"
    );

    let generator = &TrafficGenerator::new(&config);
    let shutdown = podscope_core::shutdown::watch_channel();

    info!("starting traffic generation loop");
    let scheduler = PollScheduler::new(config.interval);
    let cycles = scheduler
        .run(shutdown, move || async move {
            generator.run_cycle().await;
        })
        .await;

    info!(cycles, "traffic generator stopped");
    Ok(())
}
