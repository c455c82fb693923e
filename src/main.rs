//! Avocado Charts - CSV aggregation & static chart generation
//!
//! Renders five descriptive charts from an avocado sales CSV.

use anyhow::Result;
use avocado_charts::config::{Cli, Config};
use avocado_charts::pipeline;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::try_from(cli)?;
    let report = pipeline::run(&config)?;

    for chart in &report.charts {
        info!(path = %chart.display(), "rendered");
    }
    Ok(())
}
