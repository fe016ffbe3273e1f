//! Plate Insights - Vehicle Registration Make Report
//!
//! Reads registration records from a CSV file and charts them by manufacturer.

mod app;
mod charts;
mod config;
mod data;

use clap::Parser;
use config::Args;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    app::run(&args)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
