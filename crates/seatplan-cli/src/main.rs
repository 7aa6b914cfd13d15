//! `seatplan`: classroom seating charts from the command line.
//!
//! Usage:
//!   seatplan import roster.xlsx -o plan.json
//!   seatplan template --students 26 --male 14 --female 12
//!   seatplan check --plan plan.json
//!   seatplan assign --plan plan.json --seed 7

mod assign;
mod check;
mod cli;
mod import;
mod plan;
mod template;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<ExitCode> {
    // Logs go to stderr so charts and JSON on stdout stay clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run(cli::Cli::parse())
}
