#![allow(dead_code, unused_imports)]
#![recursion_limit = "256"]

mod cli;
mod api;
mod application;
mod domain;
mod data;
mod ml;
mod infra;
mod error;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cifar_serve=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
