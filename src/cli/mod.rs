// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `serve`   — runs the HTTP API (predict + retrain)
//   2. `predict` — classifies one image file from the terminal
//   3. `retrain` — retrains offline from a directory or archive
//
// Reference: Rust Book §12 (CLI programs)

pub mod commands;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use commands::{Commands, PredictArgs, RetrainArgs, ServeArgs};

use crate::application::predict_use_case::PredictUseCase;
use crate::application::retrain_use_case::RetrainUseCase;
use crate::domain::traits::ImageClassifier;
use crate::infra::label_store::LabelStore;
use crate::infra::model_store::ModelStore;

/// The main CLI struct — clap generates the argument parsing
/// from the derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "cifar-serve",
    version = "0.1.0",
    about = "Serve, query, and retrain a small image classifier over HTTP or the CLI."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This layer only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args)   => Self::run_serve(args),
            Commands::Predict(args) => Self::run_predict(args),
            Commands::Retrain(args) => Self::run_retrain(args),
        }
    }

    /// Handles the `serve` subcommand.
    /// Builds the shared state once, then hands the process over
    /// to the HTTP server until it is stopped.
    fn run_serve(args: ServeArgs) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", args.host, args.port)
            .parse()
            .with_context(|| format!("'{}:{}' is not a valid bind address", args.host, args.port))?;

        let config = args.into();

        // main() stays synchronous; the runtime lives only as long
        // as the server does
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Cannot start the async runtime")?;

        runtime.block_on(async {
            let state = crate::api::AppState::initialize(config)?;
            crate::api::serve(addr, state).await
        })
    }

    /// Handles the `predict` subcommand.
    /// Loads the model, classifies one file, prints the result.
    fn run_predict(args: PredictArgs) -> Result<()> {
        let store = ModelStore::new(&args.model_dir);
        let labels = Arc::new(LabelStore::new(&args.model_dir).load()?);
        let use_case = PredictUseCase::from_store(&store, labels)?;

        let bytes = std::fs::read(&args.image)
            .with_context(|| format!("Cannot read image '{}'", args.image))?;
        let prediction = use_case.classify(&bytes)?;

        println!(
            "{}  (confidence {:.1}%)",
            prediction.label,
            prediction.confidence * 100.0
        );
        Ok(())
    }

    /// Handles the `retrain` subcommand.
    /// Works from either an already-extracted directory tree or
    /// a zip archive on disk.
    fn run_retrain(args: RetrainArgs) -> Result<()> {
        let labels = Arc::new(LabelStore::new(&args.model_dir).load()?);
        let data_dir = args.data_dir.clone();
        let archive = args.archive.clone();
        let use_case = RetrainUseCase::new(args.into(), labels);

        let report = match (data_dir, archive) {
            (Some(dir), None) => use_case.execute_dir(Path::new(&dir))?,
            (None, Some(path)) => {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("Cannot read archive '{path}'"))?;
                use_case.execute_archive(&bytes)?
            }
            _ => bail!("exactly one of --data-dir or --archive is required"),
        };

        println!(
            "Retrained on {} samples over {} epochs ({} files skipped).",
            report.samples,
            report.epochs,
            report.skipped.len()
        );
        for skip in &report.skipped {
            println!("  skipped {} — {}", skip.path, skip.reason);
        }
        Ok(())
    }
}
