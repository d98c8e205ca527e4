// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands (`serve`, `predict`, `retrain`)
// and their configurable flags. clap's derive macros generate
// the help text, error messages, and type conversions.

use clap::{Args, Subcommand};

use crate::application::retrain_use_case::RetrainConfig;

/// The top-level subcommands available to the user.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API (health, predict, retrain)
    Serve(ServeArgs),

    /// Classify a single image file and print the result
    Predict(PredictArgs),

    /// Retrain the model from labelled images on disk
    Retrain(RetrainArgs),
}

/// All arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Directory holding the model artifact and class labels
    #[arg(long, default_value = "models")]
    pub model_dir: String,

    /// Directory uploaded archives are extracted into
    #[arg(long, default_value = "data/retrain")]
    pub working_dir: String,

    /// Passes over the uploaded batch per retrain
    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    /// Samples per forward/backward pass during retraining
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate for retraining
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,
}

/// Convert CLI ServeArgs into the application-layer config.
/// The application layer never sees clap types.
impl From<ServeArgs> for RetrainConfig {
    fn from(a: ServeArgs) -> Self {
        RetrainConfig {
            model_dir:   a.model_dir,
            working_dir: a.working_dir,
            epochs:      a.epochs,
            batch_size:  a.batch_size,
            lr:          a.lr,
        }
    }
}

/// All arguments for the `predict` command.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Path of the image file to classify
    #[arg(long)]
    pub image: String,

    /// Directory holding the model artifact and class labels
    #[arg(long, default_value = "models")]
    pub model_dir: String,
}

/// All arguments for the `retrain` command.
#[derive(Args, Debug)]
pub struct RetrainArgs {
    /// Directory tree of labelled images (class_name/image files)
    #[arg(long, conflicts_with = "archive")]
    pub data_dir: Option<String>,

    /// Zip archive of labelled images instead of a directory
    #[arg(long)]
    pub archive: Option<String>,

    /// Directory holding the model artifact and class labels
    #[arg(long, default_value = "models")]
    pub model_dir: String,

    /// Directory archives are extracted into
    #[arg(long, default_value = "data/retrain")]
    pub working_dir: String,

    /// Passes over the training batch
    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    /// Samples per forward/backward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,
}

impl From<RetrainArgs> for RetrainConfig {
    fn from(a: RetrainArgs) -> Self {
        RetrainConfig {
            model_dir:   a.model_dir,
            working_dir: a.working_dir,
            epochs:      a.epochs,
            batch_size:  a.batch_size,
            lr:          a.lr,
        }
    }
}
