// ============================================================
// Layer 2 — RetrainUseCase
// ============================================================
// Orchestrates the full retraining pipeline in order:
//
//   Step 1: Extract the uploaded archive   (Layer 4 - data)
//   Step 2: Load the labelled dataset      (Layer 4 - data)
//   Step 3: Load (or initialize) the model (Layer 5/6)
//   Step 4: Run the training loop          (Layer 5 - ml)
//   Step 5: Persist the updated artifact   (Layer 6 - infra)
//
// The pipeline is strictly linear. Two failures are terminal
// client errors with NO state change: a bad archive (step 1)
// and an empty training batch (step 2). Anything that fails
// after training has started is an internal error — but the
// served model is only ever replaced by the rename in step 5,
// so a failed run leaves the previous artifact fully intact.
//
// The working directory is removed again after every run; the
// uploaded archive only ever exists in memory.

use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::data::archive::ArchiveExtractor;
use crate::data::dataset::CifarDataset;
use crate::data::loader::DatasetLoader;
use crate::domain::labels::ClassLabels;
use crate::domain::report::RetrainReport;
use crate::domain::traits::SampleSource;
use crate::error::ServiceError;
use crate::infra::metrics::MetricsLogger;
use crate::infra::model_store::ModelStore;
use crate::ml::model::{CnnModel, CnnModelConfig};
use crate::ml::trainer::{run_training, TrainBackend, TrainDevice};

// ─── Retraining Configuration ────────────────────────────────────────────────
// Paths and hyperparameters for a retraining run. Serialisable
// so a run's settings can be logged or persisted alongside the
// artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrainConfig {
    /// Directory holding model.bin, model_config.json and
    /// class_names.json
    pub model_dir: String,

    /// Directory uploaded archives are extracted into
    pub working_dir: String,

    /// Passes over the training batch per retrain
    pub epochs: usize,

    /// Samples per forward/backward pass
    pub batch_size: usize,

    /// Adam learning rate
    pub lr: f64,
}

impl Default for RetrainConfig {
    fn default() -> Self {
        Self {
            model_dir:   "models".to_string(),
            working_dir: "data/retrain".to_string(),
            epochs:      3,
            batch_size:  32,
            lr:          1e-3,
        }
    }
}

// ─── RetrainUseCase ──────────────────────────────────────────────────────────
/// Owns the config and runs the retraining pipeline end to end.
///
/// The use case itself is stateless between runs — everything
/// durable lives in the model store. Callers are responsible
/// for serializing concurrent runs (the api layer holds a gate
/// so two retrains can never interleave).
pub struct RetrainUseCase {
    config: RetrainConfig,
    labels: Arc<ClassLabels>,
}

impl RetrainUseCase {
    pub fn new(config: RetrainConfig, labels: Arc<ClassLabels>) -> Self {
        Self { config, labels }
    }

    /// Retrain from an uploaded archive (the HTTP path).
    pub fn execute_archive(&self, archive: &[u8]) -> Result<RetrainReport, ServiceError> {
        tracing::info!("Retrain request received ({} bytes)", archive.len());

        // ── Step 1: extract into a fresh working directory ───────────────────
        let extractor = ArchiveExtractor::new(&self.config.working_dir);
        let root = extractor.extract(archive)?.to_path_buf();

        let result = self.train_from_directory(&root);

        // The extracted tree has served its purpose either way
        extractor.cleanup();
        result
    }

    /// Retrain from an existing directory tree (the CLI path).
    /// The directory is read, never modified or removed.
    pub fn execute_dir(&self, root: &Path) -> Result<RetrainReport, ServiceError> {
        tracing::info!("Retraining from directory '{}'", root.display());
        self.train_from_directory(root)
    }

    fn train_from_directory(&self, root: &Path) -> Result<RetrainReport, ServiceError> {
        // ── Step 2: assemble the training batch ──────────────────────────────
        let loader = DatasetLoader::new(root);
        let set = loader.load_all(&self.labels)?;

        if set.is_empty() {
            // Distinct, reportable condition: extraction worked but
            // nothing usable was inside. The model stays untouched.
            return Err(ServiceError::NoValidData);
        }
        let sample_count = set.sample_count();
        let skipped = set.skipped.clone();

        // ── Step 3: load the current model, or start fresh ───────────────────
        let store = ModelStore::new(&self.config.model_dir);
        let device = TrainDevice::default();

        let model_cfg = if store.has_config() {
            store.load_config()?
        } else {
            CnnModelConfig::new(self.labels.len())
        };
        if model_cfg.num_classes != self.labels.len() {
            return Err(ServiceError::Internal(anyhow!(
                "model artifact outputs {} classes but the label file lists {}",
                model_cfg.num_classes,
                self.labels.len()
            )));
        }

        let model: CnnModel<TrainBackend> = model_cfg.init(&device);
        let model = if store.has_model() {
            store.load_model(model, &device)?
        } else {
            tracing::warn!("No existing model artifact — training a fresh model");
            model
        };

        // ── Step 4: fit on the batch ─────────────────────────────────────────
        let metrics = MetricsLogger::new(&self.config.model_dir)?;
        let trained = run_training(
            &self.config,
            model,
            CifarDataset::new(set.samples),
            device,
            &metrics,
        )?;

        // ── Step 5: persist — replaces the previous artifact wholesale ───────
        store.save_config(&model_cfg)?;
        store.save_model(&trained)?;

        tracing::info!(
            "Retrain complete: {} samples, {} skipped, {} epochs",
            sample_count,
            skipped.len(),
            self.config.epochs
        );

        Ok(RetrainReport {
            samples: sample_count,
            skipped,
            epochs: self.config.epochs,
        })
    }
}
