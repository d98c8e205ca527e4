// ============================================================
// Layer 6 — Model Store
// ============================================================
// Persists and restores the classifier using Burn's record
// system.
//
// What gets saved:
//   1. model.bin          — all learned parameters (binary record)
//   2. model_config.json  — the architecture config
//
// Why save the config separately?
//   When loading for inference, we must rebuild a model with the
//   exact same architecture (number of classes, dropout) before
//   the weights can be loaded into it.
//
// Why record to BYTES instead of letting a file recorder write?
//   The artifact at the well-known path is replaced wholesale on
//   every retrain. Recording to a byte buffer lets us own the
//   file write: bytes go to model.bin.tmp first and are renamed
//   over model.bin afterwards, so a process that dies mid-write
//   leaves the previous artifact intact and loadable.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use burn::{
    prelude::*,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::ml::model::{CnnModel, CnnModelConfig};

const MODEL_FILE:  &str = "model.bin";
const MODEL_TMP:   &str = "model.bin.tmp";
const CONFIG_FILE: &str = "model_config.json";

/// Manages the single persisted model artifact.
/// All files live in the configured directory.
#[derive(Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    /// Create a new ModelStore.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// True when a previously persisted artifact exists.
    pub fn has_model(&self) -> bool {
        self.dir.join(MODEL_FILE).is_file()
    }

    pub fn has_config(&self) -> bool {
        self.dir.join(CONFIG_FILE).is_file()
    }

    /// Persist the model, replacing any previous artifact.
    ///
    /// The record bytes are written to a temporary file first and
    /// renamed into place, so readers only ever observe either the
    /// old artifact or the complete new one.
    pub fn save_model<B: AutodiffBackend>(&self, model: &CnnModel<B>) -> Result<()> {
        let bytes = BinBytesRecorder::<FullPrecisionSettings>::default()
            .record(model.clone().into_record(), ())
            .context("Failed to serialize model record")?;

        let tmp_path   = self.dir.join(MODEL_TMP);
        let final_path = self.dir.join(MODEL_FILE);

        fs::write(&tmp_path, &bytes)
            .with_context(|| format!("Failed to write '{}'", tmp_path.display()))?;
        fs::rename(&tmp_path, &final_path)
            .with_context(|| format!("Failed to move artifact into '{}'", final_path.display()))?;

        tracing::info!(
            "Persisted model artifact ({} bytes) to '{}'",
            bytes.len(),
            final_path.display()
        );
        Ok(())
    }

    /// Load the persisted weights into a freshly built model.
    ///
    /// The model parameter must have the architecture the artifact
    /// was saved with, or loading fails.
    pub fn load_model<B: Backend>(
        &self,
        model:  CnnModel<B>,
        device: &B::Device,
    ) -> Result<CnnModel<B>> {
        let path = self.dir.join(MODEL_FILE);

        let bytes = fs::read(&path).with_context(|| {
            format!(
                "Cannot read model artifact '{}'. Has the model been trained yet?",
                path.display()
            )
        })?;

        let record = BinBytesRecorder::<FullPrecisionSettings>::default()
            .load(bytes, device)
            .with_context(|| format!("Corrupt model artifact '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    /// Save the architecture config next to the artifact.
    pub fn save_config(&self, cfg: &CnnModelConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        Ok(())
    }

    /// Load the architecture config.
    /// Needed before the weights so the model can be rebuilt.
    pub fn load_config(&self) -> Result<CnnModelConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read model config '{}'. Has the model been trained yet?",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
