// ============================================================
// API Layer — Shared State
// ============================================================
// One AppState is built at startup and cloned into every
// handler (all fields are Arcs, so a clone is cheap).
//
// Ownership rules, which encode the concurrency model:
//   - labels:     immutable for the process lifetime
//   - classifier: read-locked by predictions, write-locked only
//                 for the swap after a successful retrain — so
//                 in-flight predictions always see a complete
//                 model, old or new, never a half-updated one
//   - retrain_gate: held for the whole retrain; try_lock means
//                 a second concurrent retrain is REJECTED, not
//                 queued or interleaved

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Mutex, RwLock};

use crate::application::predict_use_case::PredictUseCase;
use crate::application::retrain_use_case::{RetrainConfig, RetrainUseCase};
use crate::domain::labels::ClassLabels;
use crate::infra::label_store::LabelStore;
use crate::infra::model_store::ModelStore;

#[derive(Clone)]
pub struct AppState {
    /// The serving model + label lookup, swapped after retrains
    pub classifier: Arc<RwLock<PredictUseCase>>,

    /// The retraining pipeline (stateless between runs)
    pub retrainer: Arc<RetrainUseCase>,

    /// Ensures at most one retrain runs at a time
    pub retrain_gate: Arc<Mutex<()>>,

    /// For rebuilding the classifier after a retrain persists
    pub store: ModelStore,

    pub labels: Arc<ClassLabels>,
}

impl AppState {
    /// Load everything the service needs to start serving:
    /// the class labels, the persisted model, and the retraining
    /// pipeline. Fails (with context) when either artifact is
    /// missing — the API cannot run without a model to serve.
    pub fn initialize(config: RetrainConfig) -> Result<Self> {
        let labels = Arc::new(LabelStore::new(&config.model_dir).load()?);
        let store = ModelStore::new(&config.model_dir);

        let classifier = PredictUseCase::from_store(&store, labels.clone())?;
        let retrainer = RetrainUseCase::new(config, labels.clone());

        Ok(Self {
            classifier: Arc::new(RwLock::new(classifier)),
            retrainer: Arc::new(retrainer),
            retrain_gate: Arc::new(Mutex::new(())),
            store,
            labels,
        })
    }
}
