// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fits the classifier on one training batch using Burn's
// DataLoader and Adam.
//
// The loop is intentionally plain: a small fixed number of
// epochs over whatever the dataset loader produced. There is no
// early stopping and no held-out split — retraining fits on the
// full uploaded batch, and per-epoch loss/accuracy go to the
// metrics CSV so a bad run is at least visible after the fact.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::retrain_use_case::RetrainConfig;
use crate::data::{batcher::ImageBatcher, dataset::CifarDataset};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::CnnModel;

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type TrainDevice  = burn::backend::ndarray::NdArrayDevice;

// Fixed shuffle seed for the data loader; the framework itself
// makes no determinism promise beyond batch ordering.
const SHUFFLE_SEED: u64 = 42;

/// Run the full training loop and return the fitted model.
pub fn run_training(
    cfg:     &RetrainConfig,
    model:   CnnModel<TrainBackend>,
    dataset: CifarDataset,
    device:  TrainDevice,
    metrics: &MetricsLogger,
) -> Result<CnnModel<TrainBackend>> {
    let sample_count = dataset.sample_count();
    tracing::info!(
        "Training on {} samples for {} epochs (batch size {})",
        sample_count,
        cfg.epochs,
        cfg.batch_size
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    let mut model = model;

    // ── Training data loader ──────────────────────────────────────────────────
    let batcher = ImageBatcher::<TrainBackend>::new(device);
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(SHUFFLE_SEED)
        .num_workers(1)
        .build(dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut correct  = 0usize;
        let mut total    = 0usize;

        for batch in loader.iter() {
            let targets = batch.targets.clone();
            let (loss, logits) = model.forward_loss(batch.images, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val;
            batches  += 1;

            // argmax(1) returns shape [batch, 1] — flatten to [batch]
            // before comparing with the targets
            let predicted = logits.argmax(1).flatten::<1>(0, 1);
            let batch_correct: i64 = predicted
                .equal(targets.clone())
                .int().sum().into_scalar().elem::<i64>();
            correct += batch_correct as usize;
            total   += targets.dims()[0];

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let accuracy = if total > 0 { correct as f64 / total as f64 } else { 0.0 };

        tracing::info!(
            "Epoch {:>2}/{} | train_loss={:.4} | train_acc={:.1}%",
            epoch,
            cfg.epochs,
            avg_loss,
            accuracy * 100.0,
        );
        metrics.log(&EpochMetrics::new(epoch, avg_loss, accuracy))?;
    }

    tracing::info!("Training complete");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::{ImageTensor, TrainingSample, TENSOR_LEN};
    use crate::ml::model::CnnModelConfig;

    fn tiny_dataset() -> CifarDataset {
        // Two strongly distinct constant images, one per class
        let samples = vec![
            TrainingSample::new(ImageTensor::new(vec![0.05; TENSOR_LEN]), 0),
            TrainingSample::new(ImageTensor::new(vec![0.95; TENSOR_LEN]), 1),
        ];
        CifarDataset::new(samples)
    }

    #[test]
    fn test_one_epoch_runs_and_returns_a_model() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        let cfg = RetrainConfig {
            epochs: 1,
            batch_size: 2,
            ..RetrainConfig::default()
        };

        let device = TrainDevice::default();
        let model = CnnModelConfig::new(2).init::<TrainBackend>(&device);

        let trained = run_training(&cfg, model, tiny_dataset(), device, &metrics);
        assert!(trained.is_ok());

        // One metrics row must have been written
        let csv = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 2); // header + one epoch
    }
}
