// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw bytes on the wire (or on disk) and
// tensor batches the model can consume.
//
// The retraining pipeline flows in this order:
//
//   uploaded zip archive
//       │
//       ▼
//   ArchiveExtractor  → expands into a fresh working directory
//       │
//       ▼
//   DatasetLoader     → walks class folders in label order
//       │
//       ▼
//   ImageDecoder      → bytes → 32×32×3 tensor in [0,1]
//       │
//       ▼
//   CifarDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher      → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// The prediction path reuses only the decoder.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Decodes, resizes, and normalizes raw image bytes
pub mod decoder;

/// Expands uploaded zip archives into a working directory
pub mod archive;

/// Walks a directory tree of class folders into a TrainingSet
pub mod loader;

/// Implements Burn's Dataset trait for training samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
