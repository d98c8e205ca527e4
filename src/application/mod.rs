// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (classifying one image, or retraining the
// model on an uploaded batch).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No HTTP types here (that's the api layer)
//   - Only workflow coordination and the service's error policy
//
// Reference: Clean Architecture pattern

// The single-image classification workflow
pub mod predict_use_case;

// The retraining workflow (extract → load → train → persist)
pub mod retrain_use_case;
