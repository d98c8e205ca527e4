// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the classifier service.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - NO ML-specific code
//   - Only plain Rust structs, enums, and traits
//
// Keeping this layer pure means every type here can be unit
// tested without a model on disk, and every other layer agrees
// on what a label, a tensor, or a report IS.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The ordered, immutable set of class labels
pub mod labels;

// Decoded image tensors and labelled training samples
pub mod image;

// Prediction results returned to callers
pub mod prediction;

// Dataset loading and retraining reports
pub mod report;

// Core abstractions (traits) that other layers implement
pub mod traits;
