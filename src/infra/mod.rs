// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns used by several layers:
//
//   model_store.rs — Saving and loading the model artifact and
//                    its architecture config. Saves go through
//                    a temp file + rename so a crash mid-write
//                    can never leave a half-written artifact at
//                    the well-known path.
//
//   label_store.rs — Loads the ordered class-label list from
//                    its JSON file at process start.
//
//   metrics.rs     — Per-epoch training metrics appended to a
//                    CSV file for later analysis.
//
// Reference: Rust Book §7 (Modules), §9 (Error Handling)
//            Burn Book §5 (Records and Checkpointing)

/// Model artifact and architecture-config persistence
pub mod model_store;

/// Class-label JSON loading
pub mod label_store;

/// Training metrics CSV logger
pub mod metrics;
