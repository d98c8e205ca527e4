// ============================================================
// Layer 6 — Label Store
// ============================================================
// Loads the ordered class-label list from its JSON file.
//
// The file is a plain JSON array of strings:
//
//   ["airplane", "automobile", "bird", ...]
//
// Array order is load-bearing: position N in the file is class
// index N everywhere else in the system. The file is read once
// at process start and the resulting ClassLabels value is
// immutable for the process lifetime.

use anyhow::{ensure, Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::labels::ClassLabels;

const LABELS_FILE: &str = "class_names.json";

/// Reads (and, for bootstrap tooling, writes) the label file.
pub struct LabelStore {
    path: PathBuf,
}

impl LabelStore {
    /// Point the store at the directory holding the label file.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(LABELS_FILE),
        }
    }

    /// Load the label set.
    /// The service cannot start without it, so failures carry
    /// enough context to fix the deployment.
    pub fn load(&self) -> Result<ClassLabels> {
        let json = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Cannot read class label file '{}'. The service needs it to map \
                 model outputs to label names.",
                self.path.display()
            )
        })?;

        let names: Vec<String> = serde_json::from_str(&json).with_context(|| {
            format!(
                "'{}' is not a JSON array of label strings",
                self.path.display()
            )
        })?;

        ensure!(
            !names.is_empty(),
            "Class label file '{}' is empty",
            self.path.display()
        );

        tracing::info!("Loaded {} class labels", names.len());
        Ok(ClassLabels::new(names))
    }

    /// Write a label set out as pretty JSON.
    pub fn save(&self, labels: &ClassLabels) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).ok();
        }
        let names: Vec<&str> = labels.iter().map(|(_, name)| name).collect();
        let json = serde_json::to_string_pretty(&names)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write '{}'", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_preserves_file_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("class_names.json"),
            r#"["truck", "ship", "horse"]"#,
        )
        .unwrap();

        let labels = LabelStore::new(dir.path()).load().unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.name_at(0), Some("truck"));
        assert_eq!(labels.name_at(2), Some("horse"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LabelStore::new(dir.path()).load().is_err());
    }

    #[test]
    fn test_empty_array_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("class_names.json"), "[]").unwrap();
        assert!(LabelStore::new(dir.path()).load().is_err());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LabelStore::new(dir.path());
        let labels = ClassLabels::new(vec!["cat".into(), "dog".into()]);

        store.save(&labels).unwrap();
        let back = store.load().unwrap();
        assert_eq!(back.name_at(1), Some("dog"));
    }
}
