// ============================================================
// Layer 3 — Class Labels
// ============================================================
// The ordered list of category names the classifier can output.
//
// Order matters: the position of a label in this list IS the
// numeric class index the model trains against and predicts.
// The set is loaded once at process start and never mutated —
// retraining replaces the model, never the label list.

use serde::{Deserialize, Serialize};

/// Ordered, read-only set of class labels.
///
/// Index position doubles as the model's output class index,
/// so `name_at(2)` is the label for output neuron 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    /// Create a label set from an ordered list of names.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Number of classes the model must discriminate between.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Label at a given class index, or None if out of range.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|s| s.as_str())
    }

    /// Iterate labels in index order as (class_index, name) pairs.
    /// The dataset loader walks directories in exactly this order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, s)| (i, s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cifar_labels() -> ClassLabels {
        ClassLabels::new(vec![
            "airplane".into(),
            "automobile".into(),
            "bird".into(),
        ])
    }

    #[test]
    fn test_index_position_is_class_index() {
        let labels = cifar_labels();
        assert_eq!(labels.name_at(0), Some("airplane"));
        assert_eq!(labels.name_at(2), Some("bird"));
        assert_eq!(labels.name_at(3), None);
    }

    #[test]
    fn test_iter_preserves_order() {
        let labels = cifar_labels();
        let collected: Vec<(usize, &str)> = labels.iter().collect();
        assert_eq!(collected[1], (1, "automobile"));
        assert_eq!(collected.len(), 3);
    }
}
