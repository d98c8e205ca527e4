// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Walks a directory tree of labelled image folders and builds
// the in-memory training set.
//
// Expected layout, with directory names matching the label set:
//
//   <root>/
//     airplane/   img1.png img2.jpg ...
//     automobile/ ...
//     bird/       ...
//
// Walk order follows the label set's fixed order, which is also
// what assigns each sample its numeric class index. Per-label
// rules:
//   - missing directory  → skip the label, not an error
//   - empty directory    → skip, not an error
//   - undecodable file   → skip the FILE, record why
//
// A single file is never allowed to abort the whole load; an
// entirely empty result is the orchestrator's problem to report.
//
// Reference: Rust Book §9 (Error Handling)

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data::decoder;
use crate::domain::image::TrainingSample;
use crate::domain::labels::ClassLabels;
use crate::domain::report::{SkippedFile, TrainingSet};
use crate::domain::traits::SampleSource;

/// Loads labelled training images from a directory tree.
/// Implements the SampleSource trait from Layer 3.
pub struct DatasetLoader {
    /// Root of the extracted archive (or any labelled tree)
    root: PathBuf,
}

impl DatasetLoader {
    /// Create a new DatasetLoader pointed at a directory tree.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SampleSource for DatasetLoader {
    fn load_all(&self, labels: &ClassLabels) -> Result<TrainingSet> {
        let mut samples = Vec::new();
        let mut skipped = Vec::new();

        // Label order defines the class index used for training
        for (class_index, name) in labels.iter() {
            let class_dir = self.root.join(name);

            // A label with no matching directory simply contributes
            // no samples to this batch.
            if !class_dir.is_dir() {
                tracing::debug!("No directory for label '{}' — skipping", name);
                continue;
            }

            let entries = std::fs::read_dir(&class_dir)
                .with_context(|| format!("Cannot read directory '{}'", class_dir.display()))?;

            for entry in entries {
                let entry = entry?;
                let path = entry.path();

                if !path.is_file() {
                    continue;
                }

                match decoder::decode_file(&path) {
                    Ok(tensor) => {
                        samples.push(TrainingSample::new(tensor, class_index));
                    }
                    // Log a warning and keep going — one bad file
                    // never aborts the batch, but it IS recorded.
                    Err(err) => {
                        tracing::warn!("Skipping '{}': {}", path.display(), err);
                        skipped.push(SkippedFile::new(
                            path.display().to_string(),
                            err.to_string(),
                        ));
                    }
                }
            }
        }

        tracing::info!(
            "Loaded {} training samples ({} files skipped)",
            samples.len(),
            skipped.len()
        );
        Ok(TrainingSet::new(samples, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::fs;
    use std::io::Cursor;

    fn labels() -> ClassLabels {
        ClassLabels::new(vec!["cat".into(), "dog".into(), "frog".into()])
    }

    fn write_png(path: &std::path::Path, rgb: [u8; 3]) {
        let mut img = RgbImage::new(8, 8);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(rgb);
        }
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        fs::write(path, buf).unwrap();
    }

    #[test]
    fn test_assigns_class_index_by_label_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cat")).unwrap();
        fs::create_dir(dir.path().join("dog")).unwrap();
        write_png(&dir.path().join("cat/a.png"), [255, 0, 0]);
        write_png(&dir.path().join("dog/b.png"), [0, 255, 0]);

        let set = DatasetLoader::new(dir.path()).load_all(&labels()).unwrap();

        assert_eq!(set.sample_count(), 2);
        let mut indices: Vec<usize> =
            set.samples.iter().map(|s| s.class_index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_missing_and_empty_label_dirs_are_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        // "cat" missing entirely, "dog" present but empty
        fs::create_dir(dir.path().join("dog")).unwrap();
        write_png(&dir.path().join("unrelated.png"), [1, 2, 3]);

        let set = DatasetLoader::new(dir.path()).load_all(&labels()).unwrap();

        assert!(set.is_empty());
        assert!(set.skipped.is_empty());
    }

    #[test]
    fn test_unknown_directories_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zebra")).unwrap();
        write_png(&dir.path().join("zebra/z.png"), [9, 9, 9]);

        let set = DatasetLoader::new(dir.path()).load_all(&labels()).unwrap();
        // "zebra" is not in the label set, so its images never load
        assert!(set.is_empty());
    }

    #[test]
    fn test_bad_files_are_skipped_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("frog")).unwrap();
        write_png(&dir.path().join("frog/good.png"), [0, 128, 0]);
        fs::write(dir.path().join("frog/broken.png"), b"not an image").unwrap();

        let set = DatasetLoader::new(dir.path()).load_all(&labels()).unwrap();

        assert_eq!(set.sample_count(), 1);
        assert_eq!(set.samples[0].class_index, 2);
        assert_eq!(set.skipped.len(), 1);
        assert!(set.skipped[0].path.contains("broken.png"));
    }
}
