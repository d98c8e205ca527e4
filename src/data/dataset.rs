use burn::data::dataset::Dataset;

use crate::domain::image::TrainingSample;

/// In-memory training dataset over decoded image samples.
pub struct CifarDataset {
    samples: Vec<TrainingSample>,
}

impl CifarDataset {
    pub fn new(samples: Vec<TrainingSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<TrainingSample> for CifarDataset {
    fn get(&self, index: usize) -> Option<TrainingSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
