// data/ — Dataset types, the ingestion collaborator, and batching.
//
// Provides:
// - DataConfig: the sub-configuration handed to ingestion
// - DataIngest trait + filesystem implementation
// - ImageDataset / ImageSample
// - Batcher: per-epoch batch tensors

pub mod ingest;
pub mod loader;

use std::path::PathBuf;

use candle_core::Tensor;
use serde::{Deserialize, Serialize};

/// The exact configuration passed to the ingestion collaborator, derived from
/// the top-level pre-training config (`data_type` = modality, `image_size` fixed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_type: String,
    pub data_path: PathBuf,
    pub image_size: usize,
}

/// One labeled sample: a `[C, H, W]` f32 image tensor and its class index.
#[derive(Debug, Clone)]
pub struct ImageSample {
    pub image: Tensor,
    pub label: u32,
}

/// A labeled dataset, built once per training call and iterated per epoch.
#[derive(Debug, Default)]
pub struct ImageDataset {
    samples: Vec<ImageSample>,
}

impl ImageDataset {
    pub fn new(samples: Vec<ImageSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[ImageSample] {
        &self.samples
    }

    /// Number of classes implied by the labels (max label + 1).
    /// Classes absent from the data still count if a higher label is present.
    pub fn n_classes(&self) -> usize {
        self.samples
            .iter()
            .map(|s| s.label as usize + 1)
            .max()
            .unwrap_or(0)
    }
}

/// The data-ingestion collaborator. Injected into `pre_train` so tests can
/// substitute a fake without any runtime patching.
pub trait DataIngest {
    fn ingest(&self, config: &DataConfig) -> anyhow::Result<ImageDataset>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn sample(label: u32) -> ImageSample {
        let image = Tensor::zeros((3, 8, 8), candle_core::DType::F32, &Device::Cpu).unwrap();
        ImageSample { image, label }
    }

    #[test]
    fn test_n_classes_from_labels() {
        let ds = ImageDataset::new(vec![sample(0), sample(4), sample(2)]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.n_classes(), 5);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = ImageDataset::default();
        assert!(ds.is_empty());
        assert_eq!(ds.n_classes(), 0);
    }
}
