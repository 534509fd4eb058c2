// loader.rs — Batch iteration over an ImageDataset.
//
// Yields (images [B, C, H, W], labels [B]) tensor pairs on the requested
// device. Samples are taken in dataset order; the final batch may be short.

use candle_core::{Device, Tensor};

use crate::data::{ImageDataset, ImageSample};

pub struct Batcher<'a> {
    samples: &'a [ImageSample],
    batch_size: usize,
    device: &'a Device,
    pos: usize,
}

impl<'a> Batcher<'a> {
    pub fn new(dataset: &'a ImageDataset, batch_size: usize, device: &'a Device) -> Self {
        debug_assert!(batch_size > 0);
        Self {
            samples: dataset.samples(),
            batch_size,
            device,
            pos: 0,
        }
    }

    fn stack(&self, chunk: &[ImageSample]) -> anyhow::Result<(Tensor, Tensor)> {
        let images: Vec<&Tensor> = chunk.iter().map(|s| &s.image).collect();
        let labels: Vec<u32> = chunk.iter().map(|s| s.label).collect();

        let images = Tensor::stack(&images, 0)?.to_device(self.device)?;
        let labels = Tensor::new(labels.as_slice(), self.device)?;
        Ok((images, labels))
    }
}

impl Iterator for Batcher<'_> {
    type Item = anyhow::Result<(Tensor, Tensor)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.samples.len() {
            return None;
        }
        let end = (self.pos + self.batch_size).min(self.samples.len());
        let chunk = &self.samples[self.pos..end];
        self.pos = end;
        Some(self.stack(chunk))
    }
}
