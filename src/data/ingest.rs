// ingest.rs — Filesystem ingestion for ImageNet-style directory layouts.
//
// Walks <data_path>/train/<class_dir>/* (or <data_path>/<class_dir>/* when no
// train/ subdirectory exists). Each class directory becomes one label, in
// sorted order, and each regular file inside becomes one sample.
//
// Real image decoding is out of scope for this crate: pixel data is
// synthesized deterministically from the raw file bytes, so fixture files
// with arbitrary contents still produce valid training tensors.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use candle_core::{Device, Tensor};

use crate::config;
use crate::data::{DataConfig, DataIngest, ImageDataset, ImageSample};

pub struct FsImageIngest {
    device: Device,
}

impl FsImageIngest {
    pub fn new() -> Self {
        Self { device: Device::Cpu }
    }
}

impl Default for FsImageIngest {
    fn default() -> Self {
        Self::new()
    }
}

impl DataIngest for FsImageIngest {
    fn ingest(&self, cfg: &DataConfig) -> anyhow::Result<ImageDataset> {
        if cfg.data_type != config::data::MODALITY_IMAGE {
            bail!("unsupported data_type for filesystem ingestion: {}", cfg.data_type);
        }
        if cfg.image_size == 0 {
            bail!("image_size must be positive");
        }

        let root = class_root(&cfg.data_path);
        let class_dirs = sorted_entries(&root, |p| p.is_dir())
            .with_context(|| format!("scan class directories under {}", root.display()))?;
        if class_dirs.is_empty() {
            bail!("no class directories under {}", root.display());
        }

        let mut samples = Vec::new();
        for (label, class_dir) in class_dirs.iter().enumerate() {
            let files = sorted_entries(class_dir, |p| p.is_file())
                .with_context(|| format!("scan samples under {}", class_dir.display()))?;
            for file in files {
                let image = image_tensor(&file, cfg.image_size, &self.device)?;
                samples.push(ImageSample {
                    image,
                    label: label as u32,
                });
            }
        }

        log::info!(
            "Ingested {} samples across {} classes from {}",
            samples.len(),
            class_dirs.len(),
            root.display()
        );

        Ok(ImageDataset::new(samples))
    }
}

/// Prefer the ImageNet-style train/ subdirectory when it exists.
fn class_root(data_path: &Path) -> PathBuf {
    let train = data_path.join(config::data::TRAIN_SUBDIR);
    if train.is_dir() {
        train
    } else {
        data_path.to_path_buf()
    }
}

fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read_dir {}", dir.display()))? {
        let path = entry?.path();
        if keep(&path) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Build a `[3, size, size]` f32 tensor from the file's bytes, cycled to fill
/// the pixel buffer and scaled to [0, 1]. Empty files become a zero image.
fn image_tensor(path: &Path, size: usize, device: &Device) -> anyhow::Result<Tensor> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;

    let n = 3 * size * size;
    let pixels: Vec<f32> = if bytes.is_empty() {
        vec![0.0; n]
    } else {
        (0..n)
            .map(|i| bytes[i % bytes.len()] as f32 / config::data::PIXEL_SCALE)
            .collect()
    };

    Ok(Tensor::from_vec(pixels, (3, size, size), device)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture_tree(root: &Path, n_classes: usize, files_per_class: usize) {
        let train = root.join(config::data::TRAIN_SUBDIR);
        for c in 0..n_classes {
            let class_dir = train.join(format!("n{c:08}"));
            fs::create_dir_all(&class_dir).unwrap();
            for f in 0..files_per_class {
                fs::write(class_dir.join(format!("img_{f}.jpg")), b"dummy image data").unwrap();
            }
        }
    }

    #[test]
    fn test_ingest_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_tree(dir.path(), 3, 2);

        let cfg = DataConfig {
            data_type: "image".to_string(),
            data_path: dir.path().to_path_buf(),
            image_size: 16,
        };
        let ds = FsImageIngest::new().ingest(&cfg).unwrap();

        assert_eq!(ds.len(), 6);
        assert_eq!(ds.n_classes(), 3);
        let first = &ds.samples()[0];
        assert_eq!(first.image.dims(), &[3, 16, 16]);
        assert_eq!(first.label, 0);
        assert_eq!(ds.samples()[5].label, 2);
    }

    #[test]
    fn test_ingest_without_train_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let class_dir = dir.path().join("cats");
        fs::create_dir_all(&class_dir).unwrap();
        fs::write(class_dir.join("a.jpg"), b"x").unwrap();

        let cfg = DataConfig {
            data_type: "image".to_string(),
            data_path: dir.path().to_path_buf(),
            image_size: 8,
        };
        let ds = FsImageIngest::new().ingest(&cfg).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.n_classes(), 1);
    }

    #[test]
    fn test_ingest_rejects_unknown_modality() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DataConfig {
            data_type: "audio".to_string(),
            data_path: dir.path().to_path_buf(),
            image_size: 16,
        };
        let err = FsImageIngest::new().ingest(&cfg).unwrap_err();
        assert!(err.to_string().contains("unsupported data_type"));
    }

    #[test]
    fn test_ingest_empty_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DataConfig {
            data_type: "image".to_string(),
            data_path: dir.path().to_path_buf(),
            image_size: 16,
        };
        let err = FsImageIngest::new().ingest(&cfg).unwrap_err();
        assert!(err.to_string().contains("no class directories"));
    }

    #[test]
    fn test_image_tensor_values_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.bin");
        fs::write(&path, [255u8, 0u8]).unwrap();

        let t = image_tensor(&path, 2, &Device::Cpu).unwrap();
        let flat: Vec<f32> = t.flatten_all().unwrap().to_vec1().unwrap();
        assert_eq!(flat.len(), 12);
        assert!((flat[0] - 1.0).abs() < 1e-6);
        assert_eq!(flat[1], 0.0);
        assert!((flat[2] - 1.0).abs() < 1e-6);
    }
}
