// Integration test: pre-train over an ImageNet-style directory tree on disk.
//
// Builds a temp directory with 10 class directories of 5 dummy files each and
// runs the real filesystem ingestion end to end.

use std::fs;

use candle_core::{Device, Tensor};
use serde_json::json;
use vision_pretrain::{get_embedding, pre_train, FsImageIngest};

#[test]
fn pre_train_from_directory_tree() {
    let dir = tempfile::tempdir().unwrap();
    let train = dir.path().join("train");
    for c in 0..10 {
        let class_dir = train.join(format!("n{c:08}"));
        fs::create_dir_all(&class_dir).unwrap();
        for f in 0..5 {
            fs::write(class_dir.join(format!("img_{f}.jpg")), "dummy image data").unwrap();
        }
    }

    let config = json!({
        "data_path": dir.path(),
        "modality": "image",
        "architecture": "SimpleCNN",
        "in_channels": 3,
        "base_filters": 16,
        "n_blocks": 2,
        "batch_size": 2,
        "epochs": 1,
        "learning_rate": 0.001,
    });

    let (model, embed) = pre_train(&config, &FsImageIngest::new()).unwrap();

    // The classifier head must cover all 10 classes found on disk.
    let input = Tensor::randn(0f32, 1f32, (1, 3, 224, 224), &Device::Cpu).unwrap();
    let logits = model.forward(&input).unwrap();
    assert_eq!(logits.dims(), &[1, 10]);

    let embedding = embed(&input, &model).unwrap();
    assert_eq!(embedding.dims(), &[1, 256]);

    // Both accessors run on inference inputs; the standalone fn matches the
    // returned callable.
    let direct = get_embedding(&input, &model).unwrap();
    assert_eq!(direct.dims(), embedding.dims());
}
