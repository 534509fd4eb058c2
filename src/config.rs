// IMPORTANT:
// Keep ALL numeric values centralized here (repo rule: no hardcoded numeric values scattered around).

// NOTE: CRATE_VERSION must stay in sync with the `version` field in Cargo.toml.
pub const CRATE_VERSION: &str = "0.1.0";

pub mod logging {
    pub const LOG_DIR_REL: &str = ".vision-pretrain/logs";
    pub const LOG_FILE_NAME: &str = "pretrain.log";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;
}

pub mod data {
    // Input images are square; the derived ingestion sub-config always requests this edge length.
    pub const IMAGE_SIZE: usize = 224;

    pub const MODALITY_IMAGE: &str = "image";

    // Class directories live under <data_path>/train/ when present (ImageNet-style layout),
    // otherwise directly under <data_path>.
    pub const TRAIN_SUBDIR: &str = "train";

    pub const PIXEL_SCALE: f32 = 255.0;
}

pub mod model {
    pub const ARCH_SIMPLE_CNN: &str = "SimpleCNN";

    // Width of the feature layer used for embeddings. Fixed regardless of
    // base_filters so downstream consumers can rely on the vector size.
    pub const EMBEDDING_DIMS: usize = 256;

    pub const CONV_KERNEL_SIZE: usize = 3;
    pub const CONV_PADDING: usize = 1;
    pub const POOL_SIZE: usize = 2;
}
