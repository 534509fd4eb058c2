// vision-pretrain — supervised pre-training for a simple convolutional image
// classifier, built on candle.
//
// The single entry point is `pre_train`: given a JSON configuration mapping
// and a data-ingestion collaborator, it trains a SimpleCNN over the ingested
// dataset and returns the model together with an embedding accessor over the
// 256-wide feature layer.

pub mod config;
pub mod data;
pub mod logging;
pub mod model;
pub mod pretrain;

pub use data::ingest::FsImageIngest;
pub use data::{DataConfig, DataIngest, ImageDataset, ImageSample};
pub use model::SimpleCnn;
pub use pretrain::{get_embedding, pre_train, EmbeddingFn, PreTrainConfig};
