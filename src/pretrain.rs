// pretrain.rs — The pre-training entry point.
//
// Coordinates dataset acquisition (via the injected DataIngest collaborator),
// model construction, and the optimization loop. Returns the trained model
// plus the embedding accessor. Runs the full fixed schedule: no early
// stopping, no validation split.

use anyhow::{bail, Context};
use candle_core::Tensor;
use candle_nn::{loss, AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use serde::Deserialize;
use serde_json::Value;

use crate::config;
use crate::data::loader::Batcher;
use crate::data::{DataConfig, DataIngest, ImageDataset};
use crate::model::SimpleCnn;

/// Pre-training options. Deserialized from a JSON mapping; all keys required.
#[derive(Debug, Clone, Deserialize)]
pub struct PreTrainConfig {
    pub data_path: std::path::PathBuf,
    pub modality: String,
    pub architecture: String,
    pub in_channels: usize,
    pub base_filters: usize,
    pub n_blocks: usize,
    pub batch_size: usize,
    pub epochs: usize,
    pub learning_rate: f64,
}

impl PreTrainConfig {
    pub fn from_value(config: &Value) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_value(config.clone())
            .context("invalid pre-training configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.modality.trim().is_empty() {
            bail!("configuration error: modality must be non-empty");
        }
        if self.architecture.trim().is_empty() {
            bail!("configuration error: architecture must be non-empty");
        }
        for (name, value) in [
            ("in_channels", self.in_channels),
            ("base_filters", self.base_filters),
            ("n_blocks", self.n_blocks),
            ("batch_size", self.batch_size),
            ("epochs", self.epochs),
        ] {
            if value == 0 {
                bail!("configuration error: {name} must be positive");
            }
        }
        if !(self.learning_rate > 0.0) {
            bail!("configuration error: learning_rate must be positive");
        }
        Ok(())
    }

    /// The sub-configuration handed to the ingestion collaborator.
    pub fn data_config(&self) -> DataConfig {
        DataConfig {
            data_type: self.modality.clone(),
            data_path: self.data_path.clone(),
            image_size: config::data::IMAGE_SIZE,
        }
    }
}

/// Embedding accessor returned alongside the trained model.
pub type EmbeddingFn = fn(&Tensor, &SimpleCnn) -> anyhow::Result<Tensor>;

/// Train a classifier over the ingested dataset and return it together with
/// the embedding accessor.
pub fn pre_train(
    config: &Value,
    ingest: &dyn DataIngest,
) -> anyhow::Result<(SimpleCnn, EmbeddingFn)> {
    let cfg = PreTrainConfig::from_value(config)?;

    let data_config = cfg.data_config();
    log::info!(
        "Pre-training: ingesting {} data from {}",
        data_config.data_type,
        data_config.data_path.display()
    );
    let dataset = ingest.ingest(&data_config)?;

    if dataset.is_empty() {
        bail!("input data error: ingested dataset is empty");
    }
    let n_classes = dataset.n_classes();
    log::info!(
        "Dataset ready: {} samples, {} classes",
        dataset.len(),
        n_classes
    );

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, candle_core::DType::F32, &candle_core::Device::Cpu);
    let model = build_model(&cfg, n_classes, vb)?;

    fit(&model, &varmap, &dataset, &cfg)?;

    Ok((model, get_embedding))
}

fn build_model(cfg: &PreTrainConfig, n_classes: usize, vb: VarBuilder) -> anyhow::Result<SimpleCnn> {
    match cfg.architecture.as_str() {
        a if a == config::model::ARCH_SIMPLE_CNN => SimpleCnn::new(
            cfg.in_channels,
            cfg.base_filters,
            cfg.n_blocks,
            n_classes,
            vb,
        ),
        other => bail!("configuration error: unknown architecture {other:?}"),
    }
}

/// Run the full optimization schedule over the dataset, mutating the vars in
/// `varmap` in place.
pub(crate) fn fit(
    model: &SimpleCnn,
    varmap: &VarMap,
    dataset: &ImageDataset,
    cfg: &PreTrainConfig,
) -> anyhow::Result<()> {
    let params = ParamsAdamW {
        lr: cfg.learning_rate,
        ..Default::default()
    };
    let mut optimizer = AdamW::new(varmap.all_vars(), params).context("build optimizer")?;

    for epoch in 1..=cfg.epochs {
        let mut total_loss = 0f32;
        let mut n_batches = 0usize;

        for batch in Batcher::new(dataset, cfg.batch_size, model.device()) {
            let (images, labels) = batch?;
            let logits = model.forward(&images)?;
            let batch_loss = loss::cross_entropy(&logits, &labels)?;
            optimizer.backward_step(&batch_loss)?;

            total_loss += batch_loss.to_scalar::<f32>()?;
            n_batches += 1;
        }

        log::info!(
            "Epoch {}/{}: avg loss {:.4} over {} batches",
            epoch,
            cfg.epochs,
            total_loss / n_batches as f32,
            n_batches
        );
    }

    Ok(())
}

/// Extract the model's feature-layer activation for `input`.
///
/// The input is moved to the model's device; the result is detached so no
/// gradient graph survives. Shape `[batch, EMBEDDING_DIMS]`.
pub fn get_embedding(input: &Tensor, model: &SimpleCnn) -> anyhow::Result<Tensor> {
    let input = input.to_device(model.device())?.detach();
    let features = model.forward_features(&input)?;
    Ok(features.detach())
}
