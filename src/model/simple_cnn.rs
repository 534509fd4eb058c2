// simple_cnn.rs — The SimpleCNN classifier.
//
// n_blocks of [3x3 conv, ReLU, 2x2 max-pool], widths doubling from
// base_filters, then global average pooling into a fixed 256-wide feature
// layer (the embedding) and a linear classifier head.
//
// Global pooling makes the network valid for any input spatial size; pooling
// is skipped once the spatial extent drops below the pool window so deep
// configurations on small inputs stay well-formed.

use anyhow::Context;
use candle_core::{Device, Tensor, D};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, Module, VarBuilder};

use crate::config;

#[derive(Debug)]
pub struct SimpleCnn {
    blocks: Vec<Conv2d>,
    embed: Linear,
    classify: Linear,
    device: Device,
}

impl SimpleCnn {
    /// Build the network from a VarBuilder so training owns the variables.
    pub fn new(
        in_channels: usize,
        base_filters: usize,
        n_blocks: usize,
        n_classes: usize,
        vb: VarBuilder,
    ) -> anyhow::Result<Self> {
        let conv_cfg = Conv2dConfig {
            padding: config::model::CONV_PADDING,
            ..Default::default()
        };

        let mut blocks = Vec::with_capacity(n_blocks);
        let mut width = in_channels;
        for i in 0..n_blocks {
            let out = base_filters << i;
            let block = conv2d(
                width,
                out,
                config::model::CONV_KERNEL_SIZE,
                conv_cfg,
                vb.pp(format!("conv{i}")),
            )
            .with_context(|| format!("build conv block {i}"))?;
            blocks.push(block);
            width = out;
        }

        let embed = linear(width, config::model::EMBEDDING_DIMS, vb.pp("embed"))
            .context("build embedding layer")?;
        let classify = linear(config::model::EMBEDDING_DIMS, n_classes, vb.pp("classify"))
            .context("build classifier head")?;

        log::debug!(
            "SimpleCNN: {n_blocks} blocks, {in_channels}->{width} channels, {} classes",
            n_classes
        );

        Ok(Self {
            blocks,
            embed,
            classify,
            device: vb.device().clone(),
        })
    }

    /// Forward pass through the feature extractor only.
    /// Input `[B, C, H, W]`, output `[B, EMBEDDING_DIMS]`.
    pub fn forward_features(&self, xs: &Tensor) -> anyhow::Result<Tensor> {
        let mut xs = xs.clone();
        for block in &self.blocks {
            xs = block.forward(&xs)?.relu()?;
            let (_, _, h, w) = xs.dims4()?;
            if h >= config::model::POOL_SIZE && w >= config::model::POOL_SIZE {
                xs = xs.max_pool2d(config::model::POOL_SIZE)?;
            }
        }

        // Global average pool [B, C, H, W] -> [B, C]
        let pooled = xs.mean(D::Minus1)?.mean(D::Minus1)?;

        Ok(self.embed.forward(&pooled)?.relu()?)
    }

    /// Full forward pass: logits `[B, n_classes]`.
    pub fn forward(&self, xs: &Tensor) -> anyhow::Result<Tensor> {
        let features = self.forward_features(xs)?;
        Ok(self.classify.forward(&features)?)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}
