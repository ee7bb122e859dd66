//! Render queue for batched rendering
//!
//! Groups the draw commands of a [`RenderContext`] by shader so the backend
//! switches programs once per batch. Within a batch submission order is kept.

use super::{DrawCommand, RenderContext};
use crate::assets::ShaderHandle;

/// A batch of draws sharing the same shader
#[derive(Debug, Clone)]
pub struct RenderBatch {
    /// Shader used by all draws in this batch
    pub shader: ShaderHandle,

    /// Draws in this batch
    pub draws: Vec<DrawCommand>,
}

impl RenderBatch {
    /// Create a new empty batch for a shader
    pub fn new(shader: ShaderHandle) -> Self {
        Self {
            shader,
            draws: Vec::new(),
        }
    }

    /// Get the number of draws in this batch
    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }
}

/// Draws of one view, batched by shader
#[derive(Debug, Clone, Default)]
pub struct RenderQueue {
    batches: Vec<RenderBatch>,
}

impl RenderQueue {
    /// Build the queue; batches appear in order of each shader's first use
    pub fn from_context(ctx: &RenderContext) -> Self {
        let mut batches: Vec<RenderBatch> = Vec::new();
        for draw in ctx.draws() {
            match batches.iter_mut().find(|batch| batch.shader == draw.shader) {
                Some(batch) => batch.draws.push(draw.clone()),
                None => {
                    let mut batch = RenderBatch::new(draw.shader);
                    batch.draws.push(draw.clone());
                    batches.push(batch);
                }
            }
        }
        Self { batches }
    }

    /// Batches in first-use order
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Get total number of draws
    pub fn draw_count(&self) -> usize {
        self.batches.iter().map(RenderBatch::draw_count).sum()
    }
}
