//! Rendering seam
//!
//! The engine does not draw anything itself. For each rendered view it fills a
//! [`RenderContext`] with draw commands and lights, and the rendering backend
//! consumes that list, usually through a [`RenderQueue`].

pub mod render_queue;

pub use render_queue::{RenderBatch, RenderQueue};

use crate::assets::{MeshHandle, ShaderHandle};
use crate::ecs::EntityId;
use crate::foundation::math::{Mat4, Vec3};

/// One mesh to draw with one shader
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Entity that submitted the command
    pub entity: EntityId,
    /// Mesh to draw
    pub mesh: MeshHandle,
    /// Shader program, after applying the context's override
    pub shader: ShaderHandle,
    /// Model matrix
    pub model: Mat4,
}

/// Point light contributed by an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    /// World position
    pub position: Vec3,
    /// Linear RGB colour
    pub color: Vec3,
    /// Intensity multiplier
    pub intensity: f32,
    /// Distance at which the light fades out
    pub range: f32,
}

/// Camera matrices and the draw and light lists of one view
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// View matrix
    pub view: Mat4,
    /// Projection matrix
    pub projection: Mat4,
    /// Shader forced on every draw (depth pass, debug views)
    pub shader_override: Option<ShaderHandle>,
    draws: Vec<DrawCommand>,
    lights: Vec<LightSource>,
}

impl RenderContext {
    /// Create an empty context for a view
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view,
            projection,
            shader_override: None,
            draws: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Force one shader for every draw
    pub fn with_shader_override(mut self, shader: ShaderHandle) -> Self {
        self.shader_override = Some(shader);
        self
    }

    /// Shader a component should draw with, given its own choice
    pub fn shader_for(&self, own: ShaderHandle) -> ShaderHandle {
        self.shader_override.unwrap_or(own)
    }

    /// Queue a draw
    pub fn submit(&mut self, command: DrawCommand) {
        self.draws.push(command);
    }

    /// Queue a light
    pub fn add_light(&mut self, light: LightSource) {
        self.lights.push(light);
    }

    /// Queued draws in submission order
    pub fn draws(&self) -> &[DrawCommand] {
        &self.draws
    }

    /// Queued lights in submission order
    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    /// Combined projection * view matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Drop queued draws and lights, keeping the camera
    pub fn clear(&mut self) {
        self.draws.clear();
        self.lights.clear();
    }
}
