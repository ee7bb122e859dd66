//! Graphics component slot

use crate::assets::{MeshHandle, ShaderHandle};
use crate::ecs::GameObject;
use crate::render::{DrawCommand, RenderContext};

/// Something that submits draws for its entity
pub trait GraphicsComponent {
    /// Submit this entity's draws to `ctx`
    fn draw(&self, owner: &GameObject, ctx: &mut RenderContext);

    /// Whether this is the empty placeholder
    fn is_null(&self) -> bool {
        false
    }
}

/// Draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGraphics;

impl GraphicsComponent for NullGraphics {
    fn draw(&self, _owner: &GameObject, _ctx: &mut RenderContext) {}

    fn is_null(&self) -> bool {
        true
    }
}

/// One mesh drawn with one shader at the entity's transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelGraphics {
    /// Mesh to draw
    pub mesh: MeshHandle,
    /// Shader used unless the render context overrides it
    pub shader: ShaderHandle,
    /// Hidden models submit nothing
    pub visible: bool,
}

impl ModelGraphics {
    /// Create a visible model
    pub fn new(mesh: MeshHandle, shader: ShaderHandle) -> Self {
        Self {
            mesh,
            shader,
            visible: true,
        }
    }

    /// Set visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl GraphicsComponent for ModelGraphics {
    fn draw(&self, owner: &GameObject, ctx: &mut RenderContext) {
        if !self.visible {
            return;
        }
        ctx.submit(DrawCommand {
            entity: owner.id(),
            mesh: self.mesh,
            shader: ctx.shader_for(self.shader),
            model: owner.transform().to_matrix(),
        });
    }
}
