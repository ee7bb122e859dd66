//! Light component slot

use crate::ecs::GameObject;
use crate::foundation::math::Vec3;
use crate::render::LightSource;

/// Light contributed by an entity
pub trait LightComponent {
    /// The light for `owner`'s current transform, if it emits one
    fn light(&self, owner: &GameObject) -> Option<LightSource>;

    /// Whether this is the empty placeholder
    fn is_null(&self) -> bool {
        false
    }
}

/// Emits nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLight;

impl LightComponent for NullLight {
    fn light(&self, _owner: &GameObject) -> Option<LightSource> {
        None
    }

    fn is_null(&self) -> bool {
        true
    }
}

/// Point light following the entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Offset from the entity origin
    pub offset: Vec3,
    /// Linear RGB colour
    pub color: Vec3,
    /// Intensity multiplier
    pub intensity: f32,
    /// Fade-out distance
    pub range: f32,
    /// Disabled lights emit nothing
    pub enabled: bool,
}

impl PointLight {
    /// Light at the entity origin
    pub fn new(color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            offset: Vec3::zeros(),
            color,
            intensity,
            range,
            enabled: true,
        }
    }
}

impl LightComponent for PointLight {
    fn light(&self, owner: &GameObject) -> Option<LightSource> {
        self.enabled.then(|| LightSource {
            position: owner.position() + self.offset,
            color: self.color,
            intensity: self.intensity,
            range: self.range,
        })
    }
}
