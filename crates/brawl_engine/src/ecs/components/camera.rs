//! Camera component slot

use crate::ecs::GameObject;
use crate::foundation::math::{constants::DEG_TO_RAD, up, Mat4, Point3, Quat, Vec3};

/// View and projection source for rendering from an entity
pub trait CameraComponent {
    /// View matrix for `owner`'s current transform
    fn view_matrix(&self, owner: &GameObject) -> Mat4;

    /// Projection matrix
    fn projection_matrix(&self) -> Mat4;

    /// Tilt the view up (positive) or down
    fn add_pitch(&mut self, delta: f32);

    /// Current pitch in radians
    fn pitch(&self) -> f32;

    /// Whether this is the empty placeholder
    fn is_null(&self) -> bool {
        false
    }
}

/// Identity matrices
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCamera;

impl CameraComponent for NullCamera {
    fn view_matrix(&self, _owner: &GameObject) -> Mat4 {
        Mat4::identity()
    }

    fn projection_matrix(&self) -> Mat4 {
        Mat4::identity()
    }

    fn add_pitch(&mut self, _delta: f32) {}

    fn pitch(&self) -> f32 {
        0.0
    }

    fn is_null(&self) -> bool {
        true
    }
}

/// Eye placed above the entity, yaw from the entity, pitch kept here
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonCamera {
    /// Eye offset above the entity origin
    pub eye_height: f32,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Largest absolute pitch
    pub pitch_limit: f32,
    pitch: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            eye_height: 0.6,
            fov: 70.0 * DEG_TO_RAD,
            aspect: 16.0 / 9.0,
            near: 0.05,
            far: 500.0,
            pitch_limit: 85.0 * DEG_TO_RAD,
            pitch: 0.0,
        }
    }
}

impl FirstPersonCamera {
    /// Camera with the given eye height and default lens
    pub fn new(eye_height: f32) -> Self {
        Self {
            eye_height,
            ..Self::default()
        }
    }

    /// Eye position for `owner`
    pub fn eye(&self, owner: &GameObject) -> Vec3 {
        owner.position() + up() * self.eye_height
    }

    /// Viewing direction for `owner`
    pub fn look_direction(&self, owner: &GameObject) -> Vec3 {
        let tilt = Quat::from_axis_angle(&Vec3::x_axis(), self.pitch);
        owner.orientation() * (tilt * Vec3::new(0.0, 0.0, -1.0))
    }
}

impl CameraComponent for FirstPersonCamera {
    fn view_matrix(&self, owner: &GameObject) -> Mat4 {
        let eye = self.eye(owner);
        let target = eye + self.look_direction(owner);
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up())
    }

    fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    fn add_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-self.pitch_limit, self.pitch_limit);
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityId;
    use approx::assert_relative_eq;

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = FirstPersonCamera::default();
        camera.add_pitch(10.0);
        assert_relative_eq!(camera.pitch(), camera.pitch_limit);
        camera.add_pitch(-20.0);
        assert_relative_eq!(camera.pitch(), -camera.pitch_limit);
    }

    #[test]
    fn test_positive_pitch_looks_up() {
        let mut camera = FirstPersonCamera::default();
        camera.add_pitch(0.5);
        let object = GameObject::new(EntityId::default());
        assert!(camera.look_direction(&object).y > 0.0);
    }

    #[test]
    fn test_view_moves_eye_to_origin() {
        let camera = FirstPersonCamera::new(1.0);
        let mut object = GameObject::new(EntityId::default());
        object.set_position(Vec3::new(2.0, 0.0, 5.0));
        let view = camera.view_matrix(&object);
        let eye = view.transform_point(&Point3::new(2.0, 1.0, 5.0));
        assert_relative_eq!(eye.coords, Vec3::zeros(), epsilon = 1.0e-5);
    }
}
