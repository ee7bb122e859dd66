//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the entity [`Transform`]. The engine works in a
//! right-handed, Y-up frame where an unrotated object faces `-Z`.

pub use nalgebra::{Matrix4, Quaternion, Unit, UnitQuaternion, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// World up axis
pub fn up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Facing direction of an unrotated object
pub fn forward() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// Rotation about the world up axis
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_axis_angle(&Vector3::y_axis(), yaw)
}

/// Drop the vertical component of a vector
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Normalize `v`, or return `None` when it is too short to carry a direction
pub fn try_direction(v: Vec3) -> Option<Vec3> {
    let length = v.norm();
    if length > 1.0e-6 && length.is_finite() {
        Some(v / length)
    } else {
        None
    }
}

/// Position, orientation and scale of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Orientation
    pub rotation: Quat,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Model matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Direction this transform faces
    pub fn forward(&self) -> Vec3 {
        self.rotation * forward()
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}
