//! Collision shape descriptions
//!
//! Shapes are stored in model space, unscaled. Position, rotation and the body's
//! local scaling are applied on demand by [`CollisionShape::to_world`], which
//! produces a temporary [`WorldShape`] for contact and ray tests.

use super::primitives::{Aabb, Capsule, Contact, Ray};
use crate::foundation::math::{Quat, Vec3};
use crate::physics::PhysicsError;

/// Collision shape types (stored in MODEL SPACE)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// Sphere centred on the body origin
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Capsule along the local Y axis
    Capsule {
        /// Radius of the rounded ends and the cylinder
        radius: f32,
        /// Half the length of the core segment
        half_height: f32,
    },
    /// Box centred on the body origin
    Box {
        /// Half size along each local axis
        half_extents: Vec3,
    },
}

fn check_positive(name: &str, value: f32) -> Result<(), PhysicsError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidShape(format!("{} must be positive, got {}", name, value)))
    }
}

impl CollisionShape {
    /// Creates a sphere
    pub fn sphere(radius: f32) -> Result<Self, PhysicsError> {
        check_positive("sphere radius", radius)?;
        Ok(Self::Sphere { radius })
    }

    /// Creates an upright capsule; `half_height` may be zero
    pub fn capsule(radius: f32, half_height: f32) -> Result<Self, PhysicsError> {
        check_positive("capsule radius", radius)?;
        if !(half_height >= 0.0 && half_height.is_finite()) {
            return Err(PhysicsError::InvalidShape(format!(
                "capsule half height must not be negative, got {}",
                half_height
            )));
        }
        Ok(Self::Capsule { radius, half_height })
    }

    /// Creates a box from its half extents
    pub fn cuboid(half_extents: Vec3) -> Result<Self, PhysicsError> {
        check_positive("box half extent x", half_extents.x)?;
        check_positive("box half extent y", half_extents.y)?;
        check_positive("box half extent z", half_extents.z)?;
        Ok(Self::Box { half_extents })
    }

    /// Distance from the origin to the lowest point of the unscaled shape
    pub fn half_height(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Capsule { radius, half_height } => radius + half_height,
            Self::Box { half_extents } => half_extents.y,
        }
    }

    /// Place the shape in the world
    pub fn to_world(&self, position: Vec3, rotation: &Quat, scaling: &Vec3) -> WorldShape {
        let scaling = scaling.abs();
        match *self {
            Self::Sphere { radius } => WorldShape::Capsule(Capsule::sphere(position, radius * scaling.max())),
            Self::Capsule { radius, half_height } => {
                let axis = rotation * Vec3::new(0.0, half_height * scaling.y, 0.0);
                let radius = radius * scaling.x.max(scaling.z);
                WorldShape::Capsule(Capsule::new(position - axis, position + axis, radius))
            }
            Self::Box { half_extents } => {
                let half_extents = half_extents.component_mul(&scaling);
                // Bounds of the rotated box
                let basis = rotation.to_rotation_matrix();
                let extent = basis.matrix().abs() * half_extents;
                WorldShape::Aabb(Aabb::from_center(position, extent))
            }
        }
    }
}

/// World-space collision shape (temporary, for testing only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    /// Sphere-swept segment, spheres included
    Capsule(Capsule),
    /// Axis-aligned box
    Aabb(Aabb),
}

impl WorldShape {
    /// Get center position
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Capsule(capsule) => capsule.center(),
            Self::Aabb(aabb) => aabb.center(),
        }
    }

    /// Penetration of this shape into `other`; the normal points towards `self`
    pub fn contact(&self, other: &WorldShape) -> Option<Contact> {
        match (self, other) {
            (Self::Capsule(a), Self::Capsule(b)) => a.contact_capsule(b),
            (Self::Capsule(capsule), Self::Aabb(aabb)) => capsule.contact_aabb(aabb),
            (Self::Aabb(aabb), Self::Capsule(capsule)) => capsule.contact_aabb(aabb).map(Contact::flipped),
            (Self::Aabb(a), Self::Aabb(b)) => a.contact_aabb(b),
        }
    }

    /// Entry point of `ray` into this shape
    ///
    /// Returns `(distance, hit_point, normal)` if hit, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        match self {
            Self::Capsule(capsule) => capsule.intersect_ray(ray),
            Self::Aabb(aabb) => aabb.intersect_ray(ray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_shapes_rejected() {
        assert!(CollisionShape::sphere(0.0).is_err());
        assert!(CollisionShape::sphere(f32::NAN).is_err());
        assert!(CollisionShape::capsule(0.5, -1.0).is_err());
        assert!(CollisionShape::cuboid(Vec3::new(1.0, 0.0, 1.0)).is_err());
        assert!(CollisionShape::capsule(0.5, 0.0).is_ok());
    }

    #[test]
    fn test_sphere_scales_by_largest_axis() {
        let shape = CollisionShape::sphere(1.0).unwrap();
        let world = shape.to_world(Vec3::zeros(), &Quat::identity(), &Vec3::new(1.0, 3.0, 2.0));
        match world {
            WorldShape::Capsule(capsule) => assert_relative_eq!(capsule.radius, 3.0),
            WorldShape::Aabb(_) => panic!("sphere became a box"),
        }
    }

    #[test]
    fn test_capsule_follows_rotation() {
        let shape = CollisionShape::capsule(0.5, 1.0).unwrap();
        let tipped = Quat::from_axis_angle(&nalgebra::Vector3::z_axis(), HALF_PI);
        match shape.to_world(Vec3::zeros(), &tipped, &Vec3::new(1.0, 1.0, 1.0)) {
            WorldShape::Capsule(capsule) => {
                assert_relative_eq!(capsule.a.y, 0.0, epsilon = 1.0e-6);
                assert_relative_eq!((capsule.b - capsule.a).magnitude(), 2.0, epsilon = 1.0e-6);
                assert_relative_eq!(capsule.a.x.abs(), 1.0, epsilon = 1.0e-6);
            }
            WorldShape::Aabb(_) => panic!("capsule became a box"),
        }
    }

    #[test]
    fn test_rotated_box_bounds_grow() {
        let shape = CollisionShape::cuboid(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let quarter = Quat::from_axis_angle(&nalgebra::Vector3::y_axis(), HALF_PI * 0.5);
        match shape.to_world(Vec3::zeros(), &quarter, &Vec3::new(1.0, 1.0, 1.0)) {
            WorldShape::Aabb(aabb) => {
                assert_relative_eq!(aabb.max.x, std::f32::consts::SQRT_2, epsilon = 1.0e-5);
                assert_relative_eq!(aabb.max.y, 1.0, epsilon = 1.0e-5);
            }
            WorldShape::Capsule(_) => panic!("box became a capsule"),
        }
    }

    #[test]
    fn test_box_capsule_contact_is_antisymmetric() {
        let floor = CollisionShape::cuboid(Vec3::new(5.0, 0.5, 5.0))
            .unwrap()
            .to_world(Vec3::new(0.0, -0.5, 0.0), &Quat::identity(), &Vec3::new(1.0, 1.0, 1.0));
        let ball = CollisionShape::sphere(0.5)
            .unwrap()
            .to_world(Vec3::new(0.0, 0.4, 0.0), &Quat::identity(), &Vec3::new(1.0, 1.0, 1.0));

        let on_ball = ball.contact(&floor).unwrap();
        let on_floor = floor.contact(&ball).unwrap();
        assert_relative_eq!(on_ball.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1.0e-5);
        assert_relative_eq!(on_floor.normal, -on_ball.normal, epsilon = 1.0e-5);
        assert_relative_eq!(on_ball.depth, on_floor.depth);
    }
}
