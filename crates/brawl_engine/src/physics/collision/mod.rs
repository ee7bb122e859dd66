//! Collision geometry
//!
//! Shapes are stored in model space and transformed to world space only while a
//! contact or ray test runs.
//!
//! # Module Organization
//!
//! - [`primitives`] - World-space rays, capsules and boxes with their intersection tests
//! - [`shape`] - Model-space shapes attached to bodies

pub mod primitives;
pub mod shape;

pub use primitives::{Aabb, BoundingSphere, Capsule, Contact, Ray};
pub use shape::{CollisionShape, WorldShape};
