//! Physics module
//!
//! - [`world`] - The rigid-body world: bodies, stepping, ray and overlap queries
//! - [`collision`] - Shapes and the geometric tests behind contacts and rays
//! - [`collision_layers`] - Group/mask filtering
//! - [`sync`] - Which side owns an entity's transform, per body kind
//! - [`body`] - The physics component connecting an entity to a world

pub mod body;
pub mod collision;
pub mod collision_layers;
pub mod sync;
pub mod world;

pub use body::PhysicsBody;
pub use collision::{CollisionShape, Ray};
pub use collision_layers::{CollisionFilter, CollisionGroups, GROUP_TABLE};
pub use sync::SyncPolicy;
pub use world::{BodyDesc, BodyHandle, BodyKind, CollisionObject, ContactPair, PhysicsWorld, RayHit};

/// Physics errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Shape parameters out of range
    #[error("Invalid collision shape: {0}")]
    InvalidShape(String),
}
