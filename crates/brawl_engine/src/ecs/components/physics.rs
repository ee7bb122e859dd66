//! Physics component slot
//!
//! The trait is the contract gameplay sees. The real implementation is
//! [`PhysicsBody`](crate::physics::PhysicsBody); [`NullPhysics`] answers every
//! query with "no body".

use crate::ecs::GameObject;
use crate::events::{Event, Observer};
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{BodyHandle, BodyKind, CollisionFilter, PhysicsWorld};
use std::cell::RefCell;
use std::rc::Rc;

/// Connection between an entity and a physics world
///
/// Every physics component observes its own entity so it can follow scene
/// changes and rescaling.
pub trait PhysicsComponent: Observer {
    /// Kind of the body, `None` without one
    fn body_kind(&self) -> Option<BodyKind>;

    /// Handle inside the registered world
    fn body_handle(&self) -> Option<BodyHandle>;

    /// World the body is currently registered with
    fn registered_world(&self) -> Option<Rc<RefCell<PhysicsWorld>>>;

    /// Group and mask
    fn collision_filter(&self) -> CollisionFilter;

    /// Mass, zero for bodies that do not move
    fn mass(&self) -> f32;

    /// Current linear velocity
    fn linear_velocity(&self) -> Vec3;

    /// Copy the solved transform into `transform` where the body kind allows
    fn pull(&self, transform: &mut Transform);

    /// Write `transform` into the world where the body kind asks for it every step
    fn push(&self, transform: &Transform);

    /// Write `transform` into the world whatever the body kind
    fn warp(&self, transform: &Transform);

    /// Accumulate a force for the next step; `false` if it was not accepted
    fn apply_force(&self, force: Vec3) -> bool;

    /// Change velocity immediately; `false` if it was not accepted
    fn apply_impulse(&self, impulse: Vec3) -> bool;

    /// Overwrite the linear velocity; `false` if it was not accepted
    fn set_linear_velocity(&self, velocity: Vec3) -> bool;

    /// Bodies currently touching this one, after filtering
    fn overlapping(&self) -> Vec<BodyHandle>;

    /// Whether this is the empty placeholder
    fn is_null(&self) -> bool {
        false
    }
}

/// No body at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPhysics;

impl Observer for NullPhysics {
    fn on_notify(&mut self, _entity: &mut GameObject, _event: Event) {}
}

impl PhysicsComponent for NullPhysics {
    fn body_kind(&self) -> Option<BodyKind> {
        None
    }

    fn body_handle(&self) -> Option<BodyHandle> {
        None
    }

    fn registered_world(&self) -> Option<Rc<RefCell<PhysicsWorld>>> {
        None
    }

    fn collision_filter(&self) -> CollisionFilter {
        CollisionFilter::default()
    }

    fn mass(&self) -> f32 {
        0.0
    }

    fn linear_velocity(&self) -> Vec3 {
        Vec3::zeros()
    }

    fn pull(&self, _transform: &mut Transform) {}

    fn push(&self, _transform: &Transform) {}

    fn warp(&self, _transform: &Transform) {}

    fn apply_force(&self, _force: Vec3) -> bool {
        false
    }

    fn apply_impulse(&self, _impulse: Vec3) -> bool {
        false
    }

    fn set_linear_velocity(&self, _velocity: Vec3) -> bool {
        false
    }

    fn overlapping(&self) -> Vec<BodyHandle> {
        Vec::new()
    }

    fn is_null(&self) -> bool {
        true
    }
}
