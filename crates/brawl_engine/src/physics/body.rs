//! Physics component bridging an entity and a physics world
//!
//! A [`PhysicsBody`] is registered with at most one [`PhysicsWorld`] at a time.
//! It never decides on its own which world that is: it observes its entity and
//! re-resolves registration whenever the entity raises [`Event::SceneAttached`].
//!
//! While registered the collision object lives inside the world and the body keeps
//! a weak handle to that world. While unregistered the body holds the object
//! itself, so velocity survives a move between scenes. If the world has been
//! destroyed in the meantime the object is rebuilt from its [`BodyDesc`].

use super::sync::SyncPolicy;
use super::world::{BodyDesc, BodyHandle, BodyKind, CollisionObject, PhysicsWorld};
use super::CollisionFilter;
use crate::ecs::components::PhysicsComponent;
use crate::ecs::{EntityId, GameObject};
use crate::events::{Event, Observer};
use crate::foundation::math::{Quat, Transform, Vec3};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone)]
struct Attachment {
    world: Weak<RefCell<PhysicsWorld>>,
    handle: BodyHandle,
}

/// Rigid body, character capsule, ghost or static collider of one entity
#[derive(Debug)]
pub struct PhysicsBody {
    owner: EntityId,
    desc: BodyDesc,
    detached: Option<CollisionObject>,
    attachment: Option<Attachment>,
}

impl PhysicsBody {
    /// Create an unregistered body for `owner`
    pub fn new(owner: EntityId, desc: BodyDesc) -> Self {
        Self {
            owner,
            desc,
            detached: None,
            attachment: None,
        }
    }

    /// Start with `velocity` once registered
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        let mut object = self.detached.take().unwrap_or_else(|| {
            CollisionObject::new(self.desc.clone(), Vec3::zeros(), Quat::identity()).with_owner(self.owner)
        });
        object.set_linear_velocity(velocity);
        self.detached = Some(object);
        self
    }

    /// Entity this body belongs to
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Construction parameters
    pub fn desc(&self) -> &BodyDesc {
        &self.desc
    }

    /// Whether the body currently lives in a world
    pub fn is_registered(&self) -> bool {
        self.attachment.is_some()
    }

    fn policy(&self) -> SyncPolicy {
        SyncPolicy::for_kind(self.desc.kind)
    }

    /// Run `f` against the world this body is registered with
    fn with_world<R>(&self, f: impl FnOnce(&mut PhysicsWorld, BodyHandle) -> R) -> Option<R> {
        let attachment = self.attachment.as_ref()?;
        let world = attachment.world.upgrade()?;
        let mut world = world.try_borrow_mut().ok()?;
        Some(f(&mut world, attachment.handle))
    }

    fn with_world_ref<R>(&self, f: impl FnOnce(&PhysicsWorld, BodyHandle) -> R) -> Option<R> {
        let attachment = self.attachment.as_ref()?;
        let world = attachment.world.upgrade()?;
        let world = world.try_borrow().ok()?;
        Some(f(&world, attachment.handle))
    }

    /// Make the registration match `target`
    pub(crate) fn resolve(&mut self, target: Option<&Rc<RefCell<PhysicsWorld>>>, transform: &Transform) {
        let current = self.attachment.as_ref().and_then(|a| a.world.upgrade());
        match (current.as_ref(), target) {
            (Some(current), Some(target)) if Rc::ptr_eq(current, target) => return,
            (None, None) if self.attachment.is_none() => return,
            _ => {}
        }

        if !self.deregister() {
            return;
        }
        if let Some(world) = target {
            self.register(world, transform);
        }
    }

    fn register(&mut self, world: &Rc<RefCell<PhysicsWorld>>, transform: &Transform) {
        let mut object = self
            .detached
            .take()
            .unwrap_or_else(|| CollisionObject::new(self.desc.clone(), transform.position, transform.rotation).with_owner(self.owner));
        object.set_transform(transform.position, transform.rotation);
        object.set_local_scaling(transform.scale);

        let Ok(mut borrowed) = world.try_borrow_mut() else {
            log::warn!("Physics world busy, {:?} body of {:?} left unregistered", self.desc.kind, self.owner);
            self.detached = Some(object);
            return;
        };
        let handle = borrowed.add(object);
        log::debug!("Registered {:?} body {:?} of {:?}", self.desc.kind, handle, self.owner);
        self.attachment = Some(Attachment {
            world: Rc::downgrade(world),
            handle,
        });
    }

    /// Leave the current world, returning false if the body is still attached to it
    fn deregister(&mut self) -> bool {
        let Some(attachment) = self.attachment.take() else {
            return true;
        };

        let Some(world) = attachment.world.upgrade() else {
            log::debug!("World of {:?} is gone, rebuilding its body", self.owner);
            self.detached = None;
            return true;
        };

        let removed = match world.try_borrow_mut() {
            Ok(mut world) => world.remove(attachment.handle),
            Err(_) => {
                log::error!("Physics world busy while deregistering body of {:?}", self.owner);
                self.attachment = Some(attachment);
                return false;
            }
        };

        match removed {
            Some(object) => {
                log::debug!("Deregistered body {:?} of {:?}", attachment.handle, self.owner);
                self.detached = Some(object);
            }
            None => {
                log::error!(
                    "Registration mismatch: body {:?} of {:?} missing from its world",
                    attachment.handle,
                    self.owner
                );
                if !std::thread::panicking() {
                    debug_assert!(false, "registration mismatch for body of {:?}", self.owner);
                }
                self.detached = None;
            }
        }
        true
    }

    fn set_scaling(&mut self, scaling: Vec3) {
        if self.attachment.is_some() {
            self.with_world(|world, handle| world.set_local_scaling(handle, scaling));
        } else if let Some(object) = self.detached.as_mut() {
            object.set_local_scaling(scaling);
        }
    }
}

impl Observer for PhysicsBody {
    fn on_notify(&mut self, entity: &mut GameObject, event: Event) {
        if entity.id() != self.owner {
            log::warn!("Body of {:?} notified by {:?}, ignoring", self.owner, entity.id());
            return;
        }
        match event {
            Event::SceneAttached => {
                let target = entity.scene().and_then(|link| link.physics.upgrade());
                self.resolve(target.as_ref(), entity.transform());
            }
            Event::Scaled => self.set_scaling(entity.scale()),
            Event::FootstepOccurred | Event::JumpOccurred | Event::Nothing => {}
        }
    }
}

impl PhysicsComponent for PhysicsBody {
    fn body_kind(&self) -> Option<BodyKind> {
        Some(self.desc.kind)
    }

    fn body_handle(&self) -> Option<BodyHandle> {
        self.attachment.as_ref().map(|a| a.handle)
    }

    fn registered_world(&self) -> Option<Rc<RefCell<PhysicsWorld>>> {
        self.attachment.as_ref().and_then(|a| a.world.upgrade())
    }

    fn collision_filter(&self) -> CollisionFilter {
        self.desc.filter
    }

    fn mass(&self) -> f32 {
        self.desc.mass
    }

    fn linear_velocity(&self) -> Vec3 {
        self.with_world_ref(|world, handle| world.linear_velocity(handle))
            .flatten()
            .or_else(|| self.detached.as_ref().map(CollisionObject::linear_velocity))
            .unwrap_or_else(Vec3::zeros)
    }

    fn pull(&self, transform: &mut Transform) {
        let policy = self.policy();
        if !policy.pulls() {
            return;
        }
        if let Some((position, rotation)) = self.with_world_ref(|world, handle| world.transform(handle)).flatten() {
            if policy.pull_position {
                transform.position = position;
            }
            if policy.pull_rotation {
                transform.rotation = rotation;
            }
        }
    }

    fn push(&self, transform: &Transform) {
        if self.policy().push_every_step {
            self.warp(transform);
        }
    }

    fn warp(&self, transform: &Transform) {
        self.with_world(|world, handle| world.set_transform(handle, transform.position, transform.rotation));
    }

    fn apply_force(&self, force: Vec3) -> bool {
        self.policy().accepts_forces && self.with_world(|world, handle| world.apply_force(handle, force)).unwrap_or(false)
    }

    fn apply_impulse(&self, impulse: Vec3) -> bool {
        self.policy().accepts_forces
            && self.with_world(|world, handle| world.apply_impulse(handle, impulse)).unwrap_or(false)
    }

    fn set_linear_velocity(&self, velocity: Vec3) -> bool {
        self.policy().accepts_forces
            && self
                .with_world(|world, handle| {
                    world.body_mut(handle).map(|body| body.set_linear_velocity(velocity)).is_some()
                })
                .unwrap_or(false)
    }

    fn overlapping(&self) -> Vec<BodyHandle> {
        self.with_world_ref(|world, handle| world.overlaps(handle)).unwrap_or_default()
    }
}

impl Drop for PhysicsBody {
    fn drop(&mut self) {
        self.deregister();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::CollisionShape;
    use approx::assert_relative_eq;

    fn shared_world() -> Rc<RefCell<PhysicsWorld>> {
        Rc::new(RefCell::new(PhysicsWorld::new(Vec3::zeros(), 0.8)))
    }

    fn ball() -> PhysicsBody {
        let shape = CollisionShape::sphere(0.5).unwrap();
        PhysicsBody::new(EntityId::default(), BodyDesc::dynamic(shape, 2.0))
    }

    #[test]
    fn test_resolve_moves_between_worlds() {
        let first = shared_world();
        let second = shared_world();
        let mut body = ball();
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));

        body.resolve(Some(&first), &transform);
        assert!(Rc::ptr_eq(&body.registered_world().unwrap(), &first));
        assert_eq!(first.borrow().body_count(), 1);

        // Same world again is not a second registration
        body.resolve(Some(&first), &transform);
        assert_eq!(first.borrow().body_count(), 1);

        body.resolve(Some(&second), &transform);
        assert_eq!(first.borrow().body_count(), 0);
        assert_eq!(second.borrow().body_count(), 1);

        body.resolve(None, &transform);
        assert!(body.registered_world().is_none());
        assert_eq!(second.borrow().body_count(), 0);
    }

    #[test]
    fn test_velocity_survives_scene_move() {
        let first = shared_world();
        let second = shared_world();
        let mut body = ball();
        body.resolve(Some(&first), &Transform::identity());
        assert!(body.apply_impulse(Vec3::new(4.0, 0.0, 0.0)));

        body.resolve(Some(&second), &Transform::identity());
        assert_relative_eq!(body.linear_velocity(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_destroyed_world_counts_as_deregistered() {
        let first = shared_world();
        let mut body = ball();
        body.resolve(Some(&first), &Transform::identity());
        drop(first);

        assert!(body.registered_world().is_none());
        let second = shared_world();
        body.resolve(Some(&second), &Transform::identity());
        assert_eq!(second.borrow().body_count(), 1);
    }

    #[test]
    fn test_busy_world_keeps_registration() {
        let first = shared_world();
        let second = shared_world();
        let mut body = ball();
        body.resolve(Some(&first), &Transform::identity());

        {
            let _held = first.borrow_mut();
            body.resolve(None, &Transform::identity());
            body.resolve(Some(&second), &Transform::identity());
        }

        assert!(body.is_registered());
        assert!(Rc::ptr_eq(&body.registered_world().unwrap(), &first));
        assert_eq!(first.borrow().body_count(), 1);
        assert_eq!(second.borrow().body_count(), 0);

        // Once the world is free the move goes through
        body.resolve(None, &Transform::identity());
        assert!(!body.is_registered());
        assert_eq!(first.borrow().body_count(), 0);
    }

    #[test]
    fn test_drop_deregisters() {
        let world = shared_world();
        let mut body = ball();
        body.resolve(Some(&world), &Transform::identity());
        drop(body);
        assert_eq!(world.borrow().body_count(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "registration mismatch")]
    fn test_mismatch_asserts_in_debug() {
        let world = shared_world();
        let mut body = ball();
        body.resolve(Some(&world), &Transform::identity());
        let handle = body.body_handle().unwrap();
        world.borrow_mut().remove(handle);
        body.resolve(None, &Transform::identity());
    }

    #[test]
    fn test_ghost_pushes_and_never_pulls() {
        let world = shared_world();
        let shape = CollisionShape::sphere(1.0).unwrap();
        let mut ghost = PhysicsBody::new(EntityId::default(), BodyDesc::ghost(shape, crate::physics::CollisionGroups::EVERYTHING));
        ghost.resolve(Some(&world), &Transform::identity());

        let moved = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));
        ghost.push(&moved);
        let handle = ghost.body_handle().unwrap();
        assert_relative_eq!(world.borrow().transform(handle).unwrap().0, moved.position);

        let mut entity_side = Transform::identity();
        ghost.pull(&mut entity_side);
        assert_eq!(entity_side, Transform::identity());
        assert!(!ghost.apply_force(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_dynamic_push_is_ignored() {
        let world = shared_world();
        let mut body = ball();
        body.resolve(Some(&world), &Transform::identity());
        body.push(&Transform::from_position(Vec3::new(9.0, 9.0, 9.0)));
        let handle = body.body_handle().unwrap();
        assert_relative_eq!(world.borrow().transform(handle).unwrap().0, Vec3::zeros());
    }

    #[test]
    fn test_registration_applies_scale() {
        let world = shared_world();
        let mut body = ball();
        let mut transform = Transform::identity();
        transform.scale = Vec3::new(2.0, 2.0, 2.0);
        body.resolve(Some(&world), &transform);
        let handle = body.body_handle().unwrap();
        assert_relative_eq!(world.borrow().body(handle).unwrap().local_scaling(), transform.scale);
        assert_relative_eq!(body.mass(), 2.0);
    }
}
