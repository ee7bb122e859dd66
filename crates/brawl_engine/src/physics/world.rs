//! Rigid-body physics world
//!
//! A compact implementation of the call contract the rest of the engine uses:
//! bodies are added and removed by handle, stepped with semi-implicit Euler,
//! pushed apart by impulse-based contact response and queried with rays and
//! overlap tests. Every interaction goes through the group/mask filter.
//!
//! Dynamic bodies rotate under their angular velocity; characters never rotate.
//! Ghost bodies report overlaps but never push or get pushed. Static bodies only
//! move when their transform is set explicitly.

use super::collision::{CollisionShape, Ray, WorldShape};
use super::collision_layers::{CollisionFilter, CollisionGroups};
use crate::config::PhysicsConfig;
use crate::ecs::EntityId;
use crate::foundation::math::{Quat, Vec3};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a body inside one [`PhysicsWorld`]
    pub struct BodyHandle;
}

/// Penetration ignored by positional correction
const CONTACT_SLOP: f32 = 0.005;

/// Fraction of the remaining penetration resolved per step
const CORRECTION_PERCENT: f32 = 0.8;

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Moved by the solver; position and rotation are physics-owned
    Dynamic,
    /// Upright capsule moved by forces from gameplay; never rotates
    Character,
    /// Non-solid volume positioned by gameplay, reports overlaps only
    Ghost,
    /// Immovable solid positioned by gameplay
    Static,
}

impl BodyKind {
    /// Whether the solver integrates and pushes this body
    pub fn is_simulated(self) -> bool {
        matches!(self, Self::Dynamic | Self::Character)
    }

    /// Whether the body takes part in contact response
    pub fn is_solid(self) -> bool {
        !matches!(self, Self::Ghost)
    }
}

/// Construction parameters of a body, kept so it can be rebuilt
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    /// Simulation role
    pub kind: BodyKind,
    /// Unscaled collision shape
    pub shape: CollisionShape,
    /// Group and mask
    pub filter: CollisionFilter,
    /// Mass in kilograms; ignored for ghosts and statics
    pub mass: f32,
    /// Coulomb friction; the world default is used when `None`
    pub friction: Option<f32>,
    /// Bounciness in `[0, 1]`
    pub restitution: f32,
    /// Linear velocity damping per second
    pub linear_damping: f32,
    /// Angular velocity damping per second
    pub angular_damping: f32,
}

impl BodyDesc {
    /// Solver-driven rigid body
    pub fn dynamic(shape: CollisionShape, mass: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            filter: CollisionFilter::default(),
            mass,
            friction: None,
            restitution: 0.1,
            linear_damping: 0.05,
            angular_damping: 0.1,
        }
    }

    /// Character capsule driven by gameplay forces
    pub fn character(shape: CollisionShape, mass: f32) -> Self {
        Self {
            kind: BodyKind::Character,
            filter: CollisionFilter::character(),
            restitution: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            ..Self::dynamic(shape, mass)
        }
    }

    /// Overlap-only volume reporting the groups in `mask`
    pub fn ghost(shape: CollisionShape, mask: CollisionGroups) -> Self {
        Self {
            kind: BodyKind::Ghost,
            filter: CollisionFilter::ghost(mask),
            mass: 0.0,
            ..Self::dynamic(shape, 0.0)
        }
    }

    /// Immovable level geometry
    pub fn fixed(shape: CollisionShape) -> Self {
        Self {
            kind: BodyKind::Static,
            filter: CollisionFilter::static_world(),
            mass: 0.0,
            ..Self::dynamic(shape, 0.0)
        }
    }

    /// Replace the group/mask filter
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the friction coefficient
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = Some(friction.max(0.0));
        self
    }

    /// Set the restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set linear and angular damping
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear.max(0.0);
        self.angular_damping = angular.max(0.0);
        self
    }

    /// Inverse mass used by the solver; zero for immovable bodies
    pub fn inverse_mass(&self) -> f32 {
        if self.kind.is_simulated() && self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }
}

/// A body together with its simulated state
#[derive(Debug, Clone)]
pub struct CollisionObject {
    desc: BodyDesc,
    position: Vec3,
    rotation: Quat,
    local_scaling: Vec3,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    force: Vec3,
    owner: Option<EntityId>,
}

impl CollisionObject {
    /// Create an object at rest
    pub fn new(desc: BodyDesc, position: Vec3, rotation: Quat) -> Self {
        Self {
            desc,
            position,
            rotation,
            local_scaling: Vec3::new(1.0, 1.0, 1.0),
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            force: Vec3::zeros(),
            owner: None,
        }
    }

    /// Tag the object with the entity it represents
    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Construction parameters
    pub fn desc(&self) -> &BodyDesc {
        &self.desc
    }

    /// Simulation role
    pub fn kind(&self) -> BodyKind {
        self.desc.kind
    }

    /// Group and mask
    pub fn filter(&self) -> CollisionFilter {
        self.desc.filter
    }

    /// Entity this body belongs to
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Position of the body origin
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Orientation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Scale applied to the shape
    pub fn local_scaling(&self) -> Vec3 {
        self.local_scaling
    }

    /// Linear velocity
    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    /// Angular velocity (axis times rad/s)
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Force accumulated since the last step
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    /// Move the body without touching its velocity
    pub fn set_transform(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }

    /// Scale the collision shape
    pub fn set_local_scaling(&mut self, scaling: Vec3) {
        self.local_scaling = scaling;
    }

    /// Overwrite the linear velocity of a simulated body
    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        if self.desc.kind.is_simulated() {
            self.linear_velocity = velocity;
        }
    }

    /// Overwrite the angular velocity of a dynamic body
    pub fn set_angular_velocity(&mut self, velocity: Vec3) {
        if self.desc.kind == BodyKind::Dynamic {
            self.angular_velocity = velocity;
        }
    }

    /// Add a force for the next step; returns `false` for bodies the solver does not move
    pub fn apply_force(&mut self, force: Vec3) -> bool {
        if !self.desc.kind.is_simulated() {
            return false;
        }
        self.force += force;
        true
    }

    /// Change velocity by `impulse / mass`; returns `false` for bodies the solver does not move
    pub fn apply_impulse(&mut self, impulse: Vec3) -> bool {
        if !self.desc.kind.is_simulated() {
            return false;
        }
        self.linear_velocity += impulse * self.desc.inverse_mass();
        true
    }

    /// Shape placed at the current transform
    pub fn world_shape(&self) -> WorldShape {
        self.desc.shape.to_world(self.position, &self.rotation, &self.local_scaling)
    }

    fn integrate(&mut self, gravity: &Vec3, dt: f32) {
        if !self.desc.kind.is_simulated() {
            return;
        }

        let acceleration = gravity + self.force * self.desc.inverse_mass();
        self.linear_velocity += acceleration * dt;
        self.linear_velocity *= 1.0 / (1.0 + self.desc.linear_damping * dt);
        self.position += self.linear_velocity * dt;

        if self.desc.kind == BodyKind::Dynamic {
            self.angular_velocity *= 1.0 / (1.0 + self.desc.angular_damping * dt);
            let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
            self.rotation = spin * self.rotation;
        }

        self.force = Vec3::zeros();
    }
}

/// Nearest body hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Body that was hit
    pub body: BodyHandle,
    /// Entity owning the body
    pub owner: Option<EntityId>,
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Distance from the ray start
    pub distance: f32,
    /// Distance as a fraction of the ray length
    pub fraction: f32,
}

/// Overlapping pair found during the last step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPair {
    /// First body
    pub a: BodyHandle,
    /// Second body
    pub b: BodyHandle,
    /// Unit normal pointing from `b` towards `a`
    pub normal: Vec3,
    /// Penetration depth before response
    pub depth: f32,
}

/// Simulation space holding a set of bodies
#[derive(Debug)]
pub struct PhysicsWorld {
    bodies: SlotMap<BodyHandle, CollisionObject>,
    gravity: Vec3,
    default_friction: f32,
    contacts: Vec<ContactPair>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(gravity: Vec3, default_friction: f32) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            gravity,
            default_friction,
            contacts: Vec::new(),
        }
    }

    /// Create an empty world from configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.gravity, config.default_friction)
    }

    /// Gravity applied to simulated bodies
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Change gravity
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Insert a body
    pub fn add(&mut self, object: CollisionObject) -> BodyHandle {
        let kind = object.kind();
        let handle = self.bodies.insert(object);
        log::trace!("Added {:?} body {:?}", kind, handle);
        handle
    }

    /// Take a body out of the world
    pub fn remove(&mut self, handle: BodyHandle) -> Option<CollisionObject> {
        let removed = self.bodies.remove(handle);
        if removed.is_some() {
            self.contacts.retain(|c| c.a != handle && c.b != handle);
            log::trace!("Removed body {:?}", handle);
        }
        removed
    }

    /// Whether `handle` refers to a body in this world
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &CollisionObject)> {
        self.bodies.iter()
    }

    /// Borrow a body
    pub fn body(&self, handle: BodyHandle) -> Option<&CollisionObject> {
        self.bodies.get(handle)
    }

    /// Mutably borrow a body
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut CollisionObject> {
        self.bodies.get_mut(handle)
    }

    /// Position and orientation of a body
    pub fn transform(&self, handle: BodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies.get(handle).map(|body| (body.position, body.rotation))
    }

    /// Move a body; returns `false` for unknown handles
    pub fn set_transform(&mut self, handle: BodyHandle, position: Vec3, rotation: Quat) -> bool {
        self.bodies
            .get_mut(handle)
            .map(|body| body.set_transform(position, rotation))
            .is_some()
    }

    /// Scale a body's shape; returns `false` for unknown handles
    pub fn set_local_scaling(&mut self, handle: BodyHandle, scaling: Vec3) -> bool {
        self.bodies
            .get_mut(handle)
            .map(|body| body.set_local_scaling(scaling))
            .is_some()
    }

    /// Add a force to a simulated body for the next step
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3) -> bool {
        self.bodies.get_mut(handle).map_or(false, |body| body.apply_force(force))
    }

    /// Apply an instantaneous impulse to a simulated body
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> bool {
        self.bodies.get_mut(handle).map_or(false, |body| body.apply_impulse(impulse))
    }

    /// Linear velocity of a body
    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(CollisionObject::linear_velocity)
    }

    /// Friction of a body, resolving the world default
    pub fn friction(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies
            .get(handle)
            .map(|body| body.desc.friction.unwrap_or(self.default_friction))
    }

    /// Pairs found overlapping during the last step
    pub fn contacts(&self) -> &[ContactPair] {
        &self.contacts
    }

    /// Bodies currently overlapping `handle` that pass both sides of the filter
    pub fn overlaps(&self, handle: BodyHandle) -> Vec<BodyHandle> {
        let Some(body) = self.bodies.get(handle) else {
            return Vec::new();
        };
        let shape = body.world_shape();
        let filter = body.filter();

        self.bodies
            .iter()
            .filter(|(other, object)| {
                *other != handle
                    && filter.should_collide(&object.filter())
                    && shape.contact(&object.world_shape()).is_some()
            })
            .map(|(other, _)| other)
            .collect()
    }

    /// Nearest body along the segment `from`-`to` whose group is in `mask`
    pub fn ray_test(&self, from: Vec3, to: Vec3, mask: CollisionGroups) -> Option<RayHit> {
        let length = (to - from).magnitude();
        let ray = Ray::new(from, to - from)?;

        let mut best: Option<RayHit> = None;
        for (handle, body) in &self.bodies {
            if !body.filter().accepted_by(mask) {
                continue;
            }
            let Some((distance, point, normal)) = body.world_shape().intersect_ray(&ray) else {
                continue;
            };
            if distance > length || best.map_or(false, |hit| hit.distance <= distance) {
                continue;
            }
            best = Some(RayHit {
                body: handle,
                owner: body.owner,
                point,
                normal,
                distance,
                fraction: distance / length,
            });
        }
        best
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            body.integrate(&gravity, dt);
        }

        self.contacts.clear();
        let handles: Vec<BodyHandle> = self.bodies.keys().collect();
        for (i, &a) in handles.iter().enumerate() {
            for &b in &handles[i + 1..] {
                self.collide(a, b);
            }
        }
    }

    fn collide(&mut self, a: BodyHandle, b: BodyHandle) {
        let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) else {
            return;
        };
        if !body_a.filter().should_collide(&body_b.filter()) {
            return;
        }
        if !body_a.kind().is_simulated() && !body_b.kind().is_simulated() && body_a.kind().is_solid() && body_b.kind().is_solid() {
            return;
        }
        let Some(contact) = body_a.world_shape().contact(&body_b.world_shape()) else {
            return;
        };

        self.contacts.push(ContactPair {
            a,
            b,
            normal: contact.normal,
            depth: contact.depth,
        });

        if !body_a.kind().is_solid() || !body_b.kind().is_solid() {
            return;
        }

        let inverse_a = body_a.desc.inverse_mass();
        let inverse_b = body_b.desc.inverse_mass();
        let inverse_total = inverse_a + inverse_b;
        if inverse_total <= 0.0 {
            return;
        }

        let normal = contact.normal;
        let correction = normal * ((contact.depth - CONTACT_SLOP).max(0.0) * CORRECTION_PERCENT / inverse_total);

        let relative = body_a.linear_velocity - body_b.linear_velocity;
        let approach = relative.dot(&normal);
        let mut delta_a = Vec3::zeros();
        let mut delta_b = Vec3::zeros();
        if approach < 0.0 {
            let restitution = body_a.desc.restitution.min(body_b.desc.restitution);
            let normal_impulse = -(1.0 + restitution) * approach / inverse_total;
            let mut impulse = normal * normal_impulse;

            let sliding = relative - normal * approach;
            if let Some(tangent) = crate::foundation::math::try_direction(sliding) {
                let friction_a = body_a.desc.friction.unwrap_or(self.default_friction);
                let friction_b = body_b.desc.friction.unwrap_or(self.default_friction);
                let mu = (friction_a * friction_b).sqrt();
                let tangent_impulse =
                    (-relative.dot(&tangent) / inverse_total).clamp(-mu * normal_impulse, mu * normal_impulse);
                impulse += tangent * tangent_impulse;
            }

            delta_a = impulse * inverse_a;
            delta_b = -impulse * inverse_b;
        }

        if let Some(body) = self.bodies.get_mut(a) {
            body.position += correction * inverse_a;
            body.linear_velocity += delta_a;
        }
        if let Some(body) = self.bodies.get_mut(b) {
            body.position -= correction * inverse_b;
            body.linear_velocity += delta_b;
        }
    }
}
