//! Character movement math
//!
//! Pure functions used by [`PlayerLogic`](super::PlayerLogic), kept apart so the
//! force bounds can be checked without a world.

use crate::config::MovementConfig;
use crate::foundation::math::{horizontal, try_direction, up, Quat, Vec2, Vec3};
use crate::physics::{BodyHandle, CollisionGroups, PhysicsWorld};

/// Groups the ground probe can stand on
pub const GROUND_MASK: CollisionGroups = CollisionGroups::SOLID_WORLD;

/// Result of a ground probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Body underneath
    pub body: BodyHandle,
    /// Distance from the probe origin to the ground
    pub distance: f32,
    /// Ground surface normal
    pub normal: Vec3,
    /// Friction of the ground body
    pub friction: f32,
}

/// Cast straight down from `origin` over `ride_height + probe_margin`
pub fn probe_ground(world: &PhysicsWorld, origin: Vec3, config: &MovementConfig) -> Option<GroundHit> {
    let reach = config.ride_height + config.probe_margin;
    let hit = world.ray_test(origin, origin - up() * reach, GROUND_MASK)?;
    Some(GroundHit {
        body: hit.body,
        distance: hit.distance,
        normal: hit.normal,
        friction: world.friction(hit.body).unwrap_or(0.0),
    })
}

/// World-space target velocity for a local move intention (`x` right, `y` forward)
pub fn desired_velocity(intent: Vec2, orientation: &Quat, max_speed: f32) -> Vec3 {
    let local = Vec3::new(intent.x, 0.0, -intent.y);
    horizontal(orientation * local) * max_speed
}

/// Horizontal force steering `current` towards `desired`
///
/// With an intention the magnitude is `acceleration_gain * |desired - current|`
/// clamped to `[normal_move_force * traction, max_move_force * traction]`. Without
/// one the force brakes and is only bounded above. It never exceeds
/// `max_move_force * traction`.
pub fn compute_move_force(
    desired: Vec3,
    current: Vec3,
    wants_to_move: bool,
    traction: f32,
    config: &MovementConfig,
) -> Vec3 {
    let traction = traction.max(0.0);
    let ceiling = config.max_move_force * traction;
    let floor = (config.normal_move_force * traction).min(ceiling);
    let current = horizontal(current);

    if wants_to_move {
        let delta = horizontal(desired) - current;
        let Some(direction) = try_direction(delta).or_else(|| try_direction(horizontal(desired))) else {
            return Vec3::zeros();
        };
        let magnitude = (config.acceleration_gain * delta.norm()).clamp(floor, ceiling);
        direction * magnitude
    } else {
        let Some(direction) = try_direction(-current) else {
            return Vec3::zeros();
        };
        let magnitude = (config.acceleration_gain * current.norm()).min(ceiling);
        direction * magnitude
    }
}

/// Upward hover force, `None` when the spring would pull down
pub fn hover_spring_force(config: &MovementConfig, distance: f32, vertical_speed: f32) -> Option<f32> {
    let force = (config.ride_height - distance) * config.spring_strength - vertical_speed * config.spring_damping;
    (force > 0.0).then_some(force)
}
