//! Explosion ability
//!
//! Spawns a short-lived ghost sphere in front of the caster. Until it expires the
//! ghost pushes every overlapping dynamic or character body away from its centre.

use super::ability::{Ability, Cooldown};
use super::transient::expiring;
use crate::audio::SoundGroup;
use crate::config::ExplosionConfig;
use crate::ecs::{EntityId, GameObject, TickContext};
use crate::foundation::math::{try_direction, up};
use crate::physics::{BodyDesc, CollisionGroups, CollisionShape, PhysicsBody, PhysicsError};

/// Groups an explosion pushes
pub const BLAST_MASK: CollisionGroups = CollisionGroups::DEFAULT
    .union(CollisionGroups::CHARACTERS)
    .union(CollisionGroups::DEBRIS);

/// Force scale at `distance` from the centre: `(radius - distance / radius)^2`
pub fn explosion_falloff(radius: f32, distance: f32) -> f32 {
    let falloff = radius - distance / radius;
    falloff * falloff
}

/// Blast parameters captured by the explosion entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blast {
    /// Entity that caused the blast
    pub caster: EntityId,
    /// Reach from the centre
    pub radius: f32,
    /// Force at full falloff
    pub strength: f32,
}

impl Blast {
    /// Push every body overlapping `explosion`'s ghost
    ///
    /// Returns how many bodies received a force. The caster's own body is left
    /// alone while the caster is alive.
    pub fn apply(&self, explosion: &GameObject, ctx: &TickContext<'_>) -> usize {
        let center = explosion.position();
        let overlapping = explosion.physics().overlapping();
        if overlapping.is_empty() {
            return 0;
        }

        let Ok(mut world) = ctx.physics.try_borrow_mut() else {
            log::warn!("Physics world busy, blast of {:?} skipped", explosion.id());
            return 0;
        };

        let mut pushed = 0;
        for handle in overlapping {
            let Some(body) = world.body(handle) else {
                continue;
            };
            if !body.kind().is_simulated() {
                continue;
            }
            if body.owner() == Some(self.caster) && ctx.is_alive(self.caster) {
                continue;
            }

            let offset = body.position() - center;
            let distance = offset.norm();
            if distance > self.radius {
                continue;
            }
            let direction = try_direction(offset).unwrap_or_else(up);
            let force = direction * self.strength * explosion_falloff(self.radius, distance);
            if world.apply_force(handle, force) {
                pushed += 1;
            }
        }
        pushed
    }
}

/// Area push on a cooldown
#[derive(Debug, Clone)]
pub struct ExplosionAbility {
    owner: EntityId,
    cooldown: Cooldown,
    config: ExplosionConfig,
    shape: CollisionShape,
}

impl ExplosionAbility {
    /// Explosion owned by `owner`
    pub fn new(owner: EntityId, config: &ExplosionConfig) -> Result<Self, PhysicsError> {
        Ok(Self {
            owner,
            cooldown: Cooldown::new(config.cooldown),
            config: config.clone(),
            shape: CollisionShape::sphere(config.radius)?,
        })
    }

    /// Tuning
    pub fn config(&self) -> &ExplosionConfig {
        &self.config
    }
}

impl Ability for ExplosionAbility {
    fn owner(&self) -> EntityId {
        self.owner
    }

    fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    fn cooldown_mut(&mut self) -> &mut Cooldown {
        &mut self.cooldown
    }

    fn activate(&mut self, caster: &GameObject, ctx: &mut TickContext<'_>) {
        let position = caster.position() + caster.forward() * self.config.forward_offset;
        let blast = Blast {
            caster: caster.id(),
            radius: self.config.radius,
            strength: self.config.strength,
        };
        let shape = self.shape;
        let start = ctx.now;
        let lifetime = self.config.lifetime;

        ctx.spawn("explosion", move |object| {
            object.set_position(position);
            object.set_physics_component(PhysicsBody::new(object.id(), BodyDesc::ghost(shape, BLAST_MASK)));
            object.set_tick_callback(expiring(start, lifetime, move |entity, ctx, _age| {
                blast.apply(entity, ctx);
            }));
        });
        ctx.play_sound(SoundGroup::Explosion, position);
        log::debug!("{:?} cast an explosion at {:?}", caster.id(), position);
    }
}
