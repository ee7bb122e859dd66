//! Projectile ability

use super::ability::{Ability, Cooldown};
use super::transient::expiring;
use crate::audio::SoundGroup;
use crate::config::ProjectileConfig;
use crate::ecs::{EntityId, GameObject, TickContext};
use crate::physics::{BodyDesc, CollisionFilter, CollisionShape, PhysicsBody, PhysicsError};

/// Dynamic sphere launched along the caster's forward vector
#[derive(Debug, Clone)]
pub struct ProjectileAbility {
    owner: EntityId,
    cooldown: Cooldown,
    config: ProjectileConfig,
    shape: CollisionShape,
}

impl ProjectileAbility {
    /// Projectile launcher owned by `owner`
    pub fn new(owner: EntityId, config: &ProjectileConfig) -> Result<Self, PhysicsError> {
        Ok(Self {
            owner,
            cooldown: Cooldown::new(config.cooldown),
            config: config.clone(),
            shape: CollisionShape::sphere(config.radius)?,
        })
    }
}

impl Ability for ProjectileAbility {
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
        let direction = caster.forward();
        let position = caster.position() + direction * self.config.spawn_offset;
        // Launch impulse over mass
        let velocity = direction * self.config.speed + caster.physics().linear_velocity();
        let desc = BodyDesc::dynamic(self.shape, self.config.mass).with_filter(CollisionFilter::debris());
        let start = ctx.now;
        let lifetime = self.config.lifetime;

        ctx.spawn("projectile", move |object| {
            object.set_position(position);
            object.set_physics_component(PhysicsBody::new(object.id(), desc).with_linear_velocity(velocity));
            object.set_tick_callback(expiring(start, lifetime, |_, _, _| {}));
        });
        ctx.play_sound(SoundGroup::Projectile, position);
    }
}
