//! Player-controlled character logic
//!
//! Drives a character body from the entity's input every tick: look, ground
//! probe, move force, jumps, hover spring, footsteps and abilities, in that order.
//! Ground state is sampled once per tick; a jump clears it for the rest of the tick.

use super::ability::Ability;
use super::explosion::ExplosionAbility;
use super::movement::{compute_move_force, desired_velocity, hover_spring_force, probe_ground, GroundHit};
use super::projectile::ProjectileAbility;
use crate::config::{EngineConfig, MovementConfig};
use crate::ecs::components::LogicComponent;
use crate::ecs::{EntityId, GameObject, TickContext};
use crate::events::Event;
use crate::foundation::math::{horizontal, try_direction, up, yaw_rotation, Vec3};
use crate::physics::PhysicsError;

/// Logic component of a player character
pub struct PlayerLogic {
    owner: EntityId,
    config: MovementConfig,
    yaw: f32,
    jump_held: bool,
    air_jumps_left: u32,
    grounded: bool,
    stride: f32,
    last_position: Option<Vec3>,
    primary: Option<Box<dyn Ability>>,
    secondary: Option<Box<dyn Ability>>,
}

impl PlayerLogic {
    /// Unarmed player logic for `owner`
    pub fn new(owner: EntityId, config: MovementConfig) -> Self {
        Self {
            owner,
            air_jumps_left: config.max_air_jumps,
            config,
            yaw: 0.0,
            jump_held: false,
            grounded: false,
            stride: 0.0,
            last_position: None,
            primary: None,
            secondary: None,
        }
    }

    /// Player with the explosion on primary attack and the projectile on secondary
    pub fn armed(owner: EntityId, config: &EngineConfig) -> Result<Self, PhysicsError> {
        Ok(Self::new(owner, config.movement.clone())
            .with_primary(ExplosionAbility::new(owner, &config.abilities.explosion)?)
            .with_secondary(ProjectileAbility::new(owner, &config.abilities.projectile)?))
    }

    /// Set the primary-attack ability
    pub fn with_primary(mut self, ability: impl Ability + 'static) -> Self {
        self.primary = Some(Box::new(ability));
        self
    }

    /// Set the secondary-attack ability
    pub fn with_secondary(mut self, ability: impl Ability + 'static) -> Self {
        self.secondary = Some(Box::new(ability));
        self
    }

    /// Heading in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Ground state at the end of the last tick
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Air jumps still available
    pub fn air_jumps_left(&self) -> u32 {
        self.air_jumps_left
    }

    /// Primary ability
    pub fn primary(&self) -> Option<&dyn Ability> {
        self.primary.as_deref()
    }

    /// Secondary ability
    pub fn secondary(&self) -> Option<&dyn Ability> {
        self.secondary.as_deref()
    }

    fn jump(&mut self, owner: &mut GameObject, ground: Option<GroundHit>, velocity: Vec3, desired: Vec3) -> bool {
        if ground.is_some() {
            owner.physics().apply_impulse(up() * self.config.jump_impulse);
            return true;
        }
        if self.air_jumps_left == 0 {
            return false;
        }

        self.air_jumps_left -= 1;
        if velocity.y < 0.0 {
            owner.physics().set_linear_velocity(horizontal(velocity));
        }
        let direction = try_direction(horizontal(desired)).unwrap_or_else(Vec3::zeros);
        let impulse = up() * self.config.jump_impulse
            + direction * self.config.jump_impulse * self.config.double_jump_horizontal_scale;
        owner.physics().apply_impulse(impulse);
        true
    }

    fn count_footsteps(&mut self, owner: &mut GameObject, grounded: bool) {
        let position = owner.position();
        // A non-positive stride turns footsteps off
        if grounded && self.config.footstep_stride > 0.0 {
            if let Some(last) = self.last_position {
                self.stride += horizontal(position - last).norm();
            }
            while self.stride >= self.config.footstep_stride {
                self.stride -= self.config.footstep_stride;
                owner.notify(Event::FootstepOccurred);
            }
        }
        self.last_position = Some(position);
    }
}

impl LogicComponent for PlayerLogic {
    fn update(&mut self, owner: &mut GameObject, ctx: &mut TickContext<'_>) {
        if owner.id() != self.owner {
            log::warn!("Player logic of {:?} ticked on {:?}", self.owner, owner.id());
            return;
        }
        let input = owner.input().state();

        // Look
        self.yaw -= input.look_x * self.config.look_sensitivity;
        owner.camera_mut().add_pitch(input.look_y * self.config.look_sensitivity);
        owner.set_orientation(yaw_rotation(self.yaw));

        let mut ground = match ctx.physics.try_borrow() {
            Ok(world) => probe_ground(&world, owner.position(), &self.config),
            Err(_) => None,
        };
        let velocity = owner.physics().linear_velocity();

        // Move
        let desired = desired_velocity(input.move_intent(), &owner.orientation(), self.config.max_speed);
        let traction = ground.map_or(self.config.air_control, |hit| hit.friction);
        let force = compute_move_force(desired, velocity, input.wants_to_move(), traction, &self.config);
        if force != Vec3::zeros() {
            owner.physics().apply_force(force);
        }

        // Jump
        if ground.is_some() {
            self.air_jumps_left = self.config.max_air_jumps;
        }
        let pressed = input.jump && !self.jump_held;
        self.jump_held = input.jump;
        if pressed && self.jump(owner, ground, velocity, desired) {
            ground = None;
            owner.notify(Event::JumpOccurred);
        }

        // Hover
        if let Some(spring) = ground.and_then(|hit| hover_spring_force(&self.config, hit.distance, velocity.y)) {
            owner.physics().apply_force(up() * spring);
        }

        self.count_footsteps(owner, ground.is_some());
        self.grounded = ground.is_some();

        // Abilities
        for ability in [&mut self.primary, &mut self.secondary].into_iter().flatten() {
            ability.tick(ctx.dt);
        }
        if input.primary_attack {
            if let Some(ability) = self.primary.as_mut() {
                ability.use_ability(owner, ctx);
            }
        }
        if input.secondary_attack {
            if let Some(ability) = self.secondary.as_mut() {
                ability.use_ability(owner, ctx);
            }
        }
    }
}

impl std::fmt::Debug for PlayerLogic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerLogic")
            .field("owner", &self.owner)
            .field("yaw", &self.yaw)
            .field("grounded", &self.grounded)
            .field("air_jumps_left", &self.air_jumps_left)
            .finish_non_exhaustive()
    }
}
