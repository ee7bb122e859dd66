//! # Engine Configuration
//!
//! Every tunable of the simulation core in one serde tree. All sections use
//! `#[serde(default)]`, so a config file only needs the values it changes:
//!
//! ```toml
//! log_level = "debug"
//!
//! [movement]
//! max_move_force = 1500.0
//! ```

use super::{Config, ConfigError};
use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter handed to the logger when `RUST_LOG` is unset
    pub log_level: String,
    /// Fixed-step scheduling
    pub simulation: SimulationConfig,
    /// Physics world defaults
    pub physics: PhysicsConfig,
    /// Player movement tuning
    pub movement: MovementConfig,
    /// Ability tuning
    pub abilities: AbilityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            simulation: SimulationConfig::default(),
            physics: PhysicsConfig::default(),
            movement: MovementConfig::default(),
            abilities: AbilityConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Check every section for out-of-range values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.physics.validate()?;
        self.movement.validate()?;
        self.abilities.validate()
    }
}

/// Fixed-step scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one simulation step in seconds
    pub fixed_timestep: f32,
    /// Upper bound of steps run for a single rendered frame
    pub max_steps_per_frame: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 5,
        }
    }
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep > 0.0 && self.fixed_timestep.is_finite()) {
            return Err(ConfigError::Invalid("simulation.fixed_timestep must be positive".into()));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid("simulation.max_steps_per_frame must be at least 1".into()));
        }
        Ok(())
    }
}

/// Physics world defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity applied to dynamic and character bodies (m/s²)
    pub gravity: Vec3,
    /// Friction used for bodies that do not specify one
    pub default_friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            default_friction: 0.8,
        }
    }
}

impl PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid("physics.gravity must be finite".into()));
        }
        if self.default_friction < 0.0 {
            return Err(ConfigError::Invalid("physics.default_friction must not be negative".into()));
        }
        Ok(())
    }
}

/// Player movement tuning
///
/// Forces are in newtons and impulses in newton-seconds, so they scale with the
/// mass of the player's body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Smallest horizontal force applied while the player wants to move
    pub normal_move_force: f32,
    /// Largest horizontal force ever applied
    pub max_move_force: f32,
    /// Target horizontal speed (m/s)
    pub max_speed: f32,
    /// Force per m/s of difference between target and current velocity
    pub acceleration_gain: f32,
    /// Friction stand-in used while airborne
    pub air_control: f32,
    /// Upward impulse of a jump
    pub jump_impulse: f32,
    /// Jumps allowed before touching ground again
    pub max_air_jumps: u32,
    /// Horizontal impulse of an air jump relative to `jump_impulse`
    pub double_jump_horizontal_scale: f32,
    /// Height of the body centre above ground the hover spring aims for
    pub ride_height: f32,
    /// Extra probe length below `ride_height` still counted as grounded
    pub probe_margin: f32,
    /// Hover spring stiffness (N/m)
    pub spring_strength: f32,
    /// Hover spring damping (N per m/s)
    pub spring_damping: f32,
    /// Radians of yaw/pitch per unit of look input
    pub look_sensitivity: f32,
    /// Horizontal distance between footstep cues (m)
    pub footstep_stride: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            normal_move_force: 400.0,
            max_move_force: 1200.0,
            max_speed: 6.0,
            acceleration_gain: 250.0,
            air_control: 0.3,
            jump_impulse: 480.0,
            max_air_jumps: 1,
            double_jump_horizontal_scale: 0.5,
            ride_height: 1.2,
            probe_margin: 0.4,
            spring_strength: 6000.0,
            spring_damping: 600.0,
            look_sensitivity: 0.0025,
            footstep_stride: 1.8,
        }
    }
}

impl MovementConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.normal_move_force < 0.0 || self.max_move_force < self.normal_move_force {
            return Err(ConfigError::Invalid(
                "movement forces must satisfy 0 <= normal_move_force <= max_move_force".into(),
            ));
        }
        if self.max_speed <= 0.0 || self.ride_height <= 0.0 || self.footstep_stride <= 0.0 {
            return Err(ConfigError::Invalid(
                "movement.max_speed, ride_height and footstep_stride must be positive".into(),
            ));
        }
        if self.probe_margin < 0.0 || self.air_control < 0.0 {
            return Err(ConfigError::Invalid("movement.probe_margin and air_control must not be negative".into()));
        }
        Ok(())
    }
}

/// Ability tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    /// Area push effect
    pub explosion: ExplosionConfig,
    /// Launched sphere
    pub projectile: ProjectileConfig,
}

impl AbilityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.explosion;
        if e.cooldown < 0.0 || e.radius <= 0.0 || e.lifetime <= 0.0 {
            return Err(ConfigError::Invalid(
                "abilities.explosion needs cooldown >= 0 and positive radius and lifetime".into(),
            ));
        }
        let p = &self.projectile;
        if p.cooldown < 0.0 || p.radius <= 0.0 || p.mass <= 0.0 || p.lifetime <= 0.0 {
            return Err(ConfigError::Invalid(
                "abilities.projectile needs cooldown >= 0 and positive radius, mass and lifetime".into(),
            ));
        }
        Ok(())
    }
}

/// Area push effect tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Seconds between uses
    pub cooldown: f32,
    /// Radius of the ghost sphere and of the falloff
    pub radius: f32,
    /// Force scale before falloff
    pub strength: f32,
    /// Seconds the effect entity lives
    pub lifetime: f32,
    /// Distance in front of the caster the effect is centred
    pub forward_offset: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            cooldown: 2.0,
            radius: 4.0,
            strength: 300.0,
            lifetime: 0.25,
            forward_offset: 2.0,
        }
    }
}

/// Launched sphere tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Seconds between uses
    pub cooldown: f32,
    /// Launch speed (m/s)
    pub speed: f32,
    /// Sphere radius
    pub radius: f32,
    /// Sphere mass (kg)
    pub mass: f32,
    /// Seconds before the projectile removes itself
    pub lifetime: f32,
    /// Distance in front of the caster the projectile appears
    pub spawn_offset: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            cooldown: 0.4,
            speed: 25.0,
            radius: 0.15,
            mass: 0.5,
            lifetime: 3.0,
            spawn_offset: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            log_level = "debug"

            [movement]
            max_move_force = 1500.0

            [physics]
            gravity = [0.0, -20.0, 0.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.movement.max_move_force, 1500.0);
        assert_eq!(config.movement.normal_move_force, 400.0);
        assert_eq!(config.physics.gravity, Vec3::new(0.0, -20.0, 0.0));
        assert_eq!(config.simulation.max_steps_per_frame, 5);
    }

    #[test]
    fn test_inverted_move_forces_rejected() {
        let mut config = EngineConfig::default();
        config.movement.normal_move_force = 2000.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_timestep_rejected() {
        let mut config = EngineConfig::default();
        config.simulation.fixed_timestep = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ron_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("brawl_engine_config_{}.ron", std::process::id()));

        let mut config = EngineConfig::default();
        config.abilities.explosion.radius = 7.5;
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.abilities.explosion.radius, 7.5);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        assert!(matches!(
            EngineConfig::load_from_file("engine.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            EngineConfig::default().save_to_file("engine.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
