//! Gameplay built on the entity core
//!
//! - [`ability`] - Cooldowns and the ability trait
//! - [`explosion`] / [`projectile`] - The two shipped abilities
//! - [`transient`] - Self-removing entities
//! - [`movement`] / [`player`] - Character control

pub mod ability;
pub mod explosion;
pub mod movement;
pub mod player;
pub mod projectile;
pub mod transient;

pub use ability::{Ability, Cooldown};
pub use explosion::{explosion_falloff, Blast, ExplosionAbility};
pub use player::PlayerLogic;
pub use projectile::ProjectileAbility;
pub use transient::{expiring, Lifetime};
