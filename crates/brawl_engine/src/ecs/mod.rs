//! Entities, component slots, scenes and the world that steps them
//!
//! - [`entity`] - [`GameObject`]: transform, six component slots, event channel
//! - [`components`] - One trait per slot kind plus null and concrete implementations
//! - [`scene`] - Scenes owning a physics world each
//! - [`commands`] - Spawns and despawns deferred until after the logic pass
//! - [`context`] - What a logic component may touch during a tick
//! - [`world`] - The arena owning all of the above

pub mod commands;
pub mod components;
pub mod context;
pub mod entity;
pub mod scene;
pub mod world;

pub use commands::Commands;
pub use context::{EntitySnapshot, TickContext};
pub use entity::{EntityId, GameObject, TickCallback};
pub use scene::{Scene, SceneId, SceneLink, SceneStats};
pub use world::World;

#[cfg(test)]
mod tests;
