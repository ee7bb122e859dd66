//! # Brawl Engine
//!
//! Entity/component core of a physics-driven arena brawler.
//!
//! ## Features
//!
//! - **Component slots**: every entity has exactly one graphics, physics, logic,
//!   input, camera and light component, backed by null objects until set
//! - **Physics bridge**: per-body-kind transform authority and registration that
//!   follows the entity from scene to scene
//! - **Event channel**: weak-reference observers for scene changes, scaling,
//!   footsteps and jumps
//! - **Abilities**: cooldown-gated effects spawning transient entities
//! - **Fixed timestep**: deterministic simulation steps driven by real frame time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brawl_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.world_mut().create_scene("arena");
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         if engine.world().time() > 10.0 {
//!             engine.quit();
//!         }
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]

pub mod assets;
pub mod audio;
pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod gameplay;
pub mod input;
pub mod physics;
pub mod render;
pub mod services;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetManager, BuiltinLoader, MeshHandle, ShaderHandle},
        audio::{AudioBackend, LogAudio, NullAudio, SoundGroup},
        config::{Config, EngineConfig},
        ecs::components::{
            CameraComponent, DeviceInput, FirstPersonCamera, GraphicsComponent, InputComponent, LightComponent,
            LogicComponent, ModelGraphics, PhysicsComponent, PointLight,
        },
        ecs::{EntityId, GameObject, SceneId, TickContext, World},
        events::{Event, Observer},
        foundation::math::{Quat, Transform, Vec3},
        gameplay::{Ability, ExplosionAbility, PlayerLogic, ProjectileAbility},
        input::InputState,
        physics::{BodyDesc, BodyKind, CollisionFilter, CollisionGroups, CollisionShape, PhysicsBody},
        render::RenderContext,
        services::Services,
        AppError, Application, Engine, EngineError,
    };
}
