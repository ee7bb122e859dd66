//! Core engine implementation
//!
//! The engine owns the world and the shared services and turns real frame time
//! into fixed simulation steps.

use crate::{
    application::Application,
    assets::{AssetManager, ShaderHandle},
    audio::AudioBackend,
    config::{ConfigError, EngineConfig},
    ecs::{EntityId, SceneId, World},
    foundation::time::{FixedTimestep, Timer},
    render::RenderContext,
    services::Services,
};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Main engine struct
pub struct Engine {
    /// Entities and scenes
    pub world: World,

    services: Services,

    timestep: FixedTimestep,

    /// Frame timing
    timer: Timer,

    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create an engine with silent audio and built-in assets
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_services(config, Services::headless())
    }

    /// Create an engine around an audio backend and asset manager
    pub fn with_backends(
        config: EngineConfig,
        audio: Rc<RefCell<dyn AudioBackend>>,
        assets: AssetManager,
    ) -> Result<Self, EngineError> {
        Self::with_services(config, Services::new(audio, assets))
    }

    fn with_services(config: EngineConfig, services: Services) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        let timestep = FixedTimestep::new(config.simulation.fixed_timestep, config.simulation.max_steps_per_frame);
        Ok(Self {
            world: World::new(config.physics.clone()),
            services,
            timestep,
            timer: Timer::new(),
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        Self::new(config)?.run_app(app)
    }

    /// Run the main loop on an already built engine
    pub fn run_app<T: Application>(self, app: &mut T) -> Result<(), EngineError> {
        let mut engine = self;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        engine.timer.update();

        while engine.running {
            engine.timer.update();
            let frame_time = app.frame_time(engine.timer.delta_time());

            app.update(&mut engine, frame_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            engine.frame(frame_time);

            app.render(&mut engine)
                .map_err(|e| EngineError::ApplicationError(format!("App render: {}", e)))?;
        }

        app.cleanup(&mut engine);

        log::info!("Engine shutdown complete");
        Ok(())
    }

    /// Run as many fixed steps as `frame_time` pays for; returns the step count
    pub fn frame(&mut self, frame_time: f32) -> u32 {
        let steps = self.timestep.accumulate(frame_time);
        let dt = self.timestep.step();
        for _ in 0..steps {
            self.world.step(dt, &self.services);
        }
        steps
    }

    /// Collect the draws of `scene` as seen from `camera`
    pub fn render(&self, scene: SceneId, camera: EntityId, shader_override: Option<ShaderHandle>) -> Option<RenderContext> {
        if let Some(viewer) = self.world.object(camera) {
            self.services.set_listener(viewer.position(), viewer.orientation());
        }
        self.world.render(scene, camera, shader_override)
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Shared services
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fixed step length in seconds
    pub fn fixed_timestep(&self) -> f32 {
        self.timestep.step()
    }

    /// Fraction of a step carried to the next frame
    pub fn interpolation_alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    /// Steps dropped because the simulation fell behind
    pub fn dropped_steps(&self) -> u64 {
        self.timestep.dropped_steps()
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to initialize a subsystem
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The application returned an error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
