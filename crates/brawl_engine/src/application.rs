//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive the engine's main loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Create scenes and spawn the
    /// initial entities here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Called every frame before the simulation steps; feed input here
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Frame time that the following steps will consume
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Called after the frame's simulation steps
    fn render(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        Ok(())
    }

    /// Frame time to simulate given the measured wall-clock time
    ///
    /// Override for deterministic or headless runs.
    fn frame_time(&mut self, measured: f32) -> f32 {
        measured
    }

    /// Cleanup the application
    ///
    /// Called when the main loop ends.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
