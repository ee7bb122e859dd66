//! Component slots
//!
//! One trait per component kind, each with a null implementation that fills the
//! slot until a real component is set.

pub mod camera;
pub mod graphics;
pub mod input;
pub mod light;
pub mod logic;
pub mod physics;

pub use camera::{CameraComponent, FirstPersonCamera, NullCamera};
pub use graphics::{GraphicsComponent, ModelGraphics, NullGraphics};
pub use input::{DeviceInput, InputComponent, NullInput};
pub use light::{LightComponent, NullLight, PointLight};
pub use logic::{LogicComponent, NullLogic};
pub use physics::{NullPhysics, PhysicsComponent};
