//! Input component slot

use crate::input::InputState;

/// Source of an entity's per-tick input
pub trait InputComponent {
    /// Input for the current tick
    fn state(&self) -> InputState;

    /// Store the input for the next tick
    fn feed(&mut self, state: InputState);

    /// Whether this is the empty placeholder
    fn is_null(&self) -> bool {
        false
    }
}

/// Always idle
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInput;

impl InputComponent for NullInput {
    fn state(&self) -> InputState {
        InputState::default()
    }

    fn feed(&mut self, _state: InputState) {}

    fn is_null(&self) -> bool {
        true
    }
}

/// Input fed by the windowing backend once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceInput {
    state: InputState,
}

impl InputComponent for DeviceInput {
    fn state(&self) -> InputState {
        self.state
    }

    fn feed(&mut self, state: InputState) {
        self.state = state;
    }
}
