//! Per-tick input snapshot
//!
//! The windowing backend turns devices into one flat [`InputState`] per
//! simulation step. Gameplay only ever sees this struct.

use crate::foundation::math::Vec2;

/// Buttons and look deltas for one simulation step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Move forward held
    pub move_forward: bool,
    /// Move backward held
    pub move_backward: bool,
    /// Strafe left held
    pub move_left: bool,
    /// Strafe right held
    pub move_right: bool,
    /// Horizontal look delta since the last step
    pub look_x: f32,
    /// Vertical look delta since the last step
    pub look_y: f32,
    /// Interact held
    pub action: bool,
    /// Jump held
    pub jump: bool,
    /// Primary attack held
    pub primary_attack: bool,
    /// Secondary attack held
    pub secondary_attack: bool,
}

impl InputState {
    /// Movement wish in local space: `x` strafes right, `y` moves forward
    ///
    /// Diagonals are normalized so they are not faster than straight moves.
    pub fn move_intent(&self) -> Vec2 {
        let axis = |positive: bool, negative: bool| f32::from(u8::from(positive)) - f32::from(u8::from(negative));
        let intent = Vec2::new(
            axis(self.move_right, self.move_left),
            axis(self.move_forward, self.move_backward),
        );
        let length = intent.norm();
        if length > 1.0 {
            intent / length
        } else {
            intent
        }
    }

    /// Whether any movement key is held in a way that does not cancel out
    pub fn wants_to_move(&self) -> bool {
        self.move_intent().norm_squared() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_opposite_keys_cancel() {
        let state = InputState {
            move_forward: true,
            move_backward: true,
            ..Default::default()
        };
        assert!(!state.wants_to_move());
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let state = InputState {
            move_forward: true,
            move_right: true,
            ..Default::default()
        };
        assert_relative_eq!(state.move_intent().norm(), 1.0, epsilon = 1.0e-6);
        assert!(state.move_intent().x > 0.0);
    }
}
