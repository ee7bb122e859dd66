//! Logic component slot

use crate::ecs::context::TickContext;
use crate::ecs::GameObject;

/// Per-tick behaviour of an entity
pub trait LogicComponent {
    /// Advance one fixed step
    ///
    /// The component is out of its slot while this runs, so `owner.logic()`
    /// returns the null logic.
    fn update(&mut self, owner: &mut GameObject, ctx: &mut TickContext<'_>);

    /// Whether this is the empty placeholder
    fn is_null(&self) -> bool {
        false
    }
}

/// Does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogic;

impl LogicComponent for NullLogic {
    fn update(&mut self, _owner: &mut GameObject, _ctx: &mut TickContext<'_>) {}

    fn is_null(&self) -> bool {
        true
    }
}
