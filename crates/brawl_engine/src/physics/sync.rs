//! Transform authority between entities and the physics world
//!
//! Each body kind decides which side owns which part of the transform:
//!
//! | kind      | pulled after step   | pushed before step | forces |
//! |-----------|---------------------|--------------------|--------|
//! | Dynamic   | position + rotation | only on creation   | yes    |
//! | Character | position            | only on creation   | yes    |
//! | Ghost     | never               | every step         | no     |
//! | Static    | never               | every step         | no     |
//!
//! Scale never flows through here. It is applied as local scaling of the shape.

use super::world::BodyKind;

/// What to copy in which direction for one body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Copy the solved position into the entity after a step
    pub pull_position: bool,
    /// Copy the solved rotation into the entity after a step
    pub pull_rotation: bool,
    /// Copy the entity transform into the body before every step
    pub push_every_step: bool,
    /// Gameplay may apply forces and impulses
    pub accepts_forces: bool,
}

impl SyncPolicy {
    /// Policy for a body kind
    pub const fn for_kind(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Dynamic => Self {
                pull_position: true,
                pull_rotation: true,
                push_every_step: false,
                accepts_forces: true,
            },
            BodyKind::Character => Self {
                pull_position: true,
                pull_rotation: false,
                push_every_step: false,
                accepts_forces: true,
            },
            BodyKind::Ghost | BodyKind::Static => Self {
                pull_position: false,
                pull_rotation: false,
                push_every_step: true,
                accepts_forces: false,
            },
        }
    }

    /// Whether anything is copied back into the entity
    pub const fn pulls(&self) -> bool {
        self.pull_position || self.pull_rotation
    }
}
