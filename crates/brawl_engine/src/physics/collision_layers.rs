//! Collision group/mask filtering
//!
//! Every body carries a *group* (what it is) and a *mask* (what it wants to touch).
//! Two bodies interact only when each one's group is accepted by the other's mask:
//!
//! ```text
//! (A.group & B.mask) != 0 && (B.group & A.mask) != 0
//! ```
//!
//! Ray casts and overlap queries take an explicit mask instead, tested against the
//! candidate body's group only.

use bitflags::bitflags;

bitflags! {
    /// Named collision groups, one bit each
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionGroups: u32 {
        /// Ordinary dynamic objects
        const DEFAULT = 1 << 0;
        /// Level geometry that never moves
        const STATIC_BODIES = 1 << 1;
        /// Player and NPC capsules
        const CHARACTERS = 1 << 2;
        /// Small loose objects and projectiles
        const DEBRIS = 1 << 3;
        /// Non-solid volumes that only report overlaps
        const GHOSTS = 1 << 4;
        /// Scripted trigger volumes
        const TRIGGERS = 1 << 5;
    }
}

impl CollisionGroups {
    /// Union of every named group
    pub const EVERYTHING: Self = Self::all();

    /// Mask for rays that should only hit solid world geometry (menu picking, ground probes)
    pub const SOLID_WORLD: Self = Self::DEFAULT.union(Self::STATIC_BODIES);

    /// Look up a single named group
    pub fn from_group_name(name: &str) -> Option<Self> {
        GROUP_TABLE
            .iter()
            .find(|(group_name, _)| group_name.eq_ignore_ascii_case(name))
            .map(|(_, group)| *group)
    }
}

/// Symbolic names of the collision groups
pub const GROUP_TABLE: [(&str, CollisionGroups); 6] = [
    ("default", CollisionGroups::DEFAULT),
    ("static_bodies", CollisionGroups::STATIC_BODIES),
    ("characters", CollisionGroups::CHARACTERS),
    ("debris", CollisionGroups::DEBRIS),
    ("ghosts", CollisionGroups::GHOSTS),
    ("triggers", CollisionGroups::TRIGGERS),
];

/// Group and mask of one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    /// Groups this body belongs to
    pub group: CollisionGroups,
    /// Groups this body accepts contacts from
    pub mask: CollisionGroups,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::new(CollisionGroups::DEFAULT, CollisionGroups::EVERYTHING)
    }
}

impl CollisionFilter {
    /// Create a filter from a group and a mask
    pub const fn new(group: CollisionGroups, mask: CollisionGroups) -> Self {
        Self { group, mask }
    }

    /// Check if two bodies should interact
    pub fn should_collide(&self, other: &Self) -> bool {
        self.group.intersects(other.mask) && other.group.intersects(self.mask)
    }

    /// Check if a query with `mask` may report this body
    pub fn accepted_by(&self, mask: CollisionGroups) -> bool {
        self.group.intersects(mask)
    }

    /// Immovable level geometry, touched by everything except other statics
    pub fn static_world() -> Self {
        Self::new(
            CollisionGroups::STATIC_BODIES,
            CollisionGroups::EVERYTHING.difference(CollisionGroups::STATIC_BODIES),
        )
    }

    /// Player or NPC capsule
    pub fn character() -> Self {
        Self::new(CollisionGroups::CHARACTERS, CollisionGroups::EVERYTHING)
    }

    /// Loose objects; they skip characters and other debris
    pub fn debris() -> Self {
        Self::new(
            CollisionGroups::DEBRIS,
            CollisionGroups::SOLID_WORLD | CollisionGroups::GHOSTS | CollisionGroups::TRIGGERS,
        )
    }

    /// Non-solid volume reporting overlaps with the groups in `mask`
    pub fn ghost(mask: CollisionGroups) -> Self {
        Self::new(CollisionGroups::GHOSTS, mask)
    }

    /// Trigger volume that notices characters only
    pub fn trigger() -> Self {
        Self::new(CollisionGroups::TRIGGERS, CollisionGroups::CHARACTERS)
    }
}
