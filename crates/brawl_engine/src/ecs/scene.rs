//! Scenes
//!
//! A scene groups entities and owns the physics world they simulate in. Entities
//! reach their scene only through a [`SceneLink`], which holds the physics world
//! weakly; dropping the scene drops the world.

use super::EntityId;
use crate::physics::PhysicsWorld;
use slotmap::new_key_type;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Generational scene identifier
    pub struct SceneId;
}

/// Back reference from an entity to its scene
#[derive(Debug, Clone)]
pub struct SceneLink {
    /// Scene the entity belongs to
    pub id: SceneId,
    /// That scene's physics world
    pub physics: Weak<RefCell<PhysicsWorld>>,
}

/// Entity and body counts of one scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Entities attached to the scene
    pub entity_count: usize,
    /// Bodies registered with the scene's physics world
    pub body_count: usize,
    /// Overlapping pairs found during the last physics step
    pub contact_count: usize,
}

/// A set of entities sharing one physics world
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    name: String,
    physics: Rc<RefCell<PhysicsWorld>>,
    members: Vec<EntityId>,
}

impl Scene {
    pub(crate) fn new(id: SceneId, name: impl Into<String>, physics: PhysicsWorld) -> Self {
        Self {
            id,
            name: name.into(),
            physics: Rc::new(RefCell::new(physics)),
            members: Vec::new(),
        }
    }

    /// Identifier in the owning world
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The physics world owned by this scene
    pub fn physics(&self) -> &Rc<RefCell<PhysicsWorld>> {
        &self.physics
    }

    /// Attached entities in attach order
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    /// Whether `entity` is attached here
    pub fn contains(&self, entity: EntityId) -> bool {
        self.members.contains(&entity)
    }

    /// Link handed to attached entities
    pub fn link(&self) -> SceneLink {
        SceneLink {
            id: self.id,
            physics: Rc::downgrade(&self.physics),
        }
    }

    /// Current counts
    pub fn stats(&self) -> SceneStats {
        let (body_count, contact_count) = self
            .physics
            .try_borrow()
            .map(|world| (world.body_count(), world.contacts().len()))
            .unwrap_or_default();
        SceneStats {
            entity_count: self.members.len(),
            body_count,
            contact_count,
        }
    }

    pub(crate) fn insert(&mut self, entity: EntityId) {
        if !self.contains(entity) {
            self.members.push(entity);
        }
    }

    pub(crate) fn remove(&mut self, entity: EntityId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != entity);
        before != self.members.len()
    }
}
