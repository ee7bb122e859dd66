//! Per-tick context handed to logic components and tick callbacks

use super::commands::Commands;
use super::scene::SceneId;
use super::{EntityId, GameObject};
use crate::audio::SoundGroup;
use crate::foundation::math::Vec3;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::services::Services;
use slotmap::SecondaryMap;
use std::cell::RefCell;
use std::rc::Rc;

/// What other entities may know about an entity during a tick
///
/// Taken before the logic pass of a scene, so it reflects the previous step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    /// World position
    pub position: Vec3,
    /// Scene the entity is attached to
    pub scene: Option<SceneId>,
    /// Registered body, if any
    pub body: Option<BodyHandle>,
}

/// Lookup table of live entities
pub type Directory = SecondaryMap<EntityId, EntitySnapshot>;

/// Everything a logic component may touch besides its own entity
pub struct TickContext<'a> {
    /// Fixed step length in seconds
    pub dt: f32,
    /// Simulation time at the end of this step
    pub now: f64,
    /// Scene being stepped
    pub scene: SceneId,
    /// That scene's physics world
    pub physics: Rc<RefCell<PhysicsWorld>>,
    commands: &'a mut Commands,
    directory: &'a Directory,
    services: &'a Services,
}

impl<'a> TickContext<'a> {
    /// Assemble a context; the world does this once per scene step
    pub fn new(
        dt: f32,
        now: f64,
        scene: SceneId,
        physics: Rc<RefCell<PhysicsWorld>>,
        commands: &'a mut Commands,
        directory: &'a Directory,
        services: &'a Services,
    ) -> Self {
        Self {
            dt,
            now,
            scene,
            physics,
            commands,
            directory,
            services,
        }
    }

    /// Whether `entity` was alive when the step began and is not queued for removal
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.directory.contains_key(entity) && !self.commands.despawns().contains(&entity)
    }

    /// Snapshot of `entity`
    pub fn lookup(&self, entity: EntityId) -> Option<&EntitySnapshot> {
        self.directory.get(entity)
    }

    /// Position of `entity` when the step began
    pub fn position_of(&self, entity: EntityId) -> Option<Vec3> {
        self.lookup(entity).map(|snapshot| snapshot.position)
    }

    /// Queue creation of an entity in this scene
    pub fn spawn(&mut self, name: impl Into<String>, build: impl FnOnce(&mut GameObject) + 'static) {
        let scene = self.scene;
        self.commands.spawn(Some(scene), name, build);
    }

    /// Queue removal of `entity`
    pub fn despawn(&mut self, entity: EntityId) {
        self.commands.despawn(entity);
    }

    /// Play a sound through the shared audio backend
    pub fn play_sound(&self, group: SoundGroup, position: Vec3) {
        self.services.play(group, position);
    }

    /// Shared services
    pub fn services(&self) -> &Services {
        self.services
    }
}
