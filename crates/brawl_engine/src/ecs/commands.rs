//! Deferred world mutations
//!
//! Logic runs while the world is being iterated, so it cannot create or destroy
//! entities directly. It queues [`Commands`] instead; the world applies them after
//! the logic pass and before the physics step.

use super::scene::SceneId;
use super::{EntityId, GameObject};

/// Closure configuring a freshly created entity before it joins its scene
pub type SpawnFn = Box<dyn FnOnce(&mut GameObject)>;

/// A queued entity creation
pub struct SpawnRequest {
    /// Scene to attach the new entity to
    pub scene: Option<SceneId>,
    /// Display name
    pub name: String,
    /// Setup run with the entity's final id already assigned
    pub build: SpawnFn,
}

impl std::fmt::Debug for SpawnRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnRequest")
            .field("scene", &self.scene)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Spawns and despawns queued during a logic pass
#[derive(Debug, Default)]
pub struct Commands {
    spawns: Vec<SpawnRequest>,
    despawns: Vec<EntityId>,
}

impl Commands {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an entity creation
    pub fn spawn(&mut self, scene: Option<SceneId>, name: impl Into<String>, build: impl FnOnce(&mut GameObject) + 'static) {
        self.spawns.push(SpawnRequest {
            scene,
            name: name.into(),
            build: Box::new(build),
        });
    }

    /// Queue an entity removal; queuing the same entity twice has no extra effect
    pub fn despawn(&mut self, entity: EntityId) {
        if !self.despawns.contains(&entity) {
            self.despawns.push(entity);
        }
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.despawns.is_empty()
    }

    /// Number of queued spawns
    pub fn spawn_count(&self) -> usize {
        self.spawns.len()
    }

    /// Queued removals
    pub fn despawns(&self) -> &[EntityId] {
        &self.despawns
    }

    /// Empty the queue, returning spawns then despawns
    pub fn drain(&mut self) -> (Vec<SpawnRequest>, Vec<EntityId>) {
        (std::mem::take(&mut self.spawns), std::mem::take(&mut self.despawns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_despawn_is_queued_once() {
        let mut commands = Commands::new();
        let id = EntityId::default();
        commands.despawn(id);
        commands.despawn(id);
        assert_eq!(commands.despawns(), &[id]);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut commands = Commands::new();
        commands.spawn(None, "shard", |object| object.set_name("renamed"));
        commands.despawn(EntityId::default());
        assert_eq!(commands.spawn_count(), 1);

        let (spawns, despawns) = commands.drain();
        assert_eq!(spawns.len(), 1);
        assert_eq!(spawns[0].name, "shard");
        assert_eq!(despawns.len(), 1);
        assert!(commands.is_empty());
    }
}
