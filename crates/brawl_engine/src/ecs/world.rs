//! World: entity arena, scenes and the per-step orchestration
//!
//! Each step runs scene by scene:
//!
//! 1. logic of every attached entity (logic component, then tick callback)
//! 2. queued spawns, then queued despawns
//! 3. push of ghost and static transforms into physics
//! 4. physics step
//! 5. pull of dynamic and character transforms out of physics

use super::commands::{Commands, SpawnRequest};
use super::context::{Directory, EntitySnapshot, TickContext};
use super::scene::{Scene, SceneId, SceneStats};
use super::{EntityId, GameObject};
use crate::assets::ShaderHandle;
use crate::config::PhysicsConfig;
use crate::input::InputState;
use crate::physics::PhysicsWorld;
use crate::render::RenderContext;
use crate::services::Services;
use slotmap::SlotMap;

/// Owner of all entities and scenes
pub struct World {
    objects: SlotMap<EntityId, GameObject>,
    scenes: SlotMap<SceneId, Scene>,
    physics_config: PhysicsConfig,
    time: f64,
}

impl World {
    /// Create an empty world; new scenes get physics worlds built from `physics_config`
    pub fn new(physics_config: PhysicsConfig) -> Self {
        Self {
            objects: SlotMap::with_key(),
            scenes: SlotMap::with_key(),
            physics_config,
            time: 0.0,
        }
    }

    /// Simulation time in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    // Scenes

    /// Create a scene with its own physics world
    pub fn create_scene(&mut self, name: impl Into<String>) -> SceneId {
        let name = name.into();
        let physics = PhysicsWorld::from_config(&self.physics_config);
        let id = self.scenes.insert_with_key(|id| Scene::new(id, name, physics));
        log::info!("Created scene {:?}", id);
        id
    }

    /// Remove a scene; its entities stay alive but lose their scene
    pub fn remove_scene(&mut self, scene: SceneId) -> bool {
        let Some(members) = self.scenes.get(scene).map(|s| s.members().to_vec()) else {
            return false;
        };
        for entity in members {
            self.attach(entity, None);
        }
        self.scenes.remove(scene);
        log::info!("Removed scene {:?}", scene);
        true
    }

    /// Scene by id
    pub fn scene(&self, scene: SceneId) -> Option<&Scene> {
        self.scenes.get(scene)
    }

    /// All scenes
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Counts for one scene
    pub fn scene_stats(&self, scene: SceneId) -> Option<SceneStats> {
        self.scenes.get(scene).map(Scene::stats)
    }

    // Entities

    /// Create an entity that belongs to no scene
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        let name = name.into();
        let id = self.objects.insert_with_key(|id| GameObject::new(id).with_name(name));
        log::debug!("Spawned {:?}", id);
        id
    }

    /// Create an entity, configure it with `build`, then attach it to `scene`
    pub fn spawn_in(
        &mut self,
        scene: SceneId,
        name: impl Into<String>,
        build: impl FnOnce(&mut GameObject),
    ) -> EntityId {
        let id = self.spawn(name);
        if let Some(object) = self.objects.get_mut(id) {
            build(object);
        }
        self.attach(id, Some(scene));
        id
    }

    /// Move `entity` to `scene`, or out of any scene with `None`
    ///
    /// Raises [`Event::SceneAttached`](crate::events::Event::SceneAttached) on the
    /// entity, which is what moves its physics body between worlds.
    pub fn attach(&mut self, entity: EntityId, scene: Option<SceneId>) -> bool {
        let Some(object) = self.objects.get_mut(entity) else {
            log::warn!("Cannot attach dead entity {:?}", entity);
            return false;
        };

        let link = match scene {
            Some(id) => match self.scenes.get(id) {
                Some(scene) => Some(scene.link()),
                None => {
                    log::warn!("Cannot attach {:?} to missing scene {:?}", entity, id);
                    return false;
                }
            },
            None => None,
        };

        if let Some(previous) = object.scene_id().and_then(|id| self.scenes.get_mut(id)) {
            previous.remove(entity);
        }
        if let Some(next) = scene.and_then(|id| self.scenes.get_mut(id)) {
            next.insert(entity);
        }

        log::debug!("Attaching {:?} to {:?}", entity, scene);
        object.attach(link);
        true
    }

    /// Remove an entity; its components are dropped, deregistering its body
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let Some(scene) = self.objects.get(entity).map(GameObject::scene_id) else {
            return false;
        };
        if scene.is_some() {
            self.attach(entity, None);
        }
        let removed = self.objects.remove(entity).is_some();
        log::debug!("Despawned {:?}", entity);
        removed
    }

    /// Entity by id
    pub fn object(&self, entity: EntityId) -> Option<&GameObject> {
        self.objects.get(entity)
    }

    /// Mutable entity by id
    pub fn object_mut(&mut self, entity: EntityId) -> Option<&mut GameObject> {
        self.objects.get_mut(entity)
    }

    /// Whether `entity` still exists
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.objects.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether there are no entities
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All live entities
    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    /// Hand input for the next step to an entity's input component
    pub fn feed_input(&mut self, entity: EntityId, state: InputState) -> bool {
        match self.objects.get_mut(entity) {
            Some(object) => {
                object.feed_input(state);
                true
            }
            None => false,
        }
    }

    // Simulation

    /// Advance every scene by one fixed step
    pub fn step(&mut self, dt: f32, services: &Services) {
        self.time += f64::from(dt);
        let scenes: Vec<SceneId> = self.scenes.keys().collect();
        for scene in scenes {
            self.step_scene(scene, dt, services);
        }
    }

    fn directory(&self) -> Directory {
        let mut directory = Directory::with_capacity(self.objects.len());
        for (id, object) in &self.objects {
            let snapshot = EntitySnapshot {
                position: object.position(),
                scene: object.scene_id(),
                body: object.physics().body_handle(),
            };
            directory.insert(id, snapshot);
        }
        directory
    }

    fn step_scene(&mut self, scene: SceneId, dt: f32, services: &Services) {
        let Some((physics, members)) = self
            .scenes
            .get(scene)
            .map(|s| (s.physics().clone(), s.members().to_vec()))
        else {
            return;
        };

        let directory = self.directory();
        let mut commands = Commands::new();
        {
            let mut ctx = TickContext::new(dt, self.time, scene, physics.clone(), &mut commands, &directory, services);
            for id in &members {
                if let Some(object) = self.objects.get_mut(*id) {
                    object.tick(&mut ctx);
                }
            }
        }

        self.apply_commands(commands);

        let Some(members) = self.scenes.get(scene).map(|s| s.members().to_vec()) else {
            return;
        };
        for id in &members {
            if let Some(object) = self.objects.get(*id) {
                object.push_to_physics();
            }
        }

        match physics.try_borrow_mut() {
            Ok(mut world) => world.step(dt),
            Err(_) => log::error!("Physics world of {:?} busy, step skipped", scene),
        }

        for id in &members {
            if let Some(object) = self.objects.get_mut(*id) {
                object.pull_from_physics();
            }
        }
    }

    /// Apply queued spawns, then queued despawns
    pub fn apply_commands(&mut self, mut commands: Commands) {
        let (spawns, despawns) = commands.drain();
        for SpawnRequest { scene, name, build } in spawns {
            let id = self.spawn(name);
            if let Some(object) = self.objects.get_mut(id) {
                build(object);
            }
            if scene.is_some() {
                self.attach(id, scene);
            }
        }
        for entity in despawns {
            if !self.despawn(entity) {
                log::debug!("Despawn of dead entity {:?} ignored", entity);
            }
        }
    }

    // Rendering

    /// Collect draws and lights of `scene` as seen by `camera`'s camera component
    pub fn render(&self, scene: SceneId, camera: EntityId, shader_override: Option<ShaderHandle>) -> Option<RenderContext> {
        let scene = self.scenes.get(scene)?;
        let viewer = self.objects.get(camera)?;
        let mut ctx = RenderContext::new(viewer.camera().view_matrix(viewer), viewer.camera().projection_matrix());
        ctx.shader_override = shader_override;
        for id in scene.members() {
            if let Some(object) = self.objects.get(*id) {
                object.draw(&mut ctx);
            }
        }
        Some(ctx)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.objects.len())
            .field("scenes", &self.scenes.len())
            .field("time", &self.time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{CameraComponent, FirstPersonCamera, ModelGraphics};
    use crate::foundation::math::Vec3;

    #[test]
    fn test_spawn_in_attaches() {
        let mut world = World::default();
        let scene = world.create_scene("arena");
        let id = world.spawn_in(scene, "crate", |object| object.set_position(Vec3::new(1.0, 0.0, 0.0)));

        assert_eq!(world.object(id).unwrap().scene_id(), Some(scene));
        assert!(world.scene(scene).unwrap().contains(id));
        assert_eq!(world.object(id).unwrap().name(), "crate");
    }

    #[test]
    fn test_despawned_id_is_not_reused() {
        let mut world = World::default();
        let first = world.spawn("a");
        assert!(world.despawn(first));
        assert!(!world.despawn(first));
        let second = world.spawn("b");
        assert_ne!(first, second);
        assert!(!world.is_alive(first));
        assert!(world.object(first).is_none());
    }

    #[test]
    fn test_remove_scene_detaches_members() {
        let mut world = World::default();
        let scene = world.create_scene("lobby");
        let id = world.spawn_in(scene, "guest", |_| {});
        assert!(world.remove_scene(scene));
        assert!(world.object(id).unwrap().scene().is_none());
        assert!(!world.remove_scene(scene));
    }

    #[test]
    fn test_scene_debug_shows_physics_world() {
        let mut world = World::default();
        let scene = world.create_scene("lobby");
        let text = format!("{:?}", world.scene(scene).unwrap());
        assert!(text.contains("PhysicsWorld"));
        assert!(text.contains("gravity"));
    }

    #[test]
    fn test_step_advances_time() {
        let mut world = World::default();
        world.create_scene("empty");
        world.step(0.5, &Services::headless());
        world.step(0.25, &Services::headless());
        assert!((world.time() - 0.75).abs() < 1.0e-9);
    }

    #[test]
    fn test_render_collects_scene_members_only() {
        let services = Services::headless();
        let (mesh, shader) = {
            let mut assets = services.assets();
            (assets.load_mesh("cube"), assets.load_shader_program("lit"))
        };

        let mut world = World::default();
        let arena = world.create_scene("arena");
        let other = world.create_scene("other");
        let viewer = world.spawn_in(arena, "viewer", |object| object.set_camera_component(FirstPersonCamera::default()));
        world.spawn_in(arena, "box", |object| object.set_graphics_component(ModelGraphics::new(mesh, shader)));
        world.spawn_in(other, "hidden", |object| object.set_graphics_component(ModelGraphics::new(mesh, shader)));

        let ctx = world.render(arena, viewer, None).unwrap();
        assert_eq!(ctx.draws().len(), 1);
        assert_eq!(ctx.projection, FirstPersonCamera::default().projection_matrix());
        assert!(world.render(arena, EntityId::default(), None).is_none());
    }
}
