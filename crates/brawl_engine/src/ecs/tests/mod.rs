//! Scenario tests driving several modules together

mod explosion;
mod player;
mod registration;

use crate::assets::AssetManager;
use crate::audio::RecordingAudio;
use crate::config::PhysicsConfig;
use crate::ecs::commands::Commands;
use crate::ecs::context::{Directory, EntitySnapshot, TickContext};
use crate::ecs::{EntityId, SceneId, World};
use crate::foundation::math::Vec3;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::services::Services;
use std::cell::RefCell;
use std::rc::Rc;

/// One world with one scene, ticked by hand
struct Harness {
    world: World,
    scene: SceneId,
    services: Services,
    audio: Rc<RefCell<RecordingAudio>>,
}

impl Harness {
    fn new(gravity: Vec3) -> Self {
        let mut world = World::new(PhysicsConfig {
            gravity,
            ..PhysicsConfig::default()
        });
        let scene = world.create_scene("scenario");
        let audio = Rc::new(RefCell::new(RecordingAudio::default()));
        let services = Services::new(audio.clone(), AssetManager::default());
        Self {
            world,
            scene,
            services,
            audio,
        }
    }

    fn physics(&self) -> Rc<RefCell<PhysicsWorld>> {
        self.world.scene(self.scene).unwrap().physics().clone()
    }

    fn handle(&self, entity: EntityId) -> BodyHandle {
        self.world.object(entity).unwrap().physics().body_handle().unwrap()
    }

    fn accumulated_force(&self, entity: EntityId) -> Vec3 {
        let handle = self.handle(entity);
        self.physics().borrow().body(handle).unwrap().accumulated_force()
    }

    fn directory(&self) -> Directory {
        let mut directory = Directory::new();
        for object in self.world.objects() {
            directory.insert(
                object.id(),
                EntitySnapshot {
                    position: object.position(),
                    scene: object.scene_id(),
                    body: object.physics().body_handle(),
                },
            );
        }
        directory
    }

    /// Tick one entity at simulation time `now` with `commands` already queued
    fn tick_with(&mut self, entity: EntityId, now: f64, mut commands: Commands) -> Commands {
        let directory = self.directory();
        let physics = self.physics();
        {
            let mut ctx = TickContext::new(1.0 / 60.0, now, self.scene, physics, &mut commands, &directory, &self.services);
            self.world.object_mut(entity).unwrap().tick(&mut ctx);
        }
        commands
    }

    fn tick(&mut self, entity: EntityId, now: f64) -> Commands {
        self.tick_with(entity, now, Commands::new())
    }
}
