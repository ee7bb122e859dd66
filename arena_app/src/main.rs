//! Headless arena demo
//!
//! Builds a small arena, spawns a player driven by scripted input and lets it
//! walk, jump and fire both abilities at a pile of crates for a fixed number of
//! frames. Everything the player does shows up in the log.
//!
//! Usage: `arena_demo [frames] [config.toml|config.ron]`

use brawl_engine::audio::SpatialAudio;
use brawl_engine::ecs::SceneStats;
use brawl_engine::foundation::logging;
use brawl_engine::render::RenderQueue;
use brawl_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

const DEFAULT_FRAMES: u32 = 600;
const FRAME_TIME: f32 = 1.0 / 60.0;
const CRATE_COUNT: usize = 12;

/// Demo-level errors
#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Invalid frame count: {0}")]
    FrameCount(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] brawl_engine::config::ConfigError),
}

struct ArenaDemo {
    frames_left: u32,
    frame: u32,
    rng: StdRng,
    scene: Option<SceneId>,
    player: Option<EntityId>,
    heading: f32,
}

impl ArenaDemo {
    fn new(frames: u32, seed: u64) -> Self {
        Self {
            frames_left: frames,
            frame: 0,
            rng: StdRng::seed_from_u64(seed),
            scene: None,
            player: None,
            heading: 0.0,
        }
    }

    fn spawn_level(&mut self, engine: &mut Engine, scene: SceneId) -> Result<(), AppError> {
        let (cube, sphere, lit) = {
            let mut assets = engine.services().assets();
            (assets.load_mesh("cube"), assets.load_mesh("sphere"), assets.load_shader_program("lit"))
        };
        let floor_shape = CollisionShape::cuboid(Vec3::new(30.0, 0.5, 30.0))
            .map_err(|e| AppError::GameLogic(e.to_string()))?;
        let crate_shape =
            CollisionShape::cuboid(Vec3::new(0.5, 0.5, 0.5)).map_err(|e| AppError::GameLogic(e.to_string()))?;

        let world = engine.world_mut();
        world.spawn_in(scene, "floor", |object| {
            object.set_position(Vec3::new(0.0, -0.5, 0.0));
            object.set_scale(Vec3::new(30.0, 0.5, 30.0));
            object.set_graphics_component(ModelGraphics::new(cube, lit));
            object.set_physics_component(PhysicsBody::new(object.id(), BodyDesc::fixed(floor_shape).with_friction(1.0)));
        });

        for i in 0..CRATE_COUNT {
            let position = Vec3::new(
                self.rng.gen_range(-8.0..8.0),
                self.rng.gen_range(0.5..4.0),
                self.rng.gen_range(-12.0..-3.0),
            );
            let mass = self.rng.gen_range(5.0..40.0);
            let shape = crate_shape;
            world.spawn_in(scene, format!("crate {i}"), move |object| {
                object.set_position(position);
                object.set_graphics_component(ModelGraphics::new(cube, lit));
                object.set_physics_component(PhysicsBody::new(object.id(), BodyDesc::dynamic(shape, mass)));
            });
        }

        world.spawn_in(scene, "lamp", |object| {
            object.set_position(Vec3::new(0.0, 6.0, -6.0));
            object.set_graphics_component(ModelGraphics::new(sphere, lit));
            object.set_light_component(PointLight::new(Vec3::new(1.0, 0.9, 0.7), 2.0, 25.0));
        });
        Ok(())
    }

    fn spawn_player(engine: &mut Engine, scene: SceneId) -> Result<EntityId, AppError> {
        let config = engine.config().clone();
        let capsule = CollisionShape::capsule(0.4, 0.5).map_err(|e| AppError::GameLogic(e.to_string()))?;
        let cues = engine.services().sound_cues().clone();

        let id = engine.world_mut().spawn("player");
        let logic = PlayerLogic::armed(id, &config).map_err(|e| AppError::GameLogic(e.to_string()))?;
        let object = engine
            .world_mut()
            .object_mut(id)
            .ok_or_else(|| AppError::Custom("player vanished during setup".to_string()))?;
        object.set_position(Vec3::new(0.0, 1.2, 0.0));
        object.set_physics_component(PhysicsBody::new(id, BodyDesc::character(capsule, 80.0)));
        object.set_input_component(DeviceInput::default());
        object.set_camera_component(FirstPersonCamera::default());
        object.set_logic_component(logic);
        object.add_observer(&cues);
        engine.world_mut().attach(id, Some(scene));
        Ok(id)
    }

    /// Wander around, turning now and then, jumping and attacking on a rhythm
    fn scripted_input(&mut self) -> InputState {
        if self.frame % 90 == 0 {
            self.heading = self.rng.gen_range(-1.0..1.0);
        }
        InputState {
            move_forward: self.frame % 240 < 200,
            move_left: self.heading < -0.5,
            move_right: self.heading > 0.5,
            look_x: self.heading * 4.0,
            look_y: 0.0,
            jump: matches!(self.frame % 120, 60 | 61 | 75),
            primary_attack: self.frame % 150 == 149,
            secondary_attack: self.frame % 45 == 44,
            ..Default::default()
        }
    }

    fn log_stats(&self, engine: &Engine) {
        let Some(stats) = self.scene.and_then(|scene| engine.world().scene_stats(scene)) else {
            return;
        };
        let SceneStats {
            entity_count,
            body_count,
            contact_count,
        } = stats;
        log::info!(
            "t={:.2}s entities={} bodies={} contacts={}",
            engine.world().time(),
            entity_count,
            body_count,
            contact_count
        );
    }
}

impl Application for ArenaDemo {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Building arena...");
        let scene = engine.world_mut().create_scene("arena");
        self.spawn_level(engine, scene)?;
        let player = Self::spawn_player(engine, scene)?;
        self.scene = Some(scene);
        self.player = Some(player);
        log::info!("Arena ready with {} entities", engine.world().len());
        Ok(())
    }

    fn frame_time(&mut self, _measured: f32) -> f32 {
        FRAME_TIME
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        if self.frames_left == 0 {
            engine.quit();
            return Ok(());
        }
        self.frames_left -= 1;
        self.frame += 1;

        let input = self.scripted_input();
        if let Some(player) = self.player {
            if !engine.world_mut().feed_input(player, input) {
                return Err(AppError::GameLogic("player entity is gone".to_string()));
            }
        }
        Ok(())
    }

    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let (Some(scene), Some(player)) = (self.scene, self.player) else {
            return Ok(());
        };
        let Some(ctx) = engine.render(scene, player, None) else {
            return Err(AppError::Custom("arena scene has no viewer".to_string()));
        };
        if self.frame % 60 == 0 {
            let queue = RenderQueue::from_context(&ctx);
            log::debug!(
                "Frame {}: {} draws in {} batches, {} lights",
                self.frame,
                queue.draw_count(),
                queue.batches().len(),
                ctx.lights().len()
            );
            self.log_stats(engine);
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        self.log_stats(engine);
        if engine.dropped_steps() > 0 {
            log::warn!("Dropped {} simulation steps", engine.dropped_steps());
        }
        log::info!("Arena demo finished after {} frames", self.frame);
    }
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let frames = match args.next() {
        Some(arg) => arg.parse::<u32>().map_err(|_| DemoError::FrameCount(arg))?,
        None => DEFAULT_FRAMES,
    };
    let config = match args.next() {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::load_or_default("arena.toml")?,
    };
    logging::init_with_filter(&config.log_level);

    let audio: Rc<RefCell<dyn AudioBackend>> = Rc::new(RefCell::new(LogAudio::new(SpatialAudio::default())));
    let engine = Engine::with_backends(config, audio, AssetManager::default())?;

    let mut app = ArenaDemo::new(frames, 7);
    engine.run_app(&mut app)?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        // Logger may not be up yet
        eprintln!("arena_demo: {e}");
        std::process::exit(1);
    }
}
