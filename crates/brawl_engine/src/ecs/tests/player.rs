use super::Harness;
use crate::audio::SoundGroup;
use crate::config::MovementConfig;
use crate::ecs::components::DeviceInput;
use crate::ecs::EntityId;
use crate::foundation::math::{horizontal, Quat, Vec3};
use crate::gameplay::PlayerLogic;
use crate::input::InputState;
use crate::physics::{BodyDesc, CollisionShape, PhysicsBody};
use approx::assert_relative_eq;

const MASS: f32 = 80.0;

fn arena() -> (Harness, EntityId) {
    arena_with(MovementConfig::default())
}

fn arena_with(config: MovementConfig) -> (Harness, EntityId) {
    let mut harness = Harness::new(Vec3::new(0.0, -9.81, 0.0));
    let scene = harness.scene;
    harness.world.spawn_in(scene, "floor", |object| {
        object.set_position(Vec3::new(0.0, -0.5, 0.0));
        let slab = CollisionShape::cuboid(Vec3::new(50.0, 0.5, 50.0)).unwrap();
        object.set_physics_component(PhysicsBody::new(object.id(), BodyDesc::fixed(slab).with_friction(1.0)));
    });

    let cues = harness.services.sound_cues().clone();
    let player = harness.world.spawn_in(scene, "player", |object| {
        object.set_position(Vec3::new(0.0, 1.1, 0.0));
        let capsule = CollisionShape::capsule(0.4, 0.5).unwrap();
        object.set_physics_component(PhysicsBody::new(object.id(), BodyDesc::character(capsule, MASS)));
        object.set_input_component(DeviceInput::default());
        object.set_logic_component(PlayerLogic::new(object.id(), config));
        object.add_observer(&cues);
    });
    (harness, player)
}

fn feed(harness: &mut Harness, player: EntityId, state: InputState) {
    harness.world.feed_input(player, state);
}

fn velocity(harness: &Harness, player: EntityId) -> Vec3 {
    let handle = harness.handle(player);
    harness.physics().borrow().linear_velocity(handle).unwrap()
}

fn set_velocity(harness: &Harness, player: EntityId, velocity: Vec3) {
    harness.world.object(player).unwrap().physics().set_linear_velocity(velocity);
}

#[test]
fn test_grounded_move_force_stays_in_bounds() {
    let (mut harness, player) = arena();
    let config = MovementConfig::default();
    feed(
        &mut harness,
        player,
        InputState {
            move_forward: true,
            ..Default::default()
        },
    );

    let mut now = 0.0;
    for speed in [-30.0, -3.0, 0.0, 2.0, 5.9, 6.0, 12.0, 80.0] {
        set_velocity(&harness, player, Vec3::new(0.0, 0.0, -speed));
        let before = horizontal(harness.accumulated_force(player));
        now += 1.0 / 60.0;
        harness.tick(player, now);
        let applied = horizontal(harness.accumulated_force(player)) - before;

        let magnitude = applied.norm();
        assert!(magnitude >= config.normal_move_force - 1.0e-2, "speed {speed}: {magnitude}");
        assert!(magnitude <= config.max_move_force + 1.0e-2, "speed {speed}: {magnitude}");
    }
}

#[test]
fn test_hover_spring_holds_player_up() {
    let (mut harness, player) = arena();
    harness
        .world
        .object_mut(player)
        .unwrap()
        .teleport(Vec3::new(0.0, 1.0, 0.0), Quat::identity());
    harness.tick(player, 0.0);

    let force = harness.accumulated_force(player);
    let expected = (1.2 - 1.0) * MovementConfig::default().spring_strength;
    assert_relative_eq!(force.y, expected, epsilon = 1.0);
}

#[test]
fn test_jump_suppresses_spring_and_plays_cue() {
    let (mut harness, player) = arena();
    harness
        .world
        .object_mut(player)
        .unwrap()
        .teleport(Vec3::new(0.0, 1.0, 0.0), Quat::identity());
    feed(
        &mut harness,
        player,
        InputState {
            jump: true,
            ..Default::default()
        },
    );
    harness.tick(player, 0.0);

    assert_eq!(harness.accumulated_force(player).y, 0.0);
    assert_relative_eq!(velocity(&harness, player).y, 480.0 / MASS, epsilon = 1.0e-4);
    assert_eq!(harness.audio.borrow().count(SoundGroup::Jump), 1);

    // Still near the ground and rising: the spring would pull down, so it stays off
    feed(&mut harness, player, InputState::default());
    harness.tick(player, 1.0 / 60.0);
    assert_eq!(harness.accumulated_force(player).y, 0.0);
}

#[test]
fn test_single_air_jump() {
    let (mut harness, player) = arena();
    harness
        .world
        .object_mut(player)
        .unwrap()
        .teleport(Vec3::new(0.0, 8.0, 0.0), Quat::identity());
    set_velocity(&harness, player, Vec3::new(0.0, -3.0, 0.0));

    let jump = InputState {
        jump: true,
        move_forward: true,
        ..Default::default()
    };
    feed(&mut harness, player, jump);
    harness.tick(player, 0.0);
    let after_first = velocity(&harness, player);
    assert_relative_eq!(after_first.y, 480.0 / MASS, epsilon = 1.0e-4);
    assert_relative_eq!(after_first.z, -480.0 * 0.5 / MASS, epsilon = 1.0e-4);

    // Holding the button is not a new press
    harness.tick(player, 0.1);
    feed(&mut harness, player, InputState::default());
    harness.tick(player, 0.2);
    feed(&mut harness, player, jump);
    harness.tick(player, 0.3);
    assert_relative_eq!(velocity(&harness, player).y, after_first.y, epsilon = 1.0e-4);
    assert_eq!(harness.audio.borrow().count(SoundGroup::Jump), 1);
}

#[test]
fn test_footstep_every_stride() {
    let (mut harness, player) = arena();
    let mut now = 0.0;
    for x in [0.0, 1.0, 2.0, 3.0, 4.0] {
        harness.world.object_mut(player).unwrap().set_position(Vec3::new(x, 1.1, 0.0));
        harness.tick(player, now);
        now += 1.0 / 60.0;
    }
    // Four metres walked at a 1.8 m stride
    assert_eq!(harness.audio.borrow().count(SoundGroup::Footstep), 2);
}

#[test]
fn test_zero_stride_disables_footsteps() {
    let (mut harness, player) = arena_with(MovementConfig {
        footstep_stride: 0.0,
        ..MovementConfig::default()
    });
    let mut now = 0.0;
    for x in [0.0, 1.0, 2.0, 3.0] {
        harness.world.object_mut(player).unwrap().set_position(Vec3::new(x, 1.1, 0.0));
        harness.tick(player, now);
        now += 1.0 / 60.0;
    }
    assert_eq!(harness.audio.borrow().count(SoundGroup::Footstep), 0);
}

#[test]
fn test_no_footsteps_in_the_air() {
    let (mut harness, player) = arena();
    for x in [0.0, 2.0, 4.0] {
        harness.world.object_mut(player).unwrap().set_position(Vec3::new(x, 10.0, 0.0));
        harness.tick(player, 0.0);
    }
    assert_eq!(harness.audio.borrow().count(SoundGroup::Footstep), 0);
}

#[test]
fn test_abilities_fire_from_input() {
    let (mut harness, player) = arena();
    let config = crate::config::EngineConfig::default();
    let logic = PlayerLogic::armed(player, &config).unwrap();
    harness.world.object_mut(player).unwrap().set_logic_component(logic);
    feed(
        &mut harness,
        player,
        InputState {
            primary_attack: true,
            secondary_attack: true,
            ..Default::default()
        },
    );

    let commands = harness.tick(player, 0.0);
    assert_eq!(commands.spawn_count(), 2);
    assert_eq!(harness.audio.borrow().count(SoundGroup::Explosion), 1);
    assert_eq!(harness.audio.borrow().count(SoundGroup::Projectile), 1);

    // Both on cooldown next tick
    let commands = harness.tick(player, 1.0 / 60.0);
    assert_eq!(commands.spawn_count(), 0);
}
