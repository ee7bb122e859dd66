use super::Harness;
use crate::ecs::commands::Commands;
use crate::ecs::EntityId;
use crate::foundation::math::Vec3;
use crate::gameplay::explosion::{explosion_falloff, Blast, BLAST_MASK};
use crate::gameplay::transient::expiring;
use crate::physics::{BodyDesc, CollisionShape, PhysicsBody};
use approx::assert_relative_eq;

const RADIUS: f32 = 4.0;
const STRENGTH: f32 = 300.0;

struct Setup {
    harness: Harness,
    caster: EntityId,
    target: EntityId,
    explosion: EntityId,
}

fn setup() -> Setup {
    let mut harness = Harness::new(Vec3::zeros());
    let scene = harness.scene;
    let caster = harness.world.spawn_in(scene, "caster", |object| {
        let capsule = CollisionShape::capsule(0.4, 0.5).unwrap();
        object.set_physics_component(PhysicsBody::new(object.id(), BodyDesc::character(capsule, 80.0)));
    });
    let target = harness.world.spawn_in(scene, "barrel", |object| {
        object.set_position(Vec3::new(2.0, 0.0, 0.0));
        let sphere = CollisionShape::sphere(0.5).unwrap();
        object.set_physics_component(PhysicsBody::new(object.id(), BodyDesc::dynamic(sphere, 10.0)));
    });

    let blast = Blast {
        caster,
        radius: RADIUS,
        strength: STRENGTH,
    };
    let explosion = harness.world.spawn_in(scene, "explosion", move |object| {
        let ghost = BodyDesc::ghost(CollisionShape::sphere(RADIUS).unwrap(), BLAST_MASK);
        object.set_physics_component(PhysicsBody::new(object.id(), ghost));
        object.set_tick_callback(expiring(0.0, 0.1, move |entity, ctx, _age| {
            blast.apply(entity, ctx);
        }));
    });

    Setup {
        harness,
        caster,
        target,
        explosion,
    }
}

#[test]
fn test_explosion_pushes_then_expires_once() {
    let Setup {
        mut harness,
        caster,
        target,
        explosion,
    } = setup();

    let commands = harness.tick(explosion, 0.05);
    assert!(commands.despawns().is_empty());
    let expected = STRENGTH * explosion_falloff(RADIUS, 2.0);
    assert_relative_eq!(harness.accumulated_force(target), Vec3::new(expected, 0.0, 0.0), epsilon = 1.0e-2);
    assert_eq!(harness.accumulated_force(caster), Vec3::zeros());

    let commands = harness.tick(explosion, 0.2);
    assert_eq!(commands.despawns(), &[explosion]);
    let later = harness.tick(explosion, 0.3);
    assert!(later.despawns().is_empty());

    let bodies_before = harness.physics().borrow().body_count();
    harness.world.apply_commands(commands);
    assert!(!harness.world.is_alive(explosion));
    assert_eq!(harness.physics().borrow().body_count(), bodies_before - 1);
}

#[test]
fn test_expired_explosion_applies_no_force() {
    let Setup {
        mut harness,
        target,
        explosion,
        ..
    } = setup();
    harness.tick(explosion, 0.2);
    assert_eq!(harness.accumulated_force(target), Vec3::zeros());
}

#[test]
fn test_caster_leaving_is_no_longer_spared() {
    let Setup {
        mut harness,
        caster,
        explosion,
        ..
    } = setup();
    let mut queued = Commands::new();
    queued.despawn(caster);

    harness.tick_with(explosion, 0.05, queued);
    // Caster sits on the centre, so it is pushed straight up at full falloff
    let expected = STRENGTH * explosion_falloff(RADIUS, 0.0);
    assert_relative_eq!(harness.accumulated_force(caster), Vec3::new(0.0, expected, 0.0), epsilon = 1.0e-2);
}

#[test]
fn test_explosion_ability_spawns_on_use_only_when_ready() {
    use crate::config::ExplosionConfig;
    use crate::ecs::context::TickContext;
    use crate::gameplay::{Ability, ExplosionAbility};

    let Setup { mut harness, caster, .. } = setup();
    let mut ability = ExplosionAbility::new(caster, &ExplosionConfig::default()).unwrap();
    let directory = harness.directory();
    let physics = harness.physics();
    let mut commands = Commands::new();
    {
        let mut ctx = TickContext::new(0.1, 1.0, harness.scene, physics, &mut commands, &directory, &harness.services);
        let caster_object = harness.world.object(caster).unwrap();
        assert!(ability.use_ability(caster_object, &mut ctx));
        let elapsed = ability.cooldown().elapsed();
        assert!(!ability.use_ability(caster_object, &mut ctx));
        assert_eq!(ability.cooldown().elapsed(), elapsed);
    }
    assert_eq!(commands.spawn_count(), 1);
    assert_eq!(harness.audio.borrow().count(crate::audio::SoundGroup::Explosion), 1);

    let members = harness.world.scene(harness.scene).unwrap().members().len();
    harness.world.apply_commands(commands);
    assert_eq!(harness.world.scene(harness.scene).unwrap().members().len(), members + 1);
}
