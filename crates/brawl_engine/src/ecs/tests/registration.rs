use super::Harness;
use crate::foundation::math::Vec3;
use crate::physics::{BodyDesc, CollisionGroups, CollisionShape, PhysicsBody};
use approx::assert_relative_eq;
use std::rc::Rc;

fn ball() -> BodyDesc {
    BodyDesc::dynamic(CollisionShape::sphere(0.5).unwrap(), 1.0)
}

#[test]
fn test_registration_follows_scene() {
    let mut harness = Harness::new(Vec3::zeros());
    let other = harness.world.create_scene("other");
    let id = harness
        .world
        .spawn_in(harness.scene, "ball", |object| object.set_physics_component(PhysicsBody::new(object.id(), ball())));

    let first = harness.physics();
    let second = harness.world.scene(other).unwrap().physics().clone();
    let registered = harness.world.object(id).unwrap().physics().registered_world().unwrap();
    assert!(Rc::ptr_eq(&registered, &first));

    harness.world.attach(id, Some(other));
    let registered = harness.world.object(id).unwrap().physics().registered_world().unwrap();
    assert!(Rc::ptr_eq(&registered, &second));
    assert_eq!(first.borrow().body_count(), 0);
    assert_eq!(second.borrow().body_count(), 1);

    harness.world.attach(id, None);
    assert!(harness.world.object(id).unwrap().physics().registered_world().is_none());
    assert_eq!(second.borrow().body_count(), 0);
}

#[test]
fn test_registration_follows_component_replacement() {
    let mut harness = Harness::new(Vec3::zeros());
    let id = harness
        .world
        .spawn_in(harness.scene, "ball", |object| object.set_physics_component(PhysicsBody::new(object.id(), ball())));
    let physics = harness.physics();
    assert_eq!(physics.borrow().body_count(), 1);

    let object = harness.world.object_mut(id).unwrap();
    let desc = BodyDesc::fixed(CollisionShape::cuboid(Vec3::new(1.0, 1.0, 1.0)).unwrap());
    object.set_physics_component(PhysicsBody::new(id, desc));
    // Old body dropped, new body waits for the next attach
    assert_eq!(physics.borrow().body_count(), 0);
    assert!(harness.world.object(id).unwrap().physics().registered_world().is_none());

    harness.world.attach(id, Some(harness.scene));
    assert_eq!(physics.borrow().body_count(), 1);
    assert_eq!(harness.world.scene(harness.scene).unwrap().members().len(), 1);
}

#[test]
fn test_despawn_and_scene_removal_deregister() {
    let mut harness = Harness::new(Vec3::zeros());
    let first = harness
        .world
        .spawn_in(harness.scene, "a", |object| object.set_physics_component(PhysicsBody::new(object.id(), ball())));
    let second = harness
        .world
        .spawn_in(harness.scene, "b", |object| object.set_physics_component(PhysicsBody::new(object.id(), ball())));
    let physics = harness.physics();
    assert_eq!(physics.borrow().body_count(), 2);

    assert!(harness.world.despawn(first));
    assert_eq!(physics.borrow().body_count(), 1);

    assert!(harness.world.remove_scene(harness.scene));
    assert_eq!(physics.borrow().body_count(), 0);
    assert!(harness.world.object(second).unwrap().physics().registered_world().is_none());
}

#[test]
fn test_step_pulls_dynamic_and_pushes_ghost() {
    let mut harness = Harness::new(Vec3::new(0.0, -10.0, 0.0));
    let ball_id = harness.world.spawn_in(harness.scene, "ball", |object| {
        object.set_position(Vec3::new(0.0, 10.0, 0.0));
        object.set_physics_component(PhysicsBody::new(object.id(), ball()));
    });
    let shape = CollisionShape::sphere(1.0).unwrap();
    let ghost_id = harness.world.spawn_in(harness.scene, "zone", |object| {
        object.set_physics_component(PhysicsBody::new(object.id(), BodyDesc::ghost(shape, CollisionGroups::EVERYTHING)));
    });

    harness
        .world
        .object_mut(ghost_id)
        .unwrap()
        .set_position(Vec3::new(3.0, 0.0, 0.0));
    let services = crate::services::Services::headless();
    harness.world.step(0.1, &services);

    assert!(harness.world.object(ball_id).unwrap().position().y < 10.0);
    let ghost_handle = harness.handle(ghost_id);
    let (ghost_position, _) = harness.physics().borrow().transform(ghost_handle).unwrap();
    assert_relative_eq!(ghost_position, Vec3::new(3.0, 0.0, 0.0));
    assert_relative_eq!(harness.world.object(ghost_id).unwrap().position(), Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_scale_reaches_collision_shape() {
    let mut harness = Harness::new(Vec3::zeros());
    let id = harness
        .world
        .spawn_in(harness.scene, "ball", |object| object.set_physics_component(PhysicsBody::new(object.id(), ball())));
    harness
        .world
        .object_mut(id)
        .unwrap()
        .set_scale(Vec3::new(3.0, 3.0, 3.0));

    let handle = harness.handle(id);
    let scaling = harness.physics().borrow().body(handle).unwrap().local_scaling();
    assert_relative_eq!(scaling, Vec3::new(3.0, 3.0, 3.0));
    assert_relative_eq!(harness.world.object(id).unwrap().physics().mass(), 1.0);
}

#[test]
fn test_teleport_moves_dynamic_body() {
    let mut harness = Harness::new(Vec3::zeros());
    let id = harness
        .world
        .spawn_in(harness.scene, "ball", |object| object.set_physics_component(PhysicsBody::new(object.id(), ball())));
    let target = Vec3::new(-4.0, 2.0, 1.0);
    harness
        .world
        .object_mut(id)
        .unwrap()
        .teleport(target, crate::foundation::math::Quat::identity());

    let handle = harness.handle(id);
    assert_relative_eq!(harness.physics().borrow().transform(handle).unwrap().0, target);
}
