//! Entity implementation
//!
//! A [`GameObject`] is a transform plus exactly one component of each kind. Slots
//! start out holding the null implementation of their kind and are replaced with
//! `set_*_component`, so every accessor always returns something usable.
//!
//! Entities are owned by the [`World`](super::World) arena and addressed through
//! generational [`EntityId`]s. An entity knows its scene only through a weak
//! [`SceneLink`]; it never keeps a scene or a physics world alive.

use super::components::{
    CameraComponent, GraphicsComponent, InputComponent, LightComponent, LogicComponent, NullCamera, NullGraphics,
    NullInput, NullLight, NullLogic, NullPhysics, PhysicsComponent,
};
use super::context::TickContext;
use super::scene::{SceneId, SceneLink};
use crate::events::{deliver, observer_ref, Event, Observer, ObserverRef, Subject};
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::input::InputState;
use crate::render::RenderContext;
use slotmap::new_key_type;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

new_key_type! {
    /// Generational entity identifier
    ///
    /// A removed entity's id is never handed out again, so stale ids are
    /// detected instead of aliasing a newer entity.
    pub struct EntityId;
}

/// Per-tick closure stored on an entity, run after its logic component
pub type TickCallback = Box<dyn FnMut(&mut GameObject, &mut TickContext<'_>)>;

/// An entity: transform, six component slots, scene link and event channel
pub struct GameObject {
    id: EntityId,
    name: String,
    transform: Transform,
    graphics: Box<dyn GraphicsComponent>,
    physics: Rc<RefCell<dyn PhysicsComponent>>,
    physics_observer: Option<ObserverRef>,
    logic: Box<dyn LogicComponent>,
    logic_generation: u32,
    input: Box<dyn InputComponent>,
    camera: Box<dyn CameraComponent>,
    light: Box<dyn LightComponent>,
    scene: Option<SceneLink>,
    on_tick: Option<TickCallback>,
    tick_generation: u32,
    subject: Subject,
}

impl GameObject {
    /// Create an entity with every slot holding its null component
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            name: String::new(),
            transform: Transform::identity(),
            graphics: Box::new(NullGraphics),
            physics: Rc::new(RefCell::new(NullPhysics)),
            physics_observer: None,
            logic: Box::new(NullLogic),
            logic_generation: 0,
            input: Box::new(NullInput),
            camera: Box::new(NullCamera),
            light: Box::new(NullLight),
            scene: None,
            on_tick: None,
            tick_generation: 0,
            subject: Subject::new(),
        }
    }

    /// Identifier in the owning world
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Display name, empty unless set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Builder-style name setter
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    // Transform

    /// Position, orientation and scale
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Set the world position; physics picks it up on the next push or warp
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Orientation
    pub fn orientation(&self) -> Quat {
        self.transform.rotation
    }

    /// Set the orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.transform.rotation = orientation;
    }

    /// Per-axis scale
    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    /// Set the scale and raise [`Event::Scaled`]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.notify(Event::Scaled);
    }

    /// Facing direction
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// Move the entity and its physics body regardless of body kind
    pub fn teleport(&mut self, position: Vec3, orientation: Quat) {
        self.transform.position = position;
        self.transform.rotation = orientation;
        self.physics.borrow().warp(&self.transform);
    }

    // Scene

    /// Link to the owning scene, if any
    pub fn scene(&self) -> Option<&SceneLink> {
        self.scene.as_ref()
    }

    /// Id of the owning scene, if any
    pub fn scene_id(&self) -> Option<SceneId> {
        self.scene.as_ref().map(|link| link.id)
    }

    /// Replace the scene link and raise [`Event::SceneAttached`]
    pub(crate) fn attach(&mut self, link: Option<SceneLink>) {
        self.scene = link;
        self.notify(Event::SceneAttached);
    }

    // Component slots

    /// Graphics component
    pub fn graphics(&self) -> &dyn GraphicsComponent {
        self.graphics.as_ref()
    }

    /// Mutable graphics component
    pub fn graphics_mut(&mut self) -> &mut dyn GraphicsComponent {
        self.graphics.as_mut()
    }

    /// Replace the graphics component
    pub fn set_graphics_component(&mut self, component: impl GraphicsComponent + 'static) {
        self.graphics = Box::new(component);
    }

    /// Physics component
    ///
    /// # Panics
    /// If the physics component is already mutably borrowed, which only happens
    /// while it handles an event raised by this entity.
    pub fn physics(&self) -> Ref<'_, dyn PhysicsComponent> {
        self.physics.borrow()
    }

    /// Mutable physics component, same borrow rules as [`Self::physics`]
    pub fn physics_mut(&self) -> RefMut<'_, dyn PhysicsComponent> {
        self.physics.borrow_mut()
    }

    /// Shared handle to the physics component
    pub fn physics_handle(&self) -> Rc<RefCell<dyn PhysicsComponent>> {
        Rc::clone(&self.physics)
    }

    /// Replace the physics component
    ///
    /// The new component observes this entity; the old one is unsubscribed and
    /// dropped, which deregisters it from its world. Registration of the new one
    /// happens on the next [`Event::SceneAttached`].
    pub fn set_physics_component<P: PhysicsComponent + 'static>(&mut self, component: P) {
        let component = Rc::new(RefCell::new(component));
        let observer = observer_ref(&component);
        if let Some(previous) = self.physics_observer.replace(observer.clone()) {
            self.subject.remove_observer(&previous);
        }
        self.subject.add_observer(observer);
        let component: Rc<RefCell<dyn PhysicsComponent>> = component;
        let previous = std::mem::replace(&mut self.physics, component);
        drop(previous);
    }

    /// Logic component
    pub fn logic(&self) -> &dyn LogicComponent {
        self.logic.as_ref()
    }

    /// Replace the logic component
    pub fn set_logic_component(&mut self, component: impl LogicComponent + 'static) {
        self.logic = Box::new(component);
        self.logic_generation = self.logic_generation.wrapping_add(1);
    }

    /// Input component
    pub fn input(&self) -> &dyn InputComponent {
        self.input.as_ref()
    }

    /// Mutable input component
    pub fn input_mut(&mut self) -> &mut dyn InputComponent {
        self.input.as_mut()
    }

    /// Replace the input component
    pub fn set_input_component(&mut self, component: impl InputComponent + 'static) {
        self.input = Box::new(component);
    }

    /// Camera component
    pub fn camera(&self) -> &dyn CameraComponent {
        self.camera.as_ref()
    }

    /// Mutable camera component
    pub fn camera_mut(&mut self) -> &mut dyn CameraComponent {
        self.camera.as_mut()
    }

    /// Replace the camera component
    pub fn set_camera_component(&mut self, component: impl CameraComponent + 'static) {
        self.camera = Box::new(component);
    }

    /// Light component
    pub fn light(&self) -> &dyn LightComponent {
        self.light.as_ref()
    }

    /// Replace the light component
    pub fn set_light_component(&mut self, component: impl LightComponent + 'static) {
        self.light = Box::new(component);
    }

    // Per-tick behaviour

    /// Install a closure run every tick after the logic component
    pub fn set_tick_callback(&mut self, callback: impl FnMut(&mut GameObject, &mut TickContext<'_>) + 'static) {
        self.on_tick = Some(Box::new(callback));
        self.tick_generation = self.tick_generation.wrapping_add(1);
    }

    /// Remove the tick closure
    pub fn clear_tick_callback(&mut self) {
        self.on_tick = None;
        self.tick_generation = self.tick_generation.wrapping_add(1);
    }

    /// Whether a tick closure is installed
    pub fn has_tick_callback(&self) -> bool {
        self.on_tick.is_some()
    }

    /// Feed the input component
    pub fn feed_input(&mut self, state: InputState) {
        self.input.feed(state);
    }

    /// Run the logic component, then the tick closure
    ///
    /// Each is moved out of its slot while it runs so it can borrow the entity
    /// mutably. It goes back afterwards unless it replaced itself.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if !self.logic.is_null() {
            let generation = self.logic_generation;
            let mut logic = std::mem::replace(&mut self.logic, Box::new(NullLogic));
            logic.update(self, ctx);
            if self.logic_generation == generation {
                self.logic = logic;
            }
        }

        if let Some(mut callback) = self.on_tick.take() {
            let generation = self.tick_generation;
            callback(self, ctx);
            if self.tick_generation == generation {
                self.on_tick = Some(callback);
            }
        }
    }

    /// Submit this entity's draw command and light
    pub fn draw(&self, ctx: &mut RenderContext) {
        self.graphics.draw(self, ctx);
        if let Some(light) = self.light.light(self) {
            ctx.add_light(light);
        }
    }

    /// Write the entity transform into physics where the body kind wants it
    pub fn push_to_physics(&self) {
        self.physics.borrow().push(&self.transform);
    }

    /// Copy the solved transform back where the body kind wants it
    pub fn pull_from_physics(&mut self) {
        self.physics.borrow().pull(&mut self.transform);
    }

    // Events

    /// Subscribe an observer to this entity's events
    pub fn add_observer<O: Observer + 'static>(&mut self, observer: &Rc<RefCell<O>>) {
        self.subject.add_observer(observer_ref(observer));
    }

    /// Unsubscribe an observer; unknown observers are ignored
    pub fn remove_observer<O: Observer + 'static>(&mut self, observer: &Rc<RefCell<O>>) -> bool {
        self.subject.remove_observer(&observer_ref(observer))
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.subject.live_count()
    }

    /// Deliver `event` to every observer of this entity
    ///
    /// Handlers may subscribe or unsubscribe observers of this entity. Those added
    /// hear the next event; those removed hear nothing further, this one included.
    pub fn notify(&mut self, event: Event) {
        for observer in self.subject.snapshot() {
            if self.subject.contains(&observer) {
                deliver(&observer, self, event);
            }
        }
        self.subject.prune();
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("scene", &self.scene_id())
            .field("observers", &self.subject)
            .finish_non_exhaustive()
    }
}
