//! Entity event channel
//!
//! Every [`GameObject`] owns a [`Subject`]: a list of weak observer references that
//! is notified synchronously, in subscription order, on the caller's stack. The
//! subject never keeps an observer alive. Observers that have been dropped are
//! skipped and removed from the list during the next notification.
//!
//! The vocabulary is closed. Physics components listen for [`Event::SceneAttached`]
//! and [`Event::Scaled`], audio listens for footsteps and jumps.

use crate::ecs::GameObject;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Events an entity can raise about itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// The entity moved to another scene, or left its scene
    SceneAttached,
    /// The entity's scale changed
    Scaled,
    /// The entity took a step while grounded
    FootstepOccurred,
    /// The entity jumped
    JumpOccurred,
    /// Placeholder event, ignored by every built-in observer
    Nothing,
}

/// Receiver of entity events
pub trait Observer {
    /// Handle `event` raised by `entity`
    ///
    /// The entity may be mutated but not destroyed; the world owns it.
    fn on_notify(&mut self, entity: &mut GameObject, event: Event);
}

/// Shared handle type the channel stores
pub type ObserverRef = Weak<RefCell<dyn Observer>>;

/// Downgrade a concrete observer into the handle stored by a [`Subject`]
pub fn observer_ref<O: Observer + 'static>(observer: &Rc<RefCell<O>>) -> ObserverRef {
    let observer: Rc<RefCell<dyn Observer>> = observer.clone();
    Rc::downgrade(&observer)
}

/// Hand `event` to one observer, returning false once it has been dropped
pub(crate) fn deliver(observer: &ObserverRef, entity: &mut GameObject, event: Event) -> bool {
    let Some(observer) = observer.upgrade() else {
        return false;
    };
    match observer.try_borrow_mut() {
        Ok(mut observer) => observer.on_notify(entity, event),
        Err(_) => log::warn!("Skipping re-entrant delivery of {:?} to a busy observer", event),
    }
    true
}

fn same_observer(a: &ObserverRef, b: &ObserverRef) -> bool {
    // Compare data addresses only, vtable pointers are not unique
    std::ptr::eq(a.as_ptr().cast::<()>(), b.as_ptr().cast::<()>())
}

/// Weak-reference publish/subscribe list
#[derive(Default)]
pub struct Subject {
    observers: Vec<ObserverRef>,
}

impl Subject {
    /// Create an empty channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe an observer; subscribing the same observer twice is ignored
    pub fn add_observer(&mut self, observer: ObserverRef) {
        if self.observers.iter().any(|existing| same_observer(existing, &observer)) {
            return;
        }
        self.observers.push(observer);
    }

    /// Unsubscribe an observer, returning whether it was subscribed
    pub fn remove_observer(&mut self, observer: &ObserverRef) -> bool {
        let before = self.observers.len();
        self.observers.retain(|existing| !same_observer(existing, observer));
        before != self.observers.len()
    }

    /// Deliver `event` to every live observer in subscription order
    ///
    /// Dead references are pruned. An observer that is already borrowed, which only
    /// happens when it raises an event from inside its own handler, is skipped.
    pub fn notify(&mut self, entity: &mut GameObject, event: Event) {
        self.observers.retain(|weak| deliver(weak, entity, event));
    }

    /// Copy of the stored references, in subscription order
    pub fn snapshot(&self) -> Vec<ObserverRef> {
        self.observers.clone()
    }

    /// Whether `observer` is currently subscribed
    pub fn contains(&self, observer: &ObserverRef) -> bool {
        self.observers.iter().any(|existing| same_observer(existing, observer))
    }

    /// Drop references whose observer no longer exists
    pub fn prune(&mut self) {
        self.observers.retain(|weak| weak.strong_count() > 0);
    }

    /// Number of stored references, dead ones included
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no references are stored
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Number of observers that are still alive
    pub fn live_count(&self) -> usize {
        self.observers.iter().filter(|weak| weak.strong_count() > 0).count()
    }
}

impl std::fmt::Debug for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observers.len())
            .field("live", &self.live_count())
            .finish()
    }
}
