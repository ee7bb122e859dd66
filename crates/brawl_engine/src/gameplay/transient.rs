//! Entities that remove themselves after a fixed lifetime

use crate::ecs::{GameObject, TickContext};

/// Lifetime tracker of a transient entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    start: f64,
    lifetime: f64,
    despawn_issued: bool,
}

impl Lifetime {
    /// Lifetime starting at simulation time `start`
    pub fn new(start: f64, lifetime: f32) -> Self {
        Self {
            start,
            lifetime: f64::from(lifetime),
            despawn_issued: false,
        }
    }

    /// Seconds since start
    pub fn age(&self, now: f64) -> f64 {
        now - self.start
    }

    /// Whether the lifetime is over
    pub fn is_expired(&self, now: f64) -> bool {
        self.age(now) > self.lifetime
    }

    /// Queue the despawn of `entity` once expired; returns whether it has expired
    pub fn check(&mut self, entity: &GameObject, ctx: &mut TickContext<'_>) -> bool {
        if !self.is_expired(ctx.now) {
            return false;
        }
        if !self.despawn_issued {
            self.despawn_issued = true;
            log::debug!("{} {:?} expired after {:.3}s", entity.name(), entity.id(), self.age(ctx.now));
            ctx.despawn(entity.id());
        }
        true
    }
}

/// Tick callback running `effect` until `lifetime` is over, then despawning the entity
///
/// The effect receives the entity's age in seconds.
pub fn expiring(
    start: f64,
    lifetime: f32,
    mut effect: impl FnMut(&mut GameObject, &mut TickContext<'_>, f64) + 'static,
) -> impl FnMut(&mut GameObject, &mut TickContext<'_>) + 'static {
    let mut tracker = Lifetime::new(start, lifetime);
    move |entity, ctx| {
        if tracker.check(entity, ctx) {
            return;
        }
        let age = tracker.age(ctx.now);
        effect(entity, ctx, age);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_strictly_after_lifetime() {
        let lifetime = Lifetime::new(1.0, 0.5);
        assert!(!lifetime.is_expired(1.5));
        assert!(lifetime.is_expired(1.5001));
    }
}
