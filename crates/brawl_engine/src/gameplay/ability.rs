//! Abilities and their cooldowns

use crate::ecs::{EntityId, GameObject, TickContext};

/// Fixed-length cooldown timer
///
/// Starts ready. [`Cooldown::trigger`] resets the elapsed counter; the timer is
/// ready again once the elapsed time reaches the duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    elapsed: f32,
    duration: f32,
}

impl Cooldown {
    /// Create a ready cooldown of `duration` seconds
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            elapsed: duration,
            duration,
        }
    }

    /// Advance by `dt` seconds; negative steps are ignored
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    /// Whether the cooldown is still running
    pub fn is_on_cooldown(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Start the cooldown if it is ready; returns whether it started
    pub fn trigger(&mut self) -> bool {
        if self.is_on_cooldown() {
            return false;
        }
        self.elapsed = 0.0;
        true
    }

    /// Seconds since the last trigger
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Cooldown length
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds until ready
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

/// Something an entity can use on a cooldown
///
/// An ability belongs to one entity for its whole life.
pub trait Ability {
    /// Entity the ability belongs to
    fn owner(&self) -> EntityId;

    /// Cooldown timer
    fn cooldown(&self) -> &Cooldown;

    /// Mutable cooldown timer
    fn cooldown_mut(&mut self) -> &mut Cooldown;

    /// The effect itself, run after the cooldown has been started
    fn activate(&mut self, caster: &GameObject, ctx: &mut TickContext<'_>);

    /// Advance the cooldown
    fn tick(&mut self, dt: f32) {
        self.cooldown_mut().tick(dt);
    }

    /// Whether the ability cannot be used yet
    fn is_on_cooldown(&self) -> bool {
        self.cooldown().is_on_cooldown()
    }

    /// Use the ability; does nothing and returns `false` while on cooldown
    fn use_ability(&mut self, caster: &GameObject, ctx: &mut TickContext<'_>) -> bool {
        if caster.id() != self.owner() {
            log::warn!("{:?} tried to use an ability of {:?}", caster.id(), self.owner());
            return false;
        }
        if !self.cooldown_mut().trigger() {
            return false;
        }
        self.activate(caster, ctx);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_starts_ready() {
        let cooldown = Cooldown::new(1.0);
        assert!(!cooldown.is_on_cooldown());
    }

    #[test]
    fn test_trigger_on_cooldown_changes_nothing() {
        let mut cooldown = Cooldown::new(1.0);
        assert!(cooldown.trigger());
        cooldown.tick(0.3);
        let before = cooldown;
        assert!(!cooldown.trigger());
        assert_eq!(cooldown, before);
    }

    #[test]
    fn test_ready_exactly_at_duration() {
        let mut cooldown = Cooldown::new(1.0);
        cooldown.trigger();
        let mut last = cooldown.elapsed();
        for _ in 0..3 {
            cooldown.tick(0.25);
            assert!(cooldown.elapsed() >= last);
            last = cooldown.elapsed();
            assert!(cooldown.is_on_cooldown());
        }
        cooldown.tick(0.25);
        assert!(!cooldown.is_on_cooldown());
        assert_eq!(cooldown.remaining(), 0.0);
    }

    #[test]
    fn test_elapsed_keeps_growing_once_ready() {
        let mut cooldown = Cooldown::new(1.0);
        cooldown.trigger();
        cooldown.tick(0.6);
        cooldown.tick(0.6);
        let before = cooldown.elapsed();
        assert!(!cooldown.is_on_cooldown());

        cooldown.tick(0.5);
        assert!(cooldown.elapsed() > before);
        assert!((cooldown.elapsed() - 1.7).abs() < 1.0e-6);
        assert_eq!(cooldown.remaining(), 0.0);
        assert!(!cooldown.is_on_cooldown());
    }

    #[test]
    fn test_negative_tick_ignored() {
        let mut cooldown = Cooldown::new(2.0);
        cooldown.trigger();
        cooldown.tick(-5.0);
        assert_eq!(cooldown.elapsed(), 0.0);
    }
}
