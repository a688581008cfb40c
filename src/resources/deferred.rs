//! Effects scheduled for a later point in world time.
//!
//! Anything that must happen "a bit later" (the fireball leaving the hand
//! after the cast wind-up, a goal's flash fading) is queued here with its due
//! time instead of living on a detached timer. The runner in
//! [`crate::systems::deferred`] validates each effect against the current
//! world before applying it.

use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredEffect {
    /// Spawn a projectile at the shooter's launch point.
    SpawnProjectile { shooter: Entity },
    /// Return a goal's emissive intensity to its resting value.
    ResetGoalFlash { goal: Entity },
}

#[derive(Resource, Debug, Default)]
pub struct DeferredEffects {
    pending: Vec<(f32, DeferredEffect)>,
}

impl DeferredEffects {
    pub fn schedule(&mut self, due: f32, effect: DeferredEffect) {
        self.pending.push((due, effect));
    }

    /// Remove and return every effect due at or before `now`, in the order
    /// they were scheduled.
    pub fn take_due(&mut self, now: f32) -> Vec<DeferredEffect> {
        let mut due = Vec::new();
        self.pending.retain(|(at, effect)| {
            if *at <= now {
                due.push(*effect);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
