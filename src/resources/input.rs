//! Per-tick input resource.
//!
//! The host samples its devices through an [`InputSampler`] and hands the
//! resulting [`InputSnapshot`] to the tick driver. [`InputState`] keeps the
//! held state of every action, derives press/release edges, and accumulates
//! the mouse-look angles used by the follow camera.
use bevy_ecs::prelude::*;
use glam::Vec2;

/// Raw device state for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    pub fire: bool,
    pub restart: bool,
    /// Mouse movement since the previous snapshot, in pixels.
    pub mouse_delta: Vec2,
}

/// Source of input snapshots (keyboard/mouse, a replay, a script...).
pub trait InputSampler {
    fn sample(&mut self) -> InputSnapshot;
}

/// Boolean action state with edges relative to the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Whether the action is held this tick.
    pub active: bool,
    /// Whether the action was pressed this tick.
    pub just_pressed: bool,
    /// Whether the action was released this tick.
    pub just_released: bool,
}

impl BoolState {
    pub fn update(&mut self, pressed: bool) {
        self.just_pressed = pressed && !self.active;
        self.just_released = !pressed && self.active;
        self.active = pressed;
    }
}

/// Resource capturing the per-tick input relevant to gameplay.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub forward: BoolState,
    pub back: BoolState,
    pub left: BoolState,
    pub right: BoolState,
    pub jump: BoolState,
    pub sprint: BoolState,
    pub fire: BoolState,
    pub restart: BoolState,
    /// Camera yaw around the player, radians.
    pub yaw: f32,
    /// Camera pitch, radians, clamped to the configured limit.
    pub pitch: f32,
}

impl InputState {
    /// Fold a snapshot into the state.
    pub fn apply(&mut self, snapshot: &InputSnapshot, sensitivity: f32, pitch_limit: f32) {
        self.forward.update(snapshot.forward);
        self.back.update(snapshot.back);
        self.left.update(snapshot.left);
        self.right.update(snapshot.right);
        self.jump.update(snapshot.jump);
        self.sprint.update(snapshot.sprint);
        self.fire.update(snapshot.fire);
        self.restart.update(snapshot.restart);

        self.yaw += snapshot.mouse_delta.x * sensitivity;
        self.pitch = (self.pitch + snapshot.mouse_delta.y * sensitivity)
            .clamp(-pitch_limit, pitch_limit);
    }

    pub fn reset_look(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_last_one_tick() {
        let mut state = BoolState::default();
        state.update(true);
        assert!(state.active && state.just_pressed && !state.just_released);
        state.update(true);
        assert!(state.active && !state.just_pressed);
        state.update(false);
        assert!(!state.active && state.just_released);
        state.update(false);
        assert!(!state.just_released);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut input = InputState::default();
        let limit = std::f32::consts::FRAC_PI_3;
        let snapshot = InputSnapshot {
            mouse_delta: Vec2::new(100.0, 10_000.0),
            ..Default::default()
        };
        input.apply(&snapshot, 0.002, limit);
        assert!((input.yaw - 0.2).abs() < 1e-6);
        assert!((input.pitch - limit).abs() < 1e-6);
    }
}
