use bevy_ecs::prelude::Component;
use glam::Vec2;

/// A clone of the player that keeps formation around it.
///
/// `offset` is the formation slot relative to the player on the `xz` plane
/// (`offset.x` maps to world `x`, `offset.y` to world `z`).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Follower {
    pub offset: Vec2,
    /// Off the road; formation easing no longer applies.
    pub falling: bool,
    /// Current downward speed in units per tick.
    pub fall_speed: f32,
    /// Spawn order, used to give formation slots a stable ordering.
    pub index: u32,
}

impl Follower {
    pub fn new(index: u32) -> Self {
        Self {
            offset: Vec2::ZERO,
            falling: false,
            fall_speed: 0.0,
            index,
        }
    }

    /// Start falling with the given initial speed.
    pub fn start_falling(&mut self, initial_speed: f32) {
        self.falling = true;
        self.fall_speed = initial_speed;
    }
}
