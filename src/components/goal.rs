use bevy_ecs::prelude::Component;

/// Emissive intensity of a goal at rest.
pub const GOAL_EMISSIVE_REST: f32 = 0.5;
/// Emissive intensity right after a goal was passed.
pub const GOAL_EMISSIVE_FLASH: f32 = 1.0;

/// A multiplier gate on the road.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    /// Followers granted when the player passes through.
    pub multiplier: u32,
    /// `0xRRGGBB`
    pub color: u32,
    /// Set once; a goal never fires twice.
    pub triggered: bool,
    pub emissive: f32,
}

impl Goal {
    pub fn new(multiplier: u32, color: u32) -> Self {
        Self {
            multiplier,
            color,
            triggered: false,
            emissive: GOAL_EMISSIVE_REST,
        }
    }

    /// Mark the goal as passed. Returns false if it already was.
    pub fn trigger(&mut self) -> bool {
        if self.triggered {
            return false;
        }
        self.triggered = true;
        self.emissive = GOAL_EMISSIVE_FLASH;
        true
    }
}
