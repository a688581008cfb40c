use bevy_ecs::prelude::Resource;

/// Colour and multiplier of the left (blue) goal of each pair.
pub const LEFT_GOAL: (u32, u32) = (0x0088ff, 2);
/// Colour and multiplier of the right (green) goal of each pair.
pub const RIGHT_GOAL: (u32, u32) = (0x00ff88, 4);

/// Tracks when the last goal pair was spawned.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct GoalSpawner {
    /// World time of the last spawn (or of the run start).
    pub last_spawn: f32,
}

impl GoalSpawner {
    /// True when more than `interval` seconds have passed since the last spawn.
    pub fn is_due(&self, now: f32, interval: f32) -> bool {
        now - self.last_spawn > interval
    }
}
