use bevy_ecs::prelude::*;

/// The player passed through a goal.
///
/// Observed by the follower spawner, which adds `multiplier` followers.
#[derive(Event, Debug, Clone, Copy)]
pub struct GoalTriggered {
    pub goal: Entity,
    pub multiplier: u32,
}
