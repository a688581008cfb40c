use bevy_ecs::prelude::Resource;

/// What the on-screen counter currently shows.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    /// The player plus every follower.
    pub characters: u32,
}

impl Default for Hud {
    fn default() -> Self {
        Hud { characters: 1 }
    }
}
