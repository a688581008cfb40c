use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Marker for the player-controlled character.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Kinematic state of the player, in world units per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerMotion {
    pub velocity: Vec3,
    /// A jump was started and the character has not touched the road since.
    pub jumping: bool,
}
