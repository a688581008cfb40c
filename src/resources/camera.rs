use bevy_ecs::prelude::Resource;
use glam::Vec3;

/// Third-person camera orbiting the player.
///
/// Starts at the origin; the camera system moves it behind the player on
/// the first playing tick. Road recycling measures against its position.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FollowCamera {
    pub position: Vec3,
    pub target: Vec3,
}
