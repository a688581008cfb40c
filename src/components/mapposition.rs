use bevy_ecs::prelude::Component;
use glam::Vec3;

/// World-space position (pivot) of an entity.
///
/// `y` is up; the road runs along `z`, with "forward" being negative `z`.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vec3,
}

impl MapPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
        }
    }

    pub fn from_vec(pos: Vec3) -> Self {
        Self { pos }
    }
}
