use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Axis-aligned trigger volume on the ground plane.
///
/// Half-extents are independent along `x` and `z`; height is ignored. The
/// test is strict, so a point exactly on the edge is outside.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct TriggerBox {
    pub half_x: f32,
    pub half_z: f32,
}

impl TriggerBox {
    pub fn new(half_x: f32, half_z: f32) -> Self {
        Self { half_x, half_z }
    }

    /// Point containment for a box centred on `position`.
    pub fn contains(&self, position: Vec3, point: Vec3) -> bool {
        (point.x - position.x).abs() < self.half_x && (point.z - position.z).abs() < self.half_z
    }
}
