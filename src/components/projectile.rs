use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Number of flame sprites each projectile is drawn with.
pub const PROJECTILE_SPRITES: usize = 2;

/// A fireball in flight.
///
/// Behaves like a time-to-live entity: `life` counts down in world seconds
/// and the projectile is despawned once it reaches zero.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// World units per second.
    pub velocity: Vec3,
    /// Remaining life in seconds.
    pub life: f32,
    pub initial_life: f32,
    /// Accumulated sprite rotation, radians.
    pub spin: f32,
    /// Uniform scale of each flame sprite.
    pub sprite_scales: [f32; PROJECTILE_SPRITES],
}

impl Projectile {
    pub fn new(velocity: Vec3, life: f32, sprite_scales: [f32; PROJECTILE_SPRITES]) -> Self {
        Self {
            velocity,
            life,
            initial_life: life,
            spin: 0.0,
            sprite_scales,
        }
    }

    /// Sprite opacity, fading linearly with remaining life.
    pub fn opacity(&self) -> f32 {
        if self.initial_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.initial_life).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}
