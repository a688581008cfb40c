use bevy_ecs::prelude::Resource;
use fastrand::Rng;

/// Random source for formation jitter and sprite sizes.
///
/// Seedable so a scripted session replays identically.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub Rng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => GameRng(Rng::with_seed(seed)),
            None => GameRng(Rng::new()),
        }
    }

    /// Uniform in `[-half_width, half_width)`.
    pub fn centered(&mut self, half_width: f32) -> f32 {
        (self.0.f32() - 0.5) * 2.0 * half_width
    }

    /// Uniform in `[min, min + range)`.
    pub fn in_range(&mut self, min: f32, range: f32) -> f32 {
        min + self.0.f32() * range
    }
}

impl Default for GameRng {
    fn default() -> Self {
        GameRng::new(None)
    }
}
