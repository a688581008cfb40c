//! Visual model assigned to a character (player or follower).

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use glam::Vec3;

use crate::resources::rigstore::{Bounds, RigTemplate};

/// Root-relative bounds of the fallback box (1 x 2 x 1, centred on the root).
pub const FALLBACK_BOUNDS: Bounds = Bounds {
    min: Vec3::new(-0.5, -1.0, -0.5),
    max: Vec3::new(0.5, 1.0, 0.5),
};

/// The model currently assigned to a character.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum CharacterModel {
    /// A skinned model with its shared template.
    Rigged(Arc<RigTemplate>),
    /// Placeholder box used when the model could not be loaded.
    Fallback,
}

impl CharacterModel {
    pub fn template(&self) -> Option<&Arc<RigTemplate>> {
        match self {
            CharacterModel::Rigged(t) => Some(t),
            CharacterModel::Fallback => None,
        }
    }

    /// Root-relative bounds, when the model has any.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            CharacterModel::Rigged(t) => t.bounds,
            CharacterModel::Fallback => Some(FALLBACK_BOUNDS),
        }
    }
}
