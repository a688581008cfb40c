//! Player settings store.
//!
//! A small JSON document written by the game's settings screen:
//!
//! ```json
//! { "graphics": "medium" }
//! ```
//!
//! Only the graphics quality tier is read. Anything that goes wrong while
//! reading falls back to [`QualityTier::High`].

use std::fmt;
use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Asset quality tier requested from the model loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    graphics: Option<QualityTier>,
}

/// Settings read once at startup.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerSettings {
    pub quality: QualityTier,
}

impl PlayerSettings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = serde_json::from_str(text)?;
        Ok(Self {
            quality: file.graphics.unwrap_or_default(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Read settings, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                info!("Graphics quality: {}", settings.quality);
                settings
            }
            Err(e) => {
                warn!("{} ({:?}), using defaults", e, path);
                Self::default()
            }
        }
    }
}
