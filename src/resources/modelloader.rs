//! ECS resources that bridge the main thread with the background loader.
//!
//! Use [`setup_model_loader`] once during initialization to spawn the loader
//! thread and insert the [`LoaderBridge`] and `Messages<LoaderMessage>`
//! resources, then [`request_model`] to start loading. Call
//! [`shutdown_model_loader`] during teardown to stop and join the thread.
//!
//! The thread itself lives in [`crate::systems::modelloader::loader_thread`].

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;

use crate::events::modelloader::{LoaderCmd, LoaderMessage};
use crate::resources::rigstore::RigTemplate;
use crate::resources::settings::QualityTier;
use crate::systems::modelloader::loader_thread;

#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed model: {0}")]
    Parse(String),
    /// The model has no animation clips at all.
    #[error("model has no animation clips")]
    NoClips,
}

/// Something that can turn a model reference into a rig template.
///
/// Runs on the loader thread. `progress` may be called any number of times
/// with a percentage in `0..=100`.
pub trait ModelLoader: Send {
    fn load(
        &self,
        reference: &str,
        quality: QualityTier,
        progress: &mut dyn FnMut(u8),
    ) -> Result<RigTemplate, AssetLoadError>;
}

/// Reads rig descriptions (joints, clips, bounds) from JSON files.
///
/// References are paths relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct JsonRigLoader {
    pub root: PathBuf,
}

impl JsonRigLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ModelLoader for JsonRigLoader {
    fn load(
        &self,
        reference: &str,
        quality: QualityTier,
        progress: &mut dyn FnMut(u8),
    ) -> Result<RigTemplate, AssetLoadError> {
        let path = self.resolve(reference);
        debug!("Loading rig {:?} ({} quality)", path, quality);
        progress(0);
        let text = std::fs::read_to_string(&path)?;
        progress(50);
        let mut template: RigTemplate =
            serde_json::from_str(&text).map_err(|e| AssetLoadError::Parse(e.to_string()))?;
        if template.clips.is_empty() {
            return Err(AssetLoadError::NoClips);
        }
        if template.reference.is_empty() {
            template.reference = reference.to_string();
        }
        progress(100);
        Ok(template)
    }
}

/// Shared bridge between the ECS world and the loader thread.
#[derive(Resource)]
pub struct LoaderBridge {
    /// Sender for [`LoaderCmd`] messages (ECS -> loader thread).
    pub tx_cmd: Sender<LoaderCmd>,
    /// Receiver for [`LoaderMessage`] messages (loader thread -> ECS).
    pub rx_msg: Receiver<LoaderMessage>,
    /// Join handle for the background loader thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the loader thread and register bridge resources.
pub fn setup_model_loader(world: &mut World, loader: Box<dyn ModelLoader>) {
    let (tx_cmd, rx_cmd) = unbounded::<LoaderCmd>();
    let (tx_msg, rx_msg) = unbounded::<LoaderMessage>();

    let handle = std::thread::spawn(move || loader_thread(loader, rx_cmd, tx_msg));

    world.insert_resource(LoaderBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    world.init_resource::<Messages<LoaderMessage>>();
}

/// Ask the loader thread for `reference` at the given quality.
///
/// Returns false when no loader is running.
pub fn request_model(world: &mut World, reference: &str, quality: QualityTier) -> bool {
    match world.get_resource::<LoaderBridge>() {
        Some(bridge) => bridge
            .tx_cmd
            .send(LoaderCmd::Load {
                reference: reference.to_string(),
                quality,
            })
            .is_ok(),
        None => false,
    }
}

/// Gracefully request shutdown of the loader thread and join it.
pub fn shutdown_model_loader(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<LoaderBridge>() {
        let _ = bridge.tx_cmd.send(LoaderCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}
