//! Model loading on a background thread.
//!
//! - [`loader_thread`] runs on its own OS thread and owns the
//!   [`ModelLoader`]. Every load ends in exactly one
//!   [`LoaderMessage::Resolved`]; failures resolve to the fallback box.
//! - [`poll_loader_messages`] non-blockingly drains the thread's messages
//!   into the ECS mailbox each tick.
//! - [`apply_loader_messages`] installs a resolved model on the player and
//!   in the [`RigStore`].
//!
//! See also [`crate::resources::modelloader`] for the bridge.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{info, warn};

use crate::components::animation::{AnimName, AnimationMixer, DEFAULT_FADE, MixerRole};
use crate::components::charactermodel::CharacterModel;
use crate::components::player::Player;
use crate::events::modelloader::{LoaderCmd, LoaderMessage};
use crate::events::scene::SceneCmd;
use crate::resources::modelloader::{LoaderBridge, ModelLoader};
use crate::resources::rigstore::RigStore;

/// Entry point of the loader thread. Blocks until [`LoaderCmd::Shutdown`]
/// or until the command sender is dropped.
pub fn loader_thread(
    loader: Box<dyn ModelLoader>,
    rx_cmd: Receiver<LoaderCmd>,
    tx_msg: Sender<LoaderMessage>,
) {
    while let Ok(cmd) = rx_cmd.recv() {
        match cmd {
            LoaderCmd::Load { reference, quality } => {
                info!("Loading model '{}' ({} quality)", reference, quality);
                let mut report = |percent: u8| {
                    let _ = tx_msg.send(LoaderMessage::Progress { percent });
                };
                let model = match loader.load(&reference, quality, &mut report) {
                    Ok(template) => {
                        info!(
                            "Model '{}' loaded: {} joints, {} clips",
                            reference,
                            template.joints.len(),
                            template.clips.len()
                        );
                        CharacterModel::Rigged(std::sync::Arc::new(template))
                    }
                    Err(e) => {
                        warn!("Model '{}' failed to load ({}), using fallback box", reference, e);
                        CharacterModel::Fallback
                    }
                };
                let _ = tx_msg.send(LoaderMessage::Resolved(model));
            }
            LoaderCmd::Shutdown => break,
        }
    }
}

/// Drain pending loader messages into the ECS mailbox.
pub fn poll_loader_messages(bridge: Option<Res<LoaderBridge>>, mut writer: MessageWriter<LoaderMessage>) {
    if let Some(bridge) = bridge {
        writer.write_batch(bridge.rx_msg.try_iter());
    }
}

/// Advance the ECS message queue for [`LoaderMessage`].
pub fn update_bevy_loader_messages(mut msgs: ResMut<Messages<LoaderMessage>>) {
    msgs.update();
}

/// Components a character needs for `model`.
///
/// Rigged models get a fresh primary mixer starting on `idle`.
pub fn player_model_parts(model: &CharacterModel) -> Option<AnimationMixer> {
    model.template().map(|template| {
        let mut mixer = AnimationMixer::from_template(template, MixerRole::Primary);
        mixer.play_base(AnimName::Idle, DEFAULT_FADE);
        mixer
    })
}

pub fn apply_loader_messages(
    mut commands: Commands,
    mut reader: MessageReader<LoaderMessage>,
    mut rig_store: ResMut<RigStore>,
    player: Query<Entity, With<Player>>,
    mut scene: MessageWriter<SceneCmd>,
) {
    for msg in reader.read() {
        match msg {
            LoaderMessage::Progress { percent } => {
                scene.write(SceneCmd::LoadProgress { percent: *percent });
            }
            LoaderMessage::Resolved(model) => {
                rig_store.set(model.clone());
                let Ok(entity) = player.single() else {
                    continue;
                };
                let mut player = commands.entity(entity);
                player.insert(model.clone());
                if let Some(mixer) = player_model_parts(model) {
                    player.insert(mixer);
                }
                scene.write(SceneCmd::SetModel {
                    entity,
                    model: model.clone(),
                });
            }
        }
    }
}
