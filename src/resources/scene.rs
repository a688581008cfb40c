//! Bridge between the ECS world and the rendering backend.
//!
//! Use [`setup_scene_bridge`] once during initialization. It inserts the
//! [`SceneBridge`] resource and the `Messages<SceneCmd>` mailbox and returns
//! the receiving end, which the host drains after every tick.

use crate::events::scene::SceneCmd;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Sending half of the scene channel.
#[derive(Resource)]
pub struct SceneBridge {
    /// Sender for [`SceneCmd`] messages (ECS -> renderer).
    pub tx_cmd: Sender<SceneCmd>,
}

/// Create the scene channel and register the bridge resources.
pub fn setup_scene_bridge(world: &mut World) -> Receiver<SceneCmd> {
    let (tx_cmd, rx_cmd) = unbounded::<SceneCmd>();
    world.insert_resource(SceneBridge { tx_cmd });
    world.insert_resource(Messages::<SceneCmd>::default());
    rx_cmd
}
