//! Input update.
//!
//! [`update_input_state`] folds the host's [`InputSnapshot`] into the
//! [`InputState`] resource before the schedule runs.
use bevy_ecs::prelude::*;

use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{InputSnapshot, InputState};

pub fn update_input_state(world: &mut World, snapshot: &InputSnapshot) {
    let camera = world.resource::<GameConfig>().camera;
    world
        .resource_mut::<InputState>()
        .apply(snapshot, camera.sensitivity, camera.pitch_limit);
}
