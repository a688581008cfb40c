//! Third-person camera.
//!
//! Orbits the player at a fixed distance using the mouse-look yaw and pitch
//! from [`InputState`], looking at the player's position.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::events::scene::SceneCmd;
use crate::resources::camera::FollowCamera;
use crate::resources::gameconfig::{CameraConfig, GameConfig};
use crate::resources::input::InputState;

/// Camera position for a player at `target`.
pub fn orbit_position(target: Vec3, yaw: f32, pitch: f32, cfg: &CameraConfig) -> Vec3 {
    Vec3::new(
        target.x + yaw.sin() * cfg.distance * pitch.cos(),
        target.y + cfg.height + pitch.sin() * cfg.distance,
        target.z + yaw.cos() * cfg.distance * pitch.cos(),
    )
}

pub fn camera_system(
    player: Query<&MapPosition, With<Player>>,
    input: Res<InputState>,
    config: Res<GameConfig>,
    mut camera: ResMut<FollowCamera>,
    mut scene: MessageWriter<SceneCmd>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    camera.position = orbit_position(player.pos, input.yaw, input.pitch, &config.camera);
    camera.target = player.pos;
    scene.write(SceneCmd::SetCamera {
        position: camera.position,
        target: camera.target,
    });
}
