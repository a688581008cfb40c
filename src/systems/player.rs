//! Player controller.
//!
//! Reads the movement keys, integrates the player's kinematics and detects
//! death. Speeds are per second; `WorldTime::delta` scales them.
//!
//! - W/S move along `-z`/`+z`, A/D along `-x`/`+x`
//! - jump only from the ground and only when not already jumping
//! - the road only supports the player while `|x|` is within its half width;
//!   off the road the player is nudged downwards and keeps falling
//! - below the death height the run ends

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::player::{Player, PlayerMotion};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameStates, NextGameState};
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

pub fn player_controller(
    mut query: Query<(&mut MapPosition, &mut PlayerMotion), With<Player>>,
    input: Res<InputState>,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    mut next_state: ResMut<NextGameState>,
) {
    let cfg = &config.player;
    let dt = time.delta;

    for (mut position, mut motion) in query.iter_mut() {
        motion.velocity.x = 0.0;
        motion.velocity.z = 0.0;
        if input.forward.active {
            motion.velocity.z = -cfg.move_speed;
        }
        if input.back.active {
            motion.velocity.z = cfg.move_speed;
        }
        if input.left.active {
            motion.velocity.x = -cfg.move_speed;
        }
        if input.right.active {
            motion.velocity.x = cfg.move_speed;
        }

        if input.jump.active && !motion.jumping && position.pos.y <= cfg.ground_height {
            motion.velocity.y = cfg.jump_speed;
            motion.jumping = true;
        }

        motion.velocity.y -= cfg.gravity * dt;
        position.pos += motion.velocity * dt;

        let on_road = config.road.is_on_road(position.pos.x);
        if !on_road && position.pos.y <= cfg.ground_height {
            motion.velocity.y = -cfg.fall_nudge;
        }
        if on_road && position.pos.y <= cfg.ground_height {
            position.pos.y = cfg.ground_height;
            motion.velocity.y = 0.0;
            motion.jumping = false;
        }

        if position.pos.y < cfg.death_height {
            next_state.set(GameStates::Dead);
        }
    }
}
