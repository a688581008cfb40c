//! Goal gates.
//!
//! - [`goal_spawn_system`] places a blue `+2` and a green `+4` gate ahead of
//!   the player at a fixed world-time interval.
//! - [`goal_collision_system`] fires [`GoalTriggered`] once per gate when the
//!   player passes through it, flashes the gate and schedules the flash
//!   reset.
//! - [`goal_lifecycle_system`] scrolls gates with the road and removes the
//!   ones left behind.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};

use crate::components::goal::{GOAL_EMISSIVE_FLASH, Goal};
use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::components::triggerbox::TriggerBox;
use crate::events::goal::GoalTriggered;
use crate::events::scene::SceneCmd;
use crate::resources::deferred::{DeferredEffect, DeferredEffects};
use crate::resources::gameconfig::GameConfig;
use crate::resources::goalspawner::{GoalSpawner, LEFT_GOAL, RIGHT_GOAL};
use crate::resources::worldtime::WorldTime;

pub fn goal_spawn_system(
    mut commands: Commands,
    mut spawner: ResMut<GoalSpawner>,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    player: Query<&MapPosition, With<Player>>,
    mut scene: MessageWriter<SceneCmd>,
) {
    let cfg = &config.goals;
    if !spawner.is_due(time.elapsed, cfg.spawn_interval) {
        return;
    }
    spawner.last_spawn = time.elapsed;
    let Ok(player) = player.single() else {
        return;
    };

    let z = player.pos.z - cfg.spawn_distance;
    for (x, (color, multiplier)) in [(-cfg.lane_offset, LEFT_GOAL), (cfg.lane_offset, RIGHT_GOAL)] {
        let position = Vec3::new(x, 0.0, z);
        let entity = commands
            .spawn((
                Goal::new(multiplier, color),
                MapPosition::from_vec(position),
                TriggerBox::new(cfg.trigger_half_x, cfg.trigger_half_z),
            ))
            .id();
        scene.write(SceneCmd::SpawnGoal {
            entity,
            position,
            color,
            multiplier,
        });
    }
    debug!("Spawned goal pair at z={}", z);
}

pub fn goal_collision_system(
    mut commands: Commands,
    mut goals: Query<(Entity, &mut Goal, &MapPosition, &TriggerBox), Without<Player>>,
    player: Query<&MapPosition, With<Player>>,
    mut deferred: ResMut<DeferredEffects>,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    mut scene: MessageWriter<SceneCmd>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    for (entity, mut goal, position, trigger_box) in goals.iter_mut() {
        // trigger() refuses a goal that already fired
        if !trigger_box.contains(position.pos, player.pos) || !goal.trigger() {
            continue;
        }
        info!("Goal +{} passed", goal.multiplier);
        commands.trigger(GoalTriggered {
            goal: entity,
            multiplier: goal.multiplier,
        });
        scene.write(SceneCmd::SetEmissive {
            entity,
            intensity: GOAL_EMISSIVE_FLASH,
        });
        deferred.schedule(
            time.elapsed + config.goals.flash_duration,
            DeferredEffect::ResetGoalFlash { goal: entity },
        );
    }
}

pub fn goal_lifecycle_system(
    mut commands: Commands,
    mut goals: Query<(Entity, &mut MapPosition), (With<Goal>, Without<Player>)>,
    player: Query<&MapPosition, With<Player>>,
    config: Res<GameConfig>,
    mut scene: MessageWriter<SceneCmd>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    let limit = player.pos.z + config.goals.despawn_distance;
    for (entity, mut position) in goals.iter_mut() {
        position.pos.z += config.road.scroll_per_tick;
        if position.pos.z > limit {
            commands.entity(entity).try_despawn();
            scene.write(SceneCmd::Despawn { entity });
        }
    }
}
