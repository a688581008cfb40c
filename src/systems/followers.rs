//! Follower (clone) systems.
//!
//! Followers are spawned in batches when the player passes a goal, keep a
//! ring formation around the player, mirror its animation state, and fall
//! off the world when they drift off the road.
//!
//! - [`observe_goal_triggered`] spawns the batch and reassigns every slot.
//! - [`advance_follower_mixers`] steps their mixers; this keeps running
//!   after the player dies.
//! - [`mirror_follower_animation`] restarts a follower's action when the
//!   player's named state is not what it is playing.
//! - [`follower_formation_system`] eases followers towards their slots and
//!   runs the falling physics.

use std::f32::consts::TAU;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::animation::{AnimName, AnimationMixer, MixerRole};
use crate::components::charactermodel::CharacterModel;
use crate::components::follower::Follower;
use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::events::goal::GoalTriggered;
use crate::events::scene::SceneCmd;
use crate::resources::gameconfig::{FollowerConfig, GameConfig};
use crate::resources::rigstore::RigStore;
use crate::resources::rng::GameRng;
use crate::resources::worldtime::WorldTime;

/// Formation slot of follower `index` out of `total`, before jitter.
///
/// Followers fill rings of `ring_size`; ring `r` has radius
/// `base_radius + r * ring_spacing` and its members are spread evenly over
/// the full circle. The last ring may be partial.
pub fn formation_offset(index: usize, total: usize, cfg: &FollowerConfig) -> Vec2 {
    let ring = index / cfg.ring_size;
    let pos_in_ring = index % cfg.ring_size;
    let in_this_ring = cfg.ring_size.min(total - ring * cfg.ring_size);
    let radius = cfg.base_radius + ring as f32 * cfg.ring_spacing;
    let angle = pos_in_ring as f32 / in_this_ring as f32 * TAU;
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}

/// Build the model (and mixer, when rigged) for a new follower.
///
/// Followers spawned before the player's model resolves get the fallback box.
pub fn follower_model(rig_store: &RigStore) -> (CharacterModel, Option<AnimationMixer>) {
    match rig_store.model() {
        Some(CharacterModel::Rigged(template)) => {
            let mut mixer = AnimationMixer::from_template(template, MixerRole::Follower);
            mixer.restart_exclusive(AnimName::Idle);
            (CharacterModel::Rigged(template.clone()), Some(mixer))
        }
        Some(CharacterModel::Fallback) | None => (CharacterModel::Fallback, None),
    }
}

/// Spawn `multiplier` followers at the player and re-space the formation.
pub fn observe_goal_triggered(
    trigger: On<GoalTriggered>,
    mut commands: Commands,
    player: Query<&MapPosition, With<Player>>,
    mut followers: Query<&mut Follower>,
    rig_store: Res<RigStore>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut scene: MessageWriter<SceneCmd>,
) {
    let multiplier = trigger.event().multiplier as usize;
    let Ok(player_pos) = player.single() else {
        return;
    };
    let cfg = &config.followers;

    let mut existing: Vec<Mut<Follower>> = followers.iter_mut().collect();
    existing.sort_by_key(|f| f.index);
    let next_index = existing.last().map_or(0, |f| f.index + 1);
    let total = existing.len() + multiplier;

    for (i, follower) in existing.iter_mut().enumerate() {
        let jitter = rng.centered(cfg.jitter);
        follower.offset = formation_offset(i, total, cfg) + Vec2::splat(jitter);
    }

    let start = existing.len();
    for k in 0..multiplier {
        let mut follower = Follower::new(next_index + k as u32);
        let jitter = rng.centered(cfg.jitter);
        follower.offset = formation_offset(start + k, total, cfg) + Vec2::splat(jitter);

        let (model, mixer) = follower_model(&rig_store);
        let mut entity = commands.spawn((follower, *player_pos, model.clone()));
        if let Some(mixer) = mixer {
            entity.insert(mixer);
        }
        scene.write(SceneCmd::SpawnCharacter {
            entity: entity.id(),
            position: player_pos.pos,
            primary: false,
            model: Some(model),
        });
    }

    info!("Multiplying player by {}: {} followers", multiplier, total);
}

/// Advance every follower mixer by the tick's delta.
pub fn advance_follower_mixers(
    mut query: Query<&mut AnimationMixer, With<Follower>>,
    time: Res<WorldTime>,
) {
    for mut mixer in query.iter_mut() {
        mixer.update(time.delta);
    }
}

/// Keep followers on the same named state as the player.
///
/// A follower whose action for that state exists but is not running stops
/// everything else and restarts it from the beginning.
pub fn mirror_follower_animation(
    player: Query<&AnimationMixer, With<Player>>,
    mut followers: Query<&mut AnimationMixer, (With<Follower>, Without<Player>)>,
) {
    let Some(current) = player.single().ok().and_then(|m| m.current()) else {
        return;
    };
    for mut mixer in followers.iter_mut() {
        if mixer.has(current) && !mixer.is_running(current) {
            mixer.restart_exclusive(current);
        }
    }
}

/// Formation easing and falling physics. Values are per tick.
pub fn follower_formation_system(
    mut commands: Commands,
    player: Query<&MapPosition, With<Player>>,
    mut followers: Query<(Entity, &mut Follower, &mut MapPosition), Without<Player>>,
    config: Res<GameConfig>,
    mut scene: MessageWriter<SceneCmd>,
) {
    let Ok(player_pos) = player.single() else {
        return;
    };
    let cfg = &config.followers;

    for (entity, mut follower, mut position) in followers.iter_mut() {
        if follower.falling {
            follower.fall_speed += cfg.fall_gravity;
            position.pos.y -= follower.fall_speed;
            if position.pos.y < cfg.removal_height {
                commands.entity(entity).try_despawn();
                scene.write(SceneCmd::Despawn { entity });
                info!("Follower {} fell off", follower.index);
            }
            continue;
        }

        let target = player_pos.pos + glam::Vec3::new(follower.offset.x, 0.0, follower.offset.y);
        let delta = (target - position.pos) * cfg.easing;
        position.pos += delta;

        if !config.road.is_on_road(position.pos.x) && position.pos.y <= cfg.fall_check_height {
            follower.start_falling(cfg.fall_start_speed);
            info!("Follower {} is off the road and starting to fall", follower.index);
        }
    }
}
