//! Runs effects from [`DeferredEffects`] once they are due.
//!
//! Every effect is checked against the world as it is *now*: a projectile is
//! not spawned for a dead player or a shooter that has since been removed,
//! and a flash is not reset on a goal that already scrolled away.
//!
//! Only the player resolves a launch point from its rig. Followers always
//! fire from chest height above their root.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::charactermodel::CharacterModel;
use crate::components::follower::Follower;
use crate::components::goal::{GOAL_EMISSIVE_REST, Goal};
use crate::components::mapposition::MapPosition;
use crate::events::scene::SceneCmd;
use crate::resources::deferred::{DeferredEffect, DeferredEffects};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::GameState;
use crate::resources::rng::GameRng;
use crate::resources::worldtime::WorldTime;
use crate::systems::projectiles::{
    LaunchPointSource, ROOT_OFFSET, resolve_launch_point, spawn_projectile,
};

pub fn run_deferred_effects(
    mut commands: Commands,
    mut deferred: ResMut<DeferredEffects>,
    time: Res<WorldTime>,
    state: Res<GameState>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    shooters: Query<(&MapPosition, Option<&CharacterModel>, Has<Follower>)>,
    mut goals: Query<&mut Goal>,
    mut scene: MessageWriter<SceneCmd>,
) {
    if deferred.is_empty() {
        return;
    }
    for effect in deferred.take_due(time.elapsed) {
        match effect {
            DeferredEffect::SpawnProjectile { shooter } => {
                if state.is_dead() {
                    continue;
                }
                let Ok((position, model, is_follower)) = shooters.get(shooter) else {
                    debug!("Shooter {:?} is gone, projectile dropped", shooter);
                    continue;
                };
                let (origin, source) = if is_follower {
                    (position.pos + ROOT_OFFSET, LaunchPointSource::Root)
                } else {
                    resolve_launch_point(position.pos, model)
                };
                debug!("Projectile from {:?} ({:?})", origin, source);
                spawn_projectile(
                    &mut commands,
                    &mut scene,
                    &mut rng,
                    &config.projectile,
                    origin,
                );
            }
            DeferredEffect::ResetGoalFlash { goal } => {
                if let Ok(mut g) = goals.get_mut(goal) {
                    g.emissive = GOAL_EMISSIVE_REST;
                    scene.write(SceneCmd::SetEmissive {
                        entity: goal,
                        intensity: GOAL_EMISSIVE_REST,
                    });
                }
            }
        }
    }
}
