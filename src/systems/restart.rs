//! Run reset.
//!
//! [`reset_run`] brings the world back to the state of a freshly started
//! run without rebuilding it: followers, projectiles and goals go away, the
//! player returns to the start, the road ring goes back to its initial
//! layout and every run-scoped resource is cleared. The loaded model and the
//! rig store survive.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::info;

use crate::components::animation::AnimationController;
use crate::components::charactermodel::CharacterModel;
use crate::components::follower::Follower;
use crate::components::goal::Goal;
use crate::components::mapposition::MapPosition;
use crate::components::player::{Player, PlayerMotion};
use crate::components::projectile::Projectile;
use crate::events::scene::SceneCmd;
use crate::resources::camera::FollowCamera;
use crate::resources::deferred::DeferredEffects;
use crate::resources::gameconfig::GameConfig;
use crate::resources::goalspawner::GoalSpawner;
use crate::resources::hud::Hud;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::systems::modelloader::player_model_parts;
use crate::systems::road::reset_road;

/// Entities that only live for the duration of a run.
fn run_scoped_entities(world: &mut World) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut followers = world.query_filtered::<Entity, With<Follower>>();
    entities.extend(followers.iter(world));
    let mut projectiles = world.query_filtered::<Entity, With<Projectile>>();
    entities.extend(projectiles.iter(world));
    let mut goals = world.query_filtered::<Entity, With<Goal>>();
    entities.extend(goals.iter(world));
    entities
}

pub fn reset_run(world: &mut World) {
    let mut cmds = Vec::new();
    for entity in run_scoped_entities(world) {
        world.despawn(entity);
        cmds.push(SceneCmd::Despawn { entity });
    }

    let start = Vec3::new(0.0, world.resource::<GameConfig>().player.start_height, 0.0);
    let mut players = world.query_filtered::<(Entity, Option<&CharacterModel>), With<Player>>();
    let player = players
        .iter(world)
        .next()
        .map(|(entity, model)| (entity, model.cloned()));
    if let Some((entity, model)) = player {
        let mut player = world.entity_mut(entity);
        player.insert((
            MapPosition::from_vec(start),
            PlayerMotion::default(),
            AnimationController::default(),
        ));
        if let Some(mixer) = model.as_ref().and_then(player_model_parts) {
            player.insert(mixer);
        }
    }

    let now = world.resource::<WorldTime>().elapsed;
    world.resource_mut::<DeferredEffects>().clear();
    world.resource_mut::<GoalSpawner>().last_spawn = now;
    *world.resource_mut::<Hud>() = Hud::default();
    *world.resource_mut::<FollowCamera>() = FollowCamera::default();
    world.resource_mut::<InputState>().reset_look();
    reset_road(world);

    cmds.push(SceneCmd::SetHud {
        characters: Hud::default().characters,
    });
    world.resource_mut::<Messages<SceneCmd>>().write_batch(cmds);
    info!("Run reset");
}
