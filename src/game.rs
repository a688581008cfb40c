//! World setup and the tick driver.
//!
//! [`GameWorld`] owns the ECS [`World`] and the update [`Schedule`]. The host
//! calls [`GameWorld::tick`] at a fixed rate with the input sampled for that
//! tick and drains [`GameWorld::scene_receiver`] afterwards to mirror the
//! simulation in whatever renderer it uses.
//!
//! # Tick order
//!
//! 0. bookkeeping: message queues, restart key, pending state, loader
//! 1. follower mixers
//! 2. goal spawning
//! 3. road scroll
//! 4. player animation (only while playing, as are steps 5 to 12)
//! 5. follower animation mirroring
//! 6. deferred effects
//! 7. projectiles
//! 8. goal collision
//! 9. goal lifecycle
//! 10. follower formation and falling
//! 11. player controller and fire input
//! 12. camera
//! 13. scene sync and forwarding

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use crossbeam_channel::Receiver;
use glam::Vec3;
use log::info;

use crate::components::animation::AnimationController;
use crate::components::charactermodel::CharacterModel;
use crate::components::mapposition::MapPosition;
use crate::components::player::{Player, PlayerMotion};
use crate::events::animation::ActionFinished;
use crate::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use crate::events::modelloader::LoaderMessage;
use crate::events::scene::SceneCmd;
use crate::resources::camera::FollowCamera;
use crate::resources::deferred::DeferredEffects;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::goalspawner::GoalSpawner;
use crate::resources::hud::Hud;
use crate::resources::input::{InputSnapshot, InputState};
use crate::resources::modelloader::{
    ModelLoader, request_model, setup_model_loader, shutdown_model_loader,
};
use crate::resources::rigstore::RigStore;
use crate::resources::rng::GameRng;
use crate::resources::scene::setup_scene_bridge;
use crate::resources::settings::PlayerSettings;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{
    advance_player_mixer, apply_action_finished, locomotion_state_machine,
    update_bevy_action_finished,
};
use crate::systems::camera::camera_system;
use crate::systems::deferred::run_deferred_effects;
use crate::systems::followers::{
    advance_follower_mixers, follower_formation_system, mirror_follower_animation,
    observe_goal_triggered,
};
use crate::systems::gamestate::{
    check_pending_state, restart_on_input, state_is_dead, state_is_playing,
};
use crate::systems::goals::{goal_collision_system, goal_lifecycle_system, goal_spawn_system};
use crate::systems::input::update_input_state;
use crate::systems::modelloader::{
    apply_loader_messages, player_model_parts, poll_loader_messages, update_bevy_loader_messages,
};
use crate::systems::player::player_controller;
use crate::systems::projectiles::{fire_input_system, observe_shoot, projectile_system};
use crate::systems::restart::reset_run;
use crate::systems::road::{road_scroll_system, spawn_road};
use crate::systems::scene::{
    forward_scene_cmds, sync_hud, sync_poses, sync_positions, sync_projectile_visuals,
    update_bevy_scene_cmds,
};
use crate::systems::time::update_world_time;

/// The simulation: world, schedule and the renderer's end of the scene bridge.
pub struct GameWorld {
    world: World,
    update: Schedule,
    scene_rx: Receiver<SceneCmd>,
}

impl GameWorld {
    /// Build a world ready for its first tick.
    ///
    /// `seed` makes jitter and sprite sizes reproducible; `None` seeds from
    /// the OS.
    pub fn new(config: GameConfig, settings: PlayerSettings, seed: Option<u64>) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(1.0));
        world.insert_resource(GameState::new());
        world.insert_resource(NextGameState::new());
        world.insert_resource(InputState::default());
        world.insert_resource(RigStore::default());
        world.insert_resource(DeferredEffects::default());
        world.insert_resource(FollowCamera::default());
        world.insert_resource(GoalSpawner::default());
        world.insert_resource(Hud::default());
        world.insert_resource(GameRng::new(seed));
        world.insert_resource(settings);
        world.insert_resource(config);
        world.init_resource::<Messages<ActionFinished>>();
        world.init_resource::<Messages<LoaderMessage>>();
        let scene_rx = setup_scene_bridge(&mut world);

        world.spawn(Observer::new(observe_gamestate_change_event));
        world.spawn(Observer::new(observe_goal_triggered));
        world.spawn(Observer::new(observe_shoot));
        // Ensure the observers are registered before any system can trigger.
        world.flush();

        spawn_road(&mut world);
        spawn_player(&mut world);

        world
            .resource_mut::<NextGameState>()
            .set(GameStates::Playing);

        GameWorld {
            world,
            update: build_schedule(),
            scene_rx,
        }
    }

    /// Start the background loader and ask it for the configured model.
    pub fn start_model_load(&mut self, loader: Box<dyn ModelLoader>) -> bool {
        setup_model_loader(&mut self.world, loader);
        let reference = self.world.resource::<GameConfig>().model.clone();
        let quality = self.world.resource::<PlayerSettings>().quality;
        request_model(&mut self.world, &reference, quality)
    }

    /// Install a model on the player right away, bypassing the loader.
    pub fn install_player_model(&mut self, model: CharacterModel) {
        self.world.resource_mut::<RigStore>().set(model.clone());
        let Some(entity) = self.player() else {
            return;
        };
        let mut player = self.world.entity_mut(entity);
        player.insert(model.clone());
        if let Some(mixer) = player_model_parts(&model) {
            player.insert(mixer);
        }
        self.world
            .resource_mut::<Messages<SceneCmd>>()
            .write(SceneCmd::SetModel { entity, model });
    }

    /// Advance the simulation by `dt` seconds with this tick's input.
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) {
        update_world_time(&mut self.world, dt);
        update_input_state(&mut self.world, input);

        self.update.run(&mut self.world);

        self.world.clear_trackers();
    }

    /// Start a new run immediately, whatever the current state.
    pub fn restart(&mut self) {
        if self.world.resource::<GameState>().is_dead() {
            self.world
                .resource_mut::<NextGameState>()
                .set(GameStates::Playing);
            self.world.trigger(GameStateChangedEvent {});
        } else {
            reset_run(&mut self.world);
        }
        self.world.flush();
    }

    /// The player entity, if it exists.
    pub fn player(&mut self) -> Option<Entity> {
        let mut query = self.world.query_filtered::<Entity, With<Player>>();
        query.iter(&self.world).next()
    }

    pub fn state(&self) -> &GameStates {
        self.world.resource::<GameState>().get()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Scene commands produced by the ticks so far.
    pub fn scene_receiver(&self) -> &Receiver<SceneCmd> {
        &self.scene_rx
    }
}

impl Drop for GameWorld {
    fn drop(&mut self) {
        shutdown_model_loader(&mut self.world);
    }
}

fn spawn_player(world: &mut World) {
    let position = Vec3::new(0.0, world.resource::<GameConfig>().player.start_height, 0.0);
    let entity = world
        .spawn((
            Player,
            PlayerMotion::default(),
            AnimationController::default(),
            MapPosition::from_vec(position),
        ))
        .id();
    world
        .resource_mut::<Messages<SceneCmd>>()
        .write(SceneCmd::SpawnCharacter {
            entity,
            position,
            primary: true,
            model: None,
        });
    info!("Player spawned at {:?}", position);
}

fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            (
                update_bevy_scene_cmds,
                update_bevy_action_finished,
                update_bevy_loader_messages,
                restart_on_input.run_if(state_is_dead),
                check_pending_state,
                poll_loader_messages,
                apply_loader_messages,
            )
                .chain(),
            (advance_follower_mixers, goal_spawn_system, road_scroll_system).chain(),
            (
                (
                    advance_player_mixer,
                    apply_action_finished,
                    locomotion_state_machine,
                )
                    .chain(),
                mirror_follower_animation,
                run_deferred_effects,
                projectile_system,
                goal_collision_system,
                goal_lifecycle_system,
                follower_formation_system,
                (player_controller, fire_input_system).chain(),
                camera_system,
            )
                .chain()
                .run_if(state_is_playing),
            (
                sync_positions,
                sync_poses,
                sync_projectile_visuals,
                sync_hud,
                forward_scene_cmds,
            )
                .chain(),
        )
            .chain(),
    );
    update
}
