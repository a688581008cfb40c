//! Game state transition event and observer.
//!
//! Systems request a change to the high-level [`GameStates`] by updating
//! [`NextGameState`]. `check_pending_state` then emits a
//! [`GameStateChangedEvent`], which triggers the observer in this module to
//! apply the transition and run the enter/exit handling.
//!
//! This decouples the intent to change state from the mechanics of tearing
//! the run down or resetting it, and avoids borrowing conflicts.
use crate::events::scene::SceneCmd;
use crate::resources::gamestate::NextGameStates::{Pending, Unchanged};
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::systems::restart::reset_run;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

/// Event used to indicate that a pending game state transition should be
/// applied.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChangedEvent {}

/// Observer that applies a pending game state transition.
///
/// - Reads the intention from [`NextGameState`].
/// - If pending, copies the new value into [`GameState`], runs the exit and
///   enter handling and resets [`NextGameState`] to [`Unchanged`].
/// - If any required resource is missing, logs a diagnostic and returns.
pub fn observe_gamestate_change_event(
    _trigger: On<GameStateChangedEvent>,
    mut commands: Commands,
    mut next_game_state: Option<ResMut<NextGameState>>,
    mut game_state: Option<ResMut<GameState>>,
    mut scene: MessageWriter<SceneCmd>,
) {
    debug!("GameStateChangedEvent triggered");

    if let (Some(next_game_state), Some(game_state)) =
        (next_game_state.as_deref_mut(), game_state.as_deref_mut())
    {
        let next_state_value = next_game_state.get().clone();
        match next_state_value {
            Pending(new_state) => {
                let old_state = game_state.get().clone();
                info!("Transitioning from {:?} to {:?}", old_state, new_state);
                game_state.set(new_state.clone());
                next_game_state.reset();
                on_state_exit(&old_state, &mut scene);
                on_state_enter(&old_state, &new_state, &mut commands, &mut scene);
            }
            Unchanged => {
                debug!("No state change pending.");
            }
        }
    } else {
        warn!(
            "One or more resources missing in observe_gamestate_change_event. next_state: {:?}, game_state: {:?}",
            next_game_state.is_some(),
            game_state.is_some()
        );
    }
}

fn on_state_enter(
    previous: &GameStates,
    state: &GameStates,
    commands: &mut Commands,
    scene: &mut MessageWriter<SceneCmd>,
) {
    match state {
        GameStates::None => debug!("Entered None state"),
        GameStates::Playing => {
            if *previous == GameStates::Dead {
                // a fresh run, as if the game had been reloaded
                commands.queue(reset_run);
            }
        }
        GameStates::Dead => {
            info!("You died! Press R to restart");
            scene.write(SceneCmd::ShowDeathScreen);
        }
    }
}

fn on_state_exit(state: &GameStates, scene: &mut MessageWriter<SceneCmd>) {
    match state {
        GameStates::None => debug!("Exited None state"),
        GameStates::Playing => debug!("Exited Playing state"),
        GameStates::Dead => {
            scene.write(SceneCmd::HideDeathScreen);
        }
    }
}
