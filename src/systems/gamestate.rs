use crate::events::gamestate::GameStateChangedEvent;
use crate::resources::gamestate::{GameState, GameStates, NextGameState, NextGameStates};
use crate::resources::input::InputState;
use bevy_ecs::prelude::*;

pub fn check_pending_state(mut commands: Commands, next_state: Res<NextGameState>) {
    // Check if there is a pending state change
    if let NextGameStates::Pending(_new_state) = next_state.get() {
        commands.trigger(GameStateChangedEvent {});
    }
}

/// While dead, the restart key starts a new run.
pub fn restart_on_input(input: Res<InputState>, mut next_state: ResMut<NextGameState>) {
    if input.restart.just_pressed {
        next_state.set(GameStates::Playing);
    }
}

pub fn state_is_playing(state: Res<GameState>) -> bool {
    matches!(state.get(), GameStates::Playing)
}

pub fn state_is_dead(state: Res<GameState>) -> bool {
    matches!(state.get(), GameStates::Dead)
}
