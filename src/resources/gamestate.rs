//! High-level game state resources.
//!
//! These resources track the authoritative current state of the run and any
//! pending transition requested by systems. See
//! `crate::events::gamestate::observe_gamestate_change_event` for how a
//! transition is applied.

use bevy_ecs::prelude::Resource;

/// Discrete high-level states the game can be in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameStates {
    #[default]
    None,
    Playing,
    /// The player fell off the world. Only restart input is honoured.
    Dead,
}

/// Representation of a requested next state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(GameStates),
}

/// Authoritative current game state.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    current: GameStates,
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            current: GameStates::None,
        }
    }

    pub fn get(&self) -> &GameStates {
        &self.current
    }

    /// Update the current state immediately.
    ///
    /// Prefer requesting transitions via [`NextGameState`] so enter/exit
    /// handling runs.
    pub fn set(&mut self, state: GameStates) {
        self.current = state;
    }

    pub fn is_dead(&self) -> bool {
        self.current == GameStates::Dead
    }
}

/// Intent to change to a new game state.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    pub fn new() -> Self {
        NextGameState {
            next: NextGameStates::Unchanged,
        }
    }

    pub fn get(&self) -> &NextGameStates {
        &self.next
    }

    /// Request a transition to `next`.
    ///
    /// `check_pending_state` picks it up at the start of the next tick.
    pub fn set(&mut self, next: GameStates) {
        self.next = NextGameStates::Pending(next);
    }

    pub fn reset(&mut self) {
        self.next = NextGameStates::Unchanged;
    }
}
