use bevy_ecs::prelude::*;

use crate::components::animation::AnimName;

/// A once-action on `entity`'s mixer reached the end of its clip.
///
/// Written by the mixer advance at the tick boundary and consumed by the
/// locomotion state machine before it decides the next state.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionFinished {
    pub entity: Entity,
    pub anim: AnimName,
}
