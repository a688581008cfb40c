use bevy_ecs::prelude::*;

/// Request for `shooter` to fire a projectile.
///
/// The player (`primary`) plays its cast overlay and respects the attack
/// cooldown; followers fire unconditionally.
#[derive(Event, Debug, Clone, Copy)]
pub struct Shoot {
    pub shooter: Entity,
    pub primary: bool,
}
