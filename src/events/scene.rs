//! Commands for the rendering backend.
//!
//! The core never touches a scene graph. Every visible change is written as a
//! [`SceneCmd`] message and forwarded once per tick through the
//! [`SceneBridge`](crate::resources::scene::SceneBridge) to whoever renders.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;
use glam::Vec3;

use crate::components::animation::Pose;
use crate::components::charactermodel::CharacterModel;
use crate::components::projectile::PROJECTILE_SPRITES;

#[derive(Message, Debug, Clone, PartialEq)]
pub enum SceneCmd {
    SpawnCharacter {
        entity: Entity,
        position: Vec3,
        primary: bool,
        /// `None` until the player's model has been resolved.
        model: Option<CharacterModel>,
    },
    SetModel {
        entity: Entity,
        model: CharacterModel,
    },
    SpawnRoadSegment {
        entity: Entity,
        position: Vec3,
        width: f32,
        length: f32,
    },
    SpawnLaneMarking {
        entity: Entity,
        position: Vec3,
    },
    SpawnGoal {
        entity: Entity,
        position: Vec3,
        color: u32,
        multiplier: u32,
    },
    SpawnProjectile {
        entity: Entity,
        position: Vec3,
        sprite_scales: [f32; PROJECTILE_SPRITES],
    },
    /// Remove the entity's visuals and release their resources.
    Despawn {
        entity: Entity,
    },
    SetPosition {
        entity: Entity,
        position: Vec3,
    },
    SetPose {
        entity: Entity,
        pose: Pose,
    },
    SetProjectileVisual {
        entity: Entity,
        opacity: f32,
        spin: f32,
    },
    SetEmissive {
        entity: Entity,
        intensity: f32,
    },
    SetCamera {
        position: Vec3,
        target: Vec3,
    },
    /// Characters on screen: the player plus its followers.
    SetHud {
        characters: u32,
    },
    LoadProgress {
        percent: u8,
    },
    ShowDeathScreen,
    HideDeathScreen,
}
