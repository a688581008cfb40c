//! Scene synchronisation.
//!
//! The last systems of a tick. They describe what changed this tick as
//! [`SceneCmd`] messages and push every message written during the tick
//! through the [`SceneBridge`].
//!
//! - [`sync_positions`] – moved entities
//! - [`sync_poses`] – blended poses of every animated character
//! - [`sync_projectile_visuals`] – sprite fade and spin
//! - [`sync_hud`] – character counter
//! - [`forward_scene_cmds`] / [`update_bevy_scene_cmds`] – bridge plumbing

use bevy_ecs::prelude::*;

use crate::components::animation::AnimationMixer;
use crate::components::follower::Follower;
use crate::components::mapposition::MapPosition;
use crate::components::projectile::Projectile;
use crate::events::scene::SceneCmd;
use crate::resources::hud::Hud;
use crate::resources::scene::SceneBridge;

pub fn sync_positions(query: Query<(Entity, Ref<MapPosition>)>, mut scene: MessageWriter<SceneCmd>) {
    for (entity, position) in query.iter() {
        if position.is_changed() {
            scene.write(SceneCmd::SetPosition {
                entity,
                position: position.pos,
            });
        }
    }
}

pub fn sync_poses(query: Query<(Entity, Ref<AnimationMixer>)>, mut scene: MessageWriter<SceneCmd>) {
    for (entity, mixer) in query.iter() {
        if mixer.is_changed() {
            scene.write(SceneCmd::SetPose {
                entity,
                pose: mixer.sample_pose(),
            });
        }
    }
}

pub fn sync_projectile_visuals(
    query: Query<(Entity, &Projectile)>,
    mut scene: MessageWriter<SceneCmd>,
) {
    for (entity, projectile) in query.iter() {
        scene.write(SceneCmd::SetProjectileVisual {
            entity,
            opacity: projectile.opacity(),
            spin: projectile.spin,
        });
    }
}

/// Keep the HUD counter equal to the player plus its followers.
pub fn sync_hud(
    followers: Query<(), With<Follower>>,
    mut hud: ResMut<Hud>,
    mut scene: MessageWriter<SceneCmd>,
) {
    let characters = 1 + followers.iter().count() as u32;
    if hud.characters != characters {
        hud.characters = characters;
        scene.write(SceneCmd::SetHud { characters });
    }
}

/// Forward this tick's scene commands to the renderer.
pub fn forward_scene_cmds(bridge: Res<SceneBridge>, mut reader: MessageReader<SceneCmd>) {
    for cmd in reader.read() {
        // ignore send errors; the host may have dropped the receiver
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for [`SceneCmd`].
pub fn update_bevy_scene_cmds(mut msgs: ResMut<Messages<SceneCmd>>) {
    msgs.update();
}
