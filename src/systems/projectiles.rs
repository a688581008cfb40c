//! Projectile systems.
//!
//! # System Flow
//!
//! 1. [`fire_input_system`] turns a fire press into one [`Shoot`] for the
//!    player followed by one per follower
//! 2. [`observe_shoot`] applies the player's cooldown and cast overlay and
//!    queues a [`DeferredEffect::SpawnProjectile`]
//! 3. the deferred runner calls [`spawn_projectile`] once the effect is due
//! 4. [`projectile_system`] moves, spins and fades projectiles and despawns
//!    them when their life runs out
//!
//! Projectile life counts down in world time, the same way any
//! time-to-live entity does.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::debug;

use crate::components::animation::{AnimName, AnimationController, AnimationMixer};
use crate::components::charactermodel::CharacterModel;
use crate::components::follower::Follower;
use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::components::projectile::{PROJECTILE_SPRITES, Projectile};
use crate::events::projectile::Shoot;
use crate::events::scene::SceneCmd;
use crate::resources::deferred::{DeferredEffect, DeferredEffects};
use crate::resources::gameconfig::{GameConfig, ProjectileConfig};
use crate::resources::input::InputState;
use crate::resources::rng::GameRng;
use crate::resources::worldtime::WorldTime;

/// Joint placed by the artist exactly where projectiles should appear.
pub const PROJECTILE_POINT: &str = "projectile_point";
/// Common names of the right hand bone, tried in order.
pub const HAND_BONES: [&str; 3] = ["mixamorig:RightHand", "RightHand", "mixamorigRightHand"];
/// Fraction of the model height used by the bounds fallback.
pub const BOUNDS_HEIGHT_FRACTION: f32 = 0.7;
/// Offset from the root used when nothing better is known (chest height).
pub const ROOT_OFFSET: Vec3 = Vec3::new(0.0, 1.5, 0.0);
/// Character forward direction. Projectiles fly along `-z`, but the model
/// faces the camera, so "in front of the chest" is `+z`.
pub const MODEL_FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);
/// Flight direction of every projectile.
pub const PROJECTILE_DIRECTION: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Which step of the launch point chain produced the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPointSource {
    /// The dedicated `projectile_point` joint.
    ProjectilePoint,
    /// One of the well-known hand bone names.
    HandBone,
    /// First joint whose name contains `righthand`.
    HandScan,
    /// 70% up the model's bounding box, slightly in front.
    Bounds,
    /// Fixed offset above the root.
    Root,
}

/// Where a shooter's projectile appears. Never fails.
pub fn resolve_launch_point(root: Vec3, model: Option<&CharacterModel>) -> (Vec3, LaunchPointSource) {
    let Some(model) = model else {
        return (root + ROOT_OFFSET, LaunchPointSource::Root);
    };

    if let Some(template) = model.template() {
        if let Some(joint) = template.joint(PROJECTILE_POINT) {
            return (root + joint.position, LaunchPointSource::ProjectilePoint);
        }
        if let Some(joint) = HAND_BONES.iter().find_map(|name| template.joint(name)) {
            return (root + joint.position, LaunchPointSource::HandBone);
        }
        if let Some(joint) = template
            .joints
            .iter()
            .find(|j| j.name.to_lowercase().contains("righthand"))
        {
            debug!("Hand found by scan: {}", joint.name);
            return (root + joint.position, LaunchPointSource::HandScan);
        }
    }

    match model.bounds() {
        Some(bounds) => {
            let y = root.y + bounds.min.y + bounds.height() * BOUNDS_HEIGHT_FRACTION;
            (
                Vec3::new(root.x, y, root.z) + MODEL_FORWARD,
                LaunchPointSource::Bounds,
            )
        }
        None => (root + ROOT_OFFSET, LaunchPointSource::Root),
    }
}

/// On the fire edge the player shoots, then every follower does.
pub fn fire_input_system(
    mut commands: Commands,
    input: Res<InputState>,
    player: Query<Entity, With<Player>>,
    followers: Query<(Entity, &Follower)>,
) {
    if !input.fire.just_pressed {
        return;
    }
    let Ok(player) = player.single() else {
        return;
    };
    commands.trigger(Shoot {
        shooter: player,
        primary: true,
    });

    let mut order: Vec<(u32, Entity)> = followers.iter().map(|(e, f)| (f.index, e)).collect();
    order.sort_unstable();
    for (_, shooter) in order {
        commands.trigger(Shoot {
            shooter,
            primary: false,
        });
    }
}

/// Start a shot: cooldown and cast overlay for the player, then schedule the
/// projectile spawn.
pub fn observe_shoot(
    trigger: On<Shoot>,
    mut shooters: Query<(Option<&mut AnimationMixer>, Option<&mut AnimationController>)>,
    mut deferred: ResMut<DeferredEffects>,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
) {
    let shot = *trigger.event();
    let delay = if shot.primary {
        let Ok((mixer, controller)) = shooters.get_mut(shot.shooter) else {
            return;
        };
        let (Some(mut mixer), Some(mut controller)) = (mixer, controller) else {
            debug!("Shooter has no animated model yet, shot ignored");
            return;
        };
        if controller.attacking {
            return;
        }
        if !(mixer.play_overlay(AnimName::Cast) || mixer.play_overlay(AnimName::Throw)) {
            debug!("No cast or throw clip, shot ignored");
            return;
        }
        controller.attacking = true;
        config.projectile.cast_delay
    } else {
        0.0
    };

    deferred.schedule(
        time.elapsed + delay,
        DeferredEffect::SpawnProjectile {
            shooter: shot.shooter,
        },
    );
}

/// Spawn a projectile at `origin` and tell the renderer about it.
pub fn spawn_projectile(
    commands: &mut Commands,
    scene: &mut MessageWriter<SceneCmd>,
    rng: &mut GameRng,
    cfg: &ProjectileConfig,
    origin: Vec3,
) -> Entity {
    let sprite_scales: [f32; PROJECTILE_SPRITES] =
        std::array::from_fn(|_| rng.in_range(cfg.min_sprite_scale, cfg.sprite_scale_range));

    let projectile = Projectile::new(PROJECTILE_DIRECTION * cfg.speed, cfg.life, sprite_scales);
    let entity = commands
        .spawn((projectile, MapPosition::from_vec(origin)))
        .id();
    scene.write(SceneCmd::SpawnProjectile {
        entity,
        position: origin,
        sprite_scales,
    });
    entity
}

/// Move, spin and age projectiles; despawn expired ones.
pub fn projectile_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut Projectile, &mut MapPosition)>,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    mut scene: MessageWriter<SceneCmd>,
) {
    let dt = time.delta;
    for (entity, mut projectile, mut position) in query.iter_mut() {
        position.pos += projectile.velocity * dt;
        projectile.life -= dt;
        projectile.spin += config.projectile.spin_per_tick;

        if projectile.is_expired() {
            commands.entity(entity).try_despawn();
            scene.write(SceneCmd::Despawn { entity });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::resources::rigstore::{Bounds, Joint, RigTemplate};

    fn rig(joints: &[(&str, Vec3)], bounds: Option<Bounds>) -> CharacterModel {
        CharacterModel::Rigged(Arc::new(RigTemplate {
            reference: "test".into(),
            joints: joints
                .iter()
                .map(|(n, p)| Joint {
                    name: (*n).into(),
                    position: *p,
                })
                .collect(),
            clips: vec![],
            bounds,
        }))
    }

    const ROOT: Vec3 = Vec3::new(2.0, 0.5, -10.0);

    #[test]
    fn projectile_point_wins() {
        let model = rig(
            &[
                ("mixamorig:RightHand", Vec3::new(0.3, 1.2, 0.0)),
                ("projectile_point", Vec3::new(0.0, 1.4, 0.2)),
            ],
            None,
        );
        let (pos, src) = resolve_launch_point(ROOT, Some(&model));
        assert_eq!(src, LaunchPointSource::ProjectilePoint);
        assert_eq!(pos, ROOT + Vec3::new(0.0, 1.4, 0.2));
    }

    #[test]
    fn hand_names_in_order_then_scan() {
        let model = rig(
            &[
                ("RightHand", Vec3::new(0.1, 1.0, 0.0)),
                ("mixamorig:RightHand", Vec3::new(0.3, 1.2, 0.0)),
            ],
            None,
        );
        let (pos, src) = resolve_launch_point(ROOT, Some(&model));
        assert_eq!(src, LaunchPointSource::HandBone);
        assert_eq!(pos, ROOT + Vec3::new(0.3, 1.2, 0.0));

        let model = rig(
            &[
                ("Spine", Vec3::ZERO),
                ("Character1_RIGHTHAND_ctrl", Vec3::new(0.4, 1.1, 0.0)),
                ("LeftRightHandle", Vec3::new(9.0, 9.0, 9.0)),
            ],
            None,
        );
        let (pos, src) = resolve_launch_point(ROOT, Some(&model));
        assert_eq!(src, LaunchPointSource::HandScan);
        assert_eq!(pos, ROOT + Vec3::new(0.4, 1.1, 0.0));
    }

    #[test]
    fn bounds_then_root() {
        let bounds = Bounds {
            min: Vec3::new(-0.5, -0.5, -0.5),
            max: Vec3::new(0.5, 1.5, 0.5),
        };
        let model = rig(&[("Spine", Vec3::ZERO)], Some(bounds));
        let (pos, src) = resolve_launch_point(ROOT, Some(&model));
        assert_eq!(src, LaunchPointSource::Bounds);
        assert!((pos.y - (0.5 - 0.5 + 2.0 * 0.7)).abs() < 1e-5);
        assert!((pos.z - (ROOT.z + 1.0)).abs() < 1e-5);
        assert!((pos.x - ROOT.x).abs() < 1e-5);

        let model = rig(&[], None);
        assert_eq!(
            resolve_launch_point(ROOT, Some(&model)),
            (ROOT + ROOT_OFFSET, LaunchPointSource::Root)
        );
        assert_eq!(
            resolve_launch_point(ROOT, None),
            (ROOT + ROOT_OFFSET, LaunchPointSource::Root)
        );
    }

    #[test]
    fn fallback_box_uses_its_bounds() {
        let (pos, src) = resolve_launch_point(Vec3::ZERO, Some(&CharacterModel::Fallback));
        assert_eq!(src, LaunchPointSource::Bounds);
        // box spans -1..1, 70% up is 0.4
        assert!((pos.y - 0.4).abs() < 1e-5);
    }
}
