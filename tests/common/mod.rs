//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::Vec3;

use crowdrun::components::animation::{AnimName, AnimationMixer};
use crowdrun::components::charactermodel::CharacterModel;
use crowdrun::components::mapposition::MapPosition;
use crowdrun::events::scene::SceneCmd;
use crowdrun::game::GameWorld;
use crowdrun::resources::gameconfig::GameConfig;
use crowdrun::resources::input::InputSnapshot;
use crowdrun::resources::rigstore::{Bounds, Clip, Joint, RigTemplate, Track};
use crowdrun::resources::settings::PlayerSettings;

pub const EPSILON: f32 = 1e-6;
pub const TICK: f32 = 1.0 / 60.0;

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

const TRACKS: [&str; 8] = [
    "mixamorig:Hips.position",
    "mixamorig:Hips.quaternion",
    "mixamorig:Spine.quaternion",
    "mixamorig:RightArm.quaternion",
    "mixamorig:RightHand.quaternion",
    "mixamorig:LeftUpLeg.quaternion",
    "mixamorig:RightLeg.quaternion",
    "mixamorig:LeftToeBase.quaternion",
];

fn clip(name: &str, duration: f32) -> Arc<Clip> {
    Arc::new(Clip {
        name: name.into(),
        duration,
        tracks: TRACKS.iter().map(|t| Track::new(*t)).collect(),
    })
}

/// A small rig with every locomotion clip, landing and cast.
pub fn rig_template() -> RigTemplate {
    RigTemplate {
        reference: "test-rig".into(),
        joints: vec![
            Joint {
                name: "mixamorig:Hips".into(),
                position: Vec3::new(0.0, 0.9, 0.0),
            },
            Joint {
                name: "mixamorig:RightHand".into(),
                position: Vec3::new(0.6, 1.4, 0.0),
            },
        ],
        clips: vec![
            clip("Armature|mixamo.com|idle", 2.0),
            clip("Armature|walk.001", 1.0),
            clip("Armature|run", 0.7),
            clip("Armature|walk_backwards", 1.2),
            clip("Armature|strafe_left", 0.9),
            clip("Armature|strafe_right", 0.9),
            clip("Armature|jump_up", 0.6),
            clip("Armature|falling_idle", 1.0),
            clip("Armature|landing", 0.5),
            clip("Armature|cast.001", 1.2),
        ],
        bounds: Some(Bounds {
            min: Vec3::new(-0.5, 0.0, -0.3),
            max: Vec3::new(0.5, 1.8, 0.3),
        }),
    }
}

pub fn rigged_model() -> CharacterModel {
    CharacterModel::Rigged(Arc::new(rig_template()))
}

pub fn new_game() -> GameWorld {
    GameWorld::new(GameConfig::default(), PlayerSettings::default(), Some(7))
}

pub fn run(game: &mut GameWorld, ticks: usize, input: &InputSnapshot) {
    for _ in 0..ticks {
        game.tick(TICK, input);
    }
}

/// A rigged game whose player has dropped onto the road and finished landing.
pub fn settled_game() -> GameWorld {
    let mut game = new_game();
    game.install_player_model(rigged_model());
    run(&mut game, 120, &InputSnapshot::default());
    game
}

pub fn drain(game: &GameWorld) -> Vec<SceneCmd> {
    game.scene_receiver().try_iter().collect()
}

pub fn player_position(game: &mut GameWorld) -> Vec3 {
    let player = game.player().expect("player exists");
    game.world().get::<MapPosition>(player).expect("player position").pos
}

pub fn player_state(game: &mut GameWorld) -> Option<AnimName> {
    let player = game.player().expect("player exists");
    game.world()
        .get::<AnimationMixer>(player)
        .and_then(|m| m.current())
}

pub fn count_with<C: Component>(world: &mut World) -> usize {
    world.query_filtered::<(), With<C>>().iter(world).count()
}
