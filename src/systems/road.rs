//! Road scrolling.
//!
//! The road is a fixed ring of segments that all slide towards `+z` every
//! tick. A segment that ends up far enough behind the camera jumps back by
//! the length of the whole ring, taking its lane markings with it, so the
//! road looks endless while no entity is ever created or destroyed.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::mapposition::MapPosition;
use crate::components::roadsegment::{LaneMarking, MARKINGS_PER_SEGMENT, RoadSegment};
use crate::events::scene::SceneCmd;
use crate::resources::camera::FollowCamera;
use crate::resources::gameconfig::{GameConfig, RoadConfig};

/// Initial centre of the segment in ring slot `slot`.
pub fn segment_start(cfg: &RoadConfig, slot: usize) -> Vec3 {
    Vec3::new(
        0.0,
        0.0,
        -cfg.segment_length / 2.0 + slot as f32 * cfg.segment_length,
    )
}

/// Position of marking `j` of a segment centred at `segment_z`.
pub fn marking_position(cfg: &RoadConfig, segment_z: f32, j: usize) -> Vec3 {
    Vec3::new(
        0.0,
        cfg.marking_height,
        segment_z - cfg.segment_length / 2.0 + j as f32 * cfg.marking_spacing,
    )
}

/// Spawn the ring of segments and their markings.
pub fn spawn_road(world: &mut World) {
    let cfg = world.resource::<GameConfig>().road;
    let mut cmds = Vec::new();
    for slot in 0..cfg.segment_count {
        let start = segment_start(&cfg, slot);
        let mut segment = RoadSegment {
            slot,
            ..Default::default()
        };
        for j in 0..MARKINGS_PER_SEGMENT {
            let position = marking_position(&cfg, start.z, j);
            let marking = world
                .spawn((LaneMarking, MapPosition::from_vec(position)))
                .id();
            segment.markings.push(marking);
            cmds.push(SceneCmd::SpawnLaneMarking {
                entity: marking,
                position,
            });
        }
        let entity = world.spawn((segment, MapPosition::from_vec(start))).id();
        cmds.push(SceneCmd::SpawnRoadSegment {
            entity,
            position: start,
            width: cfg.road_width,
            length: cfg.segment_length,
        });
    }
    world.resource_mut::<Messages<SceneCmd>>().write_batch(cmds);
}

/// Put every segment and marking back where [`spawn_road`] placed it.
pub fn reset_road(world: &mut World) {
    let cfg = world.resource::<GameConfig>().road;
    let mut segments = world.query::<(&RoadSegment, &mut MapPosition)>();
    let mut markings: Vec<(Entity, Vec3)> = Vec::new();
    for (segment, mut position) in segments.iter_mut(world) {
        let start = segment_start(&cfg, segment.slot);
        position.pos = start;
        for (j, marking) in segment.markings.iter().enumerate() {
            markings.push((*marking, marking_position(&cfg, start.z, j)));
        }
    }
    for (marking, position) in markings {
        if let Some(mut p) = world.get_mut::<MapPosition>(marking) {
            p.pos = position;
        }
    }
}

/// Scroll the road and recycle segments that fell behind the camera.
pub fn road_scroll_system(
    mut segments: Query<(&RoadSegment, &mut MapPosition), Without<LaneMarking>>,
    mut markings: Query<&mut MapPosition, (With<LaneMarking>, Without<RoadSegment>)>,
    camera: Res<FollowCamera>,
    config: Res<GameConfig>,
) {
    let cfg = &config.road;
    let ring_length = cfg.segment_length * cfg.segment_count as f32;
    let recycle_z = camera.position.z + cfg.segment_length * 2.0;

    for (segment, mut position) in segments.iter_mut() {
        position.pos.z += cfg.scroll_per_tick;
        let recycle = position.pos.z > recycle_z;
        if recycle {
            position.pos.z -= ring_length;
        }
        for marking in &segment.markings {
            if let Ok(mut m) = markings.get_mut(*marking) {
                m.pos.z += cfg.scroll_per_tick;
                if recycle {
                    m.pos.z -= ring_length;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout() {
        let cfg = RoadConfig::default();
        assert_eq!(segment_start(&cfg, 0).z, -20.0);
        assert_eq!(segment_start(&cfg, 5).z, 180.0);
        let m = marking_position(&cfg, -20.0, 3);
        assert!((m.z - -10.0).abs() < 1e-6);
        assert!((m.y - 0.01).abs() < 1e-6);
    }
}
