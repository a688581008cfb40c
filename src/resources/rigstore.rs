//! Rig templates and the registry that shares them.
//!
//! A [`RigTemplate`] is the immutable result of loading a character model:
//! its joints, its animation clips and its bounding box. Templates are shared
//! through `Arc` between the player and every follower; the runtime pose state
//! lives in each character's own
//! [`AnimationMixer`](crate::components::animation::AnimationMixer).
//!
//! This module also owns the clip name cleaning that maps raw clip names
//! (`Armature|mixamo.com|walk.001`) onto [`AnimName`], and the track filter
//! that builds upper-body overlay clips.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::components::animation::AnimName;
use crate::components::charactermodel::CharacterModel;

/// Bones an overlay clip must never drive.
///
/// Matching is by substring, so `mixamorig:LeftUpLeg.quaternion` is excluded
/// by `LeftUpLeg`.
pub const EXCLUDED_BONES: [&str; 9] = [
    "Hips",
    "LeftUpLeg",
    "LeftLeg",
    "LeftFoot",
    "LeftToeBase",
    "RightUpLeg",
    "RightLeg",
    "RightFoot",
    "RightToeBase",
];

/// A single animated channel, e.g. `mixamorig:Spine.quaternion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// True when the track animates one of the [`EXCLUDED_BONES`].
    pub fn drives_excluded_bone(&self) -> bool {
        EXCLUDED_BONES
            .iter()
            .any(|bone| self.name.contains(bone))
    }
}

/// Immutable animation clip data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Raw clip name as exported by the modelling tool.
    pub name: String,
    /// Clip length in seconds.
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl Clip {
    /// Build the upper-body variant of this clip.
    ///
    /// Every track touching an excluded bone is dropped. The result is named
    /// `<name>_UB` and keeps the original duration.
    pub fn upper_body(&self) -> Clip {
        Clip {
            name: format!("{}_UB", self.name),
            duration: self.duration,
            tracks: self
                .tracks
                .iter()
                .filter(|t| !t.drives_excluded_bone())
                .cloned()
                .collect(),
        }
    }
}

/// Strip decorations from an exported clip name.
///
/// Keeps the text after the last `|`, then drops everything from the first
/// `.` on: `Armature|mixamo.com|walk.001` becomes `walk`.
pub fn clean_clip_name(raw: &str) -> &str {
    let tail = raw.rsplit('|').next().unwrap_or(raw);
    tail.split('.').next().unwrap_or(tail)
}

/// A named joint of the skeleton with its bind position relative to the
/// character root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub name: String,
    pub position: Vec3,
}

/// Axis-aligned bounds relative to the character root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Everything the loader produced for one character model.
///
/// Joints are stored in scene traversal order, which matters for the
/// substring scan used to find a launch joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigTemplate {
    /// Model reference the template was loaded from.
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub joints: Vec<Joint>,
    /// Shared with every mixer built from this template.
    #[serde(default)]
    pub clips: Vec<Arc<Clip>>,
    #[serde(default)]
    pub bounds: Option<Bounds>,
}

impl RigTemplate {
    /// Clips that map onto a known [`AnimName`], paired with that name.
    ///
    /// When several clips clean to the same name the last one wins.
    pub fn named_clips(&self) -> Vec<(AnimName, Arc<Clip>)> {
        let mut out: Vec<(AnimName, Arc<Clip>)> = Vec::with_capacity(self.clips.len());
        for clip in &self.clips {
            let cleaned = clean_clip_name(&clip.name);
            match AnimName::from_clean_name(cleaned) {
                Some(name) => {
                    out.retain(|(n, _)| *n != name);
                    out.push((name, Arc::clone(clip)));
                }
                None => debug!("Ignoring unknown clip '{}' ({})", clip.name, cleaned),
            }
        }
        out
    }

    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.name == name)
    }
}

/// Registry for the resolved player model.
///
/// Empty until the loader resolves. Followers spawned afterwards instantiate
/// from whatever is stored here.
#[derive(Resource, Debug, Default)]
pub struct RigStore {
    model: Option<CharacterModel>,
}

impl RigStore {
    pub fn set(&mut self, model: CharacterModel) {
        self.model = Some(model);
    }

    pub fn model(&self) -> Option<&CharacterModel> {
        self.model.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack_clip() -> Clip {
        Clip {
            name: "Armature|cast".into(),
            duration: 1.0,
            tracks: vec![
                Track::new("mixamorig:Hips.position"),
                Track::new("mixamorig:Hips.quaternion"),
                Track::new("mixamorig:Spine.quaternion"),
                Track::new("mixamorig:LeftUpLeg.quaternion"),
                Track::new("mixamorig:LeftLeg.quaternion"),
                Track::new("mixamorig:RightFoot.quaternion"),
                Track::new("mixamorig:RightToeBase.quaternion"),
                Track::new("mixamorig:RightArm.quaternion"),
                Track::new("mixamorig:RightHand.quaternion"),
                Track::new("mixamorig:Head.quaternion"),
            ],
        }
    }

    #[test]
    fn clean_name_strips_prefix_and_suffix() {
        assert_eq!(clean_clip_name("Armature|mixamo.com|walk.001"), "walk");
        assert_eq!(clean_clip_name("idle"), "idle");
        assert_eq!(clean_clip_name("run.002"), "run");
        assert_eq!(clean_clip_name("Rig|jump_up"), "jump_up");
    }

    #[test]
    fn upper_body_clip_drops_every_excluded_bone() {
        let ub = attack_clip().upper_body();
        assert_eq!(ub.name, "Armature|cast_UB");
        assert!(ub.tracks.iter().all(|t| !t.drives_excluded_bone()));
        for bone in EXCLUDED_BONES {
            assert!(ub.tracks.iter().all(|t| !t.name.contains(bone)));
        }
        let names: Vec<_> = ub.tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "mixamorig:Spine.quaternion",
                "mixamorig:RightArm.quaternion",
                "mixamorig:RightHand.quaternion",
                "mixamorig:Head.quaternion",
            ]
        );
    }

    #[test]
    fn upper_body_keeps_duration() {
        let ub = attack_clip().upper_body();
        assert!((ub.duration - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn named_clips_skip_unknown_and_dedupe() {
        let template = RigTemplate {
            reference: "test".into(),
            joints: vec![],
            clips: vec![
                Arc::new(Clip {
                    name: "idle".into(),
                    duration: 1.0,
                    tracks: vec![],
                }),
                Arc::new(Clip {
                    name: "T-Pose".into(),
                    duration: 0.1,
                    tracks: vec![],
                }),
                Arc::new(Clip {
                    name: "Armature|idle.001".into(),
                    duration: 2.0,
                    tracks: vec![],
                }),
            ],
            bounds: None,
        };
        let clips = template.named_clips();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].0, AnimName::Idle);
        assert!((clips[0].1.duration - 2.0).abs() < f32::EPSILON);
        assert!(Arc::ptr_eq(&clips[0].1, &template.clips[2]));
    }

    #[test]
    fn rig_store_starts_unresolved() {
        let mut store = RigStore::default();
        assert!(store.model().is_none());
        store.set(CharacterModel::Fallback);
        assert_eq!(store.model(), Some(&CharacterModel::Fallback));
    }
}
