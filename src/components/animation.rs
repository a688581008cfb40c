//! Skeletal animation playback: actions, the layered mixer and its controller.
//!
//! An [`AnimationMixer`] owns one [`AnimationAction`] per [`AnimName`] the
//! character's rig provides. Actions live on one of two layers:
//!
//! - **Base** – locomotion (`idle`, `walk`, `run`, ...). Exactly one base
//!   action is *current*; switching cross-fades the old one out and the new one
//!   in.
//! - **Overlay** – one-shot upper-body actions (`cast`, `throw`, `attack`).
//!   They are started directly and blend on top of whatever the base layer is
//!   doing. Their clips have had the hip and leg tracks removed (see
//!   [`Clip::upper_body`]) so the legs keep following the base layer.
//!
//! [`AnimationMixer::update`] advances every action and reports the once-actions
//! that completed during the step. The caller turns those into
//! [`ActionFinished`](crate::events::animation::ActionFinished) messages.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::debug;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::resources::rigstore::{Clip, RigTemplate};

/// Default cross-fade between base-layer actions, in seconds.
pub const DEFAULT_FADE: f32 = 0.2;
/// Time scale applied to overlay actions.
pub const OVERLAY_TIME_SCALE: f32 = 1.5;

/// Every animation name the game knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimName {
    Idle,
    Walk,
    Run,
    WalkBackwards,
    StrafeLeft,
    StrafeRight,
    JumpUp,
    FallingIdle,
    Glide,
    Landing,
    Jump,
    Cast,
    Throw,
    Attack,
}

impl AnimName {
    pub const ALL: [AnimName; 14] = [
        AnimName::Idle,
        AnimName::Walk,
        AnimName::Run,
        AnimName::WalkBackwards,
        AnimName::StrafeLeft,
        AnimName::StrafeRight,
        AnimName::JumpUp,
        AnimName::FallingIdle,
        AnimName::Glide,
        AnimName::Landing,
        AnimName::Jump,
        AnimName::Cast,
        AnimName::Throw,
        AnimName::Attack,
    ];

    /// Names a rig must provide for the character to animate at all.
    pub const REQUIRED: [AnimName; 1] = [AnimName::Idle];

    pub fn as_str(self) -> &'static str {
        match self {
            AnimName::Idle => "idle",
            AnimName::Walk => "walk",
            AnimName::Run => "run",
            AnimName::WalkBackwards => "walk_backwards",
            AnimName::StrafeLeft => "strafe_left",
            AnimName::StrafeRight => "strafe_right",
            AnimName::JumpUp => "jump_up",
            AnimName::FallingIdle => "falling_idle",
            AnimName::Glide => "glide",
            AnimName::Landing => "landing",
            AnimName::Jump => "jump",
            AnimName::Cast => "cast",
            AnimName::Throw => "throw",
            AnimName::Attack => "attack",
        }
    }

    /// Look up a name after [`clean_clip_name`](crate::resources::rigstore::clean_clip_name).
    pub fn from_clean_name(name: &str) -> Option<AnimName> {
        AnimName::ALL.iter().copied().find(|n| n.as_str() == name)
    }

    /// Upper-body actions played on the overlay layer.
    pub fn is_overlay(self) -> bool {
        matches!(self, AnimName::Cast | AnimName::Throw | AnimName::Attack)
    }

    /// Actions that play a single time instead of looping.
    pub fn is_one_shot(self) -> bool {
        self.is_overlay() || matches!(self, AnimName::JumpUp | AnimName::Landing | AnimName::Jump)
    }

    /// States the character can only be in while off the ground.
    pub fn is_airborne(self) -> bool {
        matches!(
            self,
            AnimName::FallingIdle | AnimName::JumpUp | AnimName::Glide
        )
    }
}

impl std::fmt::Display for AnimName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an action does when it reaches the end of its clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Wrap around and keep playing.
    Repeat,
    /// Play a single time, then finish.
    Once,
}

/// Blend layer an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Base,
    Overlay,
}

/// Which kind of character a mixer is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerRole {
    /// The player: overlay names get upper-body clips on the overlay layer.
    Primary,
    /// A follower: every clip keeps its full track set and plays as a base
    /// action, since followers only mirror the player's named state.
    Follower,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// Playback state of one clip on one character.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<Clip>,
    pub layer: Layer,
    pub loop_mode: LoopMode,
    /// Hold the final pose when a `Once` action completes.
    pub clamp_when_finished: bool,
    pub time_scale: f32,
    /// Weight at full fade-in.
    pub weight: f32,
    time: f32,
    enabled: bool,
    paused: bool,
    fade: Option<Fade>,
    fade_weight: f32,
}

impl AnimationAction {
    pub fn new(clip: Arc<Clip>, layer: Layer) -> Self {
        Self {
            clip,
            layer,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            time_scale: 1.0,
            weight: 1.0,
            time: 0.0,
            enabled: false,
            paused: false,
            fade: None,
            fade_weight: 1.0,
        }
    }

    /// Apply the loop, clamp and time-scale policy for `name`.
    fn with_policy(mut self, name: AnimName) -> Self {
        if name.is_one_shot() {
            self.loop_mode = LoopMode::Once;
            self.clamp_when_finished = false;
        } else {
            self.loop_mode = LoopMode::Repeat;
        }
        if name.is_overlay() {
            self.time_scale = OVERLAY_TIME_SCALE;
            self.weight = 1.0;
        }
        self
    }

    pub fn clip(&self) -> &Clip {
        &self.clip
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Rewind to the start and clear any pause or fade.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.enabled = true;
        self.paused = false;
        self.fade = None;
        self.fade_weight = 1.0;
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    /// Deactivate and rewind.
    pub fn stop(&mut self) -> &mut Self {
        self.time = 0.0;
        self.enabled = false;
        self.paused = false;
        self.fade = None;
        self.fade_weight = 1.0;
        self
    }

    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.fade_weight = 0.0;
        self.fade = Some(Fade {
            from: 0.0,
            to: 1.0,
            duration,
            elapsed: 0.0,
        });
        self
    }

    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Fade {
            from: self.fade_weight,
            to: 0.0,
            duration,
            elapsed: 0.0,
        });
        self
    }

    pub fn is_running(&self) -> bool {
        self.enabled && !self.paused && self.time_scale != 0.0
    }

    /// Weight this action currently contributes to the pose.
    pub fn effective_weight(&self) -> f32 {
        if self.enabled {
            self.weight * self.fade_weight
        } else {
            0.0
        }
    }

    /// Advance by `dt` seconds. Returns true when a `Once` action completed
    /// during this step.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.enabled {
            return false;
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            let t = if fade.duration <= 0.0 {
                1.0
            } else {
                (fade.elapsed / fade.duration).min(1.0)
            };
            self.fade_weight = fade.from + (fade.to - fade.from) * t;
            if t >= 1.0 {
                let target = fade.to;
                self.fade = None;
                if target <= 0.0 {
                    // faded out completely
                    self.enabled = false;
                    return false;
                }
            }
        }

        if self.paused {
            return false;
        }

        self.time += dt * self.time_scale;
        let duration = self.clip.duration;
        match self.loop_mode {
            LoopMode::Repeat => {
                if duration > 0.0 {
                    self.time = self.time.rem_euclid(duration);
                }
                false
            }
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    if self.clamp_when_finished {
                        self.paused = true;
                    } else {
                        self.enabled = false;
                    }
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// One action's share of a track in a sampled [`Pose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseContribution {
    pub anim: AnimName,
    pub weight: f32,
    pub time: f32,
}

/// Blended pose: for every driven track, which actions drive it and how much.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub channels: FxHashMap<String, SmallVec<[PoseContribution; 2]>>,
}

impl Pose {
    /// Actions contributing to `track`.
    pub fn drivers(&self, track: &str) -> impl Iterator<Item = AnimName> + '_ {
        self.channels
            .get(track)
            .into_iter()
            .flat_map(|c| c.iter().map(|p| p.anim))
    }
}

/// Per-character animation mixer with a base and an overlay layer.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationMixer {
    actions: FxHashMap<AnimName, AnimationAction>,
    current: Option<AnimName>,
}

impl AnimationMixer {
    /// Instantiate an independent mixer from a shared template.
    ///
    /// Clip data stays shared; all playback state belongs to the new mixer.
    pub fn from_template(template: &RigTemplate, role: MixerRole) -> Self {
        let mut actions = FxHashMap::default();
        for (name, clip) in template.named_clips() {
            let action = if role == MixerRole::Primary && name.is_overlay() {
                AnimationAction::new(Arc::new(clip.upper_body()), Layer::Overlay)
            } else {
                AnimationAction::new(clip, Layer::Base)
            };
            actions.insert(name, action.with_policy(name));
        }
        for required in AnimName::REQUIRED {
            if !actions.contains_key(&required) {
                debug!("Rig '{}' has no '{}' clip", template.reference, required);
            }
        }
        Self {
            actions,
            current: None,
        }
    }

    /// Name of the current base-layer action.
    pub fn current(&self) -> Option<AnimName> {
        self.current
    }

    pub fn has(&self, name: AnimName) -> bool {
        self.actions.contains_key(&name)
    }

    pub fn action(&self, name: AnimName) -> Option<&AnimationAction> {
        self.actions.get(&name)
    }

    pub fn is_running(&self, name: AnimName) -> bool {
        self.actions.get(&name).is_some_and(|a| a.is_running())
    }

    /// Cross-fade the base layer to `name`.
    ///
    /// Returns false (and changes nothing) when the rig has no such clip.
    /// Re-requesting the current, still running action is a no-op.
    pub fn play_base(&mut self, name: AnimName, fade: f32) -> bool {
        if !self.actions.contains_key(&name) {
            debug!("No '{}' clip, transition skipped", name);
            return false;
        }
        if self.current == Some(name) && self.is_running(name) {
            return true;
        }
        if let Some(previous) = self.current.and_then(|c| self.actions.get_mut(&c)) {
            previous.fade_out(fade);
        }
        if let Some(next) = self.actions.get_mut(&name) {
            next.reset().fade_in(fade).play();
        }
        self.current = Some(name);
        true
    }

    /// Start `name` directly on top of the base layer.
    ///
    /// The current base action is left untouched.
    pub fn play_overlay(&mut self, name: AnimName) -> bool {
        let Some(action) = self.actions.get_mut(&name) else {
            return false;
        };
        action.reset();
        action.time_scale = OVERLAY_TIME_SCALE;
        action.weight = 1.0;
        action.play();
        true
    }

    /// Stop every other action and restart `name` from the beginning.
    pub fn restart_exclusive(&mut self, name: AnimName) -> bool {
        if !self.actions.contains_key(&name) {
            return false;
        }
        for (other, action) in self.actions.iter_mut() {
            if *other != name {
                action.stop();
            }
        }
        if let Some(action) = self.actions.get_mut(&name) {
            action.reset().play();
        }
        self.current = Some(name);
        true
    }

    /// Advance all actions. Returns the once-actions that finished.
    pub fn update(&mut self, dt: f32) -> SmallVec<[AnimName; 2]> {
        let mut finished = SmallVec::new();
        for name in AnimName::ALL {
            if let Some(action) = self.actions.get_mut(&name)
                && action.advance(dt)
            {
                finished.push(name);
            }
        }
        finished
    }

    /// Blend every weighted action into a pose.
    pub fn sample_pose(&self) -> Pose {
        let mut pose = Pose::default();
        for name in AnimName::ALL {
            let Some(action) = self.actions.get(&name) else {
                continue;
            };
            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }
            for track in &action.clip().tracks {
                pose.channels
                    .entry(track.name.clone())
                    .or_default()
                    .push(PoseContribution {
                        anim: name,
                        weight,
                        time: action.time(),
                    });
            }
        }
        pose
    }
}

/// Gameplay flags layered over the player's mixer.
///
/// The current named state is the mixer's current base action.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AnimationController {
    /// An overlay attack is in flight; new attacks are refused.
    pub attacking: bool,
    /// The landing action is playing and holds the state machine.
    pub landing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::rigstore::Track;

    fn clip(name: &str, duration: f32, tracks: &[&str]) -> Arc<Clip> {
        Arc::new(Clip {
            name: name.into(),
            duration,
            tracks: tracks.iter().map(|t| Track::new(*t)).collect(),
        })
    }

    fn template() -> RigTemplate {
        let full = [
            "mixamorig:Hips.quaternion",
            "mixamorig:LeftLeg.quaternion",
            "mixamorig:Spine.quaternion",
            "mixamorig:RightHand.quaternion",
        ];
        RigTemplate {
            reference: "unit".into(),
            joints: vec![],
            clips: vec![
                clip("idle", 2.0, &full),
                clip("walk", 1.0, &full),
                clip("landing", 0.5, &full),
                clip("Armature|cast.001", 1.2, &full),
            ],
            bounds: None,
        }
    }

    #[test]
    fn policy_for_names() {
        let mixer = AnimationMixer::from_template(&template(), MixerRole::Primary);
        let idle = mixer.action(AnimName::Idle).unwrap();
        assert_eq!(idle.loop_mode, LoopMode::Repeat);
        assert_eq!(idle.layer, Layer::Base);
        let landing = mixer.action(AnimName::Landing).unwrap();
        assert_eq!(landing.loop_mode, LoopMode::Once);
        assert!(!landing.clamp_when_finished);
        let cast = mixer.action(AnimName::Cast).unwrap();
        assert_eq!(cast.layer, Layer::Overlay);
        assert_eq!(cast.loop_mode, LoopMode::Once);
        assert!((cast.time_scale - OVERLAY_TIME_SCALE).abs() < f32::EPSILON);
        assert_eq!(cast.clip().tracks.len(), 2);
    }

    #[test]
    fn follower_mixer_keeps_full_tracks() {
        let mixer = AnimationMixer::from_template(&template(), MixerRole::Follower);
        let cast = mixer.action(AnimName::Cast).unwrap();
        assert_eq!(cast.layer, Layer::Base);
        assert_eq!(cast.clip().tracks.len(), 4);
    }

    #[test]
    fn mixers_share_clip_data_with_their_template() {
        let template = template();
        let a = AnimationMixer::from_template(&template, MixerRole::Follower);
        let b = AnimationMixer::from_template(&template, MixerRole::Follower);
        let shared: &Clip = &template.clips[0];
        assert!(std::ptr::eq(a.action(AnimName::Idle).unwrap().clip(), shared));
        assert!(std::ptr::eq(b.action(AnimName::Idle).unwrap().clip(), shared));
    }

    #[test]
    fn play_base_missing_clip_is_noop() {
        let mut mixer = AnimationMixer::from_template(&template(), MixerRole::Primary);
        assert!(mixer.play_base(AnimName::Idle, DEFAULT_FADE));
        assert!(!mixer.play_base(AnimName::Run, DEFAULT_FADE));
        assert_eq!(mixer.current(), Some(AnimName::Idle));
    }

    #[test]
    fn cross_fade_disables_previous_action() {
        let mut mixer = AnimationMixer::from_template(&template(), MixerRole::Primary);
        mixer.play_base(AnimName::Idle, 0.2);
        mixer.update(0.5);
        mixer.play_base(AnimName::Walk, 0.2);
        mixer.update(0.1);
        let idle_w = mixer.action(AnimName::Idle).unwrap().effective_weight();
        let walk_w = mixer.action(AnimName::Walk).unwrap().effective_weight();
        assert!((idle_w - 0.5).abs() < 1e-4);
        assert!((walk_w - 0.5).abs() < 1e-4);
        mixer.update(0.2);
        assert!(!mixer.is_running(AnimName::Idle));
        assert!(mixer.is_running(AnimName::Walk));
        assert_eq!(mixer.current(), Some(AnimName::Walk));
    }

    #[test]
    fn repeat_action_wraps() {
        let mut mixer = AnimationMixer::from_template(&template(), MixerRole::Primary);
        mixer.play_base(AnimName::Walk, 0.0);
        let finished = mixer.update(2.5);
        assert!(finished.is_empty());
        let walk = mixer.action(AnimName::Walk).unwrap();
        assert!((walk.time() - 0.5).abs() < 1e-4);
        assert!(walk.is_running());
    }

    #[test]
    fn once_action_finishes_and_stops() {
        let mut mixer = AnimationMixer::from_template(&template(), MixerRole::Primary);
        mixer.play_base(AnimName::Landing, 0.05);
        assert!(mixer.update(0.3).is_empty());
        let finished = mixer.update(0.3);
        assert_eq!(finished.as_slice(), &[AnimName::Landing]);
        assert!(!mixer.is_running(AnimName::Landing));
    }

    #[test]
    fn overlay_runs_alongside_base() {
        let mut mixer = AnimationMixer::from_template(&template(), MixerRole::Primary);
        mixer.play_base(AnimName::Walk, 0.0);
        assert!(mixer.play_overlay(AnimName::Cast));
        assert_eq!(mixer.current(), Some(AnimName::Walk));
        mixer.update(0.1);
        assert!(mixer.is_running(AnimName::Walk));
        assert!(mixer.is_running(AnimName::Cast));

        let pose = mixer.sample_pose();
        let hips: Vec<_> = pose.drivers("mixamorig:Hips.quaternion").collect();
        assert_eq!(hips, vec![AnimName::Walk]);
        let hand: Vec<_> = pose.drivers("mixamorig:RightHand.quaternion").collect();
        assert_eq!(hand, vec![AnimName::Walk, AnimName::Cast]);

        // 1.2s clip at 1.5x finishes after 0.8s of play
        let finished = mixer.update(0.75);
        assert_eq!(finished.as_slice(), &[AnimName::Cast]);
        assert!(mixer.is_running(AnimName::Walk));
    }

    #[test]
    fn restart_exclusive_stops_others() {
        let mut mixer = AnimationMixer::from_template(&template(), MixerRole::Follower);
        mixer.restart_exclusive(AnimName::Idle);
        mixer.update(0.4);
        assert!(mixer.restart_exclusive(AnimName::Walk));
        assert!(!mixer.is_running(AnimName::Idle));
        let walk = mixer.action(AnimName::Walk).unwrap();
        assert!(walk.is_running());
        assert!(walk.time().abs() < f32::EPSILON);
    }

    #[test]
    fn anim_name_round_trips_through_str() {
        for name in AnimName::ALL {
            assert_eq!(AnimName::from_clean_name(name.as_str()), Some(name));
        }
        assert_eq!(AnimName::from_clean_name("dance"), None);
    }
}
