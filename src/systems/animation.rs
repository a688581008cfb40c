//! Animation systems.
//!
//! - [`advance_player_mixer`] steps the player's mixer and reports finished
//!   once-actions as [`ActionFinished`] messages.
//! - [`apply_action_finished`] clears the controller flags those finishes
//!   release (landing, attack cooldown).
//! - [`locomotion_state_machine`] picks the base-layer state from the
//!   player's motion via [`decide_next_state`] and cross-fades to it.
//!
//! # Animation Flow
//!
//! 1. The loader resolves a [`RigTemplate`](crate::resources::rigstore::RigTemplate)
//! 2. The player gets an [`AnimationMixer`] built from it
//! 3. Each tick the mixer advances, then the finishes are applied, then the
//!    state machine decides; all three run in that order so a decision always
//!    sees the current tick's completions
//! 4. Overlay attacks are started by the shoot observer, never from here
//!
//! # Related
//!
//! - [`crate::components::animation::AnimationMixer`] – layered playback
//! - [`crate::systems::followers::mirror_follower_animation`] – followers copy
//!   the player's state instead of running this machine

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::animation::{AnimName, AnimationController, AnimationMixer};
use crate::components::mapposition::MapPosition;
use crate::components::player::{Player, PlayerMotion};
use crate::events::animation::ActionFinished;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

/// Cross-fade between ordinary locomotion states.
pub const LOCOMOTION_FADE: f32 = 0.2;
/// Faster fade into `jump_up` so the take-off reads immediately.
pub const JUMP_FADE: f32 = 0.1;
/// Fade into `landing`.
pub const LANDING_FADE: f32 = 0.05;
/// Backwards speed (towards `+z`) above which the character walks backwards.
pub const BACKWARDS_THRESHOLD: f32 = 0.1;

/// Everything the state machine looks at, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionInput {
    pub moving: bool,
    pub grounded: bool,
    pub sprinting: bool,
    pub vertical_velocity: f32,
    pub gliding: bool,
    /// Horizontal velocity in the character's frame (`x` right, `z` back).
    pub local_x: f32,
    pub local_z: f32,
    /// Speed above which an airborne character counts as rising.
    pub rising_threshold: f32,
}

/// Outcome of one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Stay on the current state.
    Hold,
    /// Cross-fade to `next` over `fade` seconds.
    To { next: AnimName, fade: f32 },
    /// Touch-down: enter `landing` and raise the landing flag.
    Land,
}

/// Ground locomotion only: strafe, backwards, run/walk or idle.
pub fn grounded_state(input: &LocomotionInput) -> AnimName {
    if !input.moving {
        return AnimName::Idle;
    }
    if input.local_x.abs() > input.local_z.abs() {
        if input.local_x > 0.0 {
            AnimName::StrafeRight
        } else {
            AnimName::StrafeLeft
        }
    } else if input.local_z > BACKWARDS_THRESHOLD {
        AnimName::WalkBackwards
    } else if input.sprinting {
        AnimName::Run
    } else {
        AnimName::Walk
    }
}

/// Decide the next base-layer state. First matching rule wins:
///
/// 1. gliding while airborne → `glide`
/// 2. airborne → `jump_up` while rising, `falling_idle` otherwise
/// 3. grounded right after an airborne state → land
/// 4. landing in progress → hold
/// 5. grounded locomotion ([`grounded_state`])
pub fn decide_next_state(
    input: &LocomotionInput,
    current: Option<AnimName>,
    landing: bool,
) -> Transition {
    let next = if input.gliding && !input.grounded {
        AnimName::Glide
    } else if !input.grounded {
        if input.vertical_velocity > input.rising_threshold {
            AnimName::JumpUp
        } else {
            AnimName::FallingIdle
        }
    } else if current.is_some_and(AnimName::is_airborne) {
        return Transition::Land;
    } else if landing {
        return Transition::Hold;
    } else {
        grounded_state(input)
    };

    if Some(next) == current {
        Transition::Hold
    } else {
        let fade = if next == AnimName::JumpUp {
            JUMP_FADE
        } else {
            LOCOMOTION_FADE
        };
        Transition::To { next, fade }
    }
}

/// Advance the player's mixer and publish finished once-actions.
pub fn advance_player_mixer(
    mut query: Query<(Entity, &mut AnimationMixer), With<Player>>,
    time: Res<WorldTime>,
    mut finished: MessageWriter<ActionFinished>,
) {
    for (entity, mut mixer) in query.iter_mut() {
        for anim in mixer.update(time.delta) {
            finished.write(ActionFinished { entity, anim });
        }
    }
}

/// Advance the ECS message queue for [`ActionFinished`].
pub fn update_bevy_action_finished(mut msgs: ResMut<Messages<ActionFinished>>) {
    msgs.update();
}

/// Release controller flags when the action holding them completes.
pub fn apply_action_finished(
    mut reader: MessageReader<ActionFinished>,
    mut query: Query<&mut AnimationController>,
) {
    for msg in reader.read() {
        let Ok(mut controller) = query.get_mut(msg.entity) else {
            continue;
        };
        if msg.anim == AnimName::Landing {
            controller.landing = false;
        }
        if msg.anim.is_overlay() {
            controller.attacking = false;
        }
    }
}

/// Drive the player's base layer from its motion.
pub fn locomotion_state_machine(
    mut query: Query<
        (
            &MapPosition,
            &PlayerMotion,
            &mut AnimationMixer,
            &mut AnimationController,
        ),
        With<Player>,
    >,
    input: Res<InputState>,
    config: Res<GameConfig>,
) {
    for (position, motion, mut mixer, mut controller) in query.iter_mut() {
        let locomotion = LocomotionInput {
            moving: motion.velocity.x != 0.0 || motion.velocity.z != 0.0,
            grounded: position.pos.y <= config.player.ground_height,
            sprinting: input.sprint.active,
            vertical_velocity: motion.velocity.y,
            // no glide input exists yet
            gliding: false,
            local_x: motion.velocity.x,
            local_z: motion.velocity.z,
            rising_threshold: config.player.rising_threshold,
        };

        match decide_next_state(&locomotion, mixer.current(), controller.landing) {
            Transition::Hold => {}
            Transition::To { next, fade } => {
                mixer.play_base(next, fade);
            }
            Transition::Land => {
                if mixer.play_base(AnimName::Landing, LANDING_FADE) {
                    controller.landing = true;
                } else {
                    debug!("No landing clip, going straight to ground locomotion");
                    mixer.play_base(grounded_state(&locomotion), LOCOMOTION_FADE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> LocomotionInput {
        LocomotionInput {
            grounded: true,
            rising_threshold: 0.5,
            ..Default::default()
        }
    }

    fn moving(x: f32, z: f32) -> LocomotionInput {
        LocomotionInput {
            moving: true,
            local_x: x,
            local_z: z,
            ..grounded()
        }
    }

    fn next_of(t: Transition) -> Option<AnimName> {
        match t {
            Transition::To { next, .. } => Some(next),
            _ => None,
        }
    }

    #[test]
    fn idle_with_no_input_holds() {
        assert_eq!(
            decide_next_state(&grounded(), Some(AnimName::Idle), false),
            Transition::Hold
        );
    }

    #[test]
    fn airborne_states() {
        let rising = LocomotionInput {
            grounded: false,
            vertical_velocity: 10.0,
            rising_threshold: 0.5,
            ..Default::default()
        };
        assert_eq!(
            decide_next_state(&rising, Some(AnimName::Walk), false),
            Transition::To {
                next: AnimName::JumpUp,
                fade: JUMP_FADE
            }
        );
        let falling = LocomotionInput {
            vertical_velocity: 0.5,
            ..rising
        };
        assert_eq!(
            next_of(decide_next_state(&falling, Some(AnimName::JumpUp), false)),
            Some(AnimName::FallingIdle)
        );
        let gliding = LocomotionInput {
            gliding: true,
            ..rising
        };
        assert_eq!(
            next_of(decide_next_state(&gliding, None, false)),
            Some(AnimName::Glide)
        );
        // airborne wins over a pending landing
        assert_eq!(
            next_of(decide_next_state(&rising, Some(AnimName::Landing), true)),
            Some(AnimName::JumpUp)
        );
    }

    #[test]
    fn touch_down_lands_from_every_airborne_state() {
        for current in [AnimName::FallingIdle, AnimName::JumpUp, AnimName::Glide] {
            assert_eq!(
                decide_next_state(&moving(0.0, -9.0), Some(current), false),
                Transition::Land
            );
        }
    }

    #[test]
    fn landing_flag_is_sticky_while_grounded() {
        assert_eq!(
            decide_next_state(&moving(9.0, 0.0), Some(AnimName::Landing), true),
            Transition::Hold
        );
        assert_eq!(
            next_of(decide_next_state(&grounded(), Some(AnimName::Landing), false)),
            Some(AnimName::Idle)
        );
    }

    #[test]
    fn ground_locomotion_table() {
        let cases = [
            (moving(9.0, 0.0), false, AnimName::StrafeRight),
            (moving(-9.0, 0.0), false, AnimName::StrafeLeft),
            (moving(-9.0, 9.0), false, AnimName::WalkBackwards),
            (moving(0.0, 9.0), true, AnimName::WalkBackwards),
            (moving(0.0, -9.0), false, AnimName::Walk),
            (moving(0.0, -9.0), true, AnimName::Run),
            (moving(0.0, 0.05), false, AnimName::Walk),
            (grounded(), true, AnimName::Idle),
        ];
        for (mut input, sprint, expected) in cases {
            input.sprinting = sprint;
            assert_eq!(grounded_state(&input), expected, "{:?}", input);
            assert_eq!(
                next_of(decide_next_state(&input, None, false)),
                Some(expected)
            );
        }
    }

    #[test]
    fn fades_by_target() {
        assert_eq!(
            decide_next_state(&moving(0.0, -9.0), Some(AnimName::Idle), false),
            Transition::To {
                next: AnimName::Walk,
                fade: LOCOMOTION_FADE
            }
        );
    }

    #[test]
    fn decision_is_deterministic() {
        let inputs = [grounded(), moving(3.0, -1.0), moving(0.0, 2.0)];
        for input in inputs {
            for current in AnimName::ALL.iter().copied().map(Some).chain([None]) {
                for landing in [false, true] {
                    assert_eq!(
                        decide_next_state(&input, current, landing),
                        decide_next_state(&input, current, landing)
                    );
                }
            }
        }
    }
}
