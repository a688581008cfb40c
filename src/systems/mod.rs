//! Game systems.
//!
//! This module groups all ECS systems that advance the simulation and
//! describe it to the renderer. [`crate::game::GameWorld::tick`] runs them in
//! a fixed order.
//!
//! Submodules overview
//! - [`animation`] – player mixer, finished actions and the locomotion state machine
//! - [`camera`] – orbit camera following the player
//! - [`deferred`] – run timed effects once they are due
//! - [`followers`] – spawn, arrange, animate and drop followers
//! - [`gamestate`] – check for pending state transitions, restart, run conditions
//! - [`goals`] – spawn goal pairs, detect the player crossing them, remove old ones
//! - [`input`] – fold the host's input snapshot into [`crate::resources::input::InputState`]
//! - [`modelloader`] – background loader thread and model installation
//! - [`player`] – player kinematics and death detection
//! - [`projectiles`] – shooting, launch points and projectile lifetime
//! - [`restart`] – reset the world for a new run
//! - [`road`] – endless road ring
//! - [`scene`] – emit scene commands and forward them to the renderer
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod camera;
pub mod deferred;
pub mod followers;
pub mod gamestate;
pub mod goals;
pub mod input;
pub mod modelloader;
pub mod player;
pub mod projectiles;
pub mod restart;
pub mod road;
pub mod scene;
pub mod time;
