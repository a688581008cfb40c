//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during a tick.
//!
//! Overview
//! - `camera` – third-person follow camera
//! - `deferred` – effects scheduled for a later world time
//! - `gameconfig` – tuning values loaded from INI
//! - `gamestate` – authoritative and pending high-level game state
//! - `goalspawner` – goal pair timing
//! - `hud` – character counter shown on screen
//! - `input` – per-tick action state and mouse look
//! - `modelloader` – loader trait, JSON rig loader and the loader thread bridge
//! - `rigstore` – shared rig templates, clips and clip name handling
//! - `rng` – seedable random source
//! - `scene` – channel to the rendering backend
//! - `settings` – player settings (graphics quality)
//! - `worldtime` – simulation time and delta
pub mod camera;
pub mod deferred;
pub mod gameconfig;
pub mod gamestate;
pub mod goalspawner;
pub mod hud;
pub mod input;
pub mod modelloader;
pub mod rigstore;
pub mod rng;
pub mod scene;
pub mod settings;
pub mod worldtime;
