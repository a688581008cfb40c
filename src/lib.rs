//! Crowdrun library.
//!
//! Headless core of an endless-runner: a player character with layered
//! skeletal animation, a crowd of followers that copies it, projectiles and
//! multiplier gates on a scrolling road. Rendering, asset fetching and input
//! devices stay outside; the core talks to them through the scene bridge,
//! the model loader and input snapshots.
//!
//! This module exposes the game's ECS components, resources, systems and
//! events for use in integration tests and by host applications.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
