//! ECS components.
//!
//! Per-entity data for the player, its followers, projectiles, goals and the
//! road. Behaviour lives in [`crate::systems`].

pub mod animation;
pub mod charactermodel;
pub mod follower;
pub mod goal;
pub mod mapposition;
pub mod player;
pub mod projectile;
pub mod roadsegment;
pub mod triggerbox;
