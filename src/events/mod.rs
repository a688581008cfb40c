//! Events and messages.
//!
//! Observer events ([`gamestate::GameStateChangedEvent`],
//! [`goal::GoalTriggered`], [`projectile::Shoot`]) carry cross-subsystem
//! requests inside a tick. Messages ([`animation::ActionFinished`],
//! [`scene::SceneCmd`], [`modelloader::LoaderMessage`]) are buffered and read
//! in schedule order.

pub mod animation;
pub mod gamestate;
pub mod goal;
pub mod modelloader;
pub mod projectile;
pub mod scene;
