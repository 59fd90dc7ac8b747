//! dice-core: Core rules engine for DiceBound
//!
//! This crate contains all game logic with no rendering dependencies.
//! A presentation layer drives a [`Campaign`] (or a bare [`LevelEngine`]),
//! drains [`GameEvent`]s to animate them, and draws [`BoardSnapshot`]s.

pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod entity;
pub mod grid;
pub mod hazard;
pub mod level;
pub mod path;
pub mod progression;
pub mod store;

mod consts;
mod error;
mod rng;

pub use config::GameConfig;
pub use consts::*;
pub use engine::{BoardSnapshot, GameEvent, LevelEngine, LossReason, TurnPhase, WinReason};
pub use error::GameError;
pub use grid::{Direction, Grid, Position};
pub use progression::{Campaign, RunState, Stage};
pub use rng::GameRng;
