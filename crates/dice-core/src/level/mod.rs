//! Level definitions
//!
//! A level is either an explicit layout or left to the procedural generator.
//! Layouts win; a broken layout falls back to the generator.

mod catalog;
mod generation;
mod layout;

pub use catalog::{builtin_levels, load_levels};
pub use generation::{HazardCount, ProceduralSpec, Weighted, generate};
pub use layout::{Layout, Token, TokenKind};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::Grid;
use crate::rng::GameRng;

/// One level of a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    /// 1-based level number
    pub level: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Starting HP for a fresh run beginning here
    pub player_start_value: u32,
    /// Bonus gold for clearing the level
    pub gold_per_level: u32,
    /// Gold dropped by each enemy the player defeats
    pub gold_per_bag: u32,
    pub min_items: usize,
    pub max_items: usize,
    /// Countdown for delayed item spawns, in rounds
    pub spawn_turns: u32,
    #[serde(default)]
    pub layout: Option<Layout>,
}

impl LevelDef {
    /// A level with no layout, built by the generator
    pub fn procedural(level: u32) -> Self {
        Self {
            level,
            name: format!("Depth {level}"),
            description: String::new(),
            player_start_value: crate::consts::PLAYER_START_VALUE,
            gold_per_level: 10,
            gold_per_bag: 5,
            min_items: 1,
            max_items: crate::consts::ITEM_COUNT,
            spawn_turns: 3,
            layout: None,
        }
    }

    /// Build the starting board
    pub fn build_grid(&self, config: &GameConfig, rng: &mut GameRng) -> Result<Grid, GameError> {
        if let Some(layout) = &self.layout {
            match layout.build_grid(&config.hazards) {
                Ok(grid) => return Ok(grid),
                Err(e) => warn!("level {} '{}': {e}; generating instead", self.level, self.name),
            }
        }
        generate(&config.procedural, &config.hazards, rng)
    }
}
