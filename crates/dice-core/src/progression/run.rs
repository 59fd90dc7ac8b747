//! State of one run across levels

use serde::{Deserialize, Serialize};

use crate::engine::PendingSpawn;
use crate::entity::Player;
use crate::rng::GameRng;

/// Counters for the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub enemies_defeated: u32,
    pub levels_cleared: u32,
    /// Gold earned this run, before any spending
    pub gold_earned: u32,
}

/// Everything that carries from one level to the next
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub player: Player,
    /// Gold earned this run; banked into lifetime gold when the run ends
    pub gold: u32,
    /// Index into the campaign's level list
    pub level_index: usize,
    /// Delayed item spawns on the current level
    pub pending_spawns: Vec<PendingSpawn>,
    pub rng: GameRng,
    pub stats: RunStats,
}

impl RunState {
    pub fn new(player: Player, rng: GameRng) -> Self {
        Self {
            player,
            gold: 0,
            level_index: 0,
            pending_spawns: Vec::new(),
            rng,
            stats: RunStats::default(),
        }
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
        self.stats.gold_earned = self.stats.gold_earned.saturating_add(amount);
    }
}
