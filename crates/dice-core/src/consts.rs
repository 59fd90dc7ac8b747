//! Core game constants
//!
//! Defaults for the board, the player and the economy. Most of them can be
//! overridden through [`crate::GameConfig`].

/// Default board dimensions
pub const GRID_W: usize = 8;
pub const GRID_H: usize = 10;

/// Procedural level defaults
pub const ENEMY_COUNT: usize = 3;
pub const ITEM_COUNT: usize = 5;

/// Starting player value (HP) for a fresh run
pub const PLAYER_START_VALUE: u32 = 2;

/// Hazard tile damage
pub const DAMAGE_TILE_AMOUNT: u32 = 1;
pub const TRAP_TILE_AMOUNT: u32 = 2;

/// Number of power-ups offered between levels
pub const POWERUP_OFFERS: usize = 3;

/// Weight applied to item value when an enemy scores candidate items
pub const ITEM_VALUE_WEIGHT: i64 = 100;

/// Store keys
pub const KEY_LIFETIME_GOLD: &str = "lifetime_gold";
pub const KEY_UPGRADES: &str = "upgrades";
pub const KEY_RUN_STATS: &str = "run_stats";
