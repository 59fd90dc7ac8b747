//! Meta progression: what survives between runs
//!
//! Lifetime gold buys permanent upgrades whose price climbs with every
//! purchase. Each part is stored under its own key so a corrupt entry only
//! resets that part.

use hashbrown::HashMap;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::RunState;
use crate::consts::{KEY_LIFETIME_GOLD, KEY_RUN_STATS, KEY_UPGRADES};
use crate::entity::Player;
use crate::error::GameError;
use crate::store::{KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum MetaUpgrade {
    Vitality,
    Strength,
    Agility,
    Wisdom,
}

impl MetaUpgrade {
    pub const fn base_cost(self) -> u32 {
        match self {
            MetaUpgrade::Vitality => 50,
            MetaUpgrade::Wisdom => 40,
            MetaUpgrade::Strength | MetaUpgrade::Agility => 30,
        }
    }

    /// Price multiplier applied after each purchase, in percent
    pub const fn scale_percent(self) -> u32 {
        match self {
            MetaUpgrade::Vitality => 140,
            MetaUpgrade::Strength => 135,
            MetaUpgrade::Agility | MetaUpgrade::Wisdom => 130,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            MetaUpgrade::Vitality => "+1 max HP",
            MetaUpgrade::Strength => "+1 max damage",
            MetaUpgrade::Agility => "+1 max speed",
            MetaUpgrade::Wisdom => "+1 max intelligence",
        }
    }

    /// Apply one level of this upgrade
    pub fn apply(self, player: &mut Player) {
        match self {
            MetaUpgrade::Vitality => player.hp.grow(1),
            MetaUpgrade::Strength => player.damage.raise_max(1),
            MetaUpgrade::Agility => player.speed.raise_max(1),
            MetaUpgrade::Wisdom => player.intelligence.raise_max(1),
        }
    }

    fn next_cost(self, cost: u32) -> u32 {
        let scaled = u64::from(cost) * u64::from(self.scale_percent()) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// Purchased level and current price of one upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevel {
    pub level: u32,
    pub cost: u32,
}

impl UpgradeLevel {
    fn fresh(upgrade: MetaUpgrade) -> Self {
        Self {
            level: 0,
            cost: upgrade.base_cost(),
        }
    }
}

/// Totals over every run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub runs_started: u32,
    pub runs_won: u32,
    pub best_level: u32,
    pub total_gold: u32,
    pub enemies_defeated: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetaProgress {
    pub lifetime_gold: u32,
    upgrades: HashMap<MetaUpgrade, UpgradeLevel>,
    pub stats: LifetimeStats,
}

impl MetaProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upgrade(&self, upgrade: MetaUpgrade) -> UpgradeLevel {
        self.upgrades
            .get(&upgrade)
            .copied()
            .unwrap_or_else(|| UpgradeLevel::fresh(upgrade))
    }

    pub fn level(&self, upgrade: MetaUpgrade) -> u32 {
        self.upgrade(upgrade).level
    }

    pub fn cost(&self, upgrade: MetaUpgrade) -> u32 {
        self.upgrade(upgrade).cost
    }

    /// Spend lifetime gold on one level of `upgrade`; returns the new level
    pub fn buy(&mut self, upgrade: MetaUpgrade) -> Result<u32, GameError> {
        let mut entry = self.upgrade(upgrade);
        if entry.cost > self.lifetime_gold {
            return Err(GameError::PurchaseRejected(format!(
                "{upgrade} costs {} gold, you have {}",
                entry.cost, self.lifetime_gold
            )));
        }
        self.lifetime_gold -= entry.cost;
        entry.level += 1;
        entry.cost = upgrade.next_cost(entry.cost);
        self.upgrades.insert(upgrade, entry);
        info!("bought {upgrade} level {}, next costs {}", entry.level, entry.cost);
        Ok(entry.level)
    }

    /// Apply every purchased upgrade to a fresh player
    pub fn apply_to(&self, player: &mut Player) {
        for upgrade in MetaUpgrade::iter() {
            for _ in 0..self.level(upgrade) {
                upgrade.apply(player);
            }
        }
    }

    /// Fold a finished run into lifetime totals and bank its gold
    pub fn bank_run(&mut self, run: &RunState, reached_level: u32, won: bool) {
        self.lifetime_gold = self.lifetime_gold.saturating_add(run.gold);
        self.stats.total_gold = self.stats.total_gold.saturating_add(run.stats.gold_earned);
        self.stats.enemies_defeated = self
            .stats
            .enemies_defeated
            .saturating_add(run.stats.enemies_defeated);
        self.stats.best_level = self.stats.best_level.max(reached_level);
        if won {
            self.stats.runs_won += 1;
        }
        info!(
            "run banked: +{} gold ({} lifetime), reached level {reached_level}",
            run.gold, self.lifetime_gold
        );
    }

    /// Load from the store; a missing or corrupt key falls back to its default
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let lifetime_gold = load_key(store, KEY_LIFETIME_GOLD);
        let upgrades: HashMap<MetaUpgrade, UpgradeLevel> = load_key(store, KEY_UPGRADES);
        let stats = load_key(store, KEY_RUN_STATS);
        Self {
            lifetime_gold,
            upgrades,
            stats,
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.save(KEY_LIFETIME_GOLD, to_value(KEY_LIFETIME_GOLD, &self.lifetime_gold)?)?;
        store.save(KEY_UPGRADES, to_value(KEY_UPGRADES, &self.upgrades)?)?;
        store.save(KEY_RUN_STATS, to_value(KEY_RUN_STATS, &self.stats)?)?;
        Ok(())
    }
}

fn to_value<T: Serialize>(key: &str, value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|_| StoreError::Malformed(key.to_string()))
}

fn read_key<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, GameError> {
    let corrupt = |reason: String| GameError::CorruptSaveData {
        key: key.to_string(),
        reason,
    };
    match store.load(key).map_err(|e| corrupt(e.to_string()))? {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| corrupt(e.to_string())),
    }
}

fn load_key<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match read_key(store, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            warn!("{e}; using defaults");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::StatRange;
    use crate::rng::GameRng;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_cost_scaling() {
        let mut meta = MetaProgress {
            lifetime_gold: 1000,
            ..MetaProgress::default()
        };
        assert_eq!(meta.cost(MetaUpgrade::Vitality), 50);
        meta.buy(MetaUpgrade::Vitality).unwrap();
        assert_eq!(meta.cost(MetaUpgrade::Vitality), 70);
        meta.buy(MetaUpgrade::Vitality).unwrap();
        assert_eq!(meta.cost(MetaUpgrade::Vitality), 98);
        assert_eq!(meta.lifetime_gold, 880);

        meta.buy(MetaUpgrade::Strength).unwrap();
        assert_eq!(meta.cost(MetaUpgrade::Strength), 40);
        meta.buy(MetaUpgrade::Agility).unwrap();
        assert_eq!(meta.cost(MetaUpgrade::Agility), 39);
    }

    #[test]
    fn test_buy_rejected_without_gold() {
        let mut meta = MetaProgress {
            lifetime_gold: 29,
            ..MetaProgress::default()
        };
        assert!(matches!(
            meta.buy(MetaUpgrade::Strength),
            Err(GameError::PurchaseRejected(_))
        ));
        assert_eq!(meta.level(MetaUpgrade::Strength), 0);
        assert_eq!(meta.lifetime_gold, 29);
    }

    #[test]
    fn test_apply_to_player() {
        let mut meta = MetaProgress {
            lifetime_gold: 200,
            ..MetaProgress::default()
        };
        meta.buy(MetaUpgrade::Vitality).unwrap();
        meta.buy(MetaUpgrade::Wisdom).unwrap();
        let mut player = Player::new(2, StatRange::new(1, 2), StatRange::new(1, 2), StatRange::new(1, 2));
        meta.apply_to(&mut player);
        assert_eq!((player.hp.current, player.hp.max), (3, 3));
        assert_eq!(player.intelligence, StatRange::new(1, 3));
        assert_eq!(player.damage, StatRange::new(1, 2));
    }

    #[test]
    fn test_store_round_trip() {
        let mut meta = MetaProgress {
            lifetime_gold: 100,
            ..MetaProgress::default()
        };
        meta.buy(MetaUpgrade::Agility).unwrap();
        meta.stats.runs_started = 3;
        let mut store = MemoryStore::new();
        meta.save(&mut store).unwrap();
        assert_eq!(MetaProgress::load(&store), meta);
    }

    #[test]
    fn test_corrupt_key_resets_only_that_part() {
        let mut store = MemoryStore::new();
        store.save(KEY_LIFETIME_GOLD, json!(75)).unwrap();
        store.save(KEY_UPGRADES, json!("not a table")).unwrap();
        let meta = MetaProgress::load(&store);
        assert_eq!(meta.lifetime_gold, 75);
        assert_eq!(meta.level(MetaUpgrade::Vitality), 0);
        assert_eq!(meta.cost(MetaUpgrade::Vitality), 50);
    }

    #[test]
    fn test_bank_run() {
        let mut meta = MetaProgress::new();
        let player = Player::new(2, StatRange::new(1, 2), StatRange::new(1, 2), StatRange::new(1, 2));
        let mut run = RunState::new(player, GameRng::new(1));
        run.add_gold(40);
        run.stats.enemies_defeated = 4;
        meta.bank_run(&run, 3, false);
        assert_eq!(meta.lifetime_gold, 40);
        assert_eq!(meta.stats.best_level, 3);
        assert_eq!(meta.stats.enemies_defeated, 4);
        assert_eq!(meta.stats.runs_won, 0);
    }
}
