//! The player token's stats
//!
//! The board position lives in the [`crate::Grid`]; this struct is what
//! carries over from level to level.

use serde::{Deserialize, Serialize};

use super::{Combatant, Hp, Stat, StatRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub hp: Hp,
    pub damage: StatRange,
    pub speed: StatRange,
    /// Resource roll for the upgrade phase
    pub intelligence: StatRange,
}

impl Player {
    pub const fn new(hp: u32, damage: StatRange, speed: StatRange, intelligence: StatRange) -> Self {
        Self {
            hp: Hp::full(hp),
            damage,
            speed,
            intelligence,
        }
    }

    /// Apply a collected item's value to the chosen stat.
    ///
    /// HP heals (capped at max); every other stat gets `+value` on its maximum.
    pub fn apply_item(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Hp => {
                self.hp.heal(value);
            }
            Stat::Damage => self.damage.raise_max(value),
            Stat::Speed => self.speed.raise_max(value),
            Stat::Intelligence => self.intelligence.raise_max(value),
        }
    }

    /// The range a stat-boosting effect targets. HP has no range.
    pub fn range_mut(&mut self, stat: Stat) -> Option<&mut StatRange> {
        match stat {
            Stat::Hp => None,
            Stat::Damage => Some(&mut self.damage),
            Stat::Speed => Some(&mut self.speed),
            Stat::Intelligence => Some(&mut self.intelligence),
        }
    }
}

impl Combatant for Player {
    fn label(&self) -> String {
        "player".to_string()
    }

    fn hp(&self) -> Hp {
        self.hp
    }

    fn hp_mut(&mut self) -> &mut Hp {
        &mut self.hp
    }

    fn damage(&self) -> StatRange {
        self.damage
    }
}
