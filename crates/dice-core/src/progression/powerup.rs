//! Power-ups offered between levels

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::entity::{Player, Stat};
use crate::rng::GameRng;

/// What a power-up does to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Heal(u32),
    /// Grows max HP; current HP grows along
    MaxHp(u32),
    RaiseMin(Stat, u32),
    RaiseMax(Stat, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum PowerUp {
    #[strum(serialize = "Minor Heal Potion")]
    MinorHeal,
    #[strum(serialize = "Heal Potion")]
    Heal,
    #[strum(serialize = "Vitality Charm")]
    VitalityCharm,
    #[strum(serialize = "Sharpening Stone")]
    SharpeningStone,
    #[strum(serialize = "Weapon Enhancement")]
    WeaponEnhancement,
    #[strum(serialize = "Agility Elixir")]
    AgilityElixir,
    #[strum(serialize = "Speed Potion")]
    SpeedPotion,
    #[strum(serialize = "Wisdom Scroll")]
    WisdomScroll,
    #[strum(serialize = "Intelligence Tome")]
    IntelligenceTome,
}

impl PowerUp {
    /// Price in resource points
    pub const fn cost(self) -> u32 {
        match self {
            PowerUp::MinorHeal
            | PowerUp::SharpeningStone
            | PowerUp::AgilityElixir
            | PowerUp::WisdomScroll => 2,
            PowerUp::VitalityCharm | PowerUp::WeaponEnhancement => 3,
            PowerUp::Heal | PowerUp::SpeedPotion | PowerUp::IntelligenceTome => 4,
        }
    }

    pub const fn effect(self) -> Effect {
        match self {
            PowerUp::MinorHeal => Effect::Heal(1),
            PowerUp::Heal => Effect::Heal(2),
            PowerUp::VitalityCharm => Effect::MaxHp(1),
            PowerUp::SharpeningStone => Effect::RaiseMin(Stat::Damage, 1),
            PowerUp::WeaponEnhancement => Effect::RaiseMax(Stat::Damage, 1),
            PowerUp::AgilityElixir => Effect::RaiseMin(Stat::Speed, 1),
            PowerUp::SpeedPotion => Effect::RaiseMax(Stat::Speed, 1),
            PowerUp::WisdomScroll => Effect::RaiseMin(Stat::Intelligence, 1),
            PowerUp::IntelligenceTome => Effect::RaiseMax(Stat::Intelligence, 1),
        }
    }

    pub fn description(self) -> String {
        match self.effect() {
            Effect::Heal(n) => format!("Heal +{n} HP"),
            Effect::MaxHp(n) => format!("+{n} Maximum HP"),
            Effect::RaiseMin(stat, n) => format!("+{n} minimum {stat}"),
            Effect::RaiseMax(stat, n) => format!("+{n} maximum {stat}"),
        }
    }

    pub fn apply(self, player: &mut Player) {
        match self.effect() {
            Effect::Heal(n) => {
                player.hp.heal(n);
            }
            Effect::MaxHp(n) => player.hp.grow(n),
            Effect::RaiseMin(stat, n) => {
                if let Some(range) = player.range_mut(stat) {
                    range.raise_min(n);
                }
            }
            Effect::RaiseMax(stat, n) => {
                if let Some(range) = player.range_mut(stat) {
                    range.raise_max(n);
                }
            }
        }
    }

    /// `count` distinct power-ups in random order
    pub fn roll_offers(count: usize, rng: &mut GameRng) -> Vec<PowerUp> {
        let mut all: Vec<PowerUp> = PowerUp::iter().collect();
        rng.shuffle(&mut all);
        all.truncate(count);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::StatRange;

    fn player() -> Player {
        Player::new(4, StatRange::new(1, 2), StatRange::new(1, 2), StatRange::new(1, 2))
    }

    #[test]
    fn test_catalog() {
        assert_eq!(PowerUp::iter().count(), 9);
        assert_eq!(PowerUp::Heal.to_string(), "Heal Potion");
        assert_eq!(PowerUp::SpeedPotion.cost(), 4);
        assert_eq!(PowerUp::SharpeningStone.description(), "+1 minimum dmg");
    }

    #[test]
    fn test_raise_min_drags_max() {
        let mut p = player();
        PowerUp::SharpeningStone.apply(&mut p);
        PowerUp::SharpeningStone.apply(&mut p);
        assert_eq!(p.damage, StatRange::new(3, 3));
    }

    #[test]
    fn test_heal_is_capped() {
        let mut p = player();
        p.hp.take(1);
        PowerUp::Heal.apply(&mut p);
        assert_eq!(p.hp.current, 4);
        PowerUp::VitalityCharm.apply(&mut p);
        assert_eq!((p.hp.current, p.hp.max), (5, 5));
    }

    #[test]
    fn test_offers_are_distinct() {
        let mut rng = GameRng::new(11);
        let offers = PowerUp::roll_offers(3, &mut rng);
        assert_eq!(offers.len(), 3);
        assert_ne!(offers[0], offers[1]);
        assert_ne!(offers[1], offers[2]);
        assert_ne!(offers[0], offers[2]);
        assert_eq!(PowerUp::roll_offers(20, &mut rng).len(), 9);
    }
}
