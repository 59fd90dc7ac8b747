//! Enemy tokens

use serde::{Deserialize, Serialize};

use super::{Combatant, Hp, StatRange};
use crate::grid::Position;

/// Unique identifier for enemy instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// An enemy on the board
///
/// Everything derives from `base_value`: HP, and both the damage and
/// movement dice as `1..=base_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: Position,
    pub base_value: u32,
    pub hp: Hp,
    pub damage: StatRange,
    pub speed: StatRange,
}

impl Enemy {
    /// A fresh enemy of power `value`; id and position are assigned on placement
    pub const fn new(value: u32) -> Self {
        Self {
            id: EnemyId(0),
            pos: Position::new(0, 0),
            base_value: value,
            hp: Hp::full(value),
            damage: StatRange::up_to(value),
            speed: StatRange::up_to(value),
        }
    }

    /// Swallow an item: every stat grows by its value
    pub fn absorb(&mut self, value: u32) {
        self.base_value = self.base_value.saturating_add(value);
        self.hp.grow(value);
        self.damage.raise_max(value);
        self.speed.raise_max(value);
    }
}

impl Combatant for Enemy {
    fn label(&self) -> String {
        format!("enemy #{}", self.id.0)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enemy_ranges() {
        let e = Enemy::new(4);
        assert_eq!(e.hp, Hp::full(4));
        assert_eq!(e.damage, StatRange::new(1, 4));
        assert_eq!(e.speed, StatRange::new(1, 4));
        assert_eq!(e.power(), 4);
    }

    #[test]
    fn test_absorb_grows_everything() {
        let mut e = Enemy::new(2);
        e.hp.take(1);
        e.absorb(3);
        assert_eq!(e.base_value, 5);
        assert_eq!(e.hp, Hp { current: 4, max: 5 });
        assert_eq!(e.damage.max, 5);
        assert_eq!(e.speed.max, 5);
    }
}
