//! Entities on the board: the player, enemies and items

mod enemy;
mod player;
mod stats;

pub use enemy::{Enemy, EnemyId};
pub use player::Player;
pub use stats::{Hp, Stat, StatRange};

use serde::{Deserialize, Serialize};

use crate::grid::Position;

/// Unique identifier for items on a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// A value pickup. Consumed on contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub pos: Position,
    pub value: u32,
}

/// Anything that fights and can be hurt by tiles
pub trait Combatant {
    /// Short name for logs and events
    fn label(&self) -> String;

    fn hp(&self) -> Hp;

    fn hp_mut(&mut self) -> &mut Hp;

    fn damage(&self) -> StatRange;

    /// Scalar strength used by the AI and the level checks
    fn power(&self) -> u32 {
        self.hp().current
    }

    fn is_alive(&self) -> bool {
        !self.hp().is_zero()
    }
}
