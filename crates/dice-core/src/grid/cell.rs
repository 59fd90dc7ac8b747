//! Board cell types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::entity::{EnemyId, ItemId};

/// Hazard tag as written in level layouts
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum HazardKind {
    Obstacle,
    Damage,
    Trap,
    Teleport,
}

impl HazardKind {
    /// Parse a layout letter: B(ox), L(ava), S(wamp), C(anon)
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "B" => Some(HazardKind::Obstacle),
            "L" => Some(HazardKind::Damage),
            "S" => Some(HazardKind::Trap),
            "C" => Some(HazardKind::Teleport),
            _ => None,
        }
    }

    /// Layout letter for this tag
    pub const fn letter(self) -> char {
        match self {
            HazardKind::Obstacle => 'B',
            HazardKind::Damage => 'L',
            HazardKind::Trap => 'S',
            HazardKind::Teleport => 'C',
        }
    }
}

/// A triggered tile effect with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// Fixed damage on entry
    Damage { amount: u32 },
    /// Heavier damage on entry, snares the mover; may be skipped by chance
    Trap { amount: u32, skip_percent: u32 },
    /// Relocates whoever enters
    Teleport,
}

impl Hazard {
    pub const fn kind(self) -> HazardKind {
        match self {
            Hazard::Damage { .. } => HazardKind::Damage,
            Hazard::Trap { .. } => HazardKind::Trap,
            Hazard::Teleport => HazardKind::Teleport,
        }
    }
}

/// Static ground of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Floor,
    Obstacle,
    Hazard(Hazard),
}

impl Terrain {
    /// Only obstacles are impassable
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Terrain::Obstacle)
    }

    pub const fn hazard(self) -> Option<Hazard> {
        match self {
            Terrain::Hazard(h) => Some(h),
            _ => None,
        }
    }

    /// Display character for this terrain
    pub const fn symbol(self) -> char {
        match self {
            Terrain::Floor => '.',
            Terrain::Obstacle => '#',
            Terrain::Hazard(Hazard::Damage { .. }) => '~',
            Terrain::Hazard(Hazard::Trap { .. }) => '^',
            Terrain::Hazard(Hazard::Teleport) => '*',
        }
    }
}

/// What stands on a cell. Entering always resolves the previous occupant
/// first, so at most one of these is ever present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    Empty,
    Player,
    Enemy(EnemyId),
    Item(ItemId),
}

/// Gold dropped on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldBag {
    pub amount: u32,
    pub collected: bool,
}

impl GoldBag {
    pub const fn new(amount: u32) -> Self {
        Self {
            amount,
            collected: false,
        }
    }
}

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: Terrain,
    pub occupant: Occupant,
    pub gold: Option<GoldBag>,
}

impl Cell {
    pub const fn floor() -> Self {
        Self {
            terrain: Terrain::Floor,
            occupant: Occupant::Empty,
            gold: None,
        }
    }

    pub const fn is_walkable(&self) -> bool {
        self.terrain.is_walkable()
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self.occupant, Occupant::Empty)
    }

    pub const fn has_player(&self) -> bool {
        matches!(self.occupant, Occupant::Player)
    }

    pub const fn enemy(&self) -> Option<EnemyId> {
        match self.occupant {
            Occupant::Enemy(id) => Some(id),
            _ => None,
        }
    }

    pub const fn item(&self) -> Option<ItemId> {
        match self.occupant {
            Occupant::Item(id) => Some(id),
            _ => None,
        }
    }

    /// Uncollected gold lying here
    pub fn loose_gold(&self) -> Option<u32> {
        self.gold.filter(|g| !g.collected).map(|g| g.amount)
    }
}
