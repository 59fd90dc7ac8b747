//! Tile effects triggered on entry

use log::debug;
use serde::{Deserialize, Serialize};

use crate::consts::{DAMAGE_TILE_AMOUNT, TRAP_TILE_AMOUNT};
use crate::entity::Combatant;
use crate::grid::{Grid, Hazard, HazardKind, Occupant, Position, Terrain};
use crate::rng::GameRng;

/// Tunable hazard strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardTable {
    pub damage: u32,
    pub trap: u32,
    /// Chance in percent that a trap does nothing
    pub trap_skip_percent: u32,
}

impl Default for HazardTable {
    fn default() -> Self {
        Self {
            damage: DAMAGE_TILE_AMOUNT,
            trap: TRAP_TILE_AMOUNT,
            trap_skip_percent: 0,
        }
    }
}

impl HazardTable {
    /// Build the terrain for a layout tag using these strengths
    pub fn terrain(&self, kind: HazardKind) -> Terrain {
        match kind {
            HazardKind::Obstacle => Terrain::Obstacle,
            HazardKind::Damage => Terrain::Hazard(Hazard::Damage {
                amount: self.damage,
            }),
            HazardKind::Trap => Terrain::Hazard(Hazard::Trap {
                amount: self.trap,
                skip_percent: self.trap_skip_percent,
            }),
            HazardKind::Teleport => Terrain::Hazard(Hazard::Teleport),
        }
    }
}

/// What a tile did to whoever stepped on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardOutcome {
    /// Plain ground
    Nothing,
    /// Damage tile; movement continues
    Damaged { amount: u32, fatal: bool },
    /// Trap fired; movement stops
    Snared { amount: u32, fatal: bool },
    /// Trap rolled its skip chance
    TrapSkipped,
    /// Movement stops and a destination must be chosen
    Teleport,
}

impl HazardOutcome {
    /// Whether the rest of the path is abandoned
    pub const fn halts_movement(self) -> bool {
        matches!(
            self,
            HazardOutcome::Snared { .. }
                | HazardOutcome::Teleport
                | HazardOutcome::Damaged { fatal: true, .. }
        )
    }

    pub const fn is_fatal(self) -> bool {
        matches!(
            self,
            HazardOutcome::Damaged { fatal: true, .. } | HazardOutcome::Snared { fatal: true, .. }
        )
    }
}

fn hurt<C: Combatant>(target: &mut C, amount: u32) -> bool {
    let fatal = target.hp().current <= amount;
    target.hp_mut().take(amount);
    fatal
}

/// Apply the effect of `terrain` to a combatant entering it
///
/// Teleport only reports; relocation is up to the caller since the
/// destination depends on who moved.
pub fn apply_hazard<C: Combatant>(terrain: Terrain, target: &mut C, rng: &mut GameRng) -> HazardOutcome {
    let outcome = match terrain {
        Terrain::Floor | Terrain::Obstacle => HazardOutcome::Nothing,
        Terrain::Hazard(Hazard::Damage { amount }) => HazardOutcome::Damaged {
            amount,
            fatal: hurt(target, amount),
        },
        Terrain::Hazard(Hazard::Trap {
            amount,
            skip_percent,
        }) => {
            if skip_percent > 0 && rng.percent(skip_percent) {
                HazardOutcome::TrapSkipped
            } else {
                HazardOutcome::Snared {
                    amount,
                    fatal: hurt(target, amount),
                }
            }
        }
        Terrain::Hazard(Hazard::Teleport) => HazardOutcome::Teleport,
    };
    if outcome != HazardOutcome::Nothing {
        debug!("{} triggered {:?}", target.label(), outcome);
    }
    outcome
}

/// Cells the player may pick after entering a teleporter
pub fn player_teleport_targets(grid: &Grid) -> Vec<Position> {
    let here = grid.player_pos();
    grid.positions()
        .filter(|&p| p != here && grid.is_walkable(p))
        .collect()
}

/// Cells an enemy at `from` may be thrown to
pub fn enemy_teleport_targets(grid: &Grid, from: Position) -> Vec<Position> {
    grid.positions()
        .filter(|&p| {
            p != from
                && grid
                    .cell(p)
                    .is_some_and(|c| c.is_walkable() && !matches!(c.occupant, Occupant::Enemy(_)))
        })
        .collect()
}
