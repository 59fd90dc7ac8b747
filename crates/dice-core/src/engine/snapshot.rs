//! Read-only board view for renderers

use bitflags::bitflags;

use super::{PendingSpawn, TurnPhase};
use crate::entity::{Enemy, Item, Player};
use crate::grid::{Cell, Grid, Position};
use crate::path::Reachable;

bitflags! {
    /// Overlay marks for a cell
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct CellMarks: u8 {
        const NONE = 0x00;
        /// The player can move here with the steps left
        const REACHABLE = 0x01;
        /// An item will appear here
        const PENDING_SPAWN = 0x02;
        /// Uncollected gold lies here
        const GOLD = 0x04;
        /// Valid teleport destination
        const TELEPORT_TARGET = 0x08;
    }
}

/// One cell as drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub cell: Cell,
    pub marks: CellMarks,
    /// Rounds until the pending spawn here appears
    pub countdown: Option<u32>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major
    pub cells: Vec<CellView>,
    pub player: Player,
    pub player_pos: Position,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub phase: TurnPhase,
    pub last_roll: Option<u32>,
    pub round: u32,
    pub level: u32,
    pub level_name: String,
    pub run_gold: u32,
    pub pending_spawns: Vec<PendingSpawn>,
}

impl BoardSnapshot {
    pub(super) fn capture(
        grid: &Grid,
        reachable: &Reachable,
        teleport_targets: &[Position],
        pending: &[PendingSpawn],
    ) -> Vec<CellView> {
        grid.positions()
            .filter_map(|pos| {
                let cell = *grid.cell(pos)?;
                let mut marks = CellMarks::NONE;
                if reachable.contains(pos) {
                    marks |= CellMarks::REACHABLE;
                }
                if teleport_targets.contains(&pos) {
                    marks |= CellMarks::TELEPORT_TARGET;
                }
                if cell.loose_gold().is_some() {
                    marks |= CellMarks::GOLD;
                }
                let countdown = pending
                    .iter()
                    .find(|s| s.pos == pos)
                    .map(|s| s.turns_left);
                if countdown.is_some() {
                    marks |= CellMarks::PENDING_SPAWN;
                }
                Some(CellView {
                    cell,
                    marks,
                    countdown,
                })
            })
            .collect()
    }

    /// Cell view at position
    pub fn at(&self, pos: Position) -> Option<&CellView> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        self.cells.get(pos.y as usize * self.width + pos.x as usize)
    }
}
