//! Enemy decision making
//!
//! A stronger enemy hunts the player; a weaker (or equal) one goes for the
//! most valuable item it can reach, heads for the nearest item it cannot,
//! and runs away when there is nothing left to grab.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::consts::ITEM_VALUE_WEIGHT;
use crate::entity::{Combatant, Enemy, EnemyId};
use crate::grid::{Grid, Position};
use crate::path::{Passability, Reachable, reachable_cells, shortest_path};
use crate::rng::GameRng;

/// What an enemy decided to do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Chase,
    SeekItem,
    /// Heading for an item beyond this turn's roll
    ApproachItem,
    Flee,
    Stay,
}

/// A chosen move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyPlan {
    pub enemy: EnemyId,
    pub roll: u32,
    pub intent: Intent,
    pub target: Position,
    /// Cells to enter, in order; at most `roll` long
    pub path: Vec<Position>,
}

/// Pick the first cell (in discovery order) minimizing `key`
fn first_min_by_key(reach: &Reachable, mut key: impl FnMut(Position) -> i64) -> Option<Position> {
    let mut best: Option<(Position, i64)> = None;
    for pos in reach.iter() {
        let k = key(pos);
        if best.is_none_or(|(_, b)| k < b) {
            best = Some((pos, k));
        }
    }
    best.map(|(p, _)| p)
}

/// Decide where `enemy` wants to end up with `roll` steps
///
/// Returns the intent and the target cell, which is always in the
/// reachable set except for [`Intent::ApproachItem`] and [`Intent::Stay`].
pub fn choose_target_cell(grid: &Grid, enemy: &Enemy, player_power: u32, roll: u32) -> (Intent, Position) {
    let reach = reachable_cells(grid, enemy.pos, roll, Passability::Enemy);
    if reach.is_empty() {
        return (Intent::Stay, enemy.pos);
    }
    let player = grid.player_pos();

    if enemy.power() > player_power {
        if reach.contains(player) {
            return (Intent::Chase, player);
        }
        if let Some(best) = first_min_by_key(&reach, |p| p.manhattan(player) as i64) {
            return (Intent::Chase, best);
        }
    }

    let best_item = first_min_by_key(&reach, |p| match grid.item_at(p) {
        Some(item) => -(item.value as i64 * ITEM_VALUE_WEIGHT - enemy.pos.manhattan(p) as i64),
        None => i64::MAX,
    })
    .filter(|&p| grid.item_at(p).is_some());
    if let Some(pos) = best_item {
        return (Intent::SeekItem, pos);
    }

    let nearest = grid
        .items()
        .iter()
        .min_by_key(|item| enemy.pos.manhattan(item.pos))
        .map(|item| item.pos);
    if let Some(pos) = nearest {
        return (Intent::ApproachItem, pos);
    }

    let flee = first_min_by_key(&reach, |p| -(p.manhattan(player) as i64));
    (Intent::Flee, flee.unwrap_or(enemy.pos))
}

fn flee_target(grid: &Grid, enemy: &Enemy, roll: u32) -> Position {
    let reach = reachable_cells(grid, enemy.pos, roll, Passability::Enemy);
    let player = grid.player_pos();
    first_min_by_key(&reach, |p| -(p.manhattan(player) as i64)).unwrap_or(enemy.pos)
}

/// Roll movement for an enemy and plan its path
pub fn plan_move(grid: &Grid, id: EnemyId, player_power: u32, rng: &mut GameRng) -> Option<EnemyPlan> {
    let enemy = grid.enemy(id)?;
    let roll = rng.roll(enemy.speed);
    let (mut intent, mut target) = choose_target_cell(grid, enemy, player_power, roll);

    let mut path = match intent {
        Intent::Stay => Vec::new(),
        Intent::ApproachItem => {
            let budget = (grid.width() * grid.height()) as u32;
            match shortest_path(grid, enemy.pos, target, budget, Passability::Enemy) {
                Ok(full) => full,
                Err(_) => {
                    intent = Intent::Flee;
                    target = flee_target(grid, enemy, roll);
                    shortest_path(grid, enemy.pos, target, roll, Passability::Enemy)
                        .unwrap_or_default()
                }
            }
        }
        _ => shortest_path(grid, enemy.pos, target, roll, Passability::Enemy).unwrap_or_default(),
    };
    path.truncate(roll as usize);

    debug!(
        "enemy #{} rolled {} and chose {:?} toward {}",
        id.0, roll, intent, target
    );
    Some(EnemyPlan {
        enemy: id,
        roll,
        intent,
        target,
        path,
    })
}
