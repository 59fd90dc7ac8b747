//! Delayed item spawns
//!
//! When a level runs low on items, a spawn is scheduled on a random free cell
//! and shows up after a countdown of rounds.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::entity::StatRange;
use crate::grid::{Grid, Position, Spawn};
use crate::level::LevelDef;
use crate::rng::GameRng;

/// An item that will appear after `turns_left` more rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSpawn {
    pub pos: Position,
    pub turns_left: u32,
}

/// What the end-of-round tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTick {
    Scheduled { pos: Position, turns: u32 },
    Spawned { pos: Position, value: u32 },
    /// Nowhere to put the item
    Dropped,
}

fn is_free(grid: &Grid, pos: Position) -> bool {
    grid.cell(pos)
        .is_some_and(|c| c.is_walkable() && c.is_empty())
}

/// Advance every countdown and schedule a new spawn if items run short
pub fn tick_spawns(
    grid: &mut Grid,
    pending: &mut Vec<PendingSpawn>,
    def: &LevelDef,
    item_value: StatRange,
    rng: &mut GameRng,
) -> Vec<SpawnTick> {
    let mut ticks = Vec::new();

    for spawn in pending.iter_mut() {
        spawn.turns_left = spawn.turns_left.saturating_sub(1);
    }
    let (due, waiting): (Vec<_>, Vec<_>) = pending.drain(..).partition(|s| s.turns_left == 0);
    *pending = waiting;

    for spawn in due {
        let pos = if is_free(grid, spawn.pos) {
            Some(spawn.pos)
        } else {
            rng.choose(&grid.empty_floor_cells()).copied()
        };
        let value = rng.roll(item_value);
        match pos {
            Some(pos) if grid.place_entity(Spawn::Item(value), pos).is_ok() => {
                debug!("spawned item {value} at {pos}");
                ticks.push(SpawnTick::Spawned { pos, value });
            }
            _ => ticks.push(SpawnTick::Dropped),
        }
    }

    let outstanding = grid.items().len() + pending.len();
    if outstanding < def.min_items && outstanding < def.max_items {
        let candidates: Vec<Position> = grid
            .empty_floor_cells()
            .into_iter()
            .filter(|p| pending.iter().all(|s| s.pos != *p))
            .collect();
        if let Some(&pos) = rng.choose(&candidates) {
            let turns = def.spawn_turns.max(1);
            pending.push(PendingSpawn {
                pos,
                turns_left: turns,
            });
            ticks.push(SpawnTick::Scheduled { pos, turns });
        }
    }

    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(min_items: usize, turns: u32) -> LevelDef {
        LevelDef {
            min_items,
            max_items: min_items + 1,
            spawn_turns: turns,
            ..LevelDef::procedural(1)
        }
    }

    #[test]
    fn test_schedule_and_spawn() {
        let mut grid = Grid::new(3, 3);
        let mut pending = Vec::new();
        let mut rng = GameRng::new(8);
        let level = def(1, 2);
        let value = StatRange::new(1, 2);

        let ticks = tick_spawns(&mut grid, &mut pending, &level, value, &mut rng);
        assert_eq!(pending.len(), 1);
        assert!(matches!(ticks[0], SpawnTick::Scheduled { turns: 2, .. }));

        let ticks = tick_spawns(&mut grid, &mut pending, &level, value, &mut rng);
        assert!(ticks.is_empty());
        assert_eq!(pending[0].turns_left, 1);

        let ticks = tick_spawns(&mut grid, &mut pending, &level, value, &mut rng);
        assert!(matches!(ticks[0], SpawnTick::Spawned { .. }));
        assert!(pending.is_empty());
        assert_eq!(grid.items().len(), 1);
        assert!((1..=2).contains(&grid.items()[0].value));
    }

    #[test]
    fn test_enough_items_means_no_spawn() {
        let mut grid = Grid::new(3, 3);
        grid.place_entity(Spawn::Item(1), Position::new(1, 1)).unwrap();
        let mut pending = Vec::new();
        let mut rng = GameRng::new(8);
        let ticks = tick_spawns(&mut grid, &mut pending, &def(1, 3), StatRange::new(1, 1), &mut rng);
        assert!(ticks.is_empty());
        assert!(pending.is_empty());
    }

    #[test]
    fn test_blocked_spawn_moves_or_drops() {
        let mut grid = Grid::new(2, 1);
        let mut pending = vec![PendingSpawn {
            pos: Position::new(0, 0),
            turns_left: 1,
        }];
        let mut rng = GameRng::new(1);
        let ticks = tick_spawns(&mut grid, &mut pending, &def(0, 3), StatRange::new(1, 1), &mut rng);
        assert_eq!(
            ticks,
            vec![SpawnTick::Spawned {
                pos: Position::new(1, 0),
                value: 1
            }]
        );

        let mut pending = vec![PendingSpawn {
            pos: Position::new(0, 0),
            turns_left: 1,
        }];
        let ticks = tick_spawns(&mut grid, &mut pending, &def(0, 3), StatRange::new(1, 1), &mut rng);
        assert_eq!(ticks, vec![SpawnTick::Dropped]);
    }
}
