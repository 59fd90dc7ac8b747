//! Breadth-first reachability and shortest paths
//!
//! Moves are 4-directional and explored in [`Direction::ALL`] order, so the
//! first path found to a cell is also the one reported. Enemy-held cells (for
//! the player) and the player's cell (for an enemy) are valid destinations
//! but never transit cells.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::error::GameError;
use crate::grid::{Cell, Direction, Grid, Occupant, Position};

/// Who is moving, which decides what a non-empty cell means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passability {
    /// Enemies are targets (final step only)
    Player,
    /// The player is a target, other enemies block
    Enemy,
}

/// How a single cell behaves during the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    Open,
    Target,
    Blocked,
}

impl Passability {
    fn classify(self, cell: &Cell) -> StepKind {
        if !cell.is_walkable() {
            return StepKind::Blocked;
        }
        match (self, cell.occupant) {
            (Passability::Player, Occupant::Enemy(_)) => StepKind::Target,
            (Passability::Enemy, Occupant::Player) => StepKind::Target,
            (Passability::Enemy, Occupant::Enemy(_)) => StepKind::Blocked,
            _ => StepKind::Open,
        }
    }
}

/// Cells reachable within a step budget
///
/// Iteration follows BFS discovery order; the origin is never included.
#[derive(Debug, Clone, Default)]
pub struct Reachable {
    order: Vec<Position>,
    distance: HashMap<Position, u32>,
}

impl Reachable {
    pub fn contains(&self, pos: Position) -> bool {
        self.distance.contains_key(&pos)
    }

    /// Steps needed to reach `pos`
    pub fn distance(&self, pos: Position) -> Option<u32> {
        self.distance.get(&pos).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// BFS from `origin` up to `max_steps` moves
pub fn reachable_cells(
    grid: &Grid,
    origin: Position,
    max_steps: u32,
    pass: Passability,
) -> Reachable {
    let mut reach = Reachable::default();
    if max_steps == 0 || !grid.in_bounds(origin) {
        return reach;
    }

    let mut queue = VecDeque::new();
    let mut seen: HashMap<Position, u32> = HashMap::new();
    seen.insert(origin, 0);
    queue.push_back(origin);

    while let Some(pos) = queue.pop_front() {
        let dist = seen[&pos];
        if dist >= max_steps {
            continue;
        }
        for dir in Direction::ALL {
            let next = pos.step(dir);
            if seen.contains_key(&next) {
                continue;
            }
            let Some(cell) = grid.cell(next) else {
                continue;
            };
            match pass.classify(cell) {
                StepKind::Blocked => continue,
                StepKind::Target => {
                    seen.insert(next, dist + 1);
                }
                StepKind::Open => {
                    seen.insert(next, dist + 1);
                    queue.push_back(next);
                }
            }
            reach.order.push(next);
            reach.distance.insert(next, dist + 1);
        }
    }

    reach
}

/// Shortest path from `origin` to `dest` of at most `max_steps` moves
///
/// Returns the cells entered in order, ending with `dest`.
pub fn shortest_path(
    grid: &Grid,
    origin: Position,
    dest: Position,
    max_steps: u32,
    pass: Passability,
) -> Result<Vec<Position>, GameError> {
    if origin == dest || max_steps == 0 || !grid.in_bounds(origin) {
        return Err(GameError::NoPathFound(dest));
    }

    let mut queue = VecDeque::new();
    let mut parent: HashMap<Position, Position> = HashMap::new();
    let mut dist: HashMap<Position, u32> = HashMap::new();
    dist.insert(origin, 0);
    queue.push_back(origin);

    while let Some(pos) = queue.pop_front() {
        let d = dist[&pos];
        if d >= max_steps {
            continue;
        }
        for dir in Direction::ALL {
            let next = pos.step(dir);
            if dist.contains_key(&next) {
                continue;
            }
            let Some(cell) = grid.cell(next) else {
                continue;
            };
            let kind = pass.classify(cell);
            if kind == StepKind::Blocked {
                continue;
            }
            dist.insert(next, d + 1);
            parent.insert(next, pos);
            if next == dest {
                return Ok(walk_back(&parent, origin, dest));
            }
            if kind == StepKind::Open {
                queue.push_back(next);
            }
        }
    }

    Err(GameError::NoPathFound(dest))
}

fn walk_back(parent: &HashMap<Position, Position>, origin: Position, dest: Position) -> Vec<Position> {
    let mut path = vec![dest];
    let mut cur = dest;
    while let Some(&prev) = parent.get(&cur) {
        if prev == origin {
            break;
        }
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Enemy;
    use crate::grid::{Spawn, Terrain};

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_zero_budget_is_empty() {
        let grid = Grid::new(5, 5);
        assert!(reachable_cells(&grid, pos(2, 2), 0, Passability::Player).is_empty());
    }

    #[test]
    fn test_origin_excluded_and_distances() {
        let grid = Grid::with_player(5, 5, pos(2, 2));
        let reach = reachable_cells(&grid, pos(2, 2), 1, Passability::Player);
        assert_eq!(reach.len(), 4);
        assert!(!reach.contains(pos(2, 2)));
        // Up, Down, Left, Right
        let order: Vec<_> = reach.iter().collect();
        assert_eq!(order, vec![pos(2, 1), pos(2, 3), pos(1, 2), pos(3, 2)]);

        let reach = reachable_cells(&grid, pos(2, 2), 2, Passability::Player);
        assert_eq!(reach.len(), 12);
        assert_eq!(reach.distance(pos(4, 2)), Some(2));
        assert_eq!(reach.distance(pos(3, 3)), Some(2));
    }

    #[test]
    fn test_obstacles_block() {
        let mut grid = Grid::new(3, 1);
        grid.set_terrain(pos(1, 0), Terrain::Obstacle).unwrap();
        let reach = reachable_cells(&grid, pos(0, 0), 5, Passability::Player);
        assert!(reach.is_empty());
        assert!(shortest_path(&grid, pos(0, 0), pos(2, 0), 5, Passability::Player).is_err());
    }

    #[test]
    fn test_enemy_is_final_step_only() {
        let mut grid = Grid::new(4, 1);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(1, 0)).unwrap();
        let reach = reachable_cells(&grid, pos(0, 0), 3, Passability::Player);
        assert!(reach.contains(pos(1, 0)));
        assert!(!reach.contains(pos(2, 0)));
    }

    #[test]
    fn test_enemy_blocks_other_enemy() {
        let mut grid = Grid::new(4, 1);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(2, 0)).unwrap();
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(3, 0)).unwrap();
        let reach = reachable_cells(&grid, pos(3, 0), 3, Passability::Enemy);
        assert!(reach.is_empty());

        // the player cell is a target for enemies
        let reach = reachable_cells(&grid, pos(2, 0), 3, Passability::Enemy);
        assert_eq!(reach.iter().collect::<Vec<_>>(), vec![pos(1, 0), pos(0, 0)]);
    }

    #[test]
    fn test_shortest_path_detours() {
        let mut grid = Grid::new(3, 3);
        grid.set_terrain(pos(1, 0), Terrain::Obstacle).unwrap();
        grid.set_terrain(pos(1, 1), Terrain::Obstacle).unwrap();
        let path = shortest_path(&grid, pos(0, 0), pos(2, 0), 10, Passability::Player).unwrap();
        assert_eq!(
            path,
            vec![pos(0, 1), pos(0, 2), pos(1, 2), pos(2, 2), pos(2, 1), pos(2, 0)]
        );
        assert!(shortest_path(&grid, pos(0, 0), pos(2, 0), 5, Passability::Player).is_err());
    }

    #[test]
    fn test_shortest_path_to_self_rejected() {
        let grid = Grid::new(3, 3);
        let err = shortest_path(&grid, pos(1, 1), pos(1, 1), 3, Passability::Player).unwrap_err();
        assert_eq!(err, GameError::NoPathFound(pos(1, 1)));
    }
}
