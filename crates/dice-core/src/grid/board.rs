//! The board: cell matrix plus the entity lists indexed by it

use serde::{Deserialize, Serialize};

use super::{Cell, GoldBag, Occupant, Position, Terrain};
use crate::entity::{Enemy, EnemyId, Item, ItemId};
use crate::error::GameError;

/// Something that can be put on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    /// Relocate the player token
    Player,
    /// Place an enemy; its id and position are assigned here
    Enemy(Enemy),
    /// Place an item of this value
    Item(u32),
}

/// Handle to an entity on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Player,
    Enemy(EnemyId),
    Item(ItemId),
}

/// Complete board state for one level
///
/// The cell occupants and the `enemies`/`items` lists are only ever mutated
/// together, so an id found in a cell always resolves to a live entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major cells
    cells: Vec<Cell>,
    player: Position,
    /// Enemies in spawn order
    enemies: Vec<Enemy>,
    /// Items in spawn order
    items: Vec<Item>,
    next_enemy_id: u32,
    next_item_id: u32,
}

impl Grid {
    /// Create an empty floor grid with the player in the top-left corner
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_player(width, height, Position::new(0, 0))
    }

    /// Create an empty floor grid with the player at `start`
    ///
    /// `start` is clamped onto the board.
    pub fn with_player(width: usize, height: usize, start: Position) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let player = Position::new(
            start.x.clamp(0, width as i32 - 1),
            start.y.clamp(0, height as i32 - 1),
        );
        let mut grid = Self {
            width,
            height,
            cells: vec![Cell::floor(); width * height],
            player,
            enemies: Vec::new(),
            items: Vec::new(),
            next_enemy_id: 1,
            next_item_id: 1,
        };
        if let Some(idx) = grid.index(player) {
            grid.cells[idx].occupant = Occupant::Player;
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    /// Check if position is on the board
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Check if position is on the board and not an obstacle
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(Cell::is_walkable)
    }

    /// Get cell at position
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index(pos).map(move |idx| &mut self.cells[idx])
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }

    pub fn player_pos(&self) -> Position {
        self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Get enemy by ID
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Get mutable enemy by ID
    ///
    /// Stats only: positions change through [`Grid::move_enemy`].
    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Get enemy at position
    pub fn enemy_at(&self, pos: Position) -> Option<&Enemy> {
        let id = self.cell(pos)?.enemy()?;
        self.enemy(id)
    }

    /// Get item by ID
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Get item at position
    pub fn item_at(&self, pos: Position) -> Option<&Item> {
        let id = self.cell(pos)?.item()?;
        self.item(id)
    }

    /// Sum of the values of all items on the board
    pub fn total_item_value(&self) -> u32 {
        self.items.iter().map(|i| i.value).fold(0, u32::saturating_add)
    }

    fn check_free(&self, what: &'static str, pos: Position) -> Result<(), GameError> {
        let cell = self.cell(pos).ok_or(GameError::InvalidPlacement {
            what,
            pos,
            reason: "out of bounds",
        })?;
        if !cell.is_walkable() {
            return Err(GameError::InvalidPlacement {
                what,
                pos,
                reason: "obstacle",
            });
        }
        if !cell.is_empty() {
            return Err(GameError::InvalidPlacement {
                what,
                pos,
                reason: "occupied",
            });
        }
        Ok(())
    }

    /// Put an entity on an empty, walkable cell
    pub fn place_entity(&mut self, spawn: Spawn, pos: Position) -> Result<EntityRef, GameError> {
        match spawn {
            Spawn::Player => {
                self.move_player(pos)?;
                Ok(EntityRef::Player)
            }
            Spawn::Enemy(mut enemy) => {
                self.check_free("enemy", pos)?;
                let id = EnemyId(self.next_enemy_id);
                self.next_enemy_id += 1;
                enemy.id = id;
                enemy.pos = pos;
                self.enemies.push(enemy);
                if let Some(cell) = self.cell_mut(pos) {
                    cell.occupant = Occupant::Enemy(id);
                }
                Ok(EntityRef::Enemy(id))
            }
            Spawn::Item(value) => {
                self.check_free("item", pos)?;
                let id = ItemId(self.next_item_id);
                self.next_item_id += 1;
                self.items.push(Item { id, pos, value });
                if let Some(cell) = self.cell_mut(pos) {
                    cell.occupant = Occupant::Item(id);
                }
                Ok(EntityRef::Item(id))
            }
        }
    }

    /// Remove an entity. The player cannot be removed; returns false then.
    pub fn remove_entity(&mut self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::Player => false,
            EntityRef::Enemy(id) => self.remove_enemy(id).is_some(),
            EntityRef::Item(id) => self.remove_item(id).is_some(),
        }
    }

    /// Remove an enemy from the board
    pub fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        let enemy = self.enemies.remove(idx);
        if let Some(cell) = self.cell_mut(enemy.pos) {
            cell.occupant = Occupant::Empty;
        }
        Some(enemy)
    }

    /// Remove an item from the board
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        let item = self.items.remove(idx);
        if let Some(cell) = self.cell_mut(item.pos) {
            cell.occupant = Occupant::Empty;
        }
        Some(item)
    }

    /// Move the player onto an empty, walkable cell
    pub fn move_player(&mut self, to: Position) -> Result<(), GameError> {
        if to == self.player {
            return Ok(());
        }
        self.check_free("player", to)?;
        let from = self.player;
        if let Some(cell) = self.cell_mut(from) {
            cell.occupant = Occupant::Empty;
        }
        if let Some(cell) = self.cell_mut(to) {
            cell.occupant = Occupant::Player;
        }
        self.player = to;
        Ok(())
    }

    /// Move an enemy onto an empty, walkable cell
    pub fn move_enemy(&mut self, id: EnemyId, to: Position) -> Result<(), GameError> {
        let from = self
            .enemy(id)
            .map(|e| e.pos)
            .ok_or(GameError::InvalidPlacement {
                what: "enemy",
                pos: to,
                reason: "no such enemy",
            })?;
        if from == to {
            return Ok(());
        }
        self.check_free("enemy", to)?;
        if let Some(cell) = self.cell_mut(from) {
            cell.occupant = Occupant::Empty;
        }
        if let Some(cell) = self.cell_mut(to) {
            cell.occupant = Occupant::Enemy(id);
        }
        if let Some(enemy) = self.enemy_mut(id) {
            enemy.pos = to;
        }
        Ok(())
    }

    /// Set the ground of a cell. Obstacles cannot go under an entity.
    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> Result<(), GameError> {
        let cell = self.cell_mut(pos).ok_or(GameError::InvalidPlacement {
            what: "terrain",
            pos,
            reason: "out of bounds",
        })?;
        if !terrain.is_walkable() && !cell.is_empty() {
            return Err(GameError::InvalidPlacement {
                what: "obstacle",
                pos,
                reason: "occupied",
            });
        }
        cell.terrain = terrain;
        Ok(())
    }

    /// Drop gold on a cell, merging with any bag already lying there
    pub fn drop_gold(&mut self, pos: Position, amount: u32) {
        if amount == 0 {
            return;
        }
        if let Some(cell) = self.cell_mut(pos) {
            let already = cell.loose_gold().unwrap_or(0);
            cell.gold = Some(GoldBag::new(already.saturating_add(amount)));
        }
    }

    /// Collect the gold on a cell, marking the bag collected
    pub fn take_gold(&mut self, pos: Position) -> Option<u32> {
        let cell = self.cell_mut(pos)?;
        let amount = cell.loose_gold()?;
        cell.gold = Some(GoldBag {
            amount,
            collected: true,
        });
        Some(amount)
    }

    /// Take every uncollected bag on the board
    pub fn sweep_gold(&mut self) -> u32 {
        let positions: Vec<Position> = self.positions().collect();
        positions
            .into_iter()
            .filter_map(|p| self.take_gold(p))
            .fold(0, u32::saturating_add)
    }

    /// Plain floor cells with nothing on them, in row-major order
    pub fn empty_floor_cells(&self) -> Vec<Position> {
        self.positions()
            .filter(|&p| {
                self.cell(p).is_some_and(|c| {
                    c.terrain == Terrain::Floor && c.is_empty() && c.loose_gold().is_none()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Hazard;

    #[test]
    fn test_new_grid() {
        let grid = Grid::new(8, 10);
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 10);
        assert_eq!(grid.player_pos(), Position::new(0, 0));
        assert!(grid.cell(Position::new(0, 0)).unwrap().has_player());
        assert!(grid.in_bounds(Position::new(7, 9)));
        assert!(!grid.in_bounds(Position::new(8, 0)));
        assert!(!grid.in_bounds(Position::new(0, -1)));
    }

    #[test]
    fn test_place_and_remove_enemy() {
        let mut grid = Grid::new(4, 4);
        let pos = Position::new(2, 1);
        let entity = grid.place_entity(Spawn::Enemy(Enemy::new(3)), pos).unwrap();
        let EntityRef::Enemy(id) = entity else {
            panic!("expected enemy ref");
        };
        assert_eq!(grid.enemy_at(pos).map(|e| e.id), Some(id));
        assert_eq!(grid.enemy(id).unwrap().pos, pos);

        assert!(grid.remove_entity(entity));
        assert!(grid.enemy_at(pos).is_none());
        assert!(grid.cell(pos).unwrap().is_empty());
        assert!(!grid.remove_entity(entity));
    }

    #[test]
    fn test_invalid_placement() {
        let mut grid = Grid::new(4, 4);
        grid.set_terrain(Position::new(1, 1), Terrain::Obstacle).unwrap();

        let err = grid
            .place_entity(Spawn::Item(2), Position::new(1, 1))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidPlacement { reason: "obstacle", .. }));

        let err = grid
            .place_entity(Spawn::Item(2), Position::new(9, 9))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidPlacement { reason: "out of bounds", .. }));

        let err = grid
            .place_entity(Spawn::Enemy(Enemy::new(1)), Position::new(0, 0))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidPlacement { reason: "occupied", .. }));
    }

    #[test]
    fn test_obstacle_under_entity_rejected() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.set_terrain(Position::new(0, 0), Terrain::Obstacle).is_err());
        assert!(
            grid.set_terrain(Position::new(0, 0), Terrain::Hazard(Hazard::Teleport))
                .is_ok()
        );
    }

    #[test]
    fn test_move_enemy_keeps_index_in_lockstep() {
        let mut grid = Grid::new(4, 4);
        let EntityRef::Enemy(id) = grid
            .place_entity(Spawn::Enemy(Enemy::new(2)), Position::new(3, 3))
            .unwrap()
        else {
            panic!("expected enemy ref");
        };
        grid.move_enemy(id, Position::new(3, 2)).unwrap();
        assert!(grid.cell(Position::new(3, 3)).unwrap().is_empty());
        assert_eq!(grid.cell(Position::new(3, 2)).unwrap().enemy(), Some(id));
        assert_eq!(grid.enemy(id).unwrap().pos, Position::new(3, 2));
    }

    #[test]
    fn test_gold_bags() {
        let mut grid = Grid::new(3, 3);
        let pos = Position::new(1, 1);
        grid.drop_gold(pos, 5);
        grid.drop_gold(pos, 2);
        assert_eq!(grid.cell(pos).unwrap().loose_gold(), Some(7));
        assert_eq!(grid.take_gold(pos), Some(7));
        assert_eq!(grid.take_gold(pos), None);
        assert!(grid.cell(pos).unwrap().gold.unwrap().collected);

        grid.drop_gold(Position::new(2, 2), 3);
        assert_eq!(grid.sweep_gold(), 3);
    }

    #[test]
    fn test_empty_floor_cells_skip_hazards_and_entities() {
        let mut grid = Grid::new(2, 2);
        grid.set_terrain(Position::new(1, 0), Terrain::Hazard(Hazard::Teleport))
            .unwrap();
        grid.place_entity(Spawn::Item(1), Position::new(0, 1)).unwrap();
        assert_eq!(grid.empty_floor_cells(), vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_gold_sums_saturate() {
        let mut grid = Grid::new(2, 1);
        grid.drop_gold(Position::new(1, 0), u32::MAX - 1);
        grid.drop_gold(Position::new(1, 0), 5);
        assert_eq!(grid.cell(Position::new(1, 0)).unwrap().loose_gold(), Some(u32::MAX));
        grid.drop_gold(Position::new(0, 0), 3);
        assert_eq!(grid.sweep_gold(), u32::MAX);
    }
}
