//! Procedural level generation
//!
//! Used for levels that have no layout or whose layout is unusable.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::consts::{ENEMY_COUNT, GRID_H, GRID_W, ITEM_COUNT};
use crate::entity::Enemy;
use crate::error::GameError;
use crate::grid::{Grid, HazardKind, Position, Spawn};
use crate::hazard::HazardTable;
use crate::path::{Passability, reachable_cells};
use crate::rng::GameRng;

/// A spawnable value with its percentage weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weighted {
    pub value: u32,
    pub weight: u32,
}

impl Weighted {
    pub const fn new(value: u32, weight: u32) -> Self {
        Self { value, weight }
    }
}

/// How many tiles of one hazard kind to scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardCount {
    pub kind: HazardKind,
    pub count: usize,
}

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProceduralSpec {
    pub width: usize,
    pub height: usize,
    pub enemy_count: usize,
    pub item_count: usize,
    pub enemy_values: Vec<Weighted>,
    pub item_values: Vec<Weighted>,
    pub hazards: Vec<HazardCount>,
}

impl Default for ProceduralSpec {
    fn default() -> Self {
        Self {
            width: GRID_W,
            height: GRID_H,
            enemy_count: ENEMY_COUNT,
            item_count: ITEM_COUNT,
            // Weak, Normal, Strong, Boss
            enemy_values: vec![
                Weighted::new(1, 25),
                Weighted::new(3, 25),
                Weighted::new(5, 25),
                Weighted::new(8, 25),
            ],
            // Small, Medium, Large, Huge
            item_values: vec![
                Weighted::new(1, 25),
                Weighted::new(2, 25),
                Weighted::new(3, 25),
                Weighted::new(5, 25),
            ],
            hazards: vec![
                HazardCount {
                    kind: HazardKind::Obstacle,
                    count: 6,
                },
                HazardCount {
                    kind: HazardKind::Damage,
                    count: 2,
                },
                HazardCount {
                    kind: HazardKind::Trap,
                    count: 1,
                },
                HazardCount {
                    kind: HazardKind::Teleport,
                    count: 1,
                },
            ],
        }
    }
}

fn pick_value(rng: &mut GameRng, table: &[Weighted]) -> Option<u32> {
    let weights: Vec<u32> = table.iter().map(|w| w.weight).collect();
    rng.weighted_index(&weights).map(|idx| table[idx].value)
}

/// Whether every walkable cell can be reached from the player
fn is_connected(grid: &Grid) -> bool {
    let walkable = grid.positions().filter(|&p| grid.is_walkable(p)).count();
    let budget = (grid.width() * grid.height()) as u32;
    let reach = reachable_cells(grid, grid.player_pos(), budget, Passability::Player);
    reach.len() + 1 == walkable
}

/// Generate a populated grid
///
/// Obstacles that would cut the board in two are skipped, so every entity
/// can eventually be reached.
pub fn generate(spec: &ProceduralSpec, hazards: &HazardTable, rng: &mut GameRng) -> Result<Grid, GameError> {
    if spec.width == 0 || spec.height == 0 {
        return Err(GameError::InvalidLayout(
            "procedural grid has no cells".to_string(),
        ));
    }

    let mut cells: Vec<Position> = (0..spec.height)
        .flat_map(|y| (0..spec.width).map(move |x| Position::new(x as i32, y as i32)))
        .collect();
    rng.shuffle(&mut cells);
    let mut free = cells.into_iter();

    let start = free.next().unwrap_or(Position::new(0, 0));
    let mut grid = Grid::with_player(spec.width, spec.height, start);

    for hc in &spec.hazards {
        let terrain = hazards.terrain(hc.kind);
        let mut placed = 0;
        while placed < hc.count {
            let Some(pos) = free.next() else {
                break;
            };
            grid.set_terrain(pos, terrain)?;
            if hc.kind == HazardKind::Obstacle && !is_connected(&grid) {
                grid.set_terrain(pos, Default::default())?;
                continue;
            }
            placed += 1;
        }
    }

    let mut open = grid.empty_floor_cells();
    rng.shuffle(&mut open);
    let mut open = open.into_iter();

    for _ in 0..spec.enemy_count {
        let (Some(value), Some(pos)) = (pick_value(rng, &spec.enemy_values), open.next()) else {
            warn!("procedural level ran out of room for enemies");
            break;
        };
        grid.place_entity(Spawn::Enemy(Enemy::new(value)), pos)?;
    }
    for _ in 0..spec.item_count {
        let (Some(value), Some(pos)) = (pick_value(rng, &spec.item_values), open.next()) else {
            warn!("procedural level ran out of room for items");
            break;
        };
        grid.place_entity(Spawn::Item(value), pos)?;
    }

    debug!(
        "generated {}x{} level: {} enemies, {} items",
        spec.width,
        spec.height,
        grid.enemy_count(),
        grid.items().len()
    );
    Ok(grid)
}
