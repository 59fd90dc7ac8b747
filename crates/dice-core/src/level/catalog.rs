//! Built-in campaign levels

use crate::consts::PLAYER_START_VALUE;
use crate::error::GameError;

use super::{Layout, LevelDef};

const SPAWN_TURNS: u32 = 3;

#[allow(clippy::too_many_arguments)]
fn level(
    number: u32,
    name: &str,
    description: &str,
    gold_per_level: u32,
    gold_per_bag: u32,
    min_items: usize,
    max_items: usize,
    rows: &[&str],
) -> LevelDef {
    LevelDef {
        level: number,
        name: name.to_string(),
        description: description.to_string(),
        player_start_value: PLAYER_START_VALUE,
        gold_per_level,
        gold_per_bag,
        min_items,
        max_items,
        spawn_turns: SPAWN_TURNS,
        layout: Some(Layout::from_rows(rows)),
    }
}

/// The ten standard levels, easiest first
pub fn builtin_levels() -> Vec<LevelDef> {
    vec![
        level(
            1,
            "Dungeon Entrance",
            "Enter the dark dungeon - your first challenge awaits",
            10,
            5,
            1,
            1,
            &[
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
                " B  B -1  0  0  0  B  B",
                " B  B  0  0  0  0  B  B",
                " B  B  0  1  0  0  B  B",
                " B  B  P  0  0  0  B  B",
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
            ],
        ),
        level(
            2,
            "Barrel Maze",
            "Navigate through cluttered barrels and monsters",
            12,
            5,
            1,
            2,
            &[
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
                " B  0  0  0  0  0  0  B",
                " B  0 -2  0  0  0 -2  B",
                " B  0  0  1  0  0  0  B",
                " B  0  0  0  0  1  0  B",
                " B  0  P  0  0  0  0  B",
                " B  0  0  0  0  0  0  B",
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
            ],
        ),
        level(
            3,
            "Goblin Den",
            "Face hordes of goblins and rats",
            15,
            5,
            1,
            3,
            &[
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
                " B  0  0  0  0  0  P  B",
                " B  0 -3  0  0  0  0  B",
                " B  0  0  1  0  1  0  B",
                " B  0  0  0  0  0  0  B",
                " B  0  0  0 -3  0  0  B",
                " B  0  1  0  0  0  0  B",
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
            ],
        ),
        level(
            4,
            "Cluttered Corridor",
            "Tight spaces filled with barrels and orcs",
            18,
            6,
            2,
            4,
            &[
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
                " B -4  0  1  0  0 -4  B",
                " B  0  0  0  0  0  0  B",
                " B  1  0  0  P  0  0  B",
                " B  0  0  0  0  0  1  B",
                " B  0  0  0  0  0  0  B",
                " B -4  0  1  0  0 -4  B",
                " B  B  B  B  B  B  B  B",
                " B  B  B  B  B  B  B  B",
            ],
        ),
        level(
            5,
            "Fire Chamber",
            "Beware the fire pits and dangerous monsters",
            20,
            6,
            2,
            5,
            &[
                " B  B  B  B  B  B  B  B",
                " B  1  0  0  0  0  1  B",
                " B  B  B  0  B  B  B  B",
                " B  0 -4  0  0 -3  0  B",
                " B  0  0  0  0  0  0  B",
                " B  0  0  0  0  0  0  B",
                " B  0 -3  0  0 -4  0  B",
                " B  B  B  0  B  B  B  B",
                " B  1  0  0  0  1  P  B",
                " B  B  B  B  B  B  B  B",
            ],
        ),
        level(
            6,
            "Monster Lair",
            "Multiple paths filled with dangerous creatures",
            25,
            7,
            2,
            6,
            &[
                "-4  B  B  B  B  B -6  0",
                " 0  0  0  1  0  0  0  0",
                " B  B  B  0  B  B  B  B",
                " 1  0  0  0  0  0  0  1",
                " B  B  B  0  0  0  B  B",
                " 1  0  0  0  0  0  0  1",
                " B  0  B  0  B  B  B  B",
                " 0  B  0  1  0  0  0  0",
                " 1  B  B  B  B  B  B  0",
                "-2  0  0  0  P  0  0 -1",
            ],
        ),
        level(
            7,
            "Poison Pools",
            "Toxic waters and swarms of monsters",
            28,
            7,
            2,
            7,
            &[
                " 1  B  0  B  0  0  1  0",
                " 0  B  0  1  1  B  0  0",
                "-5  B  B  0  0  B  B -6",
                " 0  0  0  0  0  0  0  0",
                "-4  0  0  0  0  0  0 -3",
                " 0  0  1  0  1  0  0  0",
                " 0  0  0  0  0  0  0  0",
                "-1  B  B  0  0  B  B -2",
                " 0  B  0  0  B  0  0  0",
                " 1  B  0  P  B  0  0  1",
            ],
        ),
        // No start marker: the player begins on the first free cell
        level(
            8,
            "Teleport Runes",
            "Magic runes and closing enemies",
            32,
            8,
            2,
            8,
            &[
                "-5  0  0  0  0  0  0 -5",
                " 0  B  0  B  B  B  B  0",
                " 0  B -2  0  0  1  B  0",
                " 0  B  0  B  0  B  0  0",
                " 0  B  0  1  1  0  B  0",
                " 0  B  0  1  1  0  B  0",
                " 0  B  B  B  0  B  0  0",
                " 0  B  1  0  0 -2  B  0",
                " 0  B  B  B  B  0  B  0",
                "-3  0  0  0  0  0  0 -3",
            ],
        ),
        level(
            9,
            "Dungeon Maze",
            "Complex maze with obstacles and monsters",
            35,
            8,
            3,
            9,
            &[
                " 1  1  0  0  0  0  0 -6",
                " B  B  0  0  0  0  B  B",
                " B  0  B  1  B  1  B  0",
                " B  0  B  0  0  B  0  0",
                " 0  0  0  0  0  0  0  0",
                " 0  B  1  B  1  B  1  B",
                " 0  B  0  B  0  B  0  B",
                " 0  0  0  0  0  0  0  0",
                " 0  B  0  B  0  B  0  B",
                "-4  B -4  B  P  B -4  B",
            ],
        ),
        level(
            10,
            "Dragon's Lair",
            "Face the first dragon and its minions",
            40,
            10,
            3,
            10,
            &[
                " B -6  0  0  0  0 -6  B",
                "-3  B  0  0  0  0  B -3",
                " 0  B  1  0  0  0  1  B",
                " 0  1  B  0  0  0  B  1",
                " 0  0  B  0  0  0  B  0",
                "-3  0  1  P  0  1  0 -6",
                " 0  B  0  0  0  B  0  0",
                " 0  B  0  0  0  B  0  0",
                "-3  B  0  0  0  0  B -3",
                " B -6  0  0  0  0 -6  B",
            ],
        ),
    ]
}

/// Parse a JSON array of level definitions
pub fn load_levels(json: &str) -> Result<Vec<LevelDef>, GameError> {
    let levels: Vec<LevelDef> =
        serde_json::from_str(json).map_err(|e| GameError::InvalidLayout(e.to_string()))?;
    if levels.is_empty() {
        return Err(GameError::InvalidLayout("level list is empty".to_string()));
    }
    Ok(levels)
}
