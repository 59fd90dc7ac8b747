//! Explicit level layouts
//!
//! A layout is a rectangular matrix of tokens. In JSON each token is either a
//! number or a string; the built-in catalog writes rows as whitespace
//! separated text.
//!
//! | token | meaning |
//! |---|---|
//! | `"P"` | player start |
//! | `n < 0` | enemy of power `|n|` |
//! | `n > 0` | item of value `n` |
//! | `"B"` `"L"` `"S"` `"C"` | obstacle, damage, trap, teleport |
//! | `"."` `" "` `0` | empty |

use log::warn;
use serde::{Deserialize, Serialize};

use crate::entity::Enemy;
use crate::error::GameError;
use crate::grid::{Grid, HazardKind, Position, Spawn};
use crate::hazard::HazardTable;

/// One raw layout cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Number(i64),
    Text(String),
}

/// What a token stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Player,
    Enemy(u32),
    Item(u32),
    Hazard(HazardKind),
    Empty,
    Unknown(String),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(n) => number_kind(*n),
            Token::Text(s) => {
                let s = s.trim();
                if s.is_empty() || s == "." {
                    return TokenKind::Empty;
                }
                if s == "P" {
                    return TokenKind::Player;
                }
                if let Some(kind) = HazardKind::from_letter(s) {
                    return TokenKind::Hazard(kind);
                }
                match s.parse::<i64>() {
                    Ok(n) => number_kind(n),
                    Err(_) => TokenKind::Unknown(s.to_string()),
                }
            }
        }
    }
}

fn number_kind(n: i64) -> TokenKind {
    let magnitude = u32::try_from(n.unsigned_abs()).unwrap_or(u32::MAX);
    match n {
        0 => TokenKind::Empty,
        n if n < 0 => TokenKind::Enemy(magnitude),
        _ => TokenKind::Item(magnitude),
    }
}

/// A level's explicit cell matrix, row-major
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    pub rows: Vec<Vec<Token>>,
}

impl Layout {
    /// Build from whitespace separated text rows
    pub fn from_rows(rows: &[&str]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| {
                    row.split_whitespace()
                        .map(|t| match t.parse::<i64>() {
                            Ok(n) => Token::Number(n),
                            Err(_) => Token::Text(t.to_string()),
                        })
                        .collect()
                })
                .collect(),
        }
    }

    /// `(width, height)` of a well-formed layout
    pub fn dimensions(&self) -> Result<(usize, usize), GameError> {
        let height = self.rows.len();
        let width = self.rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(GameError::InvalidLayout("layout is empty".to_string()));
        }
        if let Some(y) = self.rows.iter().position(|r| r.len() != width) {
            return Err(GameError::InvalidLayout(format!(
                "row {y} has {} cells, expected {width}",
                self.rows[y].len()
            )));
        }
        Ok((width, height))
    }

    fn kinds(&self) -> impl Iterator<Item = (Position, TokenKind)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, t)| (Position::new(x as i32, y as i32), t.kind()))
        })
    }

    /// Where the player starts: the first `P`, else the first empty cell
    pub fn player_start(&self) -> Option<Position> {
        if let Some((pos, _)) = self.kinds().find(|(_, k)| *k == TokenKind::Player) {
            return Some(pos);
        }
        let pos = self
            .kinds()
            .find(|(_, k)| matches!(k, TokenKind::Empty | TokenKind::Unknown(_)))
            .map(|(pos, _)| pos)?;
        warn!("layout has no player start, using {pos}");
        Some(pos)
    }

    /// Turn the layout into a populated grid
    pub fn build_grid(&self, hazards: &HazardTable) -> Result<Grid, GameError> {
        let (width, height) = self.dimensions()?;
        let start = self
            .player_start()
            .ok_or_else(|| GameError::InvalidLayout("no free floor cell".to_string()))?;

        let mut grid = Grid::with_player(width, height, start);
        for (pos, kind) in self.kinds() {
            if pos == start {
                continue;
            }
            match kind {
                TokenKind::Player => warn!("extra player token at {pos} ignored"),
                TokenKind::Unknown(token) => warn!("unknown layout token '{token}' at {pos}"),
                TokenKind::Empty => {}
                TokenKind::Hazard(kind) => grid.set_terrain(pos, hazards.terrain(kind))?,
                TokenKind::Enemy(value) => {
                    grid.place_entity(Spawn::Enemy(Enemy::new(value)), pos)?;
                }
                TokenKind::Item(value) => {
                    grid.place_entity(Spawn::Item(value), pos)?;
                }
            }
        }
        Ok(grid)
    }
}
