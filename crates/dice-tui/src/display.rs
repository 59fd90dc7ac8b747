//! Glyph sets for board rendering
//!
//! Classic ASCII, or Unicode shapes where the terminal can draw them.

use dice_core::grid::{Hazard, Terrain};
use strum::{Display, EnumString, VariantNames};

/// Terminal columns per board cell, wide enough for two-digit values
pub const CELL_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames, Default)]
#[strum(serialize_all = "lowercase")]
pub enum GraphicsMode {
    Classic,
    Fancy,
    #[default]
    Auto,
}

/// Characters for everything on the board that isn't a number
pub trait GlyphSet: Send + Sync {
    fn terrain_char(&self, terrain: Terrain) -> char;

    fn player_char(&self) -> char {
        '@'
    }

    fn gold_char(&self) -> char {
        '$'
    }
}

pub struct ClassicGlyphs;

impl GlyphSet for ClassicGlyphs {
    fn terrain_char(&self, terrain: Terrain) -> char {
        terrain.symbol()
    }
}

pub struct FancyGlyphs;

impl GlyphSet for FancyGlyphs {
    fn terrain_char(&self, terrain: Terrain) -> char {
        match terrain {
            Terrain::Floor => '·',
            Terrain::Obstacle => '█',
            Terrain::Hazard(Hazard::Damage { .. }) => '≈',
            Terrain::Hazard(Hazard::Trap { .. }) => '▲',
            Terrain::Hazard(Hazard::Teleport) => '◎',
        }
    }

    fn gold_char(&self) -> char {
        '¤'
    }
}

/// Whether the locale advertises UTF-8
pub fn supports_unicode() -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"].iter().any(|var| {
        std::env::var(var).is_ok_and(|val| {
            let val = val.to_uppercase();
            val.contains("UTF-8") || val.contains("UTF8")
        })
    })
}

pub fn detect_glyph_set(mode: GraphicsMode) -> Box<dyn GlyphSet> {
    match mode {
        GraphicsMode::Classic => Box::new(ClassicGlyphs),
        GraphicsMode::Fancy => Box::new(FancyGlyphs),
        GraphicsMode::Auto => {
            if supports_unicode() {
                Box::new(FancyGlyphs)
            } else {
                Box::new(ClassicGlyphs)
            }
        }
    }
}

/// Center `text` in a cell, cutting anything past [`CELL_WIDTH`]
pub fn cell_text(text: &str) -> String {
    let clipped: String = text.chars().take(CELL_WIDTH as usize).collect();
    format!("{clipped:^width$}", width = CELL_WIDTH as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_classic_uses_terrain_symbols() {
        let glyphs = ClassicGlyphs;
        assert_eq!(glyphs.terrain_char(Terrain::Obstacle), '#');
        assert_eq!(glyphs.terrain_char(Terrain::Hazard(Hazard::Teleport)), '*');
        assert_eq!(glyphs.gold_char(), '$');
    }

    #[test]
    fn test_mode_parses_from_cli_names() {
        assert_eq!(GraphicsMode::from_str("fancy").ok(), Some(GraphicsMode::Fancy));
        assert_eq!(GraphicsMode::Classic.to_string(), "classic");
        assert!(GraphicsMode::from_str("sparkly").is_err());
    }

    #[test]
    fn test_cell_text_is_fixed_width() {
        assert_eq!(cell_text("@"), " @ ");
        assert_eq!(cell_text("+3"), "+3 ");
        assert_eq!(cell_text("12345"), "123");
    }
}
