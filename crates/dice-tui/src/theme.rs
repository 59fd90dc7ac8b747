//! Terminal color theme
//!
//! Dark and light palettes. Auto-detected from COLORFGBG, or forced with
//! `--light` / DICEBOUND_LIGHT_BG=1.

use ratatui::style::Color;

/// Colors used by every widget; nothing else hardcodes a `Color`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    /// Hints and footers
    pub text_dim: Color,

    pub border: Color,
    /// Shop and home screens
    pub border_accent: Color,
    /// Prompts waiting for a choice
    pub border_action: Color,
    pub border_danger: Color,

    pub cursor_fg: Color,
    pub cursor_bg: Color,

    pub accent: Color,
    pub good: Color,
    pub bad: Color,

    // Board
    pub board_player: Color,
    /// Enemy the player currently outclasses
    pub board_enemy_weak: Color,
    pub board_enemy_strong: Color,
    pub board_item: Color,
    pub board_gold: Color,
    pub board_pending: Color,
    pub board_floor: Color,
    pub board_obstacle: Color,
    pub board_damage: Color,
    pub board_trap: Color,
    pub board_teleport: Color,
    /// Background of cells reachable with the steps left
    pub board_reach_bg: Color,
    /// Background of valid teleport destinations
    pub board_target_bg: Color,
}

impl Theme {
    /// Dark terminal background (default)
    pub fn dark() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::DarkGray,
            border: Color::White,
            border_accent: Color::Cyan,
            border_action: Color::Yellow,
            border_danger: Color::Red,
            cursor_fg: Color::Black,
            cursor_bg: Color::Yellow,
            accent: Color::Cyan,
            good: Color::Green,
            bad: Color::Red,
            board_player: Color::White,
            board_enemy_weak: Color::Yellow,
            board_enemy_strong: Color::LightRed,
            board_item: Color::LightGreen,
            board_gold: Color::Yellow,
            board_pending: Color::Magenta,
            board_floor: Color::DarkGray,
            board_obstacle: Color::Gray,
            board_damage: Color::LightRed,
            board_trap: Color::LightMagenta,
            board_teleport: Color::LightCyan,
            board_reach_bg: Color::Rgb(20, 40, 60),
            board_target_bg: Color::Rgb(20, 60, 60),
        }
    }

    /// Light terminal background
    pub fn light() -> Self {
        Self {
            text: Color::Black,
            text_dim: Color::DarkGray,
            border: Color::DarkGray,
            border_accent: Color::Blue,
            border_action: Color::Yellow,
            border_danger: Color::Red,
            cursor_fg: Color::White,
            cursor_bg: Color::Blue,
            accent: Color::Blue,
            good: Color::Green,
            bad: Color::Red,
            board_player: Color::Black,
            board_enemy_weak: Color::Yellow,
            board_enemy_strong: Color::Red,
            board_item: Color::Green,
            board_gold: Color::Yellow,
            board_pending: Color::Magenta,
            board_floor: Color::Gray,
            board_obstacle: Color::DarkGray,
            board_damage: Color::Red,
            board_trap: Color::Magenta,
            board_teleport: Color::Blue,
            board_reach_bg: Color::Rgb(200, 220, 240),
            board_target_bg: Color::Rgb(200, 240, 240),
        }
    }

    /// Pick a palette from the terminal background
    pub fn detect() -> Self {
        if Self::is_light_background() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    fn is_light_background() -> bool {
        if let Ok(val) = std::env::var("DICEBOUND_LIGHT_BG") {
            return val == "1" || val.eq_ignore_ascii_case("true");
        }

        // "fg;bg" color indices; 7 and 9..=15 are light
        if let Ok(colorfgbg) = std::env::var("COLORFGBG")
            && let Some(bg_str) = colorfgbg.rsplit(';').next()
            && let Ok(bg_idx) = bg_str.parse::<u8>()
        {
            return matches!(bg_idx, 7 | 9..=15);
        }

        false
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ_in_text() {
        assert_eq!(Theme::dark().text, Color::White);
        assert_eq!(Theme::light().text, Color::Black);
    }

    #[test]
    fn test_enemy_colors_are_distinct() {
        for theme in [Theme::dark(), Theme::light()] {
            assert_ne!(theme.board_enemy_weak, theme.board_enemy_strong);
            assert_ne!(theme.board_reach_bg, theme.board_target_bg);
        }
    }
}
