//! Input handling - convert key events to commands
//!
//! Arrows or vi keys move the cursor; digits pick from whatever list is on
//! screen (stats, shop offers, meta upgrades).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dice_core::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveCursor(Direction),
    /// Enter/space: move to, or teleport to, the cursor cell
    Confirm,
    Roll,
    EndTurn,
    /// Pick entry `n` (0-based) of the list on screen
    Select(usize),
    /// Leave the shop, or start the next run
    Continue,
    Skip,
    Quit,
}

pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Command::MoveCursor(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::MoveCursor(Direction::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::MoveCursor(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::MoveCursor(Direction::Right)),

        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Confirm),
        KeyCode::Char('r') => Some(Command::Roll),
        KeyCode::Char('e') => Some(Command::EndTurn),
        KeyCode::Char('n') => Some(Command::Continue),
        KeyCode::Char('s') | KeyCode::Esc => Some(Command::Skip),
        KeyCode::Char('q') => Some(Command::Quit),

        KeyCode::Char(c @ '1'..='9') => Some(Command::Select(c as usize - '1' as usize)),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_bindings() {
        assert_eq!(
            key_to_command(key(KeyCode::Char('k'))),
            Some(Command::MoveCursor(Direction::Up))
        );
        assert_eq!(key_to_command(key(KeyCode::Char('3'))), Some(Command::Select(2)));
        assert_eq!(key_to_command(key(KeyCode::Enter)), Some(Command::Confirm));
        assert_eq!(key_to_command(key(KeyCode::Char('z'))), None);
        assert_eq!(
            key_to_command(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }
}
