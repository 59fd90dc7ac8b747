//! Game errors
//!
//! Every error here is recoverable. A rejected request leaves the game state
//! untouched; callers surface it as "nothing happened".

use thiserror::Error;

use crate::grid::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot place {what} at {pos}: {reason}")]
    InvalidPlacement {
        what: &'static str,
        pos: Position,
        reason: &'static str,
    },

    #[error("Combatant has no hit points: {0}")]
    InvalidCombatant(String),

    #[error("No path to {0}")]
    NoPathFound(Position),

    #[error("Corrupt save data under key '{key}': {reason}")]
    CorruptSaveData { key: String, reason: String },

    #[error("Invalid level layout: {0}")]
    InvalidLayout(String),

    #[error("Action not allowed while {0}")]
    IllegalAction(String),

    #[error("Purchase rejected: {0}")]
    PurchaseRejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GameError::InvalidPlacement {
            what: "enemy",
            pos: Position::new(3, 4),
            reason: "obstacle",
        };
        let msg = err.to_string();
        assert!(msg.contains("(3, 4)"));
        assert!(msg.contains("obstacle"));

        let err = GameError::NoPathFound(Position::new(1, 2));
        assert_eq!(err.to_string(), "No path to (1, 2)");
    }
}
