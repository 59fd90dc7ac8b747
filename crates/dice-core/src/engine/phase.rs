//! Turn phases

use serde::{Deserialize, Serialize};
use strum::Display;

use super::{LossReason, WinReason};

/// Where the level is in its turn cycle
///
/// `PlayerRolling`, `PlayerTurnEnd`, `EnemyPhase` and `TurnCheck` are passed
/// through synchronously; they show up in the event stream but a caller
/// never observes them as the resting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TurnPhase {
    #[strum(serialize = "waiting for a roll")]
    PlayerIdle,
    #[strum(serialize = "rolling")]
    PlayerRolling,
    #[strum(serialize = "moving")]
    PlayerMoving { remaining: u32 },
    #[strum(serialize = "choosing a stat")]
    ChoosingStat { value: u32 },
    #[strum(serialize = "choosing a teleport destination")]
    ChoosingTeleport,
    #[strum(serialize = "ending the turn")]
    PlayerTurnEnd,
    #[strum(serialize = "enemies are moving")]
    EnemyPhase,
    #[strum(serialize = "checking the board")]
    TurnCheck,
    #[strum(serialize = "level won")]
    LevelWon(WinReason),
    #[strum(serialize = "level lost")]
    LevelLost(LossReason),
}

impl TurnPhase {
    pub const fn is_over(self) -> bool {
        matches!(self, TurnPhase::LevelWon(_) | TurnPhase::LevelLost(_))
    }

    /// Steps left to spend, outside of movement 0
    pub const fn remaining_steps(self) -> u32 {
        match self {
            TurnPhase::PlayerMoving { remaining } => remaining,
            _ => 0,
        }
    }
}
