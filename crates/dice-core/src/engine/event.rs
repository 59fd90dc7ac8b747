//! Events queued for the presentation layer

use serde::{Deserialize, Serialize};

use super::{LossReason, TurnPhase, WinReason};
use crate::ai::Intent;
use crate::combat::CombatReport;
use crate::entity::{EnemyId, Stat};
use crate::grid::Position;
use crate::hazard::HazardOutcome;

/// Who did something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Enemy(EnemyId),
}

/// One observable state change, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32, name: String },
    PhaseChanged(TurnPhase),
    PlayerRolled(u32),
    EnemyRolled { enemy: EnemyId, roll: u32, intent: Intent },
    Moved { actor: Actor, from: Position, to: Position },
    Teleported { actor: Actor, from: Position, to: Position },
    /// The player picked up an item and must pick a stat
    ItemPickedUp { value: u32 },
    ItemAssigned { stat: Stat, value: u32 },
    EnemyAteItem { enemy: EnemyId, value: u32 },
    HazardTriggered { actor: Actor, pos: Position, outcome: HazardOutcome },
    Combat { enemy: EnemyId, report: CombatReport },
    EnemyDefeated { enemy: EnemyId, pos: Position },
    /// Killed by a tile rather than by the player
    EnemyDied { enemy: EnemyId, pos: Position },
    GoldDropped { pos: Position, amount: u32 },
    GoldCollected { amount: u32 },
    SpawnScheduled { pos: Position, turns: u32 },
    ItemSpawned { pos: Position, value: u32 },
    SpawnDropped,
    LevelWon { reason: WinReason, gold: u32 },
    LevelLost(LossReason),
}
