//! Player vs enemy combat
//!
//! Two rulesets are supported. [`CombatRules::HpDuel`] trades damage rolls
//! until one side reaches 0 HP, the player striking first in every exchange.
//! [`CombatRules::ValueAbsorb`] compares power once and the winner absorbs
//! the loser's value.

use log::debug;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::entity::{Combatant, Enemy, Player};
use crate::error::GameError;
use crate::rng::GameRng;

/// Which combat ruleset is in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatRules {
    /// Alternate damage rolls; HP persists between fights
    #[default]
    HpDuel,
    /// Compare power; `strict` requires the player to beat the enemy outright
    ValueAbsorb { strict: bool },
}

/// Side of a fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Side {
    #[strum(serialize = "player")]
    Player,
    #[strum(serialize = "enemy")]
    Enemy,
}

impl Side {
    pub const fn other(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Combat sequencing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatPhase {
    Idle,
    PlayerAttack,
    EnemyAttack,
    Resolved(Side),
}

/// One strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackStep {
    pub attacker: Side,
    /// Damage rolled (or value compared, under the absorb rules)
    pub roll: u32,
    pub defender_hp_before: u32,
    pub defender_hp_after: u32,
}

/// Everything that happened in one combat, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    pub steps: Vec<AttackStep>,
    pub winner: Side,
}

impl CombatReport {
    pub fn player_won(&self) -> bool {
        self.winner == Side::Player
    }
}

fn validate(player: &Player, enemy: &Enemy) -> Result<(), GameError> {
    if player.hp.max == 0 || player.hp.is_zero() {
        return Err(GameError::InvalidCombatant(player.label()));
    }
    if enemy.hp.max == 0 || enemy.hp.is_zero() {
        return Err(GameError::InvalidCombatant(enemy.label()));
    }
    if player.damage.max == 0 && enemy.damage.max == 0 {
        return Err(GameError::InvalidCombatant(
            "neither side can deal damage".to_string(),
        ));
    }
    Ok(())
}

/// Roll the attacker's damage and apply it to the defender
fn strike<A: Combatant, D: Combatant>(
    side: Side,
    attacker: &A,
    defender: &mut D,
    rng: &mut GameRng,
) -> AttackStep {
    let roll = rng.roll(attacker.damage());
    let before = defender.hp().current;
    defender.hp_mut().take(roll);
    let after = defender.hp().current;
    debug!(
        "{} hits {} for {} ({} -> {})",
        attacker.label(),
        defender.label(),
        roll,
        before,
        after
    );
    AttackStep {
        attacker: side,
        roll,
        defender_hp_before: before,
        defender_hp_after: after,
    }
}

/// Fight to a finish
///
/// Mutates both combatants' HP (and, under the absorb rules, the winner's
/// stats). The caller removes whichever side ends at 0 HP.
pub fn resolve(
    rules: CombatRules,
    player: &mut Player,
    enemy: &mut Enemy,
    rng: &mut GameRng,
) -> Result<CombatReport, GameError> {
    validate(player, enemy)?;
    match rules {
        CombatRules::HpDuel => Ok(duel(player, enemy, rng)),
        CombatRules::ValueAbsorb { strict } => Ok(absorb(strict, player, enemy)),
    }
}

fn duel(player: &mut Player, enemy: &mut Enemy, rng: &mut GameRng) -> CombatReport {
    let mut steps = Vec::new();
    let mut phase = CombatPhase::Idle;
    loop {
        phase = match phase {
            CombatPhase::Idle => CombatPhase::PlayerAttack,
            CombatPhase::PlayerAttack => {
                steps.push(strike(Side::Player, &*player, enemy, rng));
                if enemy.is_alive() {
                    CombatPhase::EnemyAttack
                } else {
                    CombatPhase::Resolved(Side::Player)
                }
            }
            CombatPhase::EnemyAttack => {
                steps.push(strike(Side::Enemy, &*enemy, player, rng));
                if player.is_alive() {
                    CombatPhase::PlayerAttack
                } else {
                    CombatPhase::Resolved(Side::Enemy)
                }
            }
            CombatPhase::Resolved(winner) => return CombatReport { steps, winner },
        };
    }
}

fn absorb(strict: bool, player: &mut Player, enemy: &mut Enemy) -> CombatReport {
    let (p, e) = (player.power(), enemy.power());
    let player_wins = if strict { p > e } else { p >= e };
    let step = if player_wins {
        enemy.hp.take(e);
        player.hp.grow(e);
        AttackStep {
            attacker: Side::Player,
            roll: p,
            defender_hp_before: e,
            defender_hp_after: 0,
        }
    } else {
        player.hp.take(p);
        enemy.absorb(p);
        AttackStep {
            attacker: Side::Enemy,
            roll: e,
            defender_hp_before: p,
            defender_hp_after: 0,
        }
    };
    debug!("value combat {p} vs {e}: {} wins", step.attacker);
    CombatReport {
        steps: vec![step],
        winner: step.attacker,
    }
}
