//! Message log widget and event narration

use std::collections::VecDeque;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use dice_core::GameEvent;
use dice_core::ai::Intent;
use dice_core::engine::{Actor, TurnPhase};
use dice_core::hazard::HazardOutcome;

use crate::theme::Theme;

pub struct MessagesWidget<'a> {
    messages: &'a VecDeque<String>,
    theme: &'a Theme,
}

impl<'a> MessagesWidget<'a> {
    pub fn new(messages: &'a VecDeque<String>, theme: &'a Theme) -> Self {
        Self { messages, theme }
    }
}

impl Widget for MessagesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(self.theme.text_dim));
        let inner = block.inner(area);
        block.render(area, buf);

        // newest last, keep only what fits
        let shown = inner.height as usize;
        let skip = self.messages.len().saturating_sub(shown);
        let lines: Vec<Line> = self
            .messages
            .iter()
            .skip(skip)
            .map(|m| Line::from(m.as_str()))
            .collect();
        Paragraph::new(lines)
            .style(Style::default().fg(self.theme.text))
            .render(inner, buf);
    }
}

fn actor_name(actor: Actor) -> String {
    match actor {
        Actor::Player => "You".to_string(),
        Actor::Enemy(id) => format!("Enemy #{}", id.0),
    }
}

/// One line of log text for an event; `None` for events not worth showing
pub fn describe(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::LevelStarted { level, name } => format!("Level {level}: {name}"),
        GameEvent::PlayerRolled(0) => "You rolled 0. The turn passes.".to_string(),
        GameEvent::PlayerRolled(roll) => format!("You rolled {roll}."),
        GameEvent::EnemyRolled { enemy, roll, intent } => {
            let plan = match intent {
                Intent::Chase => "chases you",
                Intent::SeekItem => "goes for an item",
                Intent::ApproachItem => "heads toward an item",
                Intent::Flee => "backs away",
                Intent::Stay => "waits",
            };
            format!("Enemy #{} rolled {roll} and {plan}.", enemy.0)
        }
        GameEvent::Teleported { actor, to, .. } => {
            format!("{} teleported to ({}, {}).", actor_name(*actor), to.x, to.y)
        }
        GameEvent::ItemPickedUp { value } => {
            format!("You picked up a +{value} item. Choose a stat.")
        }
        GameEvent::ItemAssigned { stat, value } => format!("+{value} {stat}."),
        GameEvent::EnemyAteItem { enemy, value } => {
            format!("Enemy #{} absorbed a +{value} item!", enemy.0)
        }
        GameEvent::HazardTriggered { actor, outcome, .. } => {
            let who = actor_name(*actor);
            match outcome {
                HazardOutcome::Nothing => return None,
                HazardOutcome::Damaged { amount, .. } => {
                    format!("{who} took {amount} damage from the ground.")
                }
                HazardOutcome::Snared { amount, .. } => {
                    format!("{who} sprang a trap for {amount} damage.")
                }
                HazardOutcome::TrapSkipped => format!("{who} slipped past a trap."),
                HazardOutcome::Teleport => format!("{who} stepped on a teleporter."),
            }
        }
        GameEvent::Combat { enemy, report } => {
            let exchanges = report.steps.len();
            if report.player_won() {
                format!("You beat enemy #{} in {exchanges} exchanges.", enemy.0)
            } else {
                format!("Enemy #{} beat you in {exchanges} exchanges.", enemy.0)
            }
        }
        GameEvent::EnemyDied { enemy, .. } => format!("Enemy #{} perished.", enemy.0),
        GameEvent::GoldDropped { amount, .. } => format!("A bag of {amount} gold drops."),
        GameEvent::GoldCollected { amount } => format!("You collect {amount} gold."),
        GameEvent::SpawnScheduled { turns, .. } => {
            format!("Something will appear in {turns} rounds.")
        }
        GameEvent::ItemSpawned { value, .. } => format!("A +{value} item appeared."),
        GameEvent::LevelWon { reason, gold } => {
            format!("Level won: {reason}. +{gold} gold.")
        }
        GameEvent::LevelLost(reason) => format!("Level lost: {reason}."),
        GameEvent::PhaseChanged(TurnPhase::EnemyPhase) => "Enemies move.".to_string(),
        GameEvent::PhaseChanged(_)
        | GameEvent::Moved { .. }
        | GameEvent::EnemyDefeated { .. }
        | GameEvent::SpawnDropped => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_core::engine::{LossReason, WinReason};
    use dice_core::entity::{EnemyId, Stat};
    use dice_core::grid::Position;

    #[test]
    fn test_describe_key_events() {
        assert_eq!(
            describe(&GameEvent::PlayerRolled(4)).as_deref(),
            Some("You rolled 4.")
        );
        assert_eq!(
            describe(&GameEvent::ItemAssigned {
                stat: Stat::Damage,
                value: 2
            })
            .as_deref(),
            Some("+2 dmg.")
        );
        assert_eq!(
            describe(&GameEvent::LevelWon {
                reason: WinReason::AllEnemiesDefeated,
                gold: 12
            })
            .as_deref(),
            Some("Level won: all enemies defeated. +12 gold.")
        );
        assert_eq!(
            describe(&GameEvent::LevelLost(LossReason::Unwinnable)).as_deref(),
            Some("Level lost: no way to win.")
        );
    }

    #[test]
    fn test_movement_is_not_narrated() {
        let moved = GameEvent::Moved {
            actor: Actor::Enemy(EnemyId(1)),
            from: Position::new(0, 0),
            to: Position::new(1, 0),
        };
        assert_eq!(describe(&moved), None);
        assert_eq!(describe(&GameEvent::PhaseChanged(TurnPhase::PlayerIdle)), None);
    }
}
