//! Status lines widget

use ratatui::prelude::*;
use ratatui::widgets::Widget;

use dice_core::engine::{BoardSnapshot, TurnPhase};
use dice_core::entity::Combatant;

use crate::theme::Theme;

pub struct StatusWidget<'a> {
    snapshot: &'a BoardSnapshot,
    theme: &'a Theme,
}

impl<'a> StatusWidget<'a> {
    pub fn new(snapshot: &'a BoardSnapshot, theme: &'a Theme) -> Self {
        Self { snapshot, theme }
    }
}

/// Keys that do something in `phase`
pub fn phase_hint(phase: TurnPhase) -> &'static str {
    match phase {
        TurnPhase::PlayerIdle => "r: roll   q: quit",
        TurnPhase::PlayerMoving { .. } => "arrows/hjkl: cursor   enter: move   e: end turn",
        TurnPhase::ChoosingStat { .. } => "1: hp   2: damage   3: speed   4: intelligence",
        TurnPhase::ChoosingTeleport => "arrows/hjkl: cursor   enter: teleport",
        TurnPhase::LevelWon(_) | TurnPhase::LevelLost(_) => "n: continue",
        _ => "",
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s = self.snapshot;
        let p = &s.player;

        let line1 = format!(
            "HP:{} Dmg:{} Spd:{} Int:{} Pow:{}  $:{}",
            p.hp,
            p.damage,
            p.speed,
            p.intelligence,
            p.power(),
            s.run_gold,
        );

        let roll = s
            .last_roll
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        let mut line2 = format!("Round:{} Roll:{roll} Enemies:{} ", s.round, s.enemies.len());
        match s.phase {
            TurnPhase::PlayerMoving { remaining } => {
                line2.push_str(&format!("Steps:{remaining}"));
            }
            phase => line2.push_str(&phase.to_string()),
        }

        let hp_style = if p.hp.current * 3 <= p.hp.max {
            Style::default().fg(self.theme.bad)
        } else {
            Style::default().fg(self.theme.text)
        };
        buf.set_string(area.x, area.y, &line1, hp_style);
        if area.height > 1 {
            buf.set_string(area.x, area.y + 1, &line2, Style::default().fg(self.theme.text));
        }
        if area.height > 2 {
            buf.set_string(
                area.x,
                area.y + 2,
                phase_hint(s.phase),
                Style::default().fg(self.theme.text_dim),
            );
        }
    }
}
