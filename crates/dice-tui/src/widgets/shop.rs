//! Shop screens: power-ups between levels, permanent upgrades between runs

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use strum::IntoEnumIterator;

use dice_core::entity::Player;
use dice_core::progression::{MetaProgress, MetaUpgrade, RunSummary, UpgradeSession};

use crate::theme::Theme;

/// Power-up offers for the upgrade phase
pub struct UpgradeShopWidget<'a> {
    session: &'a UpgradeSession,
    player: &'a Player,
    theme: &'a Theme,
}

impl<'a> UpgradeShopWidget<'a> {
    pub fn new(session: &'a UpgradeSession, player: &'a Player, theme: &'a Theme) -> Self {
        Self {
            session,
            player,
            theme,
        }
    }
}

impl Widget for UpgradeShopWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = self.theme;
        let block = Block::default()
            .title(" Upgrades ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_accent));

        let p = self.player;
        let mut lines = vec![
            Line::from(format!(
                "Rolled {} intelligence: {} resources left",
                self.session.rolled(),
                self.session.resources()
            ))
            .style(Style::default().fg(t.accent)),
            Line::from(format!(
                "HP {}  Dmg {}  Spd {}  Int {}",
                p.hp, p.damage, p.speed, p.intelligence
            )),
            Line::from(""),
        ];

        for (i, offer) in self.session.offers().iter().enumerate() {
            let power_up = offer.power_up;
            let text = format!(
                "{}) {:<20} {:>2}  {}",
                i + 1,
                power_up.to_string(),
                power_up.cost(),
                power_up.description()
            );
            let style = if offer.bought {
                Style::default().fg(t.text_dim).crossed_out()
            } else if self.session.can_afford(i) {
                Style::default().fg(t.good)
            } else {
                Style::default().fg(t.text_dim)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }

        lines.push(Line::from(""));
        lines.push(
            Line::from("1-9: buy   s: done, next level").style(Style::default().fg(t.text_dim)),
        );

        Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(t.text))
            .render(area, buf);
    }
}

/// Home screen: lifetime gold, permanent upgrades and the last run's result
pub struct MetaShopWidget<'a> {
    meta: &'a MetaProgress,
    summary: Option<&'a RunSummary>,
    theme: &'a Theme,
}

impl<'a> MetaShopWidget<'a> {
    pub fn new(meta: &'a MetaProgress, summary: Option<&'a RunSummary>, theme: &'a Theme) -> Self {
        Self {
            meta,
            summary,
            theme,
        }
    }
}

impl Widget for MetaShopWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = self.theme;
        let mut lines = Vec::new();

        let border = match self.summary {
            Some(summary) => {
                let (headline, color) = if summary.won {
                    ("Victory!".to_string(), t.good)
                } else {
                    let why = summary
                        .loss
                        .map_or_else(|| "run over".to_string(), |r| r.to_string());
                    (format!("Run over: {why}"), t.bad)
                };
                lines.push(Line::from(headline).style(Style::default().fg(color).bold()));
                lines.push(Line::from(format!(
                    "Reached level {}, cleared {}, defeated {} enemies, banked {} gold",
                    summary.reached_level,
                    summary.levels_cleared,
                    summary.enemies_defeated,
                    summary.gold
                )));
                lines.push(Line::from(""));
                color
            }
            None => t.border_accent,
        };

        let stats = &self.meta.stats;
        lines.push(
            Line::from(format!("Lifetime gold: {}", self.meta.lifetime_gold))
                .style(Style::default().fg(t.accent)),
        );
        lines.push(Line::from(format!(
            "Runs {} (won {})  best level {}  enemies defeated {}",
            stats.runs_started, stats.runs_won, stats.best_level, stats.enemies_defeated
        )));
        lines.push(Line::from(""));

        for (i, upgrade) in MetaUpgrade::iter().enumerate() {
            let cost = self.meta.cost(upgrade);
            let text = format!(
                "{}) {:<10} lv {:<2} {:>4}g  {}",
                i + 1,
                upgrade.to_string(),
                self.meta.level(upgrade),
                cost,
                upgrade.description()
            );
            let style = if cost <= self.meta.lifetime_gold {
                Style::default().fg(t.good)
            } else {
                Style::default().fg(t.text_dim)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }

        lines.push(Line::from(""));
        lines.push(
            Line::from("1-4: buy   n/enter: new run   q: quit").style(Style::default().fg(t.text_dim)),
        );

        let block = Block::default()
            .title(" DiceBound ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(t.text))
            .render(area, buf);
    }
}
