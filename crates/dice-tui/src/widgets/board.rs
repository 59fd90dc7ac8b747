//! Board display widget

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

use dice_core::engine::{BoardSnapshot, CellMarks, CellView};
use dice_core::entity::Combatant;
use dice_core::grid::{Hazard, Occupant, Position as GridPos, Terrain};

use crate::display::{CELL_WIDTH, GlyphSet, cell_text};
use crate::theme::Theme;

pub struct BoardWidget<'a> {
    snapshot: &'a BoardSnapshot,
    cursor: Option<GridPos>,
    theme: &'a Theme,
    glyphs: &'a dyn GlyphSet,
}

impl<'a> BoardWidget<'a> {
    pub fn new(snapshot: &'a BoardSnapshot, theme: &'a Theme, glyphs: &'a dyn GlyphSet) -> Self {
        Self {
            snapshot,
            cursor: None,
            theme,
            glyphs,
        }
    }

    pub fn cursor(mut self, cursor: Option<GridPos>) -> Self {
        self.cursor = cursor;
        self
    }

    fn cell_display(&self, pos: GridPos, view: &CellView) -> (String, Style) {
        let t = self.theme;
        let (text, fg) = match view.cell.occupant {
            Occupant::Player => (self.glyphs.player_char().to_string(), t.board_player),
            Occupant::Enemy(id) => {
                let power = self
                    .snapshot
                    .enemies
                    .iter()
                    .find(|e| e.id == id)
                    .map_or(0, |e| e.power());
                let fg = if power < self.snapshot.player.power() {
                    t.board_enemy_weak
                } else {
                    t.board_enemy_strong
                };
                (power.to_string(), fg)
            }
            Occupant::Item(id) => {
                let value = self
                    .snapshot
                    .items
                    .iter()
                    .find(|i| i.id == id)
                    .map_or(0, |i| i.value);
                (format!("+{value}"), t.board_item)
            }
            Occupant::Empty => {
                if let Some(turns) = view.countdown {
                    (format!("({turns})"), t.board_pending)
                } else if view.marks.contains(CellMarks::GOLD) {
                    (self.glyphs.gold_char().to_string(), t.board_gold)
                } else {
                    let fg = match view.cell.terrain {
                        Terrain::Floor => t.board_floor,
                        Terrain::Obstacle => t.board_obstacle,
                        Terrain::Hazard(Hazard::Damage { .. }) => t.board_damage,
                        Terrain::Hazard(Hazard::Trap { .. }) => t.board_trap,
                        Terrain::Hazard(Hazard::Teleport) => t.board_teleport,
                    };
                    (self.glyphs.terrain_char(view.cell.terrain).to_string(), fg)
                }
            }
        };

        let mut style = Style::default().fg(fg);
        if matches!(view.cell.occupant, Occupant::Player | Occupant::Enemy(_)) {
            style = style.bold();
        }
        if view.marks.contains(CellMarks::TELEPORT_TARGET) {
            style = style.bg(t.board_target_bg);
        } else if view.marks.contains(CellMarks::REACHABLE) {
            style = style.bg(t.board_reach_bg);
        }
        if self.cursor == Some(pos) {
            style = style.fg(t.cursor_fg).bg(t.cursor_bg);
        }
        (cell_text(&text), style)
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Level {}: {} ", self.snapshot.level, self.snapshot.level_name);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .title(title);

        let inner = block.inner(area);
        block.render(area, buf);

        let cols = (inner.width / CELL_WIDTH) as usize;
        for y in 0..self.snapshot.height.min(inner.height as usize) {
            for x in 0..self.snapshot.width.min(cols) {
                let pos = GridPos::new(x as i32, y as i32);
                let Some(view) = self.snapshot.at(pos) else {
                    continue;
                };
                let (text, style) = self.cell_display(pos, view);
                buf.set_string(
                    inner.x + x as u16 * CELL_WIDTH,
                    inner.y + y as u16,
                    text,
                    style,
                );
            }
        }
    }
}
