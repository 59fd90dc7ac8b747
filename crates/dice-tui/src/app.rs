//! Application state and main UI controller

use std::collections::VecDeque;

use crossterm::event::{Event, KeyEventKind};
use log::debug;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use strum::IntoEnumIterator;

use dice_core::engine::TurnPhase;
use dice_core::entity::Stat;
use dice_core::progression::{MetaUpgrade, RunSummary};
use dice_core::{Campaign, GameError, GameEvent, GameRng, LevelEngine, Position, Stage};

use crate::display::{self, GlyphSet, GraphicsMode};
use crate::input::{Command, key_to_command};
use crate::theme::Theme;
use crate::widgets::{
    BoardWidget, MessagesWidget, MetaShopWidget, StatusWidget, UpgradeShopWidget, describe,
};

/// Lines kept in the message log
const MAX_MESSAGES: usize = 100;

pub struct App {
    campaign: Campaign,

    /// Board cell targeted by move and teleport commands
    cursor: Position,

    messages: VecDeque<String>,

    should_quit: bool,

    /// Seed for the next run; bumped after each start
    next_seed: u64,

    theme: Theme,

    glyph_set: Box<dyn GlyphSet>,
}

impl App {
    pub fn new(campaign: Campaign, seed: u64, theme: Theme, graphics_mode: GraphicsMode) -> Self {
        Self {
            campaign,
            cursor: Position::new(0, 0),
            messages: VecDeque::new(),
            should_quit: false,
            next_seed: seed,
            theme,
            glyph_set: display::detect_glyph_set(graphics_mode),
        }
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn messages(&self) -> &VecDeque<String> {
        &self.messages
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Add a line to the message log
    pub fn message(&mut self, text: impl Into<String>) {
        self.messages.push_back(text.into());
        while self.messages.len() > MAX_MESSAGES {
            self.messages.pop_front();
        }
    }

    /// Translate a terminal event into a command, if it maps to one
    pub fn handle_event(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => key_to_command(key),
            _ => None,
        }
    }

    pub fn execute(&mut self, command: Command) {
        debug!("command {command:?} while {}", self.campaign.stage().name());

        if command == Command::Quit {
            // leaving mid-run still banks what was earned
            self.campaign.abandon_run();
            self.should_quit = true;
            return;
        }

        let result = match self.campaign.stage() {
            Stage::Home | Stage::Finished(_) => self.execute_home(command),
            Stage::Playing(_) => self.execute_level(command),
            Stage::Upgrading { .. } => self.execute_shop(command),
        };
        if let Err(e) = result {
            self.message(e.to_string());
        }
        self.sync();
    }

    fn execute_home(&mut self, command: Command) -> Result<(), GameError> {
        match command {
            Command::Continue | Command::Confirm => {
                let seed = self.next_seed;
                self.next_seed = self.next_seed.wrapping_add(1);
                self.messages.clear();
                self.campaign.start_run(GameRng::new(seed))
            }
            Command::Select(index) => {
                let Some(upgrade) = MetaUpgrade::iter().nth(index) else {
                    return Ok(());
                };
                let level = self.campaign.buy_meta_upgrade(upgrade)?;
                self.message(format!("{upgrade} is now level {level}."));
                Ok(())
            }
            Command::Skip => {
                self.campaign.return_home();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn execute_level(&mut self, command: Command) -> Result<(), GameError> {
        let Some(engine) = self.campaign.engine_mut() else {
            return Ok(());
        };
        let phase = engine.phase();
        match (phase, command) {
            (TurnPhase::PlayerIdle, Command::Roll) => engine.roll().map(|_| ()),
            (TurnPhase::PlayerMoving { .. } | TurnPhase::ChoosingTeleport, Command::MoveCursor(dir)) => {
                let next = self.cursor.step(dir);
                if engine.grid().in_bounds(next) {
                    self.cursor = next;
                }
                Ok(())
            }
            (TurnPhase::PlayerMoving { .. }, Command::Confirm) => engine.move_to(self.cursor),
            (TurnPhase::PlayerMoving { .. }, Command::EndTurn) => engine.end_turn(),
            (TurnPhase::ChoosingTeleport, Command::Confirm) => engine.teleport_to(self.cursor),
            (TurnPhase::ChoosingStat { .. }, Command::Select(index)) => match Stat::iter().nth(index) {
                Some(stat) => engine.assign_item(stat),
                None => Ok(()),
            },
            (TurnPhase::LevelWon(_) | TurnPhase::LevelLost(_), Command::Continue | Command::Confirm) => {
                // flush the finished level's log before it is dropped
                let events = engine.drain_events();
                self.narrate(&events);
                self.campaign.advance()
            }
            _ => Ok(()),
        }
    }

    fn execute_shop(&mut self, command: Command) -> Result<(), GameError> {
        match command {
            Command::Select(index) => {
                let bought = self.campaign.buy_power_up(index)?;
                self.message(format!("Bought {bought}."));
                Ok(())
            }
            Command::Skip | Command::Continue => self.campaign.skip_upgrades(),
            _ => Ok(()),
        }
    }

    /// Pull engine events into the log and keep the cursor on the board
    fn sync(&mut self) {
        if let Some(engine) = self.campaign.engine_mut() {
            let events = engine.drain_events();
            let player = engine.grid().player_pos();
            let relocated = events.iter().any(|e| {
                matches!(
                    e,
                    GameEvent::LevelStarted { .. }
                        | GameEvent::Moved { .. }
                        | GameEvent::Teleported { .. }
                )
            });
            if relocated {
                self.cursor = player;
            }
            self.narrate(&events);
        }
    }

    fn narrate(&mut self, events: &[GameEvent]) {
        for event in events {
            if let Some(text) = describe(event) {
                self.message(text);
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        match self.campaign.stage() {
            Stage::Playing(engine) => self.render_level(frame, engine),
            Stage::Upgrading { session, run } => {
                self.render_log(frame, frame.area());
                let area = centered_rect(70, 60, frame.area());
                frame.render_widget(Clear, area);
                frame.render_widget(UpgradeShopWidget::new(session, &run.player, &self.theme), area);
            }
            Stage::Home => self.render_home(frame, None),
            Stage::Finished(summary) => self.render_home(frame, Some(summary)),
        }
    }

    fn render_home(&self, frame: &mut Frame, summary: Option<&RunSummary>) {
        let area = centered_rect(80, 70, frame.area());
        frame.render_widget(Clear, area);
        frame.render_widget(
            MetaShopWidget::new(self.campaign.meta(), summary, &self.theme),
            area,
        );
    }

    fn render_log(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(MessagesWidget::new(&self.messages, &self.theme), area);
    }

    fn render_level(&self, frame: &mut Frame, engine: &LevelEngine) {
        let snapshot = engine.snapshot();

        // Layout: board at top, status in middle, messages at bottom
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(snapshot.height as u16 + 2),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(frame.area());

        let cursor = matches!(
            snapshot.phase,
            TurnPhase::PlayerMoving { .. } | TurnPhase::ChoosingTeleport
        )
        .then_some(self.cursor);
        frame.render_widget(
            BoardWidget::new(&snapshot, &self.theme, self.glyph_set.as_ref()).cursor(cursor),
            chunks[0],
        );
        frame.render_widget(StatusWidget::new(&snapshot, &self.theme), chunks[1]);
        self.render_log(frame, chunks[2]);

        match snapshot.phase {
            TurnPhase::ChoosingStat { value } => self.render_stat_prompt(frame, value),
            TurnPhase::LevelWon(reason) => {
                self.render_banner(frame, &format!("Level won: {reason}"), self.theme.good);
            }
            TurnPhase::LevelLost(reason) => {
                self.render_banner(frame, &format!("Level lost: {reason}"), self.theme.bad);
            }
            _ => {}
        }
    }

    fn render_stat_prompt(&self, frame: &mut Frame, value: u32) {
        let area = centered_rect(40, 40, frame.area());
        frame.render_widget(Clear, area);

        let mut lines = vec![Line::from(format!("Apply +{value} to:")), Line::from("")];
        for (i, stat) in Stat::iter().enumerate() {
            lines.push(Line::from(format!("{}) {stat}", i + 1)));
        }
        let block = Block::default()
            .title(" Item ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_action));
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .style(Style::default().fg(self.theme.text)),
            area,
        );
    }

    fn render_banner(&self, frame: &mut Frame, text: &str, color: ratatui::style::Color) {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let lines = vec![
            Line::from(text.to_string()).style(Style::default().fg(color)),
            Line::from("Press n to continue").style(Style::default().fg(self.theme.text_dim)),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// A rect centered in `r`, sized as a percentage of it
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_core::GameConfig;
    use dice_core::entity::StatRange;
    use dice_core::grid::Direction as Dir;
    use dice_core::level::{LevelDef, Layout as LevelLayout};
    use dice_core::store::MemoryStore;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn app(rows: &[&str]) -> App {
        let mut config = GameConfig::default();
        config.player.hp = Some(3);
        config.player.damage = StatRange::new(5, 5);
        let level = LevelDef {
            name: "Corridor".to_string(),
            min_items: 0,
            max_items: 0,
            layout: Some(LevelLayout::from_rows(rows)),
            ..LevelDef::procedural(1)
        };
        let campaign = Campaign::new(config, vec![level], Box::new(MemoryStore::new()));
        App::new(campaign, 7, Theme::dark(), GraphicsMode::Classic)
    }

    fn draw(app: &App) {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[test]
    fn test_play_a_level_through_commands() {
        let mut app = app(&["P -1 ."]);
        draw(&app);

        app.execute(Command::Continue);
        assert!(matches!(app.campaign().stage(), Stage::Playing(_)));
        assert_eq!(app.cursor(), Position::new(0, 0));
        assert!(app.messages().iter().any(|m| m.starts_with("Level 1")));

        // cursor only moves once there are steps to spend
        app.execute(Command::MoveCursor(Dir::Right));
        assert_eq!(app.cursor(), Position::new(0, 0));

        app.execute(Command::Roll);
        app.execute(Command::MoveCursor(Dir::Right));
        assert_eq!(app.cursor(), Position::new(1, 0));
        draw(&app);
        app.execute(Command::Confirm);

        let phase = app.campaign().engine().map(|e| e.phase());
        assert!(matches!(phase, Some(TurnPhase::LevelWon(_))));
        draw(&app);

        app.execute(Command::Continue);
        assert!(matches!(app.campaign().stage(), Stage::Finished(s) if s.won));
        assert!(app.messages().iter().any(|m| m.starts_with("Level won")));
        draw(&app);
    }

    #[test]
    fn test_cursor_stays_on_the_board() {
        let mut app = app(&["P -1 ."]);
        app.execute(Command::Continue);
        app.execute(Command::Roll);
        app.execute(Command::MoveCursor(Dir::Up));
        app.execute(Command::MoveCursor(Dir::Left));
        assert_eq!(app.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_quit_mid_run_banks_the_run() {
        let mut app = app(&["P -1 ."]);
        app.execute(Command::Continue);
        app.execute(Command::Quit);
        assert!(app.should_quit());
        assert_eq!(app.campaign().meta().stats.runs_started, 1);
        assert!(matches!(app.campaign().stage(), Stage::Finished(s) if !s.won));
    }

    #[test]
    fn test_meta_shop_rejects_when_broke() {
        let mut app = app(&["P -1 ."]);
        app.execute(Command::Select(0));
        assert_eq!(app.campaign().meta().level(MetaUpgrade::Vitality), 0);
        assert_eq!(app.messages().len(), 1);
        draw(&app);
    }
}
