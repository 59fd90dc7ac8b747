//! Level engine: the turn state machine
//!
//! A [`LevelEngine`] owns the board and the [`RunState`] for the duration of
//! one level. The presentation layer drives it with commands
//! ([`LevelEngine::roll`], [`LevelEngine::move_to`], ...), drains the
//! resulting [`GameEvent`]s to animate them, and reads
//! [`LevelEngine::snapshot`] to draw. Nothing here sleeps or blocks.
//!
//! A round is:
//!
//! ```text
//! PlayerIdle -> PlayerRolling -> PlayerMoving* -> PlayerTurnEnd
//!            -> EnemyPhase -> TurnCheck -> PlayerIdle | LevelWon | LevelLost
//! ```
//!
//! Movement can pause in `ChoosingStat` (item pickup) or `ChoosingTeleport`.

mod checks;
mod event;
mod phase;
mod snapshot;
mod spawn;

pub use checks::{
    CheckOutcome, CheckRules, LossReason, WinReason, check_level, is_unwinnable,
    max_possible_player_power,
};
pub use event::{Actor, GameEvent};
pub use phase::TurnPhase;
pub use snapshot::{BoardSnapshot, CellMarks, CellView};
pub use spawn::{PendingSpawn, SpawnTick, tick_spawns};

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::ai;
use crate::combat::{self, Side};
use crate::config::GameConfig;
use crate::entity::{Combatant, EnemyId, ItemId, Player, Stat};
use crate::error::GameError;
use crate::grid::{Grid, Occupant, Position, Terrain};
use crate::hazard::{self, HazardOutcome};
use crate::level::LevelDef;
use crate::path::{Passability, Reachable, reachable_cells, shortest_path};
use crate::progression::RunState;

/// Result of entering one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepResult {
    /// Keep walking
    Continue,
    /// Waiting for a player choice
    Paused,
    /// Movement stops here
    Halted,
    LevelOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FightResult {
    Won,
    Lost,
    Rejected,
}

/// How the player arrives on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrival {
    Walk,
    Teleport,
}

/// What happens once the pending stat choice is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterChoice {
    /// Apply the cell's hazard, then keep moving
    ResumeMove { hazard_at: Position, remaining: u32 },
    EndTurn,
}

pub struct LevelEngine {
    def: LevelDef,
    config: GameConfig,
    grid: Grid,
    run: RunState,
    phase: TurnPhase,
    last_roll: Option<u32>,
    round: u32,
    /// Cells still to enter on the current move
    queued_path: VecDeque<Position>,
    after_choice: AfterChoice,
    events: VecDeque<GameEvent>,
}

impl LevelEngine {
    /// Start a level, building its board from the definition
    pub fn new(def: LevelDef, config: GameConfig, mut run: RunState) -> Result<Self, GameError> {
        let grid = def.build_grid(&config, &mut run.rng)?;
        Ok(Self::with_grid(def, config, run, grid))
    }

    /// Start a level on a prepared board
    pub fn with_grid(def: LevelDef, config: GameConfig, mut run: RunState, grid: Grid) -> Self {
        run.pending_spawns.clear();
        let mut engine = Self {
            def,
            config,
            grid,
            run,
            phase: TurnPhase::PlayerIdle,
            last_roll: None,
            round: 1,
            queued_path: VecDeque::new(),
            after_choice: AfterChoice::EndTurn,
            events: VecDeque::new(),
        };
        info!(
            "level {} '{}' started: {} enemies, {} items",
            engine.def.level,
            engine.def.name,
            engine.grid.enemy_count(),
            engine.grid.items().len()
        );
        engine.emit(GameEvent::LevelStarted {
            level: engine.def.level,
            name: engine.def.name.clone(),
        });
        engine.run_checks(true);
        engine
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.run.player
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn def(&self) -> &LevelDef {
        &self.def
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn last_roll(&self) -> Option<u32> {
        self.last_roll
    }

    /// Hand the run back once the level is over
    pub fn into_run(self) -> RunState {
        self.run
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    fn set_phase(&mut self, phase: TurnPhase) {
        debug!("phase: {} -> {}", self.phase, phase);
        self.phase = phase;
        self.emit(GameEvent::PhaseChanged(phase));
    }

    fn illegal(&self) -> GameError {
        GameError::IllegalAction(self.phase.to_string())
    }

    // ------------------------------------------------------------------
    // Player commands
    // ------------------------------------------------------------------

    /// Roll the movement die for this turn
    pub fn roll(&mut self) -> Result<u32, GameError> {
        if self.phase != TurnPhase::PlayerIdle {
            return Err(self.illegal());
        }
        self.set_phase(TurnPhase::PlayerRolling);
        let roll = self.run.rng.roll(self.run.player.speed);
        self.last_roll = Some(roll);
        self.emit(GameEvent::PlayerRolled(roll));
        if roll == 0 {
            self.end_player_turn();
        } else {
            self.set_phase(TurnPhase::PlayerMoving { remaining: roll });
        }
        Ok(roll)
    }

    /// Cells the player can move to with the steps left
    pub fn reachable(&self) -> Reachable {
        match self.phase {
            TurnPhase::PlayerMoving { remaining } => reachable_cells(
                &self.grid,
                self.grid.player_pos(),
                remaining,
                Passability::Player,
            ),
            _ => Reachable::default(),
        }
    }

    /// Walk to a reachable cell, spending one step per cell entered
    pub fn move_to(&mut self, dest: Position) -> Result<(), GameError> {
        let TurnPhase::PlayerMoving { remaining } = self.phase else {
            return Err(self.illegal());
        };
        let path = shortest_path(
            &self.grid,
            self.grid.player_pos(),
            dest,
            remaining,
            Passability::Player,
        )?;
        self.queued_path = path.into();
        self.advance_player();
        Ok(())
    }

    /// Give up the remaining steps
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        if !matches!(self.phase, TurnPhase::PlayerMoving { .. }) {
            return Err(self.illegal());
        }
        self.end_player_turn();
        Ok(())
    }

    /// Put the value of the item just picked up into a stat
    pub fn assign_item(&mut self, stat: Stat) -> Result<(), GameError> {
        let TurnPhase::ChoosingStat { value } = self.phase else {
            return Err(self.illegal());
        };
        self.run.player.apply_item(stat, value);
        self.emit(GameEvent::ItemAssigned { stat, value });

        match std::mem::replace(&mut self.after_choice, AfterChoice::EndTurn) {
            AfterChoice::ResumeMove {
                hazard_at,
                remaining,
            } => {
                self.set_phase(TurnPhase::PlayerMoving { remaining });
                match self.apply_player_hazard(hazard_at) {
                    StepResult::Paused | StepResult::LevelOver => return Ok(()),
                    StepResult::Halted => {
                        self.queued_path.clear();
                        self.set_phase(TurnPhase::PlayerMoving { remaining: 0 });
                    }
                    StepResult::Continue => {}
                }
                if self.run_checks(false) {
                    return Ok(());
                }
                self.advance_player();
            }
            AfterChoice::EndTurn => {
                if !self.run_checks(false) {
                    self.end_player_turn();
                }
            }
        }
        Ok(())
    }

    /// Finish a teleport by picking where to land
    pub fn teleport_to(&mut self, dest: Position) -> Result<(), GameError> {
        if self.phase != TurnPhase::ChoosingTeleport {
            return Err(self.illegal());
        }
        if !hazard::player_teleport_targets(&self.grid).contains(&dest) {
            return Err(GameError::InvalidPlacement {
                what: "player",
                pos: dest,
                reason: "not a teleport destination",
            });
        }
        self.set_phase(TurnPhase::PlayerMoving { remaining: 0 });
        match self.enter_cell_as_player(dest, Arrival::Teleport) {
            StepResult::Paused | StepResult::LevelOver => {}
            StepResult::Continue | StepResult::Halted => {
                if !self.run_checks(false) {
                    self.end_player_turn();
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Player movement
    // ------------------------------------------------------------------

    fn advance_player(&mut self) {
        while let Some(next) = self.queued_path.pop_front() {
            let remaining = self.phase.remaining_steps().saturating_sub(1);
            self.set_phase(TurnPhase::PlayerMoving { remaining });
            match self.enter_cell_as_player(next, Arrival::Walk) {
                StepResult::Continue => {}
                StepResult::Paused | StepResult::LevelOver => return,
                StepResult::Halted => {
                    self.queued_path.clear();
                    self.set_phase(TurnPhase::PlayerMoving { remaining: 0 });
                }
            }
        }
        if self.phase.remaining_steps() == 0 {
            self.end_player_turn();
        }
    }

    fn enter_cell_as_player(&mut self, pos: Position, arrival: Arrival) -> StepResult {
        let Some(cell) = self.grid.cell(pos).copied() else {
            return StepResult::Halted;
        };

        let mut picked = None;
        match cell.occupant {
            Occupant::Enemy(id) => match self.fight(id) {
                FightResult::Won => {}
                FightResult::Lost => return StepResult::LevelOver,
                FightResult::Rejected => return StepResult::Halted,
            },
            Occupant::Item(id) => picked = self.grid.remove_item(id).map(|item| item.value),
            Occupant::Empty | Occupant::Player => {}
        }

        let from = self.grid.player_pos();
        if let Err(e) = self.grid.move_player(pos) {
            warn!("player could not enter {pos}: {e}");
            return StepResult::Halted;
        }
        self.emit(match arrival {
            Arrival::Walk => GameEvent::Moved {
                actor: Actor::Player,
                from,
                to: pos,
            },
            Arrival::Teleport => GameEvent::Teleported {
                actor: Actor::Player,
                from,
                to: pos,
            },
        });

        if let Some(amount) = self.grid.take_gold(pos) {
            self.run.add_gold(amount);
            self.emit(GameEvent::GoldCollected { amount });
        }

        if let Some(value) = picked {
            self.after_choice = match arrival {
                Arrival::Walk => AfterChoice::ResumeMove {
                    hazard_at: pos,
                    remaining: self.phase.remaining_steps(),
                },
                Arrival::Teleport => AfterChoice::EndTurn,
            };
            self.emit(GameEvent::ItemPickedUp { value });
            self.set_phase(TurnPhase::ChoosingStat { value });
            return StepResult::Paused;
        }

        if arrival == Arrival::Walk {
            let step = self.apply_player_hazard(pos);
            if step != StepResult::Continue {
                return step;
            }
        }

        if self.run_checks(false) {
            return StepResult::LevelOver;
        }
        StepResult::Continue
    }

    fn apply_player_hazard(&mut self, pos: Position) -> StepResult {
        let terrain = self.grid.cell(pos).map_or(Terrain::Floor, |c| c.terrain);
        let outcome = hazard::apply_hazard(terrain, &mut self.run.player, &mut self.run.rng);
        if outcome == HazardOutcome::Nothing {
            return StepResult::Continue;
        }
        self.emit(GameEvent::HazardTriggered {
            actor: Actor::Player,
            pos,
            outcome,
        });

        if outcome.is_fatal() {
            self.lose(LossReason::Defeated);
            return StepResult::LevelOver;
        }
        if outcome == HazardOutcome::Teleport {
            self.queued_path.clear();
            if hazard::player_teleport_targets(&self.grid).is_empty() {
                return StepResult::Halted;
            }
            self.set_phase(TurnPhase::ChoosingTeleport);
            return StepResult::Paused;
        }
        if outcome.halts_movement() {
            return StepResult::Halted;
        }
        StepResult::Continue
    }

    /// Player vs enemy. The player always strikes first.
    fn fight(&mut self, id: EnemyId) -> FightResult {
        let Some(mut enemy) = self.grid.enemy(id).copied() else {
            return FightResult::Rejected;
        };
        let report = match combat::resolve(
            self.config.combat,
            &mut self.run.player,
            &mut enemy,
            &mut self.run.rng,
        ) {
            Ok(report) => report,
            Err(e) => {
                warn!("combat with {} rejected: {e}", enemy.label());
                return FightResult::Rejected;
            }
        };
        let won = report.winner == Side::Player;
        self.emit(GameEvent::Combat { enemy: id, report });

        if won {
            self.grid.remove_enemy(id);
            self.run.stats.enemies_defeated += 1;
            self.emit(GameEvent::EnemyDefeated {
                enemy: id,
                pos: enemy.pos,
            });
            self.drop_bag(enemy.pos);
            FightResult::Won
        } else {
            if let Some(slot) = self.grid.enemy_mut(id) {
                *slot = enemy;
            }
            self.lose(LossReason::Defeated);
            FightResult::Lost
        }
    }

    fn drop_bag(&mut self, pos: Position) {
        let amount = self.def.gold_per_bag;
        if amount == 0 {
            return;
        }
        self.grid.drop_gold(pos, amount);
        self.emit(GameEvent::GoldDropped { pos, amount });
    }

    // ------------------------------------------------------------------
    // Enemy phase and round end
    // ------------------------------------------------------------------

    fn end_player_turn(&mut self) {
        self.queued_path.clear();
        self.set_phase(TurnPhase::PlayerTurnEnd);
        if self.run_checks(false) {
            return;
        }

        self.set_phase(TurnPhase::EnemyPhase);
        self.enemy_phase();
        if self.phase.is_over() {
            return;
        }

        self.end_round();
        self.set_phase(TurnPhase::TurnCheck);
        if self.run_checks(false) {
            return;
        }
        self.round += 1;
        self.last_roll = None;
        self.set_phase(TurnPhase::PlayerIdle);
    }

    fn enemy_phase(&mut self) {
        let ids: Vec<EnemyId> = self.grid.enemies().iter().map(|e| e.id).collect();
        for id in ids {
            if self.grid.enemy(id).is_none() {
                continue;
            }
            let power = self.run.player.power();
            let Some(plan) = ai::plan_move(&self.grid, id, power, &mut self.run.rng) else {
                continue;
            };
            self.emit(GameEvent::EnemyRolled {
                enemy: id,
                roll: plan.roll,
                intent: plan.intent,
            });
            for next in plan.path {
                if self.enter_cell_as_enemy(id, next) != StepResult::Continue {
                    break;
                }
            }
            if self.phase.is_over() || self.run_checks(false) {
                return;
            }
        }
    }

    fn enter_cell_as_enemy(&mut self, id: EnemyId, pos: Position) -> StepResult {
        let Some(cell) = self.grid.cell(pos).copied() else {
            return StepResult::Halted;
        };
        if !cell.is_walkable() {
            return StepResult::Halted;
        }
        match cell.occupant {
            Occupant::Player => {
                return match self.fight(id) {
                    FightResult::Lost => StepResult::LevelOver,
                    FightResult::Won | FightResult::Rejected => StepResult::Halted,
                };
            }
            Occupant::Enemy(_) => return StepResult::Halted,
            Occupant::Item(item) => self.enemy_eats(id, item),
            Occupant::Empty => {}
        }

        let Some(from) = self.grid.enemy(id).map(|e| e.pos) else {
            return StepResult::Halted;
        };
        if self.grid.move_enemy(id, pos).is_err() {
            return StepResult::Halted;
        }
        self.emit(GameEvent::Moved {
            actor: Actor::Enemy(id),
            from,
            to: pos,
        });

        let Some(enemy) = self.grid.enemy_mut(id) else {
            return StepResult::Halted;
        };
        let outcome = hazard::apply_hazard(cell.terrain, enemy, &mut self.run.rng);
        if outcome == HazardOutcome::Nothing {
            return StepResult::Continue;
        }
        self.emit(GameEvent::HazardTriggered {
            actor: Actor::Enemy(id),
            pos,
            outcome,
        });

        if outcome.is_fatal() {
            self.grid.remove_enemy(id);
            self.emit(GameEvent::EnemyDied { enemy: id, pos });
            return StepResult::Halted;
        }
        if outcome == HazardOutcome::Teleport {
            return self.teleport_enemy(id, pos);
        }
        if outcome.halts_movement() {
            return StepResult::Halted;
        }
        StepResult::Continue
    }

    fn enemy_eats(&mut self, id: EnemyId, item: ItemId) {
        let Some(item) = self.grid.remove_item(item) else {
            return;
        };
        if let Some(enemy) = self.grid.enemy_mut(id) {
            enemy.absorb(item.value);
        }
        self.emit(GameEvent::EnemyAteItem {
            enemy: id,
            value: item.value,
        });
    }

    /// Throw an enemy to a random cell; landing on the player means a fight
    fn teleport_enemy(&mut self, id: EnemyId, from: Position) -> StepResult {
        let targets = hazard::enemy_teleport_targets(&self.grid, from);
        let Some(&dest) = self.run.rng.choose(&targets) else {
            return StepResult::Halted;
        };
        let occupant = self.grid.cell(dest).map(|c| c.occupant);
        match occupant {
            Some(Occupant::Player) => {
                if self.fight(id) == FightResult::Lost {
                    return StepResult::LevelOver;
                }
                return StepResult::Halted;
            }
            Some(Occupant::Item(item)) => self.enemy_eats(id, item),
            _ => {}
        }
        if self.grid.move_enemy(id, dest).is_ok() {
            self.emit(GameEvent::Teleported {
                actor: Actor::Enemy(id),
                from,
                to: dest,
            });
        }
        StepResult::Halted
    }

    fn end_round(&mut self) {
        let ticks = tick_spawns(
            &mut self.grid,
            &mut self.run.pending_spawns,
            &self.def,
            self.config.spawn_item_value,
            &mut self.run.rng,
        );
        for tick in ticks {
            self.emit(match tick {
                SpawnTick::Scheduled { pos, turns } => GameEvent::SpawnScheduled { pos, turns },
                SpawnTick::Spawned { pos, value } => GameEvent::ItemSpawned { pos, value },
                SpawnTick::Dropped => GameEvent::SpawnDropped,
            });
        }
    }

    // ------------------------------------------------------------------
    // Checks and level end
    // ------------------------------------------------------------------

    /// Value the pending spawns could add at most
    fn pending_value(&self) -> u32 {
        (self.run.pending_spawns.len() as u32).saturating_mul(self.config.spawn_item_value.max)
    }

    /// Run the turn checks; true when the level just ended
    fn run_checks(&mut self, level_start: bool) -> bool {
        if self.phase.is_over() {
            return true;
        }
        let rules = CheckRules {
            instant_win: self.config.instant_win,
            detect_unwinnable: self.config.detect_unwinnable,
            level_start,
        };
        match check_level(&self.grid, &self.run.player, self.pending_value(), rules) {
            CheckOutcome::Continue => false,
            CheckOutcome::Won(reason) => {
                self.win(reason);
                true
            }
            CheckOutcome::Lost(reason) => {
                self.lose(reason);
                true
            }
        }
    }

    fn win(&mut self, reason: WinReason) {
        if reason == WinReason::Overpowered {
            let remaining: Vec<(EnemyId, Position)> =
                self.grid.enemies().iter().map(|e| (e.id, e.pos)).collect();
            for (id, pos) in remaining {
                self.grid.remove_enemy(id);
                self.run.stats.enemies_defeated += 1;
                self.emit(GameEvent::EnemyDefeated { enemy: id, pos });
                self.drop_bag(pos);
            }
        }
        let gold = self.def.gold_per_level.saturating_add(self.grid.sweep_gold());
        self.run.add_gold(gold);
        self.run.stats.levels_cleared += 1;
        self.queued_path.clear();
        info!(
            "level {} won ({reason}) in {} rounds, +{gold} gold",
            self.def.level, self.round
        );
        self.set_phase(TurnPhase::LevelWon(reason));
        self.emit(GameEvent::LevelWon { reason, gold });
    }

    fn lose(&mut self, reason: LossReason) {
        self.queued_path.clear();
        info!("level {} lost: {reason}", self.def.level);
        self.set_phase(TurnPhase::LevelLost(reason));
        self.emit(GameEvent::LevelLost(reason));
    }

    /// Read-only view of the board for drawing
    pub fn snapshot(&self) -> BoardSnapshot {
        let reachable = self.reachable();
        let teleport_targets = if self.phase == TurnPhase::ChoosingTeleport {
            hazard::player_teleport_targets(&self.grid)
        } else {
            Vec::new()
        };
        BoardSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            cells: BoardSnapshot::capture(
                &self.grid,
                &reachable,
                &teleport_targets,
                &self.run.pending_spawns,
            ),
            player: self.run.player,
            player_pos: self.grid.player_pos(),
            enemies: self.grid.enemies().to_vec(),
            items: self.grid.items().to_vec(),
            phase: self.phase,
            last_roll: self.last_roll,
            round: self.round,
            level: self.def.level,
            level_name: self.def.name.clone(),
            run_gold: self.run.gold,
            pending_spawns: self.run.pending_spawns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Enemy, StatRange};
    use crate::grid::{EntityRef, Hazard, Spawn};
    use crate::rng::GameRng;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn run_with(hp: u32, speed: StatRange) -> RunState {
        RunState::new(
            Player::new(hp, StatRange::new(1, 2), speed, StatRange::new(1, 2)),
            GameRng::new(42),
        )
    }

    fn def() -> LevelDef {
        LevelDef {
            min_items: 0,
            max_items: 0,
            ..LevelDef::procedural(1)
        }
    }

    fn engine(grid: Grid, run: RunState) -> LevelEngine {
        LevelEngine::with_grid(def(), GameConfig::default(), run, grid)
    }

    #[test]
    fn test_commands_rejected_in_wrong_phase() {
        let mut grid = Grid::new(4, 4);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(3, 3)).unwrap();
        grid.place_entity(Spawn::Item(1), pos(3, 0)).unwrap();
        let mut eng = engine(grid, run_with(2, StatRange::new(1, 1)));
        assert!(matches!(eng.move_to(pos(1, 0)), Err(GameError::IllegalAction(_))));
        assert!(eng.assign_item(Stat::Hp).is_err());
        assert!(eng.teleport_to(pos(1, 1)).is_err());
        assert!(eng.end_turn().is_err());
        eng.roll().unwrap();
        assert!(eng.roll().is_err());
    }

    #[test]
    fn test_unreachable_destination_changes_nothing() {
        let mut grid = Grid::new(4, 4);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(3, 3)).unwrap();
        grid.place_entity(Spawn::Item(1), pos(3, 0)).unwrap();
        let mut eng = engine(grid, run_with(2, StatRange::new(1, 1)));
        eng.roll().unwrap();
        let err = eng.move_to(pos(2, 2)).unwrap_err();
        assert_eq!(err, GameError::NoPathFound(pos(2, 2)));
        assert_eq!(eng.grid().player_pos(), pos(0, 0));
        assert_eq!(eng.phase(), TurnPhase::PlayerMoving { remaining: 1 });
    }

    #[test]
    fn test_multiple_moves_share_the_roll() {
        let mut grid = Grid::new(6, 6);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(5, 5)).unwrap();
        grid.place_entity(Spawn::Item(1), pos(5, 0)).unwrap();
        let mut eng = engine(grid, run_with(3, StatRange::new(3, 3)));
        assert_eq!(eng.roll().unwrap(), 3);
        eng.move_to(pos(1, 0)).unwrap();
        assert_eq!(eng.phase(), TurnPhase::PlayerMoving { remaining: 2 });
        eng.move_to(pos(1, 2)).unwrap();
        assert_eq!(eng.grid().player_pos(), pos(1, 2));
        // budget spent: enemies moved and a new round began
        assert!(matches!(
            eng.phase(),
            TurnPhase::PlayerIdle | TurnPhase::LevelWon(_) | TurnPhase::LevelLost(_)
        ));
    }

    #[test]
    fn test_item_pickup_pauses_then_applies_hazard() {
        let mut grid = Grid::new(5, 5);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(4, 4)).unwrap();
        grid.place_entity(Spawn::Item(3), pos(1, 0)).unwrap();
        grid.place_entity(Spawn::Item(1), pos(4, 0)).unwrap();
        grid.set_terrain(pos(1, 0), Terrain::Hazard(Hazard::Damage { amount: 1 }))
            .unwrap();
        let mut eng = engine(grid, run_with(4, StatRange::new(2, 2)));
        eng.roll().unwrap();
        eng.move_to(pos(2, 0)).unwrap();
        assert_eq!(eng.phase(), TurnPhase::ChoosingStat { value: 3 });
        assert_eq!(eng.grid().player_pos(), pos(1, 0));

        eng.assign_item(Stat::Damage).unwrap();
        assert_eq!(eng.player().damage, StatRange::new(1, 5));
        assert_eq!(eng.player().hp.current, 3);
        assert_eq!(eng.grid().player_pos(), pos(2, 0));
    }

    #[test]
    fn test_trap_halts_movement() {
        let mut grid = Grid::new(5, 1);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(4, 0)).unwrap();
        grid.place_entity(Spawn::Item(1), pos(3, 0)).unwrap();
        grid.set_terrain(
            pos(1, 0),
            Terrain::Hazard(Hazard::Trap {
                amount: 1,
                skip_percent: 0,
            }),
        )
        .unwrap();
        let mut eng = engine(grid, run_with(5, StatRange::new(3, 3)));
        eng.roll().unwrap();
        eng.move_to(pos(2, 0)).unwrap();
        let events = eng.drain_events();
        assert!(events.contains(&GameEvent::Moved {
            actor: Actor::Player,
            from: pos(0, 0),
            to: pos(1, 0),
        }));
        assert!(!events.iter().any(|e| matches!(
            e,
            GameEvent::Moved {
                actor: Actor::Player,
                to,
                ..
            } if *to == pos(2, 0)
        )));
        assert_eq!(eng.player().hp.current, 4);
        // the halt is announced before the turn ends
        let halted = events
            .iter()
            .position(|e| *e == GameEvent::PhaseChanged(TurnPhase::PlayerMoving { remaining: 0 }))
            .unwrap();
        let ended = events
            .iter()
            .position(|e| *e == GameEvent::PhaseChanged(TurnPhase::PlayerTurnEnd))
            .unwrap();
        assert!(halted < ended);
    }

    #[test]
    fn test_teleport_prompts_for_destination() {
        let mut grid = Grid::new(5, 5);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(4, 4)).unwrap();
        grid.place_entity(Spawn::Item(1), pos(0, 4)).unwrap();
        grid.set_terrain(pos(1, 0), Terrain::Hazard(Hazard::Teleport))
            .unwrap();
        let mut eng = engine(grid, run_with(3, StatRange::new(3, 3)));
        eng.roll().unwrap();
        eng.move_to(pos(2, 0)).unwrap();
        assert_eq!(eng.phase(), TurnPhase::ChoosingTeleport);
        assert_eq!(eng.grid().player_pos(), pos(1, 0));
        assert!(eng.snapshot().at(pos(3, 3)).unwrap().marks.contains(CellMarks::TELEPORT_TARGET));

        assert!(eng.teleport_to(pos(1, 0)).is_err());
        eng.teleport_to(pos(3, 3)).unwrap();
        let events = eng.drain_events();
        assert!(events.contains(&GameEvent::Teleported {
            actor: Actor::Player,
            from: pos(1, 0),
            to: pos(3, 3),
        }));
        let landed = events
            .iter()
            .position(|e| matches!(e, GameEvent::Teleported { .. }))
            .unwrap();
        assert_eq!(
            events[landed - 1],
            GameEvent::PhaseChanged(TurnPhase::PlayerMoving { remaining: 0 })
        );
        assert_ne!(eng.phase(), TurnPhase::ChoosingTeleport);
    }

    #[test]
    fn test_player_kill_drops_and_collects_gold() {
        let mut grid = Grid::new(4, 1);
        let EntityRef::Enemy(id) = grid
            .place_entity(Spawn::Enemy(Enemy::new(1)), pos(1, 0))
            .unwrap()
        else {
            panic!("expected enemy");
        };
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(3, 0)).unwrap();
        grid.place_entity(Spawn::Item(1), pos(2, 0)).unwrap();
        let mut eng = engine(grid, run_with(3, StatRange::new(2, 2)));
        eng.roll().unwrap();
        eng.move_to(pos(1, 0)).unwrap();
        assert_eq!(eng.phase(), TurnPhase::PlayerMoving { remaining: 1 });
        let events = eng.drain_events();
        assert!(events.contains(&GameEvent::EnemyDefeated {
            enemy: id,
            pos: pos(1, 0)
        }));
        assert!(events.contains(&GameEvent::GoldCollected { amount: 5 }));
        assert_eq!(eng.run().gold, 5);
        assert_eq!(eng.run().stats.enemies_defeated, 1);
    }

    #[test]
    fn test_level_start_only_checks_losses() {
        let mut grid = Grid::new(3, 3);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(2, 2)).unwrap();
        let eng = engine(grid, run_with(2, StatRange::new(1, 1)));
        // no items and the player outclasses the enemy, but nothing happened yet
        assert_eq!(eng.phase(), TurnPhase::PlayerIdle);
    }

    #[test]
    fn test_instant_win_mops_up() {
        let mut grid = Grid::new(3, 3);
        grid.place_entity(Spawn::Enemy(Enemy::new(1)), pos(2, 2)).unwrap();
        let mut eng = engine(grid, run_with(2, StatRange::new(1, 1)));
        eng.roll().unwrap();
        eng.move_to(pos(1, 0)).unwrap();
        assert_eq!(eng.phase(), TurnPhase::LevelWon(WinReason::Overpowered));
        assert_eq!(eng.grid().enemy_count(), 0);
        // bag swept plus level bonus
        assert_eq!(eng.run().gold, 5 + 10);
    }
}
