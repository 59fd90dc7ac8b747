//! Campaign: sequences levels, upgrade sessions and meta progression
//!
//! ```text
//! Home -> Playing -> Upgrading -> Playing -> ... -> Finished -> Home
//! ```

use log::{info, warn};

use super::{MetaProgress, MetaUpgrade, PowerUp, RunState, UpgradeSession};
use crate::config::GameConfig;
use crate::engine::{LevelEngine, LossReason, TurnPhase};
use crate::error::GameError;
use crate::level::{LevelDef, builtin_levels};
use crate::rng::GameRng;
use crate::store::KeyValueStore;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub won: bool,
    /// Why the run was lost, if it was
    pub loss: Option<LossReason>,
    /// Level number the run ended on
    pub reached_level: u32,
    pub levels_cleared: u32,
    pub enemies_defeated: u32,
    /// Run gold banked into lifetime gold
    pub gold: u32,
}

pub enum Stage {
    Home,
    Playing(Box<LevelEngine>),
    Upgrading {
        session: UpgradeSession,
        run: Box<RunState>,
    },
    Finished(RunSummary),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Home => "at home",
            Stage::Playing(_) => "playing a level",
            Stage::Upgrading { .. } => "upgrading",
            Stage::Finished(_) => "between runs",
        }
    }
}

pub struct Campaign {
    config: GameConfig,
    levels: Vec<LevelDef>,
    meta: MetaProgress,
    store: Box<dyn KeyValueStore>,
    stage: Stage,
}

impl Campaign {
    /// A campaign over `levels`, with meta progression read from `store`
    ///
    /// An empty level list is replaced by the built-in catalog.
    pub fn new(config: GameConfig, levels: Vec<LevelDef>, store: Box<dyn KeyValueStore>) -> Self {
        let levels = if levels.is_empty() {
            warn!("no levels given, using the built-in catalog");
            builtin_levels()
        } else {
            levels
        };
        let meta = MetaProgress::load(store.as_ref());
        Self {
            config,
            levels,
            meta,
            store,
            stage: Stage::Home,
        }
    }

    pub fn with_builtin_levels(config: GameConfig, store: Box<dyn KeyValueStore>) -> Self {
        Self::new(config, builtin_levels(), store)
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn levels(&self) -> &[LevelDef] {
        &self.levels
    }

    pub fn meta(&self) -> &MetaProgress {
        &self.meta
    }

    /// The level being played, if any
    pub fn engine(&self) -> Option<&LevelEngine> {
        match &self.stage {
            Stage::Playing(engine) => Some(engine.as_ref()),
            _ => None,
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut LevelEngine> {
        match &mut self.stage {
            Stage::Playing(engine) => Some(engine.as_mut()),
            _ => None,
        }
    }

    fn illegal(&self) -> GameError {
        GameError::IllegalAction(self.stage.name().to_string())
    }

    /// Begin a fresh run from the first level
    pub fn start_run(&mut self, rng: GameRng) -> Result<(), GameError> {
        if !matches!(self.stage, Stage::Home | Stage::Finished(_)) {
            return Err(self.illegal());
        }
        let Some(first) = self.levels.first() else {
            return Err(GameError::InvalidLayout("no levels to play".to_string()));
        };
        let mut player = self.config.player.build(first.player_start_value);
        self.meta.apply_to(&mut player);
        self.meta.stats.runs_started += 1;
        self.persist();
        info!("run started with seed {}", rng.seed());
        self.start_level(RunState::new(player, rng))
    }

    /// Build the run's current level; a level that cannot be built ends the run
    fn start_level(&mut self, mut run: RunState) -> Result<(), GameError> {
        let built = match self.levels.get(run.level_index).cloned() {
            Some(def) => def
                .build_grid(&self.config, &mut run.rng)
                .map(|grid| (def, grid)),
            None => Err(GameError::InvalidLayout(format!(
                "no level at index {}",
                run.level_index
            ))),
        };
        match built {
            Ok((def, grid)) => {
                let engine = LevelEngine::with_grid(def, self.config.clone(), run, grid);
                self.stage = Stage::Playing(Box::new(engine));
                Ok(())
            }
            Err(e) => {
                warn!("level {} could not be built: {e}", run.level_index + 1);
                self.finish(run, Some(LossReason::Defeated));
                Err(e)
            }
        }
    }

    /// Move on once the current level is decided or the shop is closed
    pub fn advance(&mut self) -> Result<(), GameError> {
        match std::mem::replace(&mut self.stage, Stage::Home) {
            Stage::Playing(engine) => match engine.phase() {
                TurnPhase::LevelWon(_) => {
                    let mut run = engine.into_run();
                    run.level_index += 1;
                    if run.level_index >= self.levels.len() {
                        self.finish(run, None);
                        return Ok(());
                    }
                    let session =
                        UpgradeSession::new(&run.player, self.config.powerup_offers, &mut run.rng);
                    self.stage = Stage::Upgrading {
                        session,
                        run: Box::new(run),
                    };
                    self.leave_shop_if_done()
                }
                TurnPhase::LevelLost(reason) => {
                    self.finish(engine.into_run(), Some(reason));
                    Ok(())
                }
                _ => {
                    self.stage = Stage::Playing(engine);
                    Err(self.illegal())
                }
            },
            Stage::Upgrading { mut session, run } => {
                session.skip();
                self.stage = Stage::Upgrading { session, run };
                self.leave_shop_if_done()
            }
            Stage::Finished(_) => Ok(()),
            Stage::Home => Err(self.illegal()),
        }
    }

    /// Buy the offer at `index` in the current upgrade session
    pub fn buy_power_up(&mut self, index: usize) -> Result<PowerUp, GameError> {
        let Stage::Upgrading { session, run } = &mut self.stage else {
            return Err(self.illegal());
        };
        let bought = session.buy(index, &mut run.player)?;
        self.leave_shop_if_done()?;
        Ok(bought)
    }

    /// Close the upgrade session and start the next level
    pub fn skip_upgrades(&mut self) -> Result<(), GameError> {
        let Stage::Upgrading { session, .. } = &mut self.stage else {
            return Err(self.illegal());
        };
        session.skip();
        self.leave_shop_if_done()
    }

    fn leave_shop_if_done(&mut self) -> Result<(), GameError> {
        let done = matches!(&self.stage, Stage::Upgrading { session, .. } if session.is_finished());
        if !done {
            return Ok(());
        }
        match std::mem::replace(&mut self.stage, Stage::Home) {
            Stage::Upgrading { run, .. } => self.start_level(*run),
            other => {
                self.stage = other;
                Ok(())
            }
        }
    }

    /// Spend lifetime gold in the meta shop
    pub fn buy_meta_upgrade(&mut self, upgrade: MetaUpgrade) -> Result<u32, GameError> {
        if !matches!(self.stage, Stage::Home | Stage::Finished(_)) {
            return Err(self.illegal());
        }
        let level = self.meta.buy(upgrade)?;
        self.persist();
        Ok(level)
    }

    /// Back to the home screen after a run
    pub fn return_home(&mut self) {
        if matches!(self.stage, Stage::Finished(_)) {
            self.stage = Stage::Home;
        }
    }

    /// Give up the current run; its gold is still banked
    pub fn abandon_run(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Home) {
            Stage::Playing(engine) => self.finish(engine.into_run(), Some(LossReason::Defeated)),
            Stage::Upgrading { run, .. } => self.finish(*run, Some(LossReason::Defeated)),
            other => self.stage = other,
        }
    }

    fn finish(&mut self, run: RunState, loss: Option<LossReason>) {
        let won = loss.is_none();
        let reached_level = self
            .levels
            .get(run.level_index.min(self.levels.len().saturating_sub(1)))
            .map_or(0, |def| def.level);
        self.meta.bank_run(&run, reached_level, won);
        self.persist();
        info!(
            "run {} on level {reached_level} with {} gold",
            if won { "won" } else { "lost" },
            run.gold
        );
        self.stage = Stage::Finished(RunSummary {
            won,
            loss,
            reached_level,
            levels_cleared: run.stats.levels_cleared,
            enemies_defeated: run.stats.enemies_defeated,
            gold: run.gold,
        });
    }

    fn persist(&mut self) {
        if let Err(e) = self.meta.save(self.store.as_mut()) {
            warn!("could not save progress: {e}");
        }
    }
}
