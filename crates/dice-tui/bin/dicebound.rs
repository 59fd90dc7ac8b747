//! DiceBound in the terminal
//!
//! Main entry point for the game.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use dice_core::combat::CombatRules;
use dice_core::level::{LevelDef, load_levels};
use dice_core::store::{KeyValueStore, MemoryStore};
use dice_core::{Campaign, GameConfig, GameRng};
use dice_save::FileStore;
use dice_tui::display::GraphicsMode;
use dice_tui::{App, Theme};

/// Grid roguelite where every move and every blow is a die roll
#[derive(Parser, Debug)]
#[command(name = "dicebound")]
#[command(author, version, about = "DiceBound - roll, move, fight", long_about = None)]
struct Args {
    /// Seed for the first run (later runs count up from it)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Rules file (`OPTIONS=key:value,!flag` lines)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// JSON file with the level list
    #[arg(short = 'l', long = "levels")]
    levels: Option<PathBuf>,

    /// Directory for saved progress
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Value-comparison combat instead of HP duels
    #[arg(long = "legacy")]
    legacy: bool,

    /// Glyphs: classic, fancy or auto
    #[arg(short = 'g', long = "graphics", default_value = "auto")]
    graphics: GraphicsMode,

    /// Palette for light terminal backgrounds
    #[arg(long = "light")]
    light: bool,
}

/// Logs go to a file or nowhere; stderr would tear the alternate screen
fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_config(args: &Args) -> GameConfig {
    let mut config = match &args.config {
        Some(path) => GameConfig::load_from_file(path).unwrap_or_else(|e| {
            warn!("could not load {}: {e}, using defaults", path.display());
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };
    if args.legacy {
        config.combat = CombatRules::ValueAbsorb { strict: true };
    }
    config
}

fn load_level_list(path: Option<&Path>) -> Vec<LevelDef> {
    let Some(path) = path else {
        return Vec::new();
    };
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| load_levels(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(levels) => {
            info!("loaded {} levels from {}", levels.len(), path.display());
            levels
        }
        Err(e) => {
            warn!("could not load levels from {}: {e}", path.display());
            Vec::new()
        }
    }
}

fn open_store(data_dir: Option<&Path>) -> Box<dyn KeyValueStore> {
    let store = match data_dir {
        Some(dir) => Ok(FileStore::new(dir)),
        None => FileStore::open_default(),
    };
    match store {
        Ok(store) => {
            info!("progress stored in {}", store.dir().display());
            Box::new(store)
        }
        Err(e) => {
            warn!("{e}; progress will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = load_config(&args);
    let levels = load_level_list(args.levels.as_deref());
    let store = open_store(args.data_dir.as_deref());
    let campaign = Campaign::new(config, levels, store);

    let seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());
    let theme = if args.light {
        Theme::light()
    } else {
        Theme::detect()
    };
    let mut app = App::new(campaign, seed, theme, args.graphics);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;
            if let Some(command) = app.handle_event(event) {
                app.execute(command);
            }
            if app.should_quit() {
                return Ok(());
            }
        }
    }
}
