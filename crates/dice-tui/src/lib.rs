//! dice-tui: Terminal interface for DiceBound
//!
//! Uses ratatui for rendering and crossterm for input.

pub mod app;
pub mod display;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use input::Command;
pub use theme::Theme;
