//! Custom widgets for the game UI

mod board;
mod messages;
mod shop;
mod status;

pub use board::BoardWidget;
pub use messages::{MessagesWidget, describe};
pub use shop::{MetaShopWidget, UpgradeShopWidget};
pub use status::{StatusWidget, phase_hint};
