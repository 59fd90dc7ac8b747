//! Progression across levels and runs

mod campaign;
mod meta;
mod powerup;
mod run;
mod upgrade;

pub use campaign::{Campaign, RunSummary, Stage};
pub use meta::{LifetimeStats, MetaProgress, MetaUpgrade, UpgradeLevel};
pub use powerup::{Effect, PowerUp};
pub use run::{RunState, RunStats};
pub use upgrade::{Offer, UpgradeSession};
