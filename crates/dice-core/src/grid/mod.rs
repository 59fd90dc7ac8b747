//! Board model
//!
//! Contains the cell matrix, cell contents and coordinates.

mod board;
mod cell;
mod position;

pub use board::{EntityRef, Grid, Spawn};
pub use cell::{Cell, GoldBag, Hazard, HazardKind, Occupant, Terrain};
pub use position::{Direction, Position};
