//! Stat ranges and hit points

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Inclusive dice range `min..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatRange {
    pub min: u32,
    pub max: u32,
}

impl StatRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// `1..=value`, the shape of every enemy roll
    pub const fn up_to(value: u32) -> Self {
        Self { min: 1, max: value }
    }

    /// Raise the minimum; the maximum follows if it would be overtaken
    pub fn raise_min(&mut self, amount: u32) {
        self.min = self.min.saturating_add(amount);
        if self.min > self.max {
            self.max = self.min;
        }
    }

    pub fn raise_max(&mut self, amount: u32) {
        self.max = self.max.saturating_add(amount);
    }

    pub const fn contains(self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl core::fmt::Display for StatRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Hit points, `0 <= current <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hp {
    pub current: u32,
    pub max: u32,
}

impl Hp {
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub const fn is_zero(self) -> bool {
        self.current == 0
    }

    /// Subtract damage floored at zero, returning the HP actually lost
    pub fn take(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current);
        self.current -= lost;
        lost
    }

    /// Heal up to the maximum, returning the HP actually restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max - self.current);
        self.current += gained;
        gained
    }

    /// Grow the pool; current HP grows by the same amount
    pub fn grow(&mut self, amount: u32) {
        self.max = self.max.saturating_add(amount);
        self.current = self.current.saturating_add(amount);
    }
}

impl core::fmt::Display for Hp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

/// A stat a collected item or power-up can be applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Stat {
    #[strum(serialize = "hp")]
    Hp,
    #[strum(serialize = "dmg")]
    Damage,
    #[strum(serialize = "spd")]
    Speed,
    #[strum(serialize = "int")]
    Intelligence,
}
