//! Seeded dice
//!
//! Every random decision in a run draws from one ChaCha stream, so a run
//! replays exactly from its seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entity::StatRange;

/// The run's dice
///
/// Only the seed is persisted. A restored run starts the stream over.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Dice seeded from the OS
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll uniformly within an inclusive stat range
    ///
    /// A malformed range (min > max) rolls its minimum.
    pub fn roll(&mut self, range: StatRange) -> u32 {
        if range.min >= range.max {
            return range.min;
        }
        self.rng.gen_range(range.min..=range.max)
    }

    /// `percent` in 100 odds; 100 and above always succeed
    pub fn percent(&mut self, percent: u32) -> bool {
        self.rng.gen_ratio(percent.min(100), 100)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Pick an index with odds proportional to its weight
    ///
    /// `None` when every weight is zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }
        let mut pick = self.rng.gen_range(0..total);
        weights.iter().position(|&w| {
            let w = u64::from(w);
            if pick < w {
                true
            } else {
                pick -= w;
                false
            }
        })
    }
}

impl Serialize for GameRng {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(GameRng::new)
    }
}
