//! The shop between levels
//!
//! Resources are rolled once from the player's intelligence range. Each
//! offer can be bought at most once; the session closes by itself as soon
//! as nothing left on the table is affordable.

use log::debug;
use serde::{Deserialize, Serialize};

use super::PowerUp;
use crate::entity::Player;
use crate::error::GameError;
use crate::rng::GameRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub power_up: PowerUp,
    pub bought: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSession {
    offers: Vec<Offer>,
    /// What the intelligence roll produced
    rolled: u32,
    resources: u32,
    finished: bool,
}

impl UpgradeSession {
    pub fn new(player: &Player, offer_count: usize, rng: &mut GameRng) -> Self {
        let offers = PowerUp::roll_offers(offer_count, rng)
            .into_iter()
            .map(|power_up| Offer {
                power_up,
                bought: false,
            })
            .collect();
        let rolled = rng.roll(player.intelligence);
        Self::with_offers(offers, rolled)
    }

    /// A session with fixed offers and resources
    pub fn with_offers(offers: Vec<Offer>, resources: u32) -> Self {
        let mut session = Self {
            offers,
            rolled: resources,
            resources,
            finished: false,
        };
        session.close_if_stuck();
        debug!(
            "upgrade session: {} resources, {} offers",
            session.resources,
            session.offers.len()
        );
        session
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn rolled(&self) -> u32 {
        self.rolled
    }

    pub fn resources(&self) -> u32 {
        self.resources
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn can_afford(&self, index: usize) -> bool {
        !self.finished
            && self
                .offers
                .get(index)
                .is_some_and(|o| !o.bought && o.power_up.cost() <= self.resources)
    }

    /// Buy the offer at `index` and apply it to `player`
    pub fn buy(&mut self, index: usize, player: &mut Player) -> Result<PowerUp, GameError> {
        if self.finished {
            return Err(GameError::PurchaseRejected("the shop is closed".to_string()));
        }
        let Some(offer) = self.offers.get_mut(index) else {
            return Err(GameError::PurchaseRejected(format!("no offer #{}", index + 1)));
        };
        let power_up = offer.power_up;
        if offer.bought {
            return Err(GameError::PurchaseRejected(format!("{power_up} already bought")));
        }
        if power_up.cost() > self.resources {
            return Err(GameError::PurchaseRejected(format!(
                "{power_up} costs {}, only {} left",
                power_up.cost(),
                self.resources
            )));
        }

        offer.bought = true;
        self.resources -= power_up.cost();
        power_up.apply(player);
        debug!("bought {power_up}, {} resources left", self.resources);
        self.close_if_stuck();
        Ok(power_up)
    }

    /// Leave without buying anything more
    pub fn skip(&mut self) {
        self.finished = true;
    }

    fn close_if_stuck(&mut self) {
        let any_affordable = self
            .offers
            .iter()
            .any(|o| !o.bought && o.power_up.cost() <= self.resources);
        if !any_affordable {
            self.finished = true;
        }
    }
}
