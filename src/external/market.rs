//! Market collaborator used for custom-house exports and purchase quotes

use serde::{Deserialize, Serialize};

use crate::core::types::PlayerId;
use crate::external::CollaboratorError;
use crate::settlement::goods::GoodKind;

/// Route through which goods are sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleChannel {
    /// Automatic sale by a settlement's custom house
    CustomHouse,
    /// Manual sale by a unit in port
    Dock,
}

pub trait Market {
    /// Sell goods on behalf of `owner`, returning the gold credited
    fn sell(
        &mut self,
        good: GoodKind,
        amount: u32,
        owner: PlayerId,
        channel: SaleChannel,
    ) -> Result<u32, CollaboratorError>;

    /// Gold the market would pay for `amount` units
    fn bid_price(&self, good: GoodKind, amount: u32) -> u32;

    /// Gold needed to buy `amount` units, `None` when the good cannot be bought
    fn cost_to_buy(&self, good: GoodKind, amount: u32) -> Option<u32>;
}
