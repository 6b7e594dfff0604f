//! In-memory collaborators for tests and the command-line driver

use ahash::AHashMap;

use crate::core::types::{MapLocation, PlayerId, SettlementId, UnitId};
use crate::external::harbour::Harbour;
use crate::external::market::{Market, SaleChannel};
use crate::external::notify::{MessageKey, Notification, NotificationSink};
use crate::external::units::{UnitFactory, UnitHandle, UnitOrigin};
use crate::external::CollaboratorError;
use crate::rules::UnitBlueprintId;
use crate::settlement::goods::GoodKind;

/// Keeps every notification it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Vec<Notification>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Notification] {
        &self.received
    }

    pub fn count(&self, key: MessageKey) -> usize {
        self.received.iter().filter(|n| n.key == key).count()
    }

    pub fn has(&self, key: MessageKey) -> bool {
        self.count(key) > 0
    }

    /// Most recent notification with `key`
    pub fn last(&self, key: MessageKey) -> Option<&Notification> {
        self.received.iter().rev().find(|n| n.key == key)
    }

    pub fn clear(&mut self) {
        self.received.clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.received.push(notification);
    }
}

/// Market with a fixed per-unit price for each good
#[derive(Debug, Default)]
pub struct FixedMarket {
    prices: AHashMap<GoodKind, u32>,
    /// Every accepted sale: (good, amount, owner, channel)
    pub sales: Vec<(GoodKind, u32, PlayerId, SaleChannel)>,
    /// Reject every sale while set
    pub failing: bool,
}

impl FixedMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&mut self, good: GoodKind, per_unit: u32) {
        self.prices.insert(good, per_unit);
    }

    fn price_of(&self, good: GoodKind) -> Option<u32> {
        self.prices.get(&good).copied()
    }
}

impl Market for FixedMarket {
    fn sell(
        &mut self,
        good: GoodKind,
        amount: u32,
        owner: PlayerId,
        channel: SaleChannel,
    ) -> Result<u32, CollaboratorError> {
        if self.failing {
            return Err(CollaboratorError::Unavailable("market closed".into()));
        }
        self.sales.push((good, amount, owner, channel));
        Ok(self.bid_price(good, amount))
    }

    fn bid_price(&self, good: GoodKind, amount: u32) -> u32 {
        self.price_of(good).unwrap_or(0).saturating_mul(amount)
    }

    fn cost_to_buy(&self, good: GoodKind, amount: u32) -> Option<u32> {
        self.price_of(good).map(|p| p.saturating_mul(amount))
    }
}

/// Hands out sequential unit ids
#[derive(Debug)]
pub struct CountingUnitFactory {
    next_id: u32,
    /// Every unit created: (origin, location, owner, handle)
    pub created: Vec<(UnitOrigin, MapLocation, PlayerId, UnitHandle)>,
    /// Reject every request while set
    pub failing: bool,
}

impl CountingUnitFactory {
    pub fn new(first_id: u32) -> Self {
        Self {
            next_id: first_id,
            created: Vec::new(),
            failing: false,
        }
    }

    pub fn created_by(&self, origin: UnitOrigin) -> usize {
        self.created.iter().filter(|(o, ..)| *o == origin).count()
    }
}

impl UnitFactory for CountingUnitFactory {
    fn create_unit(
        &mut self,
        origin: UnitOrigin,
        location: MapLocation,
        owner: PlayerId,
        blueprint: &UnitBlueprintId,
    ) -> Result<UnitHandle, CollaboratorError> {
        if self.failing {
            return Err(CollaboratorError::Rejected(format!("no room for {}", blueprint)));
        }
        let handle = UnitHandle {
            id: UnitId(self.next_id),
            blueprint: blueprint.clone(),
            name: format!("{} #{}", blueprint, self.next_id),
        };
        self.next_id += 1;
        self.created.push((origin, location, owner, handle.clone()));
        Ok(handle)
    }
}

/// Harbour without vessels
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHarbour;

impl Harbour for NoHarbour {
    fn repair_vessels(&mut self, _settlement: SettlementId) -> Vec<UnitId> {
        Vec::new()
    }
}
