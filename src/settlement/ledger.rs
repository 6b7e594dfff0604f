//! Goods ledger - settlement-level storage of typed goods
//!
//! Quantities are unsigned and removal is checked, so a stock can never go
//! negative. Warehouse capacity is not enforced on `add`; it is applied once
//! per turn by [`GoodsLedger::cleanup`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::LedgerError;
use crate::settlement::goods::GoodKind;
use crate::settlement::warehouse::WarehouseSettings;

/// Something the end-of-turn warehouse pass wants the player to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseEvent {
    /// Stock above capacity was thrown away
    Discarded { good: GoodKind, amount: u32 },
    /// Next turn's production will not fit
    OverflowForthcoming { good: GoodKind, excess: u32 },
    /// Stock dropped below the low level during this turn
    FellBelowLow { good: GoodKind, amount: u32, level: u32 },
    /// Stock climbed above the high level during this turn
    RoseAboveHigh { good: GoodKind, amount: u32, level: u32 },
}

/// Stored goods of a settlement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodsLedger {
    stock: AHashMap<GoodKind, u32>,
    /// Stock at the start of the current turn
    #[serde(default)]
    opening: AHashMap<GoodKind, u32>,
}

impl GoodsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current amount of a good
    pub fn quantity_of(&self, good: GoodKind) -> u32 {
        self.stock.get(&good).copied().unwrap_or(0)
    }

    /// Amount held when the current turn started
    pub fn opening_quantity_of(&self, good: GoodKind) -> u32 {
        self.opening.get(&good).copied().unwrap_or(0)
    }

    /// Add goods. Capacity may be exceeded until cleanup.
    pub fn add(&mut self, good: GoodKind, amount: u32) -> Result<(), LedgerError> {
        if !good.is_storable() {
            return Err(LedgerError::NotStorable(good));
        }
        if amount > 0 {
            let entry = self.stock.entry(good).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
        Ok(())
    }

    /// Remove goods. Callers must check the stock first; this never clamps.
    pub fn remove(&mut self, good: GoodKind, amount: u32) -> Result<(), LedgerError> {
        let available = self.quantity_of(good);
        if amount > available {
            return Err(LedgerError::InsufficientStock {
                good,
                requested: amount,
                available,
            });
        }
        if amount > 0 {
            self.stock.insert(good, available - amount);
        }
        Ok(())
    }

    /// Remove everything of a good, returning how much was held
    pub fn take_all(&mut self, good: GoodKind) -> u32 {
        self.stock.remove(&good).unwrap_or(0)
    }

    /// One entry per good with a non-zero quantity, in `GoodKind::ALL` order
    pub fn enumerate_non_zero(&self) -> Vec<(GoodKind, u32)> {
        GoodKind::ALL
            .into_iter()
            .map(|good| (good, self.quantity_of(good)))
            .filter(|(_, amount)| *amount > 0)
            .collect()
    }

    /// Check if the ledger holds all of the required materials
    pub fn has_materials(&self, requirements: &[(GoodKind, u32)]) -> bool {
        requirements
            .iter()
            .all(|(good, amount)| self.quantity_of(*good) >= *amount)
    }

    /// Materials still missing from a requirement list
    pub fn missing_materials(&self, requirements: &[(GoodKind, u32)]) -> Vec<(GoodKind, u32)> {
        requirements
            .iter()
            .filter_map(|(good, amount)| {
                let held = self.quantity_of(*good);
                (held < *amount).then(|| (*good, amount - held))
            })
            .collect()
    }

    /// Consume a whole requirement list, or nothing at all
    pub fn consume_materials(&mut self, requirements: &[(GoodKind, u32)]) -> Result<(), LedgerError> {
        if let Some((good, amount)) = requirements
            .iter()
            .find(|(good, amount)| self.quantity_of(*good) < *amount)
        {
            return Err(LedgerError::InsufficientStock {
                good: *good,
                requested: *amount,
                available: self.quantity_of(*good),
            });
        }
        for (good, amount) in requirements {
            self.remove(*good, *amount)?;
        }
        Ok(())
    }

    /// Remember current stock as the opening balance of a new turn
    pub fn begin_turn(&mut self) {
        self.opening = self.stock.clone();
    }

    /// End-of-turn warehouse pass.
    ///
    /// Every storable good except food is clamped to `capacity`. Goods that
    /// fit now but will not fit after `projected_net` more units arrive get a
    /// forthcoming-overflow event instead. Low/high level events fire only on
    /// the turn the level is crossed.
    pub fn cleanup(
        &mut self,
        capacity: u32,
        settings: &WarehouseSettings,
        projected_net: &AHashMap<GoodKind, i64>,
    ) -> Vec<WarehouseEvent> {
        let mut events = Vec::new();

        for good in GoodKind::storable().filter(|g| !g.is_food()) {
            let amount = self.quantity_of(good);
            let opening = self.opening_quantity_of(good);
            let entry = settings.entry(good);

            if amount < opening && amount < entry.low && opening >= entry.low {
                events.push(WarehouseEvent::FellBelowLow {
                    good,
                    amount,
                    level: entry.low,
                });
            }
            if amount > opening && amount > entry.high && opening <= entry.high {
                events.push(WarehouseEvent::RoseAboveHigh {
                    good,
                    amount,
                    level: entry.high,
                });
            }

            if amount > capacity {
                self.stock.insert(good, capacity);
                events.push(WarehouseEvent::Discarded {
                    good,
                    amount: amount - capacity,
                });
                continue;
            }

            let net = projected_net.get(&good).copied().unwrap_or(0);
            let projected = i64::from(amount) + net;
            if amount < capacity && projected > i64::from(capacity) {
                events.push(WarehouseEvent::OverflowForthcoming {
                    good,
                    excess: (projected - i64::from(capacity)) as u32,
                });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_add_remove() {
        let mut ledger = GoodsLedger::new();
        ledger.add(GoodKind::Lumber, 30).unwrap();
        assert_eq!(ledger.quantity_of(GoodKind::Lumber), 30);

        // Capacity is not enforced on add
        ledger.add(GoodKind::Lumber, 300).unwrap();
        assert_eq!(ledger.quantity_of(GoodKind::Lumber), 330);

        ledger.remove(GoodKind::Lumber, 20).unwrap();
        assert_eq!(ledger.quantity_of(GoodKind::Lumber), 310);
    }

    #[test]
    fn test_remove_more_than_stored_fails() {
        let mut ledger = GoodsLedger::new();
        ledger.add(GoodKind::Ore, 5).unwrap();

        let err = ledger.remove(GoodKind::Ore, 6).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                good: GoodKind::Ore,
                requested: 6,
                available: 5
            }
        );
        assert_eq!(ledger.quantity_of(GoodKind::Ore), 5);
    }

    #[test]
    fn test_accumulator_goods_are_rejected() {
        let mut ledger = GoodsLedger::new();
        assert_eq!(
            ledger.add(GoodKind::Bells, 1),
            Err(LedgerError::NotStorable(GoodKind::Bells))
        );
    }

    #[test]
    fn test_enumerate_non_zero_is_ordered() {
        let mut ledger = GoodsLedger::new();
        ledger.add(GoodKind::Tools, 4).unwrap();
        ledger.add(GoodKind::Food, 9).unwrap();
        ledger.add(GoodKind::Ore, 1).unwrap();
        ledger.remove(GoodKind::Ore, 1).unwrap();

        assert_eq!(
            ledger.enumerate_non_zero(),
            vec![(GoodKind::Food, 9), (GoodKind::Tools, 4)]
        );
    }

    #[test]
    fn test_consume_materials_is_all_or_nothing() {
        let mut ledger = GoodsLedger::new();
        ledger.add(GoodKind::Tools, 50).unwrap();
        ledger.add(GoodKind::Lumber, 10).unwrap();

        let requirements = vec![(GoodKind::Tools, 20), (GoodKind::Lumber, 30)];
        assert!(!ledger.has_materials(&requirements));
        assert!(ledger.consume_materials(&requirements).is_err());
        assert_eq!(ledger.quantity_of(GoodKind::Tools), 50);
        assert_eq!(
            ledger.missing_materials(&requirements),
            vec![(GoodKind::Lumber, 20)]
        );

        ledger.add(GoodKind::Lumber, 20).unwrap();
        ledger.consume_materials(&requirements).unwrap();
        assert_eq!(ledger.quantity_of(GoodKind::Tools), 30);
        assert_eq!(ledger.quantity_of(GoodKind::Lumber), 0);
    }

    #[test]
    fn test_cleanup_discards_excess_except_food() {
        let mut ledger = GoodsLedger::new();
        ledger.add(GoodKind::Cloth, 120).unwrap();
        ledger.add(GoodKind::Food, 400).unwrap();

        let events = ledger.cleanup(100, &WarehouseSettings::new(), &AHashMap::new());

        assert_eq!(ledger.quantity_of(GoodKind::Cloth), 100);
        assert_eq!(ledger.quantity_of(GoodKind::Food), 400);
        assert!(events.contains(&WarehouseEvent::Discarded {
            good: GoodKind::Cloth,
            amount: 20
        }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, WarehouseEvent::Discarded { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_cleanup_warns_about_forthcoming_overflow() {
        let mut ledger = GoodsLedger::new();
        ledger.add(GoodKind::Furs, 95).unwrap();
        ledger.begin_turn();

        let mut net = AHashMap::new();
        net.insert(GoodKind::Furs, 8);
        let events = ledger.cleanup(100, &WarehouseSettings::new(), &net);

        assert_eq!(ledger.quantity_of(GoodKind::Furs), 95);
        assert_eq!(
            events,
            vec![WarehouseEvent::OverflowForthcoming {
                good: GoodKind::Furs,
                excess: 3
            }]
        );
    }

    #[test]
    fn test_no_overflow_warning_at_capacity() {
        let mut ledger = GoodsLedger::new();
        ledger.add(GoodKind::Furs, 100).unwrap();
        ledger.begin_turn();

        let mut net = AHashMap::new();
        net.insert(GoodKind::Furs, 8);
        let events = ledger.cleanup(100, &WarehouseSettings::new(), &net);

        assert_eq!(ledger.quantity_of(GoodKind::Furs), 100);
        assert!(events.is_empty());
    }

    #[test]
    fn test_cleanup_reports_level_crossings_once() {
        let mut ledger = GoodsLedger::new();
        ledger.add(GoodKind::Tools, 15).unwrap();
        ledger.begin_turn();
        ledger.remove(GoodKind::Tools, 10).unwrap();

        let settings = WarehouseSettings::new();
        let events = ledger.cleanup(100, &settings, &AHashMap::new());
        assert_eq!(
            events,
            vec![WarehouseEvent::FellBelowLow {
                good: GoodKind::Tools,
                amount: 5,
                level: 10
            }]
        );

        // Next turn the stock stays low: no repeat
        ledger.begin_turn();
        let events = ledger.cleanup(100, &settings, &AHashMap::new());
        assert!(events.is_empty());
    }
}
