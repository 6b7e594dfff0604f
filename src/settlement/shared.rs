//! Thread-safe handle for settlements read by other threads (UI, AI)
//!
//! Readers take a snapshot; the turn takes the write lock for its full
//! duration, so a snapshot never shows a half-processed turn.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::core::error::{Result, SettlementError};
use crate::core::types::SettlementId;
use crate::settlement::colony::Settlement;
use crate::settlement::construction::BuildTarget;
use crate::settlement::goods::GoodKind;
use crate::settlement::turn::{TurnContext, TurnReport};

/// Point-in-time copy of the values other systems display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementView {
    pub id: SettlementId,
    pub name: String,
    pub size: u32,
    pub food: u32,
    pub hammers: u32,
    pub build_target: Option<BuildTarget>,
    pub support: u32,
    pub production_bonus: i32,
    pub stock: Vec<(GoodKind, u32)>,
}

impl SettlementView {
    pub fn of(settlement: &Settlement) -> Self {
        Self {
            id: settlement.id(),
            name: settlement.name().to_string(),
            size: settlement.display_size(),
            food: settlement.ledger().quantity_of(GoodKind::Food),
            hammers: settlement.hammers(),
            build_target: settlement.build_queue().current().cloned(),
            support: settlement.civic().support(),
            production_bonus: settlement.civic().production_bonus(),
            stock: settlement.ledger().enumerate_non_zero(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SharedSettlement {
    inner: Arc<RwLock<Settlement>>,
}

impl SharedSettlement {
    pub fn new(settlement: Settlement) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settlement)),
        }
    }

    /// Snapshot for readers on other threads
    pub fn view(&self) -> Result<SettlementView> {
        let settlement = self.inner.read().map_err(|_| poisoned())?;
        Ok(SettlementView::of(&settlement))
    }

    /// Run one turn under the write lock
    pub fn advance(&self, ctx: &mut TurnContext) -> Result<TurnReport> {
        let mut settlement = self.inner.write().map_err(|_| poisoned())?;
        settlement.process_turn(ctx)
    }

    /// Run `f` with exclusive access, e.g. to move workers between turns
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut Settlement) -> T) -> Result<T> {
        let mut settlement = self.inner.write().map_err(|_| poisoned())?;
        Ok(f(&mut settlement))
    }

    /// Full copy of the settlement, e.g. for saving
    pub fn clone_settlement(&self) -> Result<Settlement> {
        let settlement = self.inner.read().map_err(|_| poisoned())?;
        Ok(settlement.clone())
    }
}

fn poisoned() -> SettlementError {
    SettlementError::InvariantViolation("settlement lock poisoned".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::{MapLocation, PlayerId};
    use crate::external::player::PlayerProfile;
    use crate::external::testing::{CountingUnitFactory, FixedMarket, NoHarbour, RecordingSink};
    use crate::rules::RuleSet;
    use crate::settlement::field::{TileKind, TileSnapshot};
    use std::thread;

    #[test]
    fn test_snapshot_read_from_other_thread() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let mut owner = PlayerProfile::new(PlayerId(1), "English", true);
        let settlement = Settlement::found(
            SettlementId(7),
            "Plymouth",
            owner.id,
            vec![TileSnapshot::new(MapLocation::new(0, 0), TileKind::Plains)],
            true,
            &rules,
        )
        .unwrap();
        let shared = SharedSettlement::new(settlement);

        let mut sink = RecordingSink::new();
        let mut market = FixedMarket::new();
        let mut units = CountingUnitFactory::new(1);
        let mut harbour = NoHarbour;
        let mut ctx = TurnContext {
            turn: 1,
            rules: &rules,
            config: &config,
            owner: &mut owner,
            notifications: &mut sink,
            market: &mut market,
            units: &mut units,
            harbour: &mut harbour,
        };
        shared.advance(&mut ctx).unwrap();

        let reader = shared.clone();
        let view = thread::spawn(move || reader.view().unwrap())
            .join()
            .unwrap();
        assert_eq!(view.id, SettlementId(7));
        assert_eq!(view.food, 5);
        assert!(view.stock.contains(&(GoodKind::Cotton, 2)));
    }
}
