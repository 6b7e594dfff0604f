//! Construction queue - what the settlement builds and how far along it is
//!
//! Hammers accumulate towards the active target and are clamped to its
//! requirement. Completion needs hammers, materials and population all at
//! once; any shortfall leaves the state untouched.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::core::config::EngineConfig;
use crate::external::market::Market;
use crate::rules::{BuildCost, UnitBlueprintId};
use crate::settlement::goods::GoodKind;
use crate::settlement::ledger::GoodsLedger;
use crate::settlement::workshop::WorkshopKind;

/// Something the construction queue can work on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildTarget {
    /// Next level of a workshop
    Workshop(WorkshopKind),
    /// A mobile unit
    Unit(UnitBlueprintId),
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildTarget::Workshop(kind) => write!(f, "{}", kind),
            BuildTarget::Unit(id) => write!(f, "{}", id),
        }
    }
}

/// Ordered build targets; the front entry is the active one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildQueue {
    items: VecDeque<BuildTarget>,
}

impl BuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&BuildTarget> {
        self.items.front()
    }

    pub fn push(&mut self, target: BuildTarget) {
        self.items.push_back(target);
    }

    /// Replace the active target, keeping the rest of the queue
    pub fn set_current(&mut self, target: BuildTarget) {
        match self.items.front_mut() {
            Some(front) => *front = target,
            None => self.items.push_back(target),
        }
    }

    pub fn pop_current(&mut self) -> Option<BuildTarget> {
        self.items.pop_front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildTarget> {
        self.items.iter()
    }
}

/// Outcome of evaluating the active target at end of turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionStatus {
    /// Still collecting hammers
    InProgress { hammers: u32, required: u32 },
    /// Hammers are complete but the settlement is too small
    NeedMorePopulation { required: u32, current: u32 },
    /// Hammers are complete but materials are short
    MissingMaterials { missing: Vec<(GoodKind, u32)> },
    /// Everything is in place
    Ready,
}

/// Add this turn's points, never past the requirement
pub fn accumulate_hammers(hammers: u32, points: u32, required: u32) -> u32 {
    hammers.saturating_add(points).min(required)
}

/// Check the completion gates in order: hammers, population, materials
pub fn evaluate(
    hammers: u32,
    cost: &BuildCost,
    headcount: u32,
    ledger: &GoodsLedger,
) -> ConstructionStatus {
    if hammers < cost.hammers {
        return ConstructionStatus::InProgress {
            hammers,
            required: cost.hammers,
        };
    }
    if headcount < cost.min_population {
        return ConstructionStatus::NeedMorePopulation {
            required: cost.min_population,
            current: headcount,
        };
    }
    if !ledger.has_materials(&cost.materials) {
        return ConstructionStatus::MissingMaterials {
            missing: ledger.missing_materials(&cost.materials),
        };
    }
    ConstructionStatus::Ready
}

/// Gold needed to finish a target right now.
///
/// Remaining hammers are priced flat; missing materials are bought from the
/// market with a markup. `None` when the market cannot supply a material
/// or the total does not fit in a gold amount.
pub fn price_to_complete(
    hammers: u32,
    cost: &BuildCost,
    ledger: &GoodsLedger,
    market: &dyn Market,
    config: &EngineConfig,
) -> Option<u32> {
    let remaining = u64::from(cost.hammers.saturating_sub(hammers));
    let mut price = remaining.checked_mul(u64::from(config.hammer_price))?;
    for (good, amount) in ledger.missing_materials(&cost.materials) {
        let bought = u64::from(market.cost_to_buy(good, amount)?);
        let marked_up = bought.checked_mul(u64::from(config.material_price_markup_percent))? / 100;
        price = price.checked_add(marked_up)?;
    }
    u32::try_from(price).ok()
}

/// Render missing materials for notification text, e.g. `"20 tools, 5 lumber"`
pub fn describe_materials(materials: &[(GoodKind, u32)]) -> String {
    materials
        .iter()
        .map(|(good, amount)| format!("{} {}", amount, good))
        .collect::<Vec<_>>()
        .join(", ")
}
