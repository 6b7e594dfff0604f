//! Production planning - what the work locations yield this turn
//!
//! Planning is read-only:
//! 1. Field plots are summed first; they need no inputs
//! 2. Workshops follow in creation order, each limited by the input stock
//!    left after earlier workshops (1 input unit per output unit)
//! 3. Outputs that are not storable (hammers, bells) are left to the
//!    construction and civic steps
//!
//! `harvest` then applies a plan to the ledger.

use ahash::AHashMap;

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SettlementError};
use crate::external::player::PlayerProfile;
use crate::rules::RuleSet;
use crate::settlement::goods::GoodKind;
use crate::settlement::ledger::GoodsLedger;
use crate::settlement::work_location::WorkLocation;

/// Everything production formulas read besides the work location itself
#[derive(Debug, Clone, Copy)]
pub struct ProductionContext<'a> {
    pub rules: &'a RuleSet,
    pub config: &'a EngineConfig,
    pub owner: &'a PlayerProfile,
    /// Civic production bonus, added per worker
    pub bonus: i32,
}

impl<'a> ProductionContext<'a> {
    pub fn new(
        rules: &'a RuleSet,
        config: &'a EngineConfig,
        owner: &'a PlayerProfile,
        bonus: i32,
    ) -> Self {
        Self {
            rules,
            config,
            owner,
            bonus,
        }
    }
}

/// Storable goods produced and consumed in one turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductionPlan {
    pub produced: AHashMap<GoodKind, u32>,
    pub consumed: AHashMap<GoodKind, u32>,
}

impl ProductionPlan {
    pub fn produced_of(&self, good: GoodKind) -> u32 {
        self.produced.get(&good).copied().unwrap_or(0)
    }

    pub fn consumed_of(&self, good: GoodKind) -> u32 {
        self.consumed.get(&good).copied().unwrap_or(0)
    }

    /// Production minus consumption per good
    pub fn net(&self) -> AHashMap<GoodKind, i64> {
        GoodKind::storable()
            .map(|g| (g, i64::from(self.produced_of(g)) - i64::from(self.consumed_of(g))))
            .filter(|(_, n)| *n != 0)
            .collect()
    }
}

/// Plan storable production against the current ledger
pub fn plan_storable_production(
    locations: &[WorkLocation],
    ledger: &GoodsLedger,
    ctx: &ProductionContext,
) -> ProductionPlan {
    let mut plan = ProductionPlan::default();
    let mut available: AHashMap<GoodKind, u32> = GoodKind::storable()
        .map(|g| (g, ledger.quantity_of(g)))
        .collect();

    for plot in locations.iter().filter_map(WorkLocation::as_plot) {
        for good in GoodKind::storable() {
            let amount = plot.production_of(good, ctx);
            if amount > 0 {
                *plan.produced.entry(good).or_insert(0) += amount;
                *available.entry(good).or_insert(0) += amount;
            }
        }
    }

    let producers = locations
        .iter()
        .filter(|loc| loc.capabilities(ctx.rules).produces_goods)
        .filter_map(WorkLocation::as_workshop);
    for shop in producers {
        let output = match shop.output(ctx.rules) {
            Some(good) => good,
            None => continue,
        };
        let raw = shop.production_of(output, ctx);
        if raw == 0 {
            continue;
        }
        let amount = match shop.input(ctx.rules) {
            Some(input) => {
                let stock = available.entry(input).or_insert(0);
                let used = raw.min(*stock);
                *stock -= used;
                if used > 0 {
                    *plan.consumed.entry(input).or_insert(0) += used;
                }
                used
            }
            None => raw,
        };
        if amount > 0 {
            *plan.produced.entry(output).or_insert(0) += amount;
            *available.entry(output).or_insert(0) += amount;
        }
    }

    plan
}

/// Total food the plots yield this turn
pub fn food_production(locations: &[WorkLocation], ctx: &ProductionContext) -> u32 {
    locations
        .iter()
        .filter_map(WorkLocation::as_plot)
        .map(|plot| plot.production_of(GoodKind::Food, ctx))
        .sum()
}

/// Construction points the carpentry workshop can deliver, limited by lumber
pub fn construction_points(
    locations: &[WorkLocation],
    ledger: &GoodsLedger,
    ctx: &ProductionContext,
) -> (u32, Option<GoodKind>) {
    let mut points = 0;
    let mut input = None;
    let builders = locations
        .iter()
        .filter(|loc| loc.capabilities(ctx.rules).construction_points)
        .filter_map(WorkLocation::as_workshop);
    for shop in builders {
        let raw = shop.production_of(GoodKind::Hammers, ctx);
        points += match shop.input(ctx.rules) {
            Some(good) => {
                input = Some(good);
                raw.min(ledger.quantity_of(good).saturating_sub(points))
            }
            None => raw,
        };
    }
    (points, input)
}

/// Civic points produced this turn
pub fn bell_production(locations: &[WorkLocation], ctx: &ProductionContext) -> u32 {
    locations
        .iter()
        .filter_map(WorkLocation::as_workshop)
        .map(|shop| shop.production_of(GoodKind::Bells, ctx))
        .sum()
}

/// Apply a plan to the ledger: outputs first, then the inputs they used
pub fn harvest(ledger: &mut GoodsLedger, plan: &ProductionPlan) -> Result<()> {
    for good in GoodKind::storable() {
        let amount = plan.produced_of(good);
        if amount > 0 {
            ledger.add(good, amount)?;
        }
    }
    for good in GoodKind::storable() {
        let amount = plan.consumed_of(good);
        if amount > 0 {
            ledger.remove(good, amount).map_err(|e| {
                SettlementError::InvariantViolation(format!("planned input missing: {}", e))
            })?;
        }
    }
    Ok(())
}
