//! Work locations - places in a settlement that hold workers
//!
//! A closed set of variants with an explicit capability set, dispatched by
//! `match` rather than by inspecting runtime types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::EngineConfig;
use crate::core::types::{PlayerId, SettlementId, UnitId};
use crate::external::player::PlayerProfile;
use crate::rules::RuleSet;
use crate::settlement::field::FieldPlot;
use crate::settlement::goods::GoodKind;
use crate::settlement::production::ProductionContext;
use crate::settlement::workshop::{Workshop, WorkshopKind};

/// A colonist assigned inside the settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: UnitId,
    pub name: String,
    /// Good this worker is an expert at producing
    pub expertise: Option<GoodKind>,
}

impl Worker {
    pub fn new(id: UnitId, name: impl Into<String>, expertise: Option<GoodKind>) -> Self {
        Self {
            id,
            name: name.into(),
            expertise,
        }
    }

    pub fn multiplier_for(&self, good: GoodKind, config: &EngineConfig) -> u32 {
        if self.expertise == Some(good) {
            config.expert_multiplier
        } else {
            1
        }
    }
}

/// Why a worker cannot be placed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no free workplace")]
    LocationFull,

    #[error("the settlement's own tile is worked without colonists")]
    CenterPlot,

    #[error("{0} is not built")]
    NotBuilt(WorkshopKind),

    #[error("{0} has no workplaces")]
    NoWorkplaces(WorkshopKind),

    #[error("water tiles need docks")]
    RequiresDocks,

    #[error("tile belongs to settlement {0:?}")]
    ClaimedBySettlement(SettlementId),

    #[error("tile is claimed by hostile player {0:?}")]
    HostileClaim(PlayerId),

    #[error("tile is native land of player {0:?}")]
    NativeLand(PlayerId),
}

/// What a work location can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub produces_goods: bool,
    pub accepts_workers: bool,
    pub construction_points: bool,
}

/// Settlement-level facts needed to judge a placement
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub settlement: SettlementId,
    pub owner: &'a PlayerProfile,
    pub docks_built: bool,
    pub rules: &'a RuleSet,
    pub config: &'a EngineConfig,
}

impl<'a> PlacementContext<'a> {
    pub fn new(
        settlement: SettlementId,
        owner: &'a PlayerProfile,
        docks_built: bool,
        rules: &'a RuleSet,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            settlement,
            owner,
            docks_built,
            rules,
            config,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkLocation {
    Plot(FieldPlot),
    Workshop(Workshop),
}

impl WorkLocation {
    pub fn capabilities(&self, rules: &RuleSet) -> Capabilities {
        match self {
            WorkLocation::Plot(plot) => Capabilities {
                produces_goods: true,
                accepts_workers: !plot.is_center(),
                construction_points: false,
            },
            WorkLocation::Workshop(shop) => {
                let output = shop.output(rules);
                Capabilities {
                    produces_goods: output.map_or(false, |g| g.is_storable()),
                    accepts_workers: shop.rule(rules).map_or(false, |r| r.workplaces > 0),
                    construction_points: output == Some(GoodKind::Hammers),
                }
            }
        }
    }

    pub fn workers(&self) -> &[Worker] {
        match self {
            WorkLocation::Plot(plot) => match plot.worker() {
                Some(worker) => std::slice::from_ref(worker),
                None => &[],
            },
            WorkLocation::Workshop(shop) => shop.workers(),
        }
    }

    pub fn has_worker(&self, id: UnitId) -> bool {
        self.workers().iter().any(|w| w.id == id)
    }

    /// Production of `good` this turn, before input limits
    pub fn production_of(&self, good: GoodKind, ctx: &ProductionContext) -> u32 {
        match self {
            WorkLocation::Plot(plot) => plot.production_of(good, ctx),
            WorkLocation::Workshop(shop) => shop.production_of(good, ctx),
        }
    }

    pub fn can_accept(&self, ctx: &PlacementContext) -> Result<(), PlacementError> {
        if !self.capabilities(ctx.rules).accepts_workers {
            return Err(match self {
                WorkLocation::Plot(_) => PlacementError::CenterPlot,
                WorkLocation::Workshop(shop) => PlacementError::NoWorkplaces(shop.kind()),
            });
        }
        match self {
            WorkLocation::Plot(plot) => plot.can_accept(ctx),
            WorkLocation::Workshop(shop) => shop.can_accept(ctx.rules),
        }
    }

    /// Run the capability check and seat the worker
    pub fn add_worker(&mut self, worker: Worker, ctx: &PlacementContext) -> Result<(), PlacementError> {
        self.can_accept(ctx)?;
        match self {
            WorkLocation::Plot(plot) => plot.seat(worker, ctx),
            WorkLocation::Workshop(shop) => shop.push_worker(worker),
        }
        Ok(())
    }

    pub fn remove_worker(&mut self, id: UnitId) -> Option<Worker> {
        match self {
            WorkLocation::Plot(plot) => match plot.worker() {
                Some(w) if w.id == id => plot.take_worker(),
                _ => None,
            },
            WorkLocation::Workshop(shop) => shop.remove_worker(id),
        }
    }

    pub(crate) fn take_workers(&mut self) -> Vec<Worker> {
        match self {
            WorkLocation::Plot(plot) => plot.take_worker().into_iter().collect(),
            WorkLocation::Workshop(shop) => shop.take_workers(),
        }
    }

    pub fn as_plot(&self) -> Option<&FieldPlot> {
        match self {
            WorkLocation::Plot(plot) => Some(plot),
            WorkLocation::Workshop(_) => None,
        }
    }

    pub fn as_workshop(&self) -> Option<&Workshop> {
        match self {
            WorkLocation::Workshop(shop) => Some(shop),
            WorkLocation::Plot(_) => None,
        }
    }

    pub(crate) fn as_workshop_mut(&mut self) -> Option<&mut Workshop> {
        match self {
            WorkLocation::Workshop(shop) => Some(shop),
            WorkLocation::Plot(_) => None,
        }
    }

    pub(crate) fn as_plot_mut(&mut self) -> Option<&mut FieldPlot> {
        match self {
            WorkLocation::Plot(plot) => Some(plot),
            WorkLocation::Workshop(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MapLocation;
    use crate::settlement::field::{TileKind, TileSnapshot};

    #[test]
    fn test_capabilities_by_variant() {
        let rules = RuleSet::with_defaults();

        let center = WorkLocation::Plot(FieldPlot::center(TileSnapshot::new(
            MapLocation::new(0, 0),
            TileKind::Plains,
        )));
        assert_eq!(
            center.capabilities(&rules),
            Capabilities {
                produces_goods: true,
                accepts_workers: false,
                construction_points: false
            }
        );

        let carpenter = WorkLocation::Workshop(Workshop::new(WorkshopKind::Carpenter, 1));
        let caps = carpenter.capabilities(&rules);
        assert!(caps.construction_points);
        assert!(caps.accepts_workers);
        assert!(!caps.produces_goods);

        let weaver = WorkLocation::Workshop(Workshop::new(WorkshopKind::Weaver, 1));
        assert!(weaver.capabilities(&rules).produces_goods);

        let stockade = WorkLocation::Workshop(Workshop::new(WorkshopKind::Stockade, 1));
        assert_eq!(stockade.capabilities(&rules), Capabilities::default());
    }

    #[test]
    fn test_add_and_remove_worker() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let ctx = PlacementContext::new(SettlementId(1), &owner, false, &rules, &config);

        let mut plot = WorkLocation::Plot(FieldPlot::new(TileSnapshot::new(
            MapLocation::new(1, 1),
            TileKind::Hills,
        )));
        plot.add_worker(Worker::new(UnitId(4), "Miner", Some(GoodKind::Ore)), &ctx)
            .unwrap();
        assert!(plot.has_worker(UnitId(4)));
        assert_eq!(
            plot.add_worker(Worker::new(UnitId(5), "Farmer", None), &ctx),
            Err(PlacementError::LocationFull)
        );

        assert!(plot.remove_worker(UnitId(5)).is_none());
        assert_eq!(plot.remove_worker(UnitId(4)).map(|w| w.name), Some("Miner".into()));
        assert!(plot.workers().is_empty());
    }

    #[test]
    fn test_locations_without_worker_capability_reject() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let ctx = PlacementContext::new(SettlementId(1), &owner, false, &rules, &config);

        let mut center = WorkLocation::Plot(FieldPlot::center(TileSnapshot::new(
            MapLocation::new(0, 0),
            TileKind::Plains,
        )));
        assert_eq!(
            center.add_worker(Worker::new(UnitId(1), "Farmer", None), &ctx),
            Err(PlacementError::CenterPlot)
        );

        let mut stockade = WorkLocation::Workshop(Workshop::new(WorkshopKind::Stockade, 1));
        assert_eq!(
            stockade.add_worker(Worker::new(UnitId(2), "Guard", None), &ctx),
            Err(PlacementError::NoWorkplaces(WorkshopKind::Stockade))
        );
        assert!(center.workers().is_empty());
        assert!(stockade.workers().is_empty());
    }
}
