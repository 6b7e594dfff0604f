//! Field plots - the settlement's own tile and the tiles around it

use serde::{Deserialize, Serialize};

use crate::core::types::{MapLocation, PlayerId, SettlementId};
use crate::external::player::{Ability, Stance};
use crate::rules::RuleSet;
use crate::settlement::goods::GoodKind;
use crate::settlement::production::ProductionContext;
use crate::settlement::work_location::{PlacementContext, PlacementError, Worker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Plains,
    Grassland,
    Prairie,
    Savannah,
    Marsh,
    Desert,
    Tundra,
    Forest,
    Hills,
    Mountains,
    Ocean,
}

impl TileKind {
    pub const ALL: [TileKind; 11] = [
        TileKind::Plains,
        TileKind::Grassland,
        TileKind::Prairie,
        TileKind::Savannah,
        TileKind::Marsh,
        TileKind::Desert,
        TileKind::Tundra,
        TileKind::Forest,
        TileKind::Hills,
        TileKind::Mountains,
        TileKind::Ocean,
    ];

    pub fn is_water(&self) -> bool {
        matches!(self, TileKind::Ocean)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TileKind::Plains => "plains",
            TileKind::Grassland => "grassland",
            TileKind::Prairie => "prairie",
            TileKind::Savannah => "savannah",
            TileKind::Marsh => "marsh",
            TileKind::Desert => "desert",
            TileKind::Tundra => "tundra",
            TileKind::Forest => "forest",
            TileKind::Hills => "hills",
            TileKind::Mountains => "mountains",
            TileKind::Ocean => "ocean",
        }
    }

    pub fn parse(name: &str) -> Option<TileKind> {
        let lowered = name.to_lowercase();
        Self::ALL.into_iter().find(|t| t.name() == lowered)
    }
}

/// Who owns the land under a plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileClaim {
    Unclaimed,
    Settlement(SettlementId),
    Player(PlayerId),
    Native(PlayerId),
}

/// What the map tells the settlement about a tile at founding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub location: MapLocation,
    pub kind: TileKind,
    pub claim: TileClaim,
}

impl TileSnapshot {
    pub fn new(location: MapLocation, kind: TileKind) -> Self {
        Self {
            location,
            kind,
            claim: TileClaim::Unclaimed,
        }
    }

    pub fn claimed(mut self, claim: TileClaim) -> Self {
        self.claim = claim;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPlot {
    tile: TileSnapshot,
    /// The settlement's own tile; worked without a worker
    center: bool,
    worker: Option<Worker>,
    work_good: Option<GoodKind>,
}

impl FieldPlot {
    pub fn new(tile: TileSnapshot) -> Self {
        Self {
            tile,
            center: false,
            worker: None,
            work_good: None,
        }
    }

    pub fn center(tile: TileSnapshot) -> Self {
        Self {
            center: true,
            ..Self::new(tile)
        }
    }

    pub fn tile(&self) -> &TileSnapshot {
        &self.tile
    }

    pub fn is_center(&self) -> bool {
        self.center
    }

    pub fn worker(&self) -> Option<&Worker> {
        self.worker.as_ref()
    }

    pub fn work_good(&self) -> Option<GoodKind> {
        self.work_good
    }

    /// Best non-food good of the tile, worked alongside food on the center plot
    pub fn secondary_good(&self, rules: &RuleSet) -> Option<GoodKind> {
        let mut best: Option<(GoodKind, u32)> = None;
        for y in rules.yields_of(self.tile.kind) {
            if y.good.is_food() || y.amount == 0 {
                continue;
            }
            if best.map_or(true, |(_, amount)| y.amount > amount) {
                best = Some((y.good, y.amount));
            }
        }
        best.map(|(good, _)| good)
    }

    pub fn production_of(&self, good: GoodKind, ctx: &ProductionContext) -> u32 {
        let potential = ctx.rules.tile_yield(self.tile.kind, good);
        if potential == 0 {
            return 0;
        }
        if self.center {
            if good.is_food() || self.secondary_good(ctx.rules) == Some(good) {
                return (potential as i32 + ctx.bonus).max(0) as u32;
            }
            return 0;
        }
        match &self.worker {
            Some(worker) if self.work_good == Some(good) => {
                let base = potential * worker.multiplier_for(good, ctx.config);
                (base as i32 + ctx.bonus).max(0) as u32
            }
            _ => 0,
        }
    }

    pub fn can_accept(&self, ctx: &PlacementContext) -> Result<(), PlacementError> {
        if self.center {
            return Err(PlacementError::CenterPlot);
        }
        if self.worker.is_some() {
            return Err(PlacementError::LocationFull);
        }
        if self.tile.kind.is_water() && !ctx.docks_built {
            return Err(PlacementError::RequiresDocks);
        }
        match self.tile.claim {
            TileClaim::Unclaimed => Ok(()),
            TileClaim::Settlement(id) if id == ctx.settlement => Ok(()),
            TileClaim::Settlement(id) => Err(PlacementError::ClaimedBySettlement(id)),
            TileClaim::Player(player) => match ctx.owner.stance_towards(player) {
                Stance::War => Err(PlacementError::HostileClaim(player)),
                Stance::Peace | Stance::Alliance => Ok(()),
            },
            TileClaim::Native(_) if ctx.owner.has_ability(Ability::ClaimNativeLand) => Ok(()),
            TileClaim::Native(player) => Err(PlacementError::NativeLand(player)),
        }
    }

    /// Seat a worker, claiming the tile and picking the good with the best yield
    pub(crate) fn seat(&mut self, worker: Worker, ctx: &PlacementContext) {
        let rules = ctx.rules;
        let mut best: Option<(GoodKind, u32)> = None;
        for y in rules.yields_of(self.tile.kind) {
            let amount = y.amount * worker.multiplier_for(y.good, ctx.config);
            if best.map_or(true, |(_, a)| amount > a) {
                best = Some((y.good, amount));
            }
        }
        self.work_good = best.map(|(good, _)| good);
        self.tile.claim = TileClaim::Settlement(ctx.settlement);
        self.worker = Some(worker);
    }

    /// Change the good the plot's worker produces
    pub fn set_work_good(&mut self, good: GoodKind) {
        if self.worker.is_some() {
            self.work_good = Some(good);
        }
    }

    pub(crate) fn take_worker(&mut self) -> Option<Worker> {
        self.work_good = None;
        self.worker.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::UnitId;
    use crate::external::player::PlayerProfile;

    fn plot(kind: TileKind, claim: TileClaim) -> FieldPlot {
        FieldPlot::new(TileSnapshot::new(MapLocation::new(1, 0), kind).claimed(claim))
    }

    fn colonist(id: u32, expertise: Option<GoodKind>) -> Worker {
        Worker::new(UnitId(id), format!("Colonist {}", id), expertise)
    }

    #[test]
    fn test_center_plot_yields_food_and_secondary() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let ctx = ProductionContext::new(&rules, &config, &owner, 0);

        let center = FieldPlot::center(TileSnapshot::new(MapLocation::new(0, 0), TileKind::Plains));
        assert_eq!(center.secondary_good(&rules), Some(GoodKind::Cotton));
        assert_eq!(center.production_of(GoodKind::Food, &ctx), 5);
        assert_eq!(center.production_of(GoodKind::Cotton, &ctx), 2);
        assert_eq!(center.production_of(GoodKind::Ore, &ctx), 0);
    }

    #[test]
    fn test_empty_plot_produces_nothing() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let ctx = ProductionContext::new(&rules, &config, &owner, 1);

        let plot = plot(TileKind::Forest, TileClaim::Unclaimed);
        assert_eq!(plot.production_of(GoodKind::Lumber, &ctx), 0);
    }

    #[test]
    fn test_seated_expert_doubles_yield() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let pctx = PlacementContext::new(SettlementId(1), &owner, false, &rules, &config);
        let ctx = ProductionContext::new(&rules, &config, &owner, 0);

        let mut forest = plot(TileKind::Forest, TileClaim::Unclaimed);
        forest.seat(colonist(1, Some(GoodKind::Furs)), &pctx);

        // Expert trapper ties with lumber; the earlier yield wins
        assert_eq!(forest.work_good(), Some(GoodKind::Furs));
        assert_eq!(forest.production_of(GoodKind::Furs, &ctx), 6);
        assert_eq!(forest.production_of(GoodKind::Lumber, &ctx), 0);
        assert_eq!(forest.tile().claim, TileClaim::Settlement(SettlementId(1)));

        let mut woods = plot(TileKind::Forest, TileClaim::Unclaimed);
        woods.seat(colonist(2, None), &pctx);
        assert_eq!(woods.work_good(), Some(GoodKind::Lumber));
        woods.set_work_good(GoodKind::Food);
        assert_eq!(woods.production_of(GoodKind::Food, &ctx), 2);
    }

    #[test]
    fn test_claims_are_checked() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let mut owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        owner.stances.insert(PlayerId(2), Stance::War);
        owner.stances.insert(PlayerId(3), Stance::Alliance);
        let ctx = PlacementContext::new(SettlementId(1), &owner, false, &rules, &config);

        assert!(plot(TileKind::Plains, TileClaim::Unclaimed).can_accept(&ctx).is_ok());
        assert!(plot(TileKind::Plains, TileClaim::Player(PlayerId(3))).can_accept(&ctx).is_ok());
        assert!(plot(TileKind::Plains, TileClaim::Settlement(SettlementId(1)))
            .can_accept(&ctx)
            .is_ok());
        assert_eq!(
            plot(TileKind::Plains, TileClaim::Player(PlayerId(2))).can_accept(&ctx),
            Err(PlacementError::HostileClaim(PlayerId(2)))
        );
        assert_eq!(
            plot(TileKind::Plains, TileClaim::Settlement(SettlementId(9))).can_accept(&ctx),
            Err(PlacementError::ClaimedBySettlement(SettlementId(9)))
        );
        assert_eq!(
            plot(TileKind::Plains, TileClaim::Native(PlayerId(7))).can_accept(&ctx),
            Err(PlacementError::NativeLand(PlayerId(7)))
        );
    }

    #[test]
    fn test_native_land_with_override_ability() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let mut owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        owner.abilities.push(Ability::ClaimNativeLand);
        let ctx = PlacementContext::new(SettlementId(1), &owner, false, &rules, &config);

        assert!(plot(TileKind::Plains, TileClaim::Native(PlayerId(7)))
            .can_accept(&ctx)
            .is_ok());
    }

    #[test]
    fn test_water_needs_docks() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let ocean = plot(TileKind::Ocean, TileClaim::Unclaimed);

        let inland = PlacementContext::new(SettlementId(1), &owner, false, &rules, &config);
        assert_eq!(ocean.can_accept(&inland), Err(PlacementError::RequiresDocks));

        let harbour = PlacementContext::new(SettlementId(1), &owner, true, &rules, &config);
        assert!(ocean.can_accept(&harbour).is_ok());
    }

    #[test]
    fn test_center_and_occupied_plots_reject() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let ctx = PlacementContext::new(SettlementId(1), &owner, false, &rules, &config);

        let center = FieldPlot::center(TileSnapshot::new(MapLocation::new(0, 0), TileKind::Plains));
        assert_eq!(center.can_accept(&ctx), Err(PlacementError::CenterPlot));

        let mut field = plot(TileKind::Plains, TileClaim::Unclaimed);
        field.seat(colonist(1, None), &ctx);
        assert_eq!(field.can_accept(&ctx), Err(PlacementError::LocationFull));
        assert_eq!(field.take_worker().map(|w| w.id), Some(UnitId(1)));
        assert_eq!(field.work_good(), None);
    }
}
