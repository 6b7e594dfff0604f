//! Settlement - owner of work locations, goods, construction and civic state

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SettlementError};
use crate::core::types::{MapLocation, PlayerId, SettlementId, Turn, UnitId};
use crate::external::market::Market;
use crate::external::player::PlayerProfile;
use crate::rules::{BuildCost, RuleSet};
use crate::settlement::civic::{CivicState, Headcount};
use crate::settlement::construction::{self, BuildQueue, BuildTarget};
use crate::settlement::field::{FieldPlot, TileClaim, TileSnapshot};
use crate::settlement::goods::GoodKind;
use crate::settlement::ledger::GoodsLedger;
use crate::settlement::production::ProductionContext;
use crate::settlement::warehouse::WarehouseSettings;
use crate::settlement::work_location::{PlacementContext, WorkLocation, Worker};
use crate::settlement::workshop::{Workshop, WorkshopKind};

/// Whether the local player can see inside the settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Local,
    /// Someone else's settlement; only its apparent size is known
    Foreign { apparent_size: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    id: SettlementId,
    name: String,
    owner: PlayerId,
    location: MapLocation,
    coastal: bool,
    visibility: Visibility,
    /// Creation order; index 0 is the center plot
    work_locations: Vec<WorkLocation>,
    ledger: GoodsLedger,
    warehouse: WarehouseSettings,
    hammers: u32,
    build_queue: BuildQueue,
    civic: CivicState,
    last_construction_turn: Option<Turn>,
}

impl Settlement {
    /// Found a settlement on the first tile, with plots for the remaining
    /// tiles and one workshop per rule line at its initial level
    pub fn found(
        id: SettlementId,
        name: impl Into<String>,
        owner: PlayerId,
        tiles: Vec<TileSnapshot>,
        coastal: bool,
        rules: &RuleSet,
    ) -> Result<Self> {
        let mut tiles = tiles.into_iter();
        let center = tiles.next().ok_or_else(|| {
            SettlementError::InvariantViolation("a settlement needs its own tile".into())
        })?;
        let location = center.location;

        let mut work_locations = vec![WorkLocation::Plot(FieldPlot::center(
            center.claimed(TileClaim::Settlement(id)),
        ))];
        work_locations.extend(tiles.map(|tile| WorkLocation::Plot(FieldPlot::new(tile))));
        for rule in rules.workshops() {
            let level = if rule.requires_coast && !coastal {
                0
            } else {
                rule.initial_level.min(rule.max_level())
            };
            work_locations.push(WorkLocation::Workshop(Workshop::new(rule.kind, level)));
        }

        let settlement = Self {
            id,
            name: name.into(),
            owner,
            location,
            coastal,
            visibility: Visibility::Local,
            work_locations,
            ledger: GoodsLedger::new(),
            warehouse: WarehouseSettings::new(),
            hammers: 0,
            build_queue: BuildQueue::new(),
            civic: CivicState::new(),
            last_construction_turn: None,
        };
        tracing::info!(
            "Founded {} with {} work locations",
            settlement.name,
            settlement.work_locations.len()
        );
        Ok(settlement)
    }

    /// Release everything, returning the workers that were inside
    pub fn dispose(mut self) -> Vec<Worker> {
        let workers: Vec<Worker> = self
            .work_locations
            .iter_mut()
            .flat_map(WorkLocation::take_workers)
            .collect();
        tracing::info!("Disposed {}, releasing {} workers", self.name, workers.len());
        workers
    }

    pub fn id(&self) -> SettlementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn location(&self) -> MapLocation {
        self.location
    }

    pub fn is_coastal(&self) -> bool {
        self.coastal
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn work_locations(&self) -> &[WorkLocation] {
        &self.work_locations
    }

    pub fn ledger(&self) -> &GoodsLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut GoodsLedger {
        &mut self.ledger
    }

    pub fn warehouse(&self) -> &WarehouseSettings {
        &self.warehouse
    }

    pub fn warehouse_mut(&mut self) -> &mut WarehouseSettings {
        &mut self.warehouse
    }

    pub fn hammers(&self) -> u32 {
        self.hammers
    }

    pub fn build_queue(&self) -> &BuildQueue {
        &self.build_queue
    }

    pub fn civic(&self) -> &CivicState {
        &self.civic
    }

    pub fn last_construction_turn(&self) -> Option<Turn> {
        self.last_construction_turn
    }

    pub(crate) fn civic_mut(&mut self) -> &mut CivicState {
        &mut self.civic
    }

    pub(crate) fn set_hammers(&mut self, hammers: u32) {
        self.hammers = hammers;
    }

    pub(crate) fn build_queue_mut(&mut self) -> &mut BuildQueue {
        &mut self.build_queue
    }

    pub(crate) fn mark_construction_turn(&mut self, turn: Turn) -> bool {
        if self.last_construction_turn == Some(turn) {
            return false;
        }
        self.last_construction_turn = Some(turn);
        true
    }

    /// Workers inside the settlement
    pub fn headcount(&self) -> u32 {
        self.work_locations
            .iter()
            .map(|loc| loc.workers().len() as u32)
            .sum()
    }

    /// Headcount as seen by the local player
    pub fn visible_headcount(&self) -> Headcount {
        match self.visibility {
            Visibility::Local => Headcount::Known(self.headcount()),
            Visibility::Foreign { .. } => Headcount::Hidden,
        }
    }

    /// Size shown on the map: real headcount or the apparent size
    pub fn display_size(&self) -> u32 {
        match self.visibility {
            Visibility::Local => self.headcount(),
            Visibility::Foreign { apparent_size } => apparent_size,
        }
    }

    pub fn workers(&self) -> impl Iterator<Item = &Worker> {
        self.work_locations.iter().flat_map(WorkLocation::workers)
    }

    pub fn workshop(&self, kind: WorkshopKind) -> Option<&Workshop> {
        self.work_locations
            .iter()
            .filter_map(WorkLocation::as_workshop)
            .find(|w| w.kind() == kind)
    }

    pub(crate) fn workshop_mut(&mut self, kind: WorkshopKind) -> Option<&mut Workshop> {
        self.work_locations
            .iter_mut()
            .filter_map(WorkLocation::as_workshop_mut)
            .find(|w| w.kind() == kind)
    }

    /// Index of a workshop among the work locations, for worker placement
    pub fn workshop_index(&self, kind: WorkshopKind) -> Option<usize> {
        self.work_locations
            .iter()
            .position(|loc| loc.as_workshop().map(Workshop::kind) == Some(kind))
    }

    pub fn workshop_level(&self, kind: WorkshopKind) -> u8 {
        self.workshop(kind).map(Workshop::level).unwrap_or(0)
    }

    pub fn has_built(&self, kind: WorkshopKind) -> bool {
        self.workshop_level(kind) > 0
    }

    /// Storage limit for non-food goods
    pub fn warehouse_capacity(&self, config: &EngineConfig) -> u32 {
        config.warehouse_capacity(self.workshop_level(WorkshopKind::Warehouse))
    }

    pub fn production_context<'a>(
        &self,
        rules: &'a RuleSet,
        config: &'a EngineConfig,
        owner: &'a PlayerProfile,
    ) -> ProductionContext<'a> {
        ProductionContext::new(rules, config, owner, self.civic.production_bonus())
    }

    fn placement_context<'a>(
        &self,
        owner: &'a PlayerProfile,
        rules: &'a RuleSet,
        config: &'a EngineConfig,
    ) -> PlacementContext<'a> {
        PlacementContext::new(
            self.id,
            owner,
            self.has_built(WorkshopKind::Docks),
            rules,
            config,
        )
    }

    /// Place a worker in the work location at `index`
    pub fn add_worker(
        &mut self,
        worker: Worker,
        index: usize,
        owner: &PlayerProfile,
        rules: &RuleSet,
        config: &EngineConfig,
    ) -> Result<()> {
        if self.workers().any(|w| w.id == worker.id) {
            return Err(SettlementError::InvariantViolation(format!(
                "unit {:?} is already in {}",
                worker.id, self.name
            )));
        }
        let ctx = self.placement_context(owner, rules, config);
        let location = self
            .work_locations
            .get_mut(index)
            .ok_or(SettlementError::UnknownWorkLocation(index))?;
        tracing::debug!("{}: placing {} at location {}", self.name, worker.name, index);
        location.add_worker(worker, &ctx)?;
        Ok(())
    }

    pub fn remove_worker(&mut self, id: UnitId) -> Result<Worker> {
        self.work_locations
            .iter_mut()
            .find_map(|loc| loc.remove_worker(id))
            .ok_or(SettlementError::UnknownUnit(id))
    }

    /// Move a worker between work locations; on rejection it stays where it was
    pub fn move_worker(
        &mut self,
        id: UnitId,
        to: usize,
        owner: &PlayerProfile,
        rules: &RuleSet,
        config: &EngineConfig,
    ) -> Result<()> {
        if to >= self.work_locations.len() {
            return Err(SettlementError::UnknownWorkLocation(to));
        }
        let from = self
            .work_locations
            .iter()
            .position(|loc| loc.has_worker(id))
            .ok_or(SettlementError::UnknownUnit(id))?;
        if from == to {
            return Ok(());
        }

        let ctx = self.placement_context(owner, rules, config);
        self.work_locations[to].can_accept(&ctx)?;
        let worker = self.work_locations[from]
            .remove_worker(id)
            .ok_or(SettlementError::UnknownUnit(id))?;
        self.work_locations[to].add_worker(worker, &ctx)?;
        Ok(())
    }

    /// Change what the worker on a plot produces
    pub fn set_plot_good(&mut self, index: usize, good: GoodKind) -> Result<()> {
        let plot = self
            .work_locations
            .get_mut(index)
            .and_then(WorkLocation::as_plot_mut)
            .ok_or(SettlementError::UnknownWorkLocation(index))?;
        plot.set_work_good(good);
        Ok(())
    }

    /// Whether `target` may be queued right now
    pub fn can_build(&self, target: &BuildTarget, owner: &PlayerProfile, rules: &RuleSet) -> Result<()> {
        match target {
            BuildTarget::Workshop(kind) => {
                let rule = rules.workshop(*kind).ok_or_else(|| {
                    SettlementError::BuildNotAllowed(format!("no rules for {}", kind))
                })?;
                let level = self.workshop_level(*kind);
                if level >= rule.max_level() {
                    return Err(SettlementError::BuildNotAllowed(format!(
                        "{} is fully upgraded",
                        kind
                    )));
                }
                if rule.requires_coast && !self.coastal {
                    return Err(SettlementError::BuildNotAllowed(format!(
                        "{} needs coastal access",
                        kind
                    )));
                }
                if let Some(ability) = rule.level(level + 1).and_then(|l| l.requires_ability) {
                    if !owner.has_ability(ability) {
                        return Err(SettlementError::BuildNotAllowed(format!(
                            "{} level {} needs {:?}",
                            kind,
                            level + 1,
                            ability
                        )));
                    }
                }
                Ok(())
            }
            BuildTarget::Unit(id) => {
                let blueprint = rules.unit(id).ok_or_else(|| {
                    SettlementError::BuildNotAllowed(format!("unknown unit {}", id))
                })?;
                if !blueprint.buildable {
                    return Err(SettlementError::BuildNotAllowed(format!(
                        "{} cannot be built",
                        id
                    )));
                }
                if let Some((kind, level)) = blueprint.requires {
                    if self.workshop_level(kind) < level {
                        return Err(SettlementError::BuildNotAllowed(format!(
                            "{} needs {} level {}",
                            id, kind, level
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Make `target` the active build target
    pub fn set_build_target(
        &mut self,
        target: BuildTarget,
        owner: &PlayerProfile,
        rules: &RuleSet,
        config: &EngineConfig,
    ) -> Result<()> {
        self.can_build(&target, owner, rules)?;
        if self.build_queue.current() != Some(&target) && config.reset_hammers_on_target_change {
            self.hammers = 0;
        }
        tracing::debug!("{}: build target set to {}", self.name, target);
        self.build_queue.set_current(target);
        Ok(())
    }

    /// Append a target behind the active one
    pub fn enqueue(&mut self, target: BuildTarget, owner: &PlayerProfile, rules: &RuleSet) -> Result<()> {
        self.can_build(&target, owner, rules)?;
        self.build_queue.push(target);
        Ok(())
    }

    /// Stop building anything
    pub fn clear_build_queue(&mut self, config: &EngineConfig) {
        self.build_queue.clear();
        if config.reset_hammers_on_target_change {
            self.hammers = 0;
        }
    }

    /// Cost of the active target's next step
    pub fn current_build_cost(&self, rules: &RuleSet) -> Option<BuildCost> {
        let target = self.build_queue.current()?;
        let level = match target {
            BuildTarget::Workshop(kind) => self.workshop_level(*kind),
            BuildTarget::Unit(_) => 0,
        };
        rules.cost_of(target, level)
    }

    /// Gold needed to finish the active target now
    pub fn price_to_complete(
        &self,
        rules: &RuleSet,
        config: &EngineConfig,
        market: &dyn Market,
    ) -> Option<u32> {
        let cost = self.current_build_cost(rules)?;
        construction::price_to_complete(self.hammers, &cost, &self.ledger, market, config)
    }

    /// Pay gold so the active target completes at the next evaluation.
    ///
    /// Hammers jump to the requirement and missing materials are added to
    /// the ledger. The population gate still applies.
    pub fn pay_to_complete(
        &mut self,
        owner: &mut PlayerProfile,
        rules: &RuleSet,
        config: &EngineConfig,
        market: &dyn Market,
    ) -> Result<u32> {
        let cost = self
            .current_build_cost(rules)
            .ok_or_else(|| SettlementError::BuildNotAllowed("nothing to complete".into()))?;
        let price =
            construction::price_to_complete(self.hammers, &cost, &self.ledger, market, config)
                .ok_or_else(|| {
                    SettlementError::BuildNotAllowed("no price for the remaining work".into())
                })?;

        owner.debit(price)?;
        for (good, amount) in self.ledger.missing_materials(&cost.materials) {
            self.ledger.add(good, amount)?;
        }
        self.hammers = cost.hammers;
        tracing::info!("{}: paid {} gold to finish construction", self.name, price);
        Ok(price)
    }
}
