//! Turn driver - advances one settlement by one turn
//!
//! Steps run in a fixed order, each seeing the result of the one before:
//! repair -> food -> livestock -> growth -> construction -> harvest ->
//! export -> warehouse cleanup -> civic support
//!
//! Collaborator failures skip the step that needs them and are reported
//! through notifications. Only invariant violations come back as errors.

use serde::Serialize;

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SettlementError};
use crate::core::types::{Turn, UnitId};
use crate::external::harbour::Harbour;
use crate::external::market::{Market, SaleChannel};
use crate::external::notify::{Attachment, MessageKey, Notification, NotificationSink};
use crate::external::player::PlayerProfile;
use crate::external::units::{UnitFactory, UnitHandle, UnitOrigin};
use crate::rules::RuleSet;
use crate::settlement::civic::{CivicChange, Headcount};
use crate::settlement::colony::Settlement;
use crate::settlement::construction::{
    accumulate_hammers, describe_materials, evaluate, BuildTarget, ConstructionStatus,
};
use crate::settlement::goods::GoodKind;
use crate::settlement::ledger::WarehouseEvent;
use crate::settlement::production::{
    bell_production, construction_points, food_production, harvest, plan_storable_production,
};
use crate::settlement::work_location::Worker;
use crate::settlement::workshop::WorkshopKind;

/// Everything a turn needs from outside the settlement
pub struct TurnContext<'a> {
    pub turn: Turn,
    pub rules: &'a RuleSet,
    pub config: &'a EngineConfig,
    pub owner: &'a mut PlayerProfile,
    pub notifications: &'a mut dyn NotificationSink,
    pub market: &'a mut dyn Market,
    pub units: &'a mut dyn UnitFactory,
    pub harbour: &'a mut dyn Harbour,
}

/// What happened during one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TurnReport {
    pub turn: Turn,
    pub repaired: Vec<UnitId>,
    pub food_consumed: u32,
    pub starved: Option<Worker>,
    pub horses_bred: u32,
    pub new_colonist: Option<UnitHandle>,
    /// False when construction was already evaluated for this turn number
    pub construction_evaluated: bool,
    pub construction_points: u32,
    pub completed: Option<BuildTarget>,
    pub produced: Vec<(GoodKind, u32)>,
    /// (good, amount, gold)
    pub exported: Vec<(GoodKind, u32, u32)>,
    pub discarded: Vec<(GoodKind, u32)>,
    pub bells: u32,
    pub support: u32,
}

impl TurnReport {
    fn new(turn: Turn) -> Self {
        Self {
            turn,
            ..Self::default()
        }
    }
}

impl Settlement {
    /// Run every turn step once
    pub fn process_turn(&mut self, ctx: &mut TurnContext) -> Result<TurnReport> {
        let mut report = TurnReport::new(ctx.turn);
        tracing::debug!("{}: turn {} begins", self.name(), ctx.turn);

        self.ledger_mut().begin_turn();
        self.repair_vessels(ctx, &mut report);
        self.consume_food(ctx, &mut report)?;
        self.breed_livestock(ctx, &mut report)?;
        self.grow_population(ctx, &mut report)?;
        self.evaluate_construction(ctx, &mut report)?;
        self.harvest_production(ctx, &mut report)?;
        self.export_goods(ctx, &mut report)?;
        self.clean_warehouse(ctx, &mut report);
        self.update_civic_support(ctx, &mut report);

        tracing::info!(
            "{}: turn {} done, headcount {}, food {}, hammers {}, support {}%",
            self.name(),
            ctx.turn,
            self.headcount(),
            self.ledger().quantity_of(GoodKind::Food),
            self.hammers(),
            self.civic().support()
        );
        Ok(report)
    }

    fn notify(&self, ctx: &mut TurnContext, notification: Notification) {
        ctx.notifications.notify(notification);
    }

    fn message(&self, key: MessageKey) -> Notification {
        Notification::new(self.id(), key).with("%settlement%", self.name())
    }

    fn repair_vessels(&mut self, ctx: &mut TurnContext, report: &mut TurnReport) {
        report.repaired = ctx.harbour.repair_vessels(self.id());
        for id in report.repaired.clone() {
            let n = self
                .message(MessageKey::VesselRepaired)
                .with_attachment(Attachment::Unit(id));
            self.notify(ctx, n);
        }
    }

    fn consume_food(&mut self, ctx: &mut TurnContext, report: &mut TurnReport) -> Result<()> {
        let headcount = self.headcount();
        let consumption = ctx.config.food_per_colonist * headcount;
        let stored = self.ledger().quantity_of(GoodKind::Food);

        if stored < consumption {
            let victim = self.workers().next().map(|w| w.id);
            let worker = match victim {
                Some(id) => self.remove_worker(id)?,
                None => {
                    return Err(SettlementError::InvariantViolation(
                        "food consumption without workers".into(),
                    ))
                }
            };
            self.ledger_mut().take_all(GoodKind::Food);
            tracing::warn!("{}: {} starved", self.name(), worker.name);

            let n = self
                .message(MessageKey::ColonistStarved)
                .with("%unit%", &worker.name)
                .with_attachment(Attachment::Unit(worker.id));
            self.notify(ctx, n);
            report.starved = Some(worker);
            return Ok(());
        }

        self.ledger_mut().remove(GoodKind::Food, consumption)?;
        report.food_consumed = consumption;

        let production = {
            let pctx = self.production_context(ctx.rules, ctx.config, ctx.owner);
            food_production(self.work_locations(), &pctx)
        };
        let net = i64::from(production) - i64::from(consumption);
        if net < 0 {
            let remaining = i64::from(stored - consumption);
            let turns = remaining / -net;
            if turns <= i64::from(ctx.config.famine_warning_turns) {
                tracing::debug!("{}: famine in {} turns", self.name(), turns);
                let n = self
                    .message(MessageKey::FamineFeared)
                    .with("%turns%", turns)
                    .with_attachment(Attachment::Good(GoodKind::Food));
                self.notify(ctx, n);
            }
        }
        Ok(())
    }

    fn breed_livestock(&mut self, ctx: &mut TurnContext, report: &mut TurnReport) -> Result<()> {
        let config = ctx.config;
        let horses = self.ledger().quantity_of(GoodKind::Horses);
        if horses < config.breeding_minimum_stock {
            return Ok(());
        }

        let headroom = self.warehouse_capacity(config).saturating_sub(horses);
        let potential = horses.checked_div(config.breeding_divisor).unwrap_or(0).max(1);
        let mut output = potential.min(headroom);

        let stables = self.has_built(WorkshopKind::Stables);
        if !stables {
            // Half the output is fed from the food store
            let food = self.ledger().quantity_of(GoodKind::Food);
            output = output.min(food.saturating_mul(2).saturating_add(1));
        }
        if output == 0 {
            return Ok(());
        }

        let food_cost = if stables { 0 } else { output / 2 };
        self.ledger_mut().remove(GoodKind::Food, food_cost)?;
        self.ledger_mut().add(GoodKind::Horses, output)?;
        report.horses_bred = output;
        tracing::debug!(
            "{}: {} horses bred for {} food",
            self.name(),
            output,
            food_cost
        );
        Ok(())
    }

    fn grow_population(&mut self, ctx: &mut TurnContext, report: &mut TurnReport) -> Result<()> {
        let threshold = ctx.config.growth_food_threshold;
        if self.ledger().quantity_of(GoodKind::Food) < threshold {
            return Ok(());
        }

        let blueprint = match ctx.rules.colonist_blueprint() {
            Some(id) => id,
            None => {
                let n = self
                    .message(MessageKey::GrowthFailed)
                    .with("%reason%", "no colonist blueprint");
                self.notify(ctx, n);
                return Ok(());
            }
        };

        match ctx
            .units
            .create_unit(UnitOrigin::Growth, self.location(), self.owner(), blueprint)
        {
            Ok(handle) => {
                self.ledger_mut().remove(GoodKind::Food, threshold)?;
                tracing::info!("{}: new colonist {}", self.name(), handle.name);
                let n = self
                    .message(MessageKey::NewColonist)
                    .with("%unit%", &handle.name)
                    .with_attachment(Attachment::Unit(handle.id));
                self.notify(ctx, n);
                report.new_colonist = Some(handle);
            }
            Err(e) => {
                tracing::warn!("{}: colonist creation failed: {}", self.name(), e);
                let n = self.message(MessageKey::GrowthFailed).with("%reason%", e);
                self.notify(ctx, n);
            }
        }
        Ok(())
    }

    fn evaluate_construction(
        &mut self,
        ctx: &mut TurnContext,
        report: &mut TurnReport,
    ) -> Result<()> {
        if !self.mark_construction_turn(ctx.turn) {
            tracing::debug!(
                "{}: construction already evaluated for turn {}",
                self.name(),
                ctx.turn
            );
            return Ok(());
        }
        report.construction_evaluated = true;

        let target = match self.build_queue().current().cloned() {
            Some(target) => target,
            None => return Ok(()),
        };

        if let Err(e) = self.can_build(&target, ctx.owner, ctx.rules) {
            tracing::warn!("{}: dropping build target {}: {}", self.name(), target, e);
            let n = self
                .message(MessageKey::CannotBuild)
                .with("%target%", &target)
                .with("%reason%", e);
            self.notify(ctx, n);
            self.build_queue_mut().pop_current();
            if ctx.config.reset_hammers_on_target_change {
                self.set_hammers(0);
            }
            self.notify_if_queue_empty(ctx);
            return Ok(());
        }

        let cost = self.current_build_cost(ctx.rules).ok_or_else(|| {
            SettlementError::InvariantViolation(format!("no cost for buildable {}", target))
        })?;

        let (points, input) = {
            let pctx = self.production_context(ctx.rules, ctx.config, ctx.owner);
            construction_points(self.work_locations(), self.ledger(), &pctx)
        };
        if let Some(input) = input {
            self.ledger_mut().remove(input, points)?;
        }
        self.set_hammers(accumulate_hammers(self.hammers(), points, cost.hammers));
        report.construction_points = points;

        match evaluate(self.hammers(), &cost, self.headcount(), self.ledger()) {
            ConstructionStatus::InProgress { hammers, required } => {
                tracing::debug!(
                    "{}: building {} ({}/{})",
                    self.name(),
                    target,
                    hammers,
                    required
                );
            }
            ConstructionStatus::NeedMorePopulation { required, current } => {
                let n = self
                    .message(MessageKey::NeedMorePopulation)
                    .with("%target%", &target)
                    .with("%required%", required)
                    .with("%current%", current);
                self.notify(ctx, n);
            }
            ConstructionStatus::MissingMaterials { missing } => {
                let mut n = self
                    .message(MessageKey::MissingMaterials)
                    .with("%target%", &target)
                    .with("%missing%", describe_materials(&missing));
                if let Some((good, _)) = missing.first() {
                    n = n.with_attachment(Attachment::Good(*good));
                }
                self.notify(ctx, n);
            }
            ConstructionStatus::Ready => {
                if let Some(done) = self.complete_construction(ctx)? {
                    report.completed = Some(done);
                }
            }
        }
        Ok(())
    }

    /// Finish the active target.
    ///
    /// Fails with `InvariantViolation` unless hammers, materials and
    /// population all meet the requirement. Returns `None` when a unit could
    /// not be created; hammers and materials are then left as they were.
    pub fn complete_construction(&mut self, ctx: &mut TurnContext) -> Result<Option<BuildTarget>> {
        let target = self.build_queue().current().cloned().ok_or_else(|| {
            SettlementError::InvariantViolation("no construction target".into())
        })?;
        let cost = self.current_build_cost(ctx.rules).ok_or_else(|| {
            SettlementError::InvariantViolation(format!("{} cannot advance", target))
        })?;
        if evaluate(self.hammers(), &cost, self.headcount(), self.ledger()) != ConstructionStatus::Ready {
            return Err(SettlementError::InvariantViolation(format!(
                "{} completed with unmet requirements",
                target
            )));
        }

        let n = match &target {
            BuildTarget::Workshop(kind) => {
                self.ledger_mut().consume_materials(&cost.materials)?;
                let level = self
                    .workshop_mut(*kind)
                    .ok_or_else(|| {
                        SettlementError::InvariantViolation(format!("no {} workshop", kind))
                    })?
                    .advance_level(ctx.rules)?;
                let name = ctx
                    .rules
                    .workshop_level(*kind, level)
                    .map(|l| l.name.clone())
                    .unwrap_or_else(|| kind.to_string());
                tracing::info!("{}: {} completed (level {})", self.name(), name, level);
                self.message(MessageKey::BuildingCompleted)
                    .with("%building%", name)
                    .with("%level%", level)
                    .with_attachment(Attachment::Workshop(*kind))
            }
            BuildTarget::Unit(id) => {
                let created = ctx.units.create_unit(
                    UnitOrigin::Construction,
                    self.location(),
                    self.owner(),
                    id,
                );
                match created {
                    Ok(handle) => {
                        self.ledger_mut().consume_materials(&cost.materials)?;
                        tracing::info!("{}: {} completed", self.name(), handle.name);
                        self.message(MessageKey::UnitCompleted)
                            .with("%unit%", &handle.name)
                            .with_attachment(Attachment::Unit(handle.id))
                    }
                    Err(e) => {
                        tracing::warn!("{}: could not create {}: {}", self.name(), id, e);
                        let n = self
                            .message(MessageKey::UnitCreationFailed)
                            .with("%unit%", id)
                            .with("%reason%", e)
                            .with_attachment(Attachment::Blueprint(id.to_string()));
                        self.notify(ctx, n);
                        return Ok(None);
                    }
                }
            }
        };

        self.set_hammers(0);
        self.build_queue_mut().pop_current();
        self.notify(ctx, n);
        self.notify_if_queue_empty(ctx);
        Ok(Some(target))
    }

    fn notify_if_queue_empty(&self, ctx: &mut TurnContext) {
        if self.build_queue().is_empty() {
            let n = self.message(MessageKey::BuildQueueEmpty);
            self.notify(ctx, n);
        }
    }

    fn harvest_production(&mut self, ctx: &mut TurnContext, report: &mut TurnReport) -> Result<()> {
        let plan = {
            let pctx = self.production_context(ctx.rules, ctx.config, ctx.owner);
            plan_storable_production(self.work_locations(), self.ledger(), &pctx)
        };
        harvest(self.ledger_mut(), &plan)?;
        report.produced = GoodKind::storable()
            .map(|g| (g, plan.produced_of(g)))
            .filter(|(_, amount)| *amount > 0)
            .collect();
        Ok(())
    }

    fn export_goods(&mut self, ctx: &mut TurnContext, report: &mut TurnReport) -> Result<()> {
        if !self.has_built(WorkshopKind::CustomHouse) {
            return Ok(());
        }

        let exports: Vec<_> = self.warehouse().exports().collect();
        for (good, entry) in exports {
            if !ctx.owner.can_trade(good) {
                continue;
            }
            let held = self.ledger().quantity_of(good);
            if held <= entry.export_level {
                continue;
            }
            let amount = held - entry.export_level;

            match ctx
                .market
                .sell(good, amount, self.owner(), SaleChannel::CustomHouse)
            {
                Ok(gold) => {
                    self.ledger_mut().remove(good, amount)?;
                    ctx.owner.credit(gold);
                    tracing::debug!("{}: exported {} {} for {}", self.name(), amount, good, gold);
                    let n = self
                        .message(MessageKey::GoodsExported)
                        .with("%amount%", amount)
                        .with("%goods%", good)
                        .with("%gold%", gold)
                        .with_attachment(Attachment::Good(good));
                    self.notify(ctx, n);
                    report.exported.push((good, amount, gold));
                }
                Err(e) => {
                    tracing::warn!("{}: custom house export failed: {}", self.name(), e);
                    let n = self
                        .message(MessageKey::ExportFailed)
                        .with("%goods%", good)
                        .with("%reason%", e)
                        .with_attachment(Attachment::Good(good));
                    self.notify(ctx, n);
                    break;
                }
            }
        }
        Ok(())
    }

    fn clean_warehouse(&mut self, ctx: &mut TurnContext, report: &mut TurnReport) {
        let capacity = self.warehouse_capacity(ctx.config);
        let net = {
            let pctx = self.production_context(ctx.rules, ctx.config, ctx.owner);
            plan_storable_production(self.work_locations(), self.ledger(), &pctx).net()
        };
        let settings = self.warehouse().clone();
        let events = self.ledger_mut().cleanup(capacity, &settings, &net);

        for event in events {
            let n = match event {
                WarehouseEvent::Discarded { good, amount } => {
                    tracing::debug!("{}: {} {} wasted", self.name(), amount, good);
                    report.discarded.push((good, amount));
                    self.message(MessageKey::WarehouseWaste)
                        .with("%goods%", good)
                        .with("%waste%", amount)
                        .with_attachment(Attachment::Good(good))
                }
                WarehouseEvent::OverflowForthcoming { good, excess } => self
                    .message(MessageKey::WarehouseOverflowSoon)
                    .with("%goods%", good)
                    .with("%excess%", excess)
                    .with_attachment(Attachment::Good(good)),
                WarehouseEvent::FellBelowLow { good, amount, level } => self
                    .message(MessageKey::WarehouseLow)
                    .with("%goods%", good)
                    .with("%amount%", amount)
                    .with("%level%", level)
                    .with_attachment(Attachment::Good(good)),
                WarehouseEvent::RoseAboveHigh { good, amount, level } => self
                    .message(MessageKey::WarehouseHigh)
                    .with("%goods%", good)
                    .with("%amount%", amount)
                    .with("%level%", level)
                    .with_attachment(Attachment::Good(good)),
            };
            self.notify(ctx, n);
        }
    }

    fn update_civic_support(&mut self, ctx: &mut TurnContext, report: &mut TurnReport) {
        let headcount = match self.visible_headcount() {
            Headcount::Known(n) => n,
            Headcount::Hidden => {
                tracing::debug!("{}: civic update skipped for foreign settlement", self.name());
                return;
            }
        };

        let bells = {
            let pctx = self.production_context(ctx.rules, ctx.config, ctx.owner);
            bell_production(self.work_locations(), &pctx)
        };
        let (difficulty, human) = (ctx.owner.difficulty, ctx.owner.human);
        let changes = {
            let civic = self.civic_mut();
            civic.add_bells(bells, headcount);
            civic.apply_upkeep(headcount);
            civic.recompute(headcount, ctx.config, difficulty, human)
        };
        report.bells = bells;
        report.support = self.civic().support();

        for change in changes {
            let key = match change {
                CivicChange::SupportReached50 => MessageKey::SupportReached50,
                CivicChange::SupportReached100 => MessageKey::SupportReached100,
                CivicChange::SupportFellBelow50 => MessageKey::SupportFellBelow50,
                CivicChange::SupportFellBelow100 => MessageKey::SupportFellBelow100,
                CivicChange::GovernmentBad => MessageKey::GovernmentBad,
                CivicChange::GovernmentVeryBad => MessageKey::GovernmentVeryBad,
                CivicChange::GovernmentRecovered => MessageKey::GovernmentRecovered,
            };
            let n = self
                .message(key)
                .with("%support%", self.civic().support())
                .with("%opposition%", self.civic().opposition())
                .with("%bonus%", self.civic().production_bonus());
            self.notify(ctx, n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MapLocation, PlayerId, SettlementId};
    use crate::external::testing::{CountingUnitFactory, FixedMarket, NoHarbour, RecordingSink};
    use crate::settlement::field::{TileKind, TileSnapshot};

    struct Harness {
        rules: RuleSet,
        config: EngineConfig,
        owner: PlayerProfile,
        sink: RecordingSink,
        market: FixedMarket,
        units: CountingUnitFactory,
        harbour: NoHarbour,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                rules: RuleSet::with_defaults(),
                config: EngineConfig::default(),
                owner: PlayerProfile::new(PlayerId(1), "Dutch", true),
                sink: RecordingSink::new(),
                market: FixedMarket::new(),
                units: CountingUnitFactory::new(100),
                harbour: NoHarbour,
            }
        }

        fn settlement(&self) -> Settlement {
            let tiles = vec![
                TileSnapshot::new(MapLocation::new(0, 0), TileKind::Plains),
                TileSnapshot::new(MapLocation::new(1, 0), TileKind::Forest),
                TileSnapshot::new(MapLocation::new(0, 1), TileKind::Grassland),
            ];
            Settlement::found(SettlementId(1), "Jamestown", self.owner.id, tiles, false, &self.rules)
                .unwrap()
        }

        fn run(&mut self, settlement: &mut Settlement, turn: Turn) -> Result<TurnReport> {
            let mut ctx = TurnContext {
                turn,
                rules: &self.rules,
                config: &self.config,
                owner: &mut self.owner,
                notifications: &mut self.sink,
                market: &mut self.market,
                units: &mut self.units,
                harbour: &mut self.harbour,
            };
            settlement.process_turn(&mut ctx)
        }
    }

    #[test]
    fn test_empty_settlement_turn_is_quiet() {
        let mut h = Harness::new();
        let mut settlement = h.settlement();

        let report = h.run(&mut settlement, 1).unwrap();

        assert!(report.starved.is_none());
        assert!(report.construction_evaluated);
        // Center plot still yields food and the secondary good
        assert_eq!(settlement.ledger().quantity_of(GoodKind::Food), 5);
        assert_eq!(settlement.ledger().quantity_of(GoodKind::Cotton), 2);
    }

    #[test]
    fn test_complete_construction_rejects_unmet_requirements() {
        let mut h = Harness::new();
        let mut settlement = h.settlement();
        settlement
            .set_build_target(
                BuildTarget::Workshop(WorkshopKind::Stockade),
                &h.owner,
                &h.rules,
                &h.config,
            )
            .unwrap();

        let mut ctx = TurnContext {
            turn: 1,
            rules: &h.rules,
            config: &h.config,
            owner: &mut h.owner,
            notifications: &mut h.sink,
            market: &mut h.market,
            units: &mut h.units,
            harbour: &mut h.harbour,
        };
        let err = settlement.complete_construction(&mut ctx).unwrap_err();
        assert!(matches!(err, SettlementError::InvariantViolation(_)));
        assert_eq!(settlement.workshop_level(WorkshopKind::Stockade), 0);
    }

    #[test]
    fn test_construction_runs_once_per_turn_number() {
        let mut h = Harness::new();
        let mut settlement = h.settlement();

        assert!(h.run(&mut settlement, 4).unwrap().construction_evaluated);
        assert!(!h.run(&mut settlement, 4).unwrap().construction_evaluated);
        assert!(h.run(&mut settlement, 5).unwrap().construction_evaluated);
    }

    fn carpenters(h: &Harness, settlement: &mut Settlement, count: u32) {
        let index = settlement.workshop_index(WorkshopKind::Carpenter).unwrap();
        for i in 0..count {
            let worker = Worker::new(UnitId(i + 1), format!("Carpenter {}", i + 1), Some(GoodKind::Hammers));
            settlement
                .add_worker(worker, index, &h.owner, &h.rules, &h.config)
                .unwrap();
        }
    }

    #[test]
    fn test_overshoot_clamped_then_level_advances() {
        let mut h = Harness::new();
        h.config.workshop_base_output = 4;
        let mut settlement = h.settlement();
        carpenters(&h, &mut settlement, 3);
        settlement
            .set_build_target(
                BuildTarget::Workshop(WorkshopKind::Carpenter),
                &h.owner,
                &h.rules,
                &h.config,
            )
            .unwrap();
        settlement.set_hammers(40);
        settlement.ledger_mut().add(GoodKind::Food, 100).unwrap();
        settlement.ledger_mut().add(GoodKind::Lumber, 20).unwrap();

        let report = h.run(&mut settlement, 1).unwrap();

        // 24 raw points limited to 20 by lumber; 40 + 20 clamps at 52
        assert_eq!(report.construction_points, 20);
        assert_eq!(
            report.completed,
            Some(BuildTarget::Workshop(WorkshopKind::Carpenter))
        );
        assert_eq!(settlement.workshop_level(WorkshopKind::Carpenter), 2);
        assert_eq!(settlement.hammers(), 0);
        assert_eq!(settlement.ledger().quantity_of(GoodKind::Lumber), 0);
        assert!(h.sink.has(MessageKey::BuildingCompleted));
        assert!(h.sink.has(MessageKey::BuildQueueEmpty));
    }

    #[test]
    fn test_population_gate_keeps_clamped_hammers() {
        let mut h = Harness::new();
        h.config.workshop_base_output = 5;
        let mut settlement = h.settlement();
        carpenters(&h, &mut settlement, 2);
        settlement
            .set_build_target(
                BuildTarget::Workshop(WorkshopKind::Carpenter),
                &h.owner,
                &h.rules,
                &h.config,
            )
            .unwrap();
        settlement.set_hammers(40);
        settlement.ledger_mut().add(GoodKind::Food, 100).unwrap();
        settlement.ledger_mut().add(GoodKind::Lumber, 50).unwrap();

        let report = h.run(&mut settlement, 1).unwrap();

        assert_eq!(report.construction_points, 20);
        assert!(report.completed.is_none());
        assert_eq!(settlement.hammers(), 52);
        assert_eq!(settlement.workshop_level(WorkshopKind::Carpenter), 1);
        let n = h.sink.last(MessageKey::NeedMorePopulation).unwrap();
        assert_eq!(n.substitution("%required%"), Some("3"));
        assert_eq!(n.substitution("%current%"), Some("2"));
    }

    #[test]
    fn test_invalid_target_is_dropped() {
        let mut h = Harness::new();
        let mut settlement = h.settlement();
        h.owner.abilities.push(crate::external::player::Ability::FactoryTier);
        settlement.workshop_mut(WorkshopKind::Weaver).unwrap().advance_level(&h.rules).unwrap();
        settlement
            .set_build_target(
                BuildTarget::Workshop(WorkshopKind::Weaver),
                &h.owner,
                &h.rules,
                &h.config,
            )
            .unwrap();
        h.owner.abilities.clear();

        h.run(&mut settlement, 1).unwrap();

        assert!(settlement.build_queue().is_empty());
        assert!(h.sink.has(MessageKey::CannotBuild));
        assert!(h.sink.has(MessageKey::BuildQueueEmpty));
    }
}
