//! Workshops - leveled buildings of a settlement
//!
//! Every settlement owns exactly one workshop of each kind from founding.
//! Level 0 means not built; construction raises the level one step at a time.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SettlementError};
use crate::rules::{RuleSet, WorkshopRule};
use crate::settlement::goods::GoodKind;
use crate::settlement::production::ProductionContext;
use crate::settlement::work_location::{PlacementError, Worker};

/// Building category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkshopKind {
    TownHall,
    Carpenter,
    Blacksmith,
    Tobacconist,
    Weaver,
    Distiller,
    FurTrader,
    Armory,
    Warehouse,
    Stockade,
    Docks,
    Stables,
    CustomHouse,
}

impl WorkshopKind {
    pub const ALL: [WorkshopKind; 13] = [
        WorkshopKind::TownHall,
        WorkshopKind::Carpenter,
        WorkshopKind::Blacksmith,
        WorkshopKind::Tobacconist,
        WorkshopKind::Weaver,
        WorkshopKind::Distiller,
        WorkshopKind::FurTrader,
        WorkshopKind::Armory,
        WorkshopKind::Warehouse,
        WorkshopKind::Stockade,
        WorkshopKind::Docks,
        WorkshopKind::Stables,
        WorkshopKind::CustomHouse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WorkshopKind::TownHall => "town_hall",
            WorkshopKind::Carpenter => "carpenter",
            WorkshopKind::Blacksmith => "blacksmith",
            WorkshopKind::Tobacconist => "tobacconist",
            WorkshopKind::Weaver => "weaver",
            WorkshopKind::Distiller => "distiller",
            WorkshopKind::FurTrader => "fur_trader",
            WorkshopKind::Armory => "armory",
            WorkshopKind::Warehouse => "warehouse",
            WorkshopKind::Stockade => "stockade",
            WorkshopKind::Docks => "docks",
            WorkshopKind::Stables => "stables",
            WorkshopKind::CustomHouse => "custom_house",
        }
    }

    pub fn parse(name: &str) -> Option<WorkshopKind> {
        let lowered = name.to_lowercase().replace(|c: char| c == ' ' || c == '-', "_");
        let compact = lowered.replace('_', "");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lowered || k.name().replace('_', "") == compact)
    }
}

impl std::fmt::Display for WorkshopKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    kind: WorkshopKind,
    level: u8,
    workers: Vec<Worker>,
}

impl Workshop {
    pub fn new(kind: WorkshopKind, level: u8) -> Self {
        Self {
            kind,
            level,
            workers: Vec::new(),
        }
    }

    pub fn kind(&self) -> WorkshopKind {
        self.kind
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_built(&self) -> bool {
        self.level > 0
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn rule<'r>(&self, rules: &'r RuleSet) -> Option<&'r WorkshopRule> {
        rules.workshop(self.kind)
    }

    /// Worker slots; an unbuilt workshop has none
    pub fn workplaces(&self, rules: &RuleSet) -> u32 {
        match self.rule(rules) {
            Some(rule) if self.is_built() => rule.workplaces,
            _ => 0,
        }
    }

    pub fn output(&self, rules: &RuleSet) -> Option<GoodKind> {
        self.rule(rules).and_then(|r| r.output)
    }

    pub fn input(&self, rules: &RuleSet) -> Option<GoodKind> {
        self.rule(rules).and_then(|r| r.input)
    }

    /// Output for this turn before input limits are applied.
    ///
    /// Each worker yields the base output, doubled for an expert in the
    /// output good, plus the civic production bonus (never below zero).
    /// The level's production percent scales the total; bell output also
    /// gets the owner's liberty boost.
    pub fn production_of(&self, good: GoodKind, ctx: &ProductionContext) -> u32 {
        if !self.is_built() || self.output(ctx.rules) != Some(good) {
            return 0;
        }
        let percent = ctx
            .rules
            .workshop_level(self.kind, self.level)
            .map(|l| l.production_percent)
            .unwrap_or(100);

        let per_worker: u32 = self
            .workers
            .iter()
            .map(|w| {
                let base = ctx.config.workshop_base_output * w.multiplier_for(good, ctx.config);
                (base as i32 + ctx.bonus).max(0) as u32
            })
            .sum();

        let mut total = per_worker * percent / 100;
        if good == GoodKind::Bells {
            total += total * ctx.owner.liberty_bonus_percent() / 100;
        }
        total
    }

    pub fn can_accept(&self, rules: &RuleSet) -> std::result::Result<(), PlacementError> {
        if !self.is_built() {
            return Err(PlacementError::NotBuilt(self.kind));
        }
        let workplaces = self.workplaces(rules);
        if workplaces == 0 {
            return Err(PlacementError::NoWorkplaces(self.kind));
        }
        if self.workers.len() as u32 >= workplaces {
            return Err(PlacementError::LocationFull);
        }
        Ok(())
    }

    pub(crate) fn push_worker(&mut self, worker: Worker) {
        self.workers.push(worker);
    }

    pub(crate) fn remove_worker(&mut self, id: crate::core::types::UnitId) -> Option<Worker> {
        let idx = self.workers.iter().position(|w| w.id == id)?;
        Some(self.workers.remove(idx))
    }

    pub(crate) fn take_workers(&mut self) -> Vec<Worker> {
        std::mem::take(&mut self.workers)
    }

    /// Raise the level by exactly one
    pub fn advance_level(&mut self, rules: &RuleSet) -> Result<u8> {
        let max = self.rule(rules).map(|r| r.max_level()).unwrap_or(0);
        if self.level >= max {
            return Err(SettlementError::InvariantViolation(format!(
                "{} cannot advance beyond level {}",
                self.kind, self.level
            )));
        }
        self.level += 1;
        Ok(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::{PlayerId, UnitId};
    use crate::external::player::{Ability, PlayerProfile};

    fn worker(id: u32, expertise: Option<GoodKind>) -> Worker {
        Worker::new(UnitId(id), format!("Colonist {}", id), expertise)
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(WorkshopKind::parse("Custom House"), Some(WorkshopKind::CustomHouse));
        assert_eq!(WorkshopKind::parse("TOWNHALL"), Some(WorkshopKind::TownHall));
        assert_eq!(WorkshopKind::parse("fur-trader"), Some(WorkshopKind::FurTrader));
        assert_eq!(WorkshopKind::parse("church"), None);
    }

    #[test]
    fn test_unbuilt_workshop_produces_nothing() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let ctx = ProductionContext::new(&rules, &config, &owner, 0);

        let mut armory = Workshop::new(WorkshopKind::Armory, 0);
        armory.push_worker(worker(1, None));
        assert_eq!(armory.production_of(GoodKind::Muskets, &ctx), 0);
        assert_eq!(
            armory.can_accept(&rules),
            Err(PlacementError::NotBuilt(WorkshopKind::Armory))
        );
    }

    #[test]
    fn test_expert_and_bonus_output() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);

        let mut smithy = Workshop::new(WorkshopKind::Blacksmith, 1);
        smithy.push_worker(worker(1, None));
        smithy.push_worker(worker(2, Some(GoodKind::Tools)));

        let ctx = ProductionContext::new(&rules, &config, &owner, 0);
        assert_eq!(smithy.production_of(GoodKind::Tools, &ctx), 3 + 6);
        assert_eq!(smithy.production_of(GoodKind::Cloth, &ctx), 0);

        let ctx = ProductionContext::new(&rules, &config, &owner, 2);
        assert_eq!(smithy.production_of(GoodKind::Tools, &ctx), 5 + 8);

        // A penalty never drives a worker below zero
        let ctx = ProductionContext::new(&rules, &config, &owner, -4);
        assert_eq!(smithy.production_of(GoodKind::Tools, &ctx), 2);
    }

    #[test]
    fn test_factory_level_scales_output() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        let ctx = ProductionContext::new(&rules, &config, &owner, 0);

        let mut factory = Workshop::new(WorkshopKind::Weaver, 3);
        factory.push_worker(worker(1, None));
        factory.push_worker(worker(2, None));
        assert_eq!(factory.production_of(GoodKind::Cloth, &ctx), 9);
    }

    #[test]
    fn test_liberty_boost_applies_to_bells() {
        let rules = RuleSet::with_defaults();
        let config = EngineConfig::default();
        let mut owner = PlayerProfile::new(PlayerId(1), "Dutch", true);
        owner.abilities.push(Ability::LibertyBoost { percent: 50 });
        let ctx = ProductionContext::new(&rules, &config, &owner, 0);

        let mut hall = Workshop::new(WorkshopKind::TownHall, 1);
        hall.push_worker(worker(1, Some(GoodKind::Bells)));
        assert_eq!(hall.production_of(GoodKind::Bells, &ctx), 9);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let rules = RuleSet::with_defaults();
        let mut weaver = Workshop::new(WorkshopKind::Weaver, 1);
        for id in 0..3 {
            assert!(weaver.can_accept(&rules).is_ok());
            weaver.push_worker(worker(id, None));
        }
        assert_eq!(weaver.can_accept(&rules), Err(PlacementError::LocationFull));

        let stockade = Workshop::new(WorkshopKind::Stockade, 1);
        assert_eq!(
            stockade.can_accept(&rules),
            Err(PlacementError::NoWorkplaces(WorkshopKind::Stockade))
        );
    }

    #[test]
    fn test_advance_level_stops_at_max() {
        let rules = RuleSet::with_defaults();
        let mut carpenter = Workshop::new(WorkshopKind::Carpenter, 1);

        assert_eq!(carpenter.advance_level(&rules).unwrap(), 2);
        assert!(matches!(
            carpenter.advance_level(&rules),
            Err(SettlementError::InvariantViolation(_))
        ));
        assert_eq!(carpenter.level(), 2);
    }
}
