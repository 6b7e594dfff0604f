//! Rule data consumed by the settlement engine

pub mod catalog;

pub use catalog::{
    BuildCost, LevelRule, RuleLoadError, RuleSet, TileYield, UnitBlueprint, UnitBlueprintId,
    WorkshopRule,
};
