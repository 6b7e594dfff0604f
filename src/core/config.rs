//! Engine configuration with documented constants
//!
//! All magic numbers of the turn engine are collected here. The config is
//! passed explicitly to every turn; there is no process-wide instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SettlementError};

/// Numeric rules of the settlement turn engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === FOOD & POPULATION ===
    /// Food eaten by every colonist each turn
    pub food_per_colonist: u32,

    /// Stored food at which a new colonist is born
    ///
    /// The full amount is removed from the ledger when the colonist appears.
    pub growth_food_threshold: u32,

    /// Famine warning horizon in turns
    ///
    /// A "famine feared" notice is raised when stored food runs out within
    /// this many turns at the current shortfall.
    pub famine_warning_turns: u32,

    // === CIVIC SUPPORT ===
    /// Bells needed per supporting member
    pub bells_per_member: u32,

    /// Support percentage granting the +2 production bonus
    pub support_full: u32,

    /// Support percentage granting the +1 production bonus
    pub support_majority: u32,

    /// Opposition limit for "bad government" before difficulty is subtracted
    ///
    /// The effective threshold is `bad_government_base - difficulty`.
    pub bad_government_base: i32,

    /// Opposition limit for "very bad government" before difficulty is subtracted
    pub very_bad_government_base: i32,

    // === WAREHOUSE ===
    /// Storage ceiling per warehouse tier
    ///
    /// Capacity is `base_warehouse_capacity * (warehouse_level + 1)`.
    pub base_warehouse_capacity: u32,

    // === LIVESTOCK ===
    /// Breeding yields at most `stock / breeding_divisor` (but at least 1) per turn
    pub breeding_divisor: u32,

    /// Animals needed before any breeding happens
    pub breeding_minimum_stock: u32,

    // === PRODUCTION ===
    /// Output of one non-expert worker in a level 1 workshop
    pub workshop_base_output: u32,

    /// Multiplier applied to an expert working in their own trade
    pub expert_multiplier: u32,

    // === CONSTRUCTION ===
    /// Gold charged per missing hammer when paying to complete a build
    pub hammer_price: u32,

    /// Markup (percent) over the market purchase cost of missing materials
    pub material_price_markup_percent: u32,

    /// Discard accumulated hammers when the active build target changes
    pub reset_hammers_on_target_change: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            food_per_colonist: 2,
            growth_food_threshold: 200,
            famine_warning_turns: 3,

            bells_per_member: 100,
            support_full: 100,
            support_majority: 50,
            bad_government_base: 6,
            very_bad_government_base: 10,

            base_warehouse_capacity: 100,

            breeding_divisor: 10,
            breeding_minimum_stock: 2,

            workshop_base_output: 3,
            expert_multiplier: 2,

            hammer_price: 20,
            material_price_markup_percent: 110,
            reset_hammers_on_target_change: true,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from a TOML file; missing keys keep their defaults
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| SettlementError::Config(e.to_string()))?;
        config.validate().map_err(SettlementError::Config)?;
        Ok(config)
    }

    /// Warehouse capacity for a given warehouse level
    pub fn warehouse_capacity(&self, warehouse_level: u8) -> u32 {
        self.base_warehouse_capacity * (u32::from(warehouse_level) + 1)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.bells_per_member == 0 {
            return Err("bells_per_member must be positive".into());
        }

        if self.breeding_divisor == 0 {
            return Err("breeding_divisor must be positive".into());
        }

        if self.support_majority > self.support_full || self.support_full > 100 {
            return Err(format!(
                "support thresholds must satisfy majority ({}) <= full ({}) <= 100",
                self.support_majority, self.support_full
            ));
        }

        if self.bad_government_base > self.very_bad_government_base {
            return Err(format!(
                "bad_government_base ({}) should be <= very_bad_government_base ({})",
                self.bad_government_base, self.very_bad_government_base
            ));
        }

        if self.expert_multiplier == 0 {
            return Err("expert_multiplier must be positive".into());
        }

        Ok(())
    }
}
