//! Per-good warehouse thresholds and export settings

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::settlement::goods::GoodKind;

/// Warehouse levels and export policy for one good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseEntry {
    /// Warn when stock falls below this level
    pub low: u32,
    /// Warn when stock rises above this level
    pub high: u32,
    /// Stock kept back when the custom house exports
    pub export_level: u32,
    pub export_enabled: bool,
}

impl Default for WarehouseEntry {
    fn default() -> Self {
        Self {
            low: 10,
            high: 90,
            export_level: 50,
            export_enabled: false,
        }
    }
}

/// One entry per storable good
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseSettings {
    entries: AHashMap<GoodKind, WarehouseEntry>,
}

impl WarehouseSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings for a good, falling back to the defaults
    pub fn entry(&self, good: GoodKind) -> WarehouseEntry {
        self.entries.get(&good).copied().unwrap_or_default()
    }

    pub fn set(&mut self, good: GoodKind, entry: WarehouseEntry) {
        self.entries.insert(good, entry);
    }

    pub fn set_export(&mut self, good: GoodKind, enabled: bool, export_level: u32) {
        let entry = self.entries.entry(good).or_default();
        entry.export_enabled = enabled;
        entry.export_level = export_level;
    }

    /// Goods with export switched on, in enumeration order
    pub fn exports(&self) -> impl Iterator<Item = (GoodKind, WarehouseEntry)> + '_ {
        GoodKind::storable()
            .map(|good| (good, self.entry(good)))
            .filter(|(_, entry)| entry.export_enabled)
    }
}
