//! Harbour collaborator - vessel repair at a settlement's docks

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{SettlementId, UnitId};

/// Damaged ship berthed at a settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: UnitId,
    pub name: String,
    pub hitpoints: u32,
    pub max_hitpoints: u32,
    pub under_repair: bool,
}

pub trait Harbour {
    /// Advance repairs at `settlement` by one turn, returning vessels that
    /// finished repairing
    fn repair_vessels(&mut self, settlement: SettlementId) -> Vec<UnitId>;
}

/// In-memory berths keyed by settlement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortRegistry {
    berths: AHashMap<SettlementId, Vec<Vessel>>,
}

impl PortRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn berth(&mut self, settlement: SettlementId, vessel: Vessel) {
        self.berths.entry(settlement).or_default().push(vessel);
    }

    pub fn vessels_at(&self, settlement: SettlementId) -> &[Vessel] {
        self.berths
            .get(&settlement)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Harbour for PortRegistry {
    fn repair_vessels(&mut self, settlement: SettlementId) -> Vec<UnitId> {
        let mut repaired = Vec::new();
        if let Some(vessels) = self.berths.get_mut(&settlement) {
            for vessel in vessels.iter_mut().filter(|v| v.under_repair) {
                vessel.hitpoints = (vessel.hitpoints + 1).min(vessel.max_hitpoints);
                if vessel.hitpoints == vessel.max_hitpoints {
                    vessel.under_repair = false;
                    repaired.push(vessel.id);
                }
            }
        }
        repaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damaged(id: u32, hitpoints: u32) -> Vessel {
        Vessel {
            id: UnitId(id),
            name: format!("Caravel {}", id),
            hitpoints,
            max_hitpoints: 6,
            under_repair: true,
        }
    }

    #[test]
    fn test_repair_gains_one_hitpoint() {
        let mut port = PortRegistry::new();
        port.berth(SettlementId(1), damaged(7, 3));
        port.berth(SettlementId(1), damaged(8, 5));

        let done = port.repair_vessels(SettlementId(1));

        assert_eq!(done, vec![UnitId(8)]);
        let vessels = port.vessels_at(SettlementId(1));
        assert_eq!(vessels[0].hitpoints, 4);
        assert!(vessels[0].under_repair);
        assert!(!vessels[1].under_repair);
    }

    #[test]
    fn test_repair_stays_at_its_settlement() {
        let mut port = PortRegistry::new();
        port.berth(SettlementId(1), damaged(7, 3));
        let mut idle = damaged(9, 2);
        idle.under_repair = false;
        port.berth(SettlementId(1), idle);

        assert!(port.repair_vessels(SettlementId(2)).is_empty());
        assert_eq!(port.vessels_at(SettlementId(1))[0].hitpoints, 3);

        assert!(port.repair_vessels(SettlementId(1)).is_empty());
        assert_eq!(port.vessels_at(SettlementId(1))[0].hitpoints, 4);
        assert_eq!(port.vessels_at(SettlementId(1))[1].hitpoints, 2);
    }
}
