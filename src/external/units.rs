//! Unit-creation collaborator

use serde::{Deserialize, Serialize};

use crate::core::types::{MapLocation, PlayerId, UnitId};
use crate::external::CollaboratorError;
use crate::rules::UnitBlueprintId;

/// Why a unit is being created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitOrigin {
    /// Born from surplus food
    Growth,
    /// Finished by the build queue
    Construction,
}

/// What the engine gets back from unit creation; used for notification text only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitHandle {
    pub id: UnitId,
    pub blueprint: UnitBlueprintId,
    pub name: String,
}

pub trait UnitFactory {
    fn create_unit(
        &mut self,
        origin: UnitOrigin,
        location: MapLocation,
        owner: PlayerId,
        blueprint: &UnitBlueprintId,
    ) -> Result<UnitHandle, CollaboratorError>;
}
