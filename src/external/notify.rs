//! Outbound notifications raised by the turn engine
//!
//! The engine never reads notifications back. Hosts translate `MessageKey`
//! into localized text using the substitutions.

use serde::{Deserialize, Serialize};

use crate::core::types::{SettlementId, UnitId};
use crate::settlement::goods::GoodKind;
use crate::settlement::workshop::WorkshopKind;

/// How prominently a host should surface a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Message catalogue of the settlement engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    ColonistStarved,
    FamineFeared,
    NewColonist,
    GrowthFailed,
    VesselRepaired,
    BuildingCompleted,
    UnitCompleted,
    UnitCreationFailed,
    MissingMaterials,
    NeedMorePopulation,
    CannotBuild,
    BuildQueueEmpty,
    GoodsExported,
    ExportFailed,
    WarehouseWaste,
    WarehouseOverflowSoon,
    WarehouseLow,
    WarehouseHigh,
    SupportReached50,
    SupportReached100,
    SupportFellBelow50,
    SupportFellBelow100,
    GovernmentBad,
    GovernmentVeryBad,
    GovernmentRecovered,
}

impl MessageKey {
    /// Stable localization key
    pub fn key(&self) -> &'static str {
        match self {
            MessageKey::ColonistStarved => "settlement.colonistStarved",
            MessageKey::FamineFeared => "settlement.famineFeared",
            MessageKey::NewColonist => "settlement.newColonist",
            MessageKey::GrowthFailed => "settlement.growthFailed",
            MessageKey::VesselRepaired => "settlement.vesselRepaired",
            MessageKey::BuildingCompleted => "settlement.buildingCompleted",
            MessageKey::UnitCompleted => "settlement.unitCompleted",
            MessageKey::UnitCreationFailed => "settlement.unitCreationFailed",
            MessageKey::MissingMaterials => "settlement.missingMaterials",
            MessageKey::NeedMorePopulation => "settlement.needMorePopulation",
            MessageKey::CannotBuild => "settlement.cannotBuild",
            MessageKey::BuildQueueEmpty => "settlement.buildQueueEmpty",
            MessageKey::GoodsExported => "settlement.goodsExported",
            MessageKey::ExportFailed => "settlement.exportFailed",
            MessageKey::WarehouseWaste => "warehouse.waste",
            MessageKey::WarehouseOverflowSoon => "warehouse.overflowSoon",
            MessageKey::WarehouseLow => "warehouse.low",
            MessageKey::WarehouseHigh => "warehouse.high",
            MessageKey::SupportReached50 => "civic.support50",
            MessageKey::SupportReached100 => "civic.support100",
            MessageKey::SupportFellBelow50 => "civic.supportLost50",
            MessageKey::SupportFellBelow100 => "civic.supportLost100",
            MessageKey::GovernmentBad => "civic.badGovernment",
            MessageKey::GovernmentVeryBad => "civic.veryBadGovernment",
            MessageKey::GovernmentRecovered => "civic.governmentRecovered",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            MessageKey::ColonistStarved => Severity::Critical,
            MessageKey::FamineFeared
            | MessageKey::GrowthFailed
            | MessageKey::UnitCreationFailed
            | MessageKey::MissingMaterials
            | MessageKey::NeedMorePopulation
            | MessageKey::CannotBuild
            | MessageKey::ExportFailed
            | MessageKey::WarehouseWaste
            | MessageKey::WarehouseOverflowSoon
            | MessageKey::GovernmentBad
            | MessageKey::GovernmentVeryBad
            | MessageKey::SupportFellBelow50
            | MessageKey::SupportFellBelow100 => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// Optional object a notification points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    Good(GoodKind),
    Unit(UnitId),
    Workshop(WorkshopKind),
    Blueprint(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subject: SettlementId,
    pub key: MessageKey,
    pub substitutions: Vec<(String, String)>,
    pub severity: Severity,
    pub attachment: Option<Attachment>,
}

impl Notification {
    pub fn new(subject: SettlementId, key: MessageKey) -> Self {
        Self {
            subject,
            key,
            substitutions: Vec::new(),
            severity: key.default_severity(),
            attachment: None,
        }
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.substitutions.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Value of a substitution, if present
    pub fn substitution(&self, name: &str) -> Option<&str> {
        self.substitutions
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Fire-and-forget receiver of notifications
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
