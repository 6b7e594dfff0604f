use thiserror::Error;

use crate::core::types::UnitId;
use crate::rules::RuleLoadError;
use crate::settlement::goods::GoodKind;
use crate::settlement::work_location::PlacementError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient {good:?}: requested {requested}, available {available}")]
    InsufficientStock {
        good: GoodKind,
        requested: u32,
        available: u32,
    },

    #[error("{0:?} cannot be stored in a warehouse")]
    NotStorable(GoodKind),
}

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Rule data error: {0}")]
    Rules(#[from] RuleLoadError),

    #[error("Worker rejected: {0}")]
    WorkerRejected(#[from] PlacementError),

    #[error("Cannot build: {0}")]
    BuildNotAllowed(String),

    #[error("Insufficient funds: price {price}, gold {gold}")]
    InsufficientFunds { price: u32, gold: i64 },

    #[error("No work location at index {0}")]
    UnknownWorkLocation(usize),

    #[error("Unit not found in settlement: {0:?}")]
    UnknownUnit(UnitId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SettlementError>;
