pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{LedgerError, Result, SettlementError};
pub use types::{MapLocation, PlayerId, SettlementId, Turn, UnitId};
