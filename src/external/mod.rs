//! Narrow contracts to the rest of the game
//!
//! The turn engine talks to markets, unit creation, harbours and the
//! notification layer only through these traits.

pub mod harbour;
pub mod market;
pub mod notify;
pub mod player;
pub mod testing;
pub mod units;

use thiserror::Error;

pub use harbour::{Harbour, PortRegistry, Vessel};
pub use market::{Market, SaleChannel};
pub use notify::{Attachment, MessageKey, Notification, NotificationSink, Severity};
pub use player::{Ability, PlayerProfile, Stance};
pub use units::{UnitFactory, UnitHandle, UnitOrigin};

/// Failure reported by an external collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}
