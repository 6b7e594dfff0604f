//! Settlement economy - goods, work locations, construction and civic support
//!
//! `Settlement::process_turn` drives one turn; everything else here is the
//! state it works on.

pub mod civic;
pub mod colony;
pub mod construction;
pub mod field;
pub mod goods;
pub mod ledger;
pub mod production;
pub mod shared;
pub mod turn;
pub mod warehouse;
pub mod work_location;
pub mod workshop;

pub use civic::{CivicChange, CivicState, Headcount};
pub use colony::{Settlement, Visibility};
pub use construction::{BuildQueue, BuildTarget, ConstructionStatus};
pub use field::{FieldPlot, TileClaim, TileKind, TileSnapshot};
pub use goods::GoodKind;
pub use ledger::{GoodsLedger, WarehouseEvent};
pub use production::{ProductionContext, ProductionPlan};
pub use shared::{SettlementView, SharedSettlement};
pub use turn::{TurnContext, TurnReport};
pub use warehouse::{WarehouseEntry, WarehouseSettings};
pub use work_location::{Capabilities, PlacementContext, PlacementError, WorkLocation, Worker};
pub use workshop::{Workshop, WorkshopKind};
