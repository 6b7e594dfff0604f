//! Colony Engine - turn processing for settlement economies
//!
//! A settlement is advanced one turn at a time: food and growth, construction,
//! production, warehouse limits, exports and civic support. Everything outside
//! the settlement (markets, unit creation, harbours, notifications) is reached
//! through the traits in [`external`].

pub mod core;
pub mod external;
pub mod rules;
pub mod settlement;
