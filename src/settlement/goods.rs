//! Goods carried by a settlement economy

use serde::{Deserialize, Serialize};

/// Type of good produced, stored or consumed by a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GoodKind {
    Food,
    Sugar,
    Tobacco,
    Cotton,
    Furs,
    Lumber,
    Ore,
    Silver,
    Horses,
    Rum,
    Cigars,
    Cloth,
    Coats,
    TradeGoods,
    Tools,
    Muskets,
    /// Civic points, accumulated by the civic model rather than stored
    Bells,
    /// Construction points, accumulated by the build queue rather than stored
    Hammers,
}

impl GoodKind {
    /// Every good, in ledger enumeration order
    pub const ALL: [GoodKind; 18] = [
        GoodKind::Food,
        GoodKind::Sugar,
        GoodKind::Tobacco,
        GoodKind::Cotton,
        GoodKind::Furs,
        GoodKind::Lumber,
        GoodKind::Ore,
        GoodKind::Silver,
        GoodKind::Horses,
        GoodKind::Rum,
        GoodKind::Cigars,
        GoodKind::Cloth,
        GoodKind::Coats,
        GoodKind::TradeGoods,
        GoodKind::Tools,
        GoodKind::Muskets,
        GoodKind::Bells,
        GoodKind::Hammers,
    ];

    /// Whether the good lives in the warehouse
    pub fn is_storable(&self) -> bool {
        !matches!(self, GoodKind::Bells | GoodKind::Hammers)
    }

    /// The primary food good is exempt from warehouse capacity
    pub fn is_food(&self) -> bool {
        matches!(self, GoodKind::Food)
    }

    /// Storable goods in enumeration order
    pub fn storable() -> impl Iterator<Item = GoodKind> {
        Self::ALL.into_iter().filter(|g| g.is_storable())
    }

    pub fn name(&self) -> &'static str {
        match self {
            GoodKind::Food => "food",
            GoodKind::Sugar => "sugar",
            GoodKind::Tobacco => "tobacco",
            GoodKind::Cotton => "cotton",
            GoodKind::Furs => "furs",
            GoodKind::Lumber => "lumber",
            GoodKind::Ore => "ore",
            GoodKind::Silver => "silver",
            GoodKind::Horses => "horses",
            GoodKind::Rum => "rum",
            GoodKind::Cigars => "cigars",
            GoodKind::Cloth => "cloth",
            GoodKind::Coats => "coats",
            GoodKind::TradeGoods => "trade_goods",
            GoodKind::Tools => "tools",
            GoodKind::Muskets => "muskets",
            GoodKind::Bells => "bells",
            GoodKind::Hammers => "hammers",
        }
    }

    /// Case-insensitive lookup used by the rule loader
    pub fn parse(name: &str) -> Option<GoodKind> {
        let lowered = name.to_lowercase().replace(|c: char| c == ' ' || c == '-', "_");
        Self::ALL.into_iter().find(|g| g.name() == lowered)
    }
}

impl std::fmt::Display for GoodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_goods_are_not_storable() {
        assert!(!GoodKind::Bells.is_storable());
        assert!(!GoodKind::Hammers.is_storable());
        assert!(GoodKind::Tools.is_storable());
        assert_eq!(GoodKind::storable().count(), GoodKind::ALL.len() - 2);
    }

    #[test]
    fn test_only_food_is_food() {
        let food: Vec<_> = GoodKind::ALL.iter().filter(|g| g.is_food()).collect();
        assert_eq!(food, vec![&GoodKind::Food]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(GoodKind::parse("TOOLS"), Some(GoodKind::Tools));
        assert_eq!(GoodKind::parse("Trade Goods"), Some(GoodKind::TradeGoods));
        assert_eq!(GoodKind::parse("mana"), None);
    }
}
