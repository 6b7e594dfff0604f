//! Player-level state the settlement engine reads: treasury, abilities,
//! diplomatic stances and trade boycotts

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SettlementError};
use crate::core::types::PlayerId;
use crate::settlement::goods::GoodKind;

/// Bonus ability held by a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Settlements may work land claimed by natives
    ClaimNativeLand,
    /// Unlocks factory-tier workshop levels
    FactoryTier,
    /// Extra bell output, in percent
    LibertyBoost { percent: u32 },
}

impl Ability {
    /// Parse an ability name from rule data. `LibertyBoost` carries data and
    /// is not nameable as a requirement.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(|c: char| c == '-' || c == ' ', "_").as_str() {
            "claim_native_land" => Some(Ability::ClaimNativeLand),
            "factory_tier" => Some(Ability::FactoryTier),
            _ => None,
        }
    }
}

/// Diplomatic stance towards another player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    War,
    Peace,
    Alliance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
    pub human: bool,
    pub difficulty: i32,
    pub gold: i64,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub stances: AHashMap<PlayerId, Stance>,
    #[serde(default)]
    pub boycotts: Vec<GoodKind>,
}

impl PlayerProfile {
    pub fn new(id: PlayerId, name: impl Into<String>, human: bool) -> Self {
        Self {
            id,
            name: name.into(),
            human,
            difficulty: 2,
            gold: 0,
            abilities: Vec::new(),
            stances: AHashMap::new(),
            boycotts: Vec::new(),
        }
    }

    pub fn has_ability(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }

    /// Total extra bell output granted by held abilities
    pub fn liberty_bonus_percent(&self) -> u32 {
        self.abilities
            .iter()
            .map(|a| match a {
                Ability::LibertyBoost { percent } => *percent,
                _ => 0,
            })
            .sum()
    }

    /// Stance towards another player; unknown players count as at peace
    pub fn stance_towards(&self, other: PlayerId) -> Stance {
        if other == self.id {
            return Stance::Alliance;
        }
        self.stances.get(&other).copied().unwrap_or(Stance::Peace)
    }

    /// Whether a good may be sold through the market
    pub fn can_trade(&self, good: GoodKind) -> bool {
        good.is_storable() && !self.boycotts.contains(&good)
    }

    /// Take gold out of the treasury, failing when it would go negative
    pub fn debit(&mut self, price: u32) -> Result<()> {
        if self.gold < i64::from(price) {
            return Err(SettlementError::InsufficientFunds {
                price,
                gold: self.gold,
            });
        }
        self.gold -= i64::from(price);
        Ok(())
    }

    pub fn credit(&mut self, amount: u32) {
        self.gold += i64::from(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liberty_bonus_sums_boosts() {
        let mut player = PlayerProfile::new(PlayerId(1), "Dutch", true);
        assert_eq!(player.liberty_bonus_percent(), 0);

        player.abilities.push(Ability::LibertyBoost { percent: 50 });
        player.abilities.push(Ability::FactoryTier);
        player.abilities.push(Ability::LibertyBoost { percent: 20 });
        assert_eq!(player.liberty_bonus_percent(), 70);
        assert!(player.has_ability(Ability::FactoryTier));
        assert!(!player.has_ability(Ability::ClaimNativeLand));
    }

    #[test]
    fn test_debit_refuses_overdraft() {
        let mut player = PlayerProfile::new(PlayerId(1), "Dutch", true);
        player.gold = 100;

        assert!(player.debit(60).is_ok());
        assert_eq!(player.gold, 40);

        let err = player.debit(41).unwrap_err();
        assert!(matches!(
            err,
            SettlementError::InsufficientFunds { price: 41, gold: 40 }
        ));
        assert_eq!(player.gold, 40);
    }

    #[test]
    fn test_boycotted_goods_are_not_tradeable() {
        let mut player = PlayerProfile::new(PlayerId(1), "Dutch", true);
        player.boycotts.push(GoodKind::Rum);

        assert!(!player.can_trade(GoodKind::Rum));
        assert!(player.can_trade(GoodKind::Furs));
        assert!(!player.can_trade(GoodKind::Hammers));
    }

    #[test]
    fn test_stance_defaults_to_peace() {
        let mut player = PlayerProfile::new(PlayerId(1), "Dutch", true);
        player.stances.insert(PlayerId(2), Stance::War);

        assert_eq!(player.stance_towards(PlayerId(2)), Stance::War);
        assert_eq!(player.stance_towards(PlayerId(3)), Stance::Peace);
        assert_eq!(player.stance_towards(PlayerId(1)), Stance::Alliance);
    }

    #[test]
    fn test_ability_parse() {
        assert_eq!(Ability::parse("Factory-Tier"), Some(Ability::FactoryTier));
        assert_eq!(Ability::parse("claim native land"), Some(Ability::ClaimNativeLand));
        assert_eq!(Ability::parse("liberty_boost"), None);
    }
}
