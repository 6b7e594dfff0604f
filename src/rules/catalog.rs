//! Rule catalog - building levels, unit blueprints and tile yields
//!
//! Read-only data the turn engine consults when it plans production and
//! evaluates construction. Loaded from TOML or built from defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::external::player::Ability;
use crate::settlement::construction::BuildTarget;
use crate::settlement::field::TileKind;
use crate::settlement::goods::GoodKind;
use crate::settlement::workshop::WorkshopKind;

/// Identifier of a unit blueprint, e.g. `"wagon_train"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitBlueprintId(pub String);

impl UnitBlueprintId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitBlueprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Points, materials and population needed to finish something
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCost {
    pub hammers: u32,
    pub materials: Vec<(GoodKind, u32)>,
    pub min_population: u32,
}

/// One level of a workshop line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRule {
    pub name: String,
    pub hammers: u32,
    pub materials: Vec<(GoodKind, u32)>,
    pub min_population: u32,
    /// Output scaling for workers at this level, in percent
    pub production_percent: u32,
    /// False on a terminal tier even if later tiers are listed
    pub upgradable: bool,
    pub requires_ability: Option<Ability>,
}

impl LevelRule {
    pub fn cost(&self) -> BuildCost {
        BuildCost {
            hammers: self.hammers,
            materials: self.materials.clone(),
            min_population: self.min_population,
        }
    }
}

/// Static description of a workshop line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopRule {
    pub kind: WorkshopKind,
    pub input: Option<GoodKind>,
    pub output: Option<GoodKind>,
    pub workplaces: u32,
    /// Level the workshop starts at when a settlement is founded
    pub initial_level: u8,
    pub requires_coast: bool,
    /// Level `n` is `levels[n - 1]`
    pub levels: Vec<LevelRule>,
}

impl WorkshopRule {
    pub fn level(&self, level: u8) -> Option<&LevelRule> {
        if level == 0 {
            return None;
        }
        self.levels.get(usize::from(level) - 1)
    }

    /// Highest level reachable by construction
    pub fn max_level(&self) -> u8 {
        let mut max = 0u8;
        for (idx, rule) in self.levels.iter().enumerate() {
            max = (idx + 1) as u8;
            if !rule.upgradable {
                break;
            }
        }
        max
    }
}

/// Mobile unit that can be built or grown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitBlueprint {
    pub id: UnitBlueprintId,
    pub name: String,
    pub hammers: u32,
    pub materials: Vec<(GoodKind, u32)>,
    pub min_population: u32,
    /// Workshop and minimum level the build queue needs for this unit
    pub requires: Option<(WorkshopKind, u8)>,
    pub buildable: bool,
}

impl UnitBlueprint {
    pub fn cost(&self) -> BuildCost {
        BuildCost {
            hammers: self.hammers,
            materials: self.materials.clone(),
            min_population: self.min_population,
        }
    }
}

/// Base yield of a good on a tile kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileYield {
    pub tile: TileKind,
    pub good: GoodKind,
    pub amount: u32,
}

/// Complete rule data for the settlement engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    workshops: Vec<WorkshopRule>,
    units: Vec<UnitBlueprint>,
    tile_yields: Vec<TileYield>,
    colonist: Option<UnitBlueprintId>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in rules, equivalent to `data/rules.toml`
    pub fn with_defaults() -> Self {
        let mut rules = Self::new();

        let level = |name: &str, hammers: u32, tools: u32, pop: u32| LevelRule {
            name: name.into(),
            hammers,
            materials: if tools > 0 {
                vec![(GoodKind::Tools, tools)]
            } else {
                vec![]
            },
            min_population: pop,
            production_percent: 100,
            upgradable: true,
            requires_ability: None,
        };
        let factory = |name: &str| LevelRule {
            production_percent: 150,
            requires_ability: Some(Ability::FactoryTier),
            ..level(name, 240, 100, 8)
        };
        let shop = |kind, input, output, names: [&str; 3]| WorkshopRule {
            kind,
            input: Some(input),
            output: Some(output),
            workplaces: 3,
            initial_level: 1,
            requires_coast: false,
            levels: vec![
                level(names[0], 0, 0, 1),
                level(names[1], 64, 20, 4),
                factory(names[2]),
            ],
        };
        let passive = |kind, initial_level, requires_coast, levels| WorkshopRule {
            kind,
            input: None,
            output: None,
            workplaces: 0,
            initial_level,
            requires_coast,
            levels,
        };

        rules.add_workshop(WorkshopRule {
            kind: WorkshopKind::TownHall,
            input: None,
            output: Some(GoodKind::Bells),
            workplaces: 3,
            initial_level: 1,
            requires_coast: false,
            levels: vec![level("Town Hall", 0, 0, 1)],
        });
        rules.add_workshop(WorkshopRule {
            kind: WorkshopKind::Carpenter,
            input: Some(GoodKind::Lumber),
            output: Some(GoodKind::Hammers),
            workplaces: 3,
            initial_level: 1,
            requires_coast: false,
            levels: vec![
                level("Carpenter's House", 0, 0, 1),
                level("Lumber Mill", 52, 0, 3),
            ],
        });
        rules.add_workshop(shop(
            WorkshopKind::Blacksmith,
            GoodKind::Ore,
            GoodKind::Tools,
            ["Blacksmith's House", "Blacksmith's Shop", "Iron Works"],
        ));
        rules.add_workshop(shop(
            WorkshopKind::Tobacconist,
            GoodKind::Tobacco,
            GoodKind::Cigars,
            ["Tobacconist's House", "Tobacconist's Shop", "Cigar Factory"],
        ));
        rules.add_workshop(shop(
            WorkshopKind::Weaver,
            GoodKind::Cotton,
            GoodKind::Cloth,
            ["Weaver's House", "Weaver's Shop", "Textile Factory"],
        ));
        rules.add_workshop(shop(
            WorkshopKind::Distiller,
            GoodKind::Sugar,
            GoodKind::Rum,
            ["Distiller's House", "Rum Distillery", "Rum Factory"],
        ));
        rules.add_workshop(shop(
            WorkshopKind::FurTrader,
            GoodKind::Furs,
            GoodKind::Coats,
            ["Fur Trader's House", "Fur Trading Post", "Fur Factory"],
        ));
        rules.add_workshop(WorkshopRule {
            kind: WorkshopKind::Armory,
            input: Some(GoodKind::Tools),
            output: Some(GoodKind::Muskets),
            workplaces: 3,
            initial_level: 0,
            requires_coast: false,
            levels: vec![
                level("Armory", 52, 0, 1),
                level("Magazine", 120, 50, 8),
                factory("Arsenal"),
            ],
        });
        rules.add_workshop(passive(
            WorkshopKind::Warehouse,
            0,
            false,
            vec![
                level("Warehouse", 80, 0, 1),
                level("Warehouse Expansion", 80, 20, 1),
            ],
        ));
        rules.add_workshop(passive(
            WorkshopKind::Stockade,
            0,
            false,
            vec![
                level("Stockade", 64, 0, 3),
                level("Fort", 120, 100, 4),
                LevelRule {
                    upgradable: false,
                    ..level("Fortress", 320, 100, 8)
                },
            ],
        ));
        rules.add_workshop(passive(
            WorkshopKind::Docks,
            0,
            true,
            vec![level("Docks", 52, 0, 1), level("Drydock", 80, 50, 4)],
        ));
        rules.add_workshop(passive(
            WorkshopKind::Stables,
            0,
            false,
            vec![level("Stables", 64, 0, 1)],
        ));
        rules.add_workshop(passive(
            WorkshopKind::CustomHouse,
            0,
            false,
            vec![level("Custom House", 150, 50, 3)],
        ));

        rules.add_unit(UnitBlueprint {
            id: UnitBlueprintId::new("free_colonist"),
            name: "Free Colonist".into(),
            hammers: 0,
            materials: vec![],
            min_population: 0,
            requires: None,
            buildable: false,
        });
        rules.add_unit(UnitBlueprint {
            id: UnitBlueprintId::new("wagon_train"),
            name: "Wagon Train".into(),
            hammers: 40,
            materials: vec![],
            min_population: 4,
            requires: None,
            buildable: true,
        });
        rules.add_unit(UnitBlueprint {
            id: UnitBlueprintId::new("artillery"),
            name: "Artillery".into(),
            hammers: 192,
            materials: vec![(GoodKind::Tools, 40)],
            min_population: 1,
            requires: Some((WorkshopKind::Armory, 1)),
            buildable: true,
        });
        rules.add_unit(UnitBlueprint {
            id: UnitBlueprintId::new("caravel"),
            name: "Caravel".into(),
            hammers: 128,
            materials: vec![(GoodKind::Tools, 40)],
            min_population: 1,
            requires: Some((WorkshopKind::Docks, 2)),
            buildable: true,
        });
        rules.colonist = Some(UnitBlueprintId::new("free_colonist"));

        let yields: [(TileKind, &[(GoodKind, u32)]); 11] = [
            (TileKind::Plains, &[(GoodKind::Food, 5), (GoodKind::Cotton, 2)]),
            (TileKind::Grassland, &[(GoodKind::Food, 3), (GoodKind::Tobacco, 3)]),
            (TileKind::Prairie, &[(GoodKind::Food, 3), (GoodKind::Cotton, 3)]),
            (TileKind::Savannah, &[(GoodKind::Food, 4), (GoodKind::Sugar, 3)]),
            (TileKind::Marsh, &[(GoodKind::Food, 3), (GoodKind::Tobacco, 2), (GoodKind::Ore, 2)]),
            (TileKind::Desert, &[(GoodKind::Food, 2), (GoodKind::Cotton, 1), (GoodKind::Ore, 2)]),
            (TileKind::Tundra, &[(GoodKind::Food, 3), (GoodKind::Ore, 2)]),
            (TileKind::Forest, &[(GoodKind::Food, 2), (GoodKind::Furs, 3), (GoodKind::Lumber, 6)]),
            (TileKind::Hills, &[(GoodKind::Food, 4), (GoodKind::Ore, 4)]),
            (TileKind::Mountains, &[(GoodKind::Ore, 4), (GoodKind::Silver, 1)]),
            (TileKind::Ocean, &[(GoodKind::Food, 4)]),
        ];
        for (tile, goods) in yields {
            for (good, amount) in goods {
                rules.add_tile_yield(TileYield {
                    tile,
                    good: *good,
                    amount: *amount,
                });
            }
        }

        rules
    }

    pub fn add_workshop(&mut self, rule: WorkshopRule) {
        self.workshops.retain(|w| w.kind != rule.kind);
        self.workshops.push(rule);
    }

    pub fn add_unit(&mut self, blueprint: UnitBlueprint) {
        self.units.retain(|u| u.id != blueprint.id);
        self.units.push(blueprint);
    }

    pub fn add_tile_yield(&mut self, tile_yield: TileYield) {
        self.tile_yields
            .retain(|y| !(y.tile == tile_yield.tile && y.good == tile_yield.good));
        self.tile_yields.push(tile_yield);
    }

    /// Workshop lines in founding order
    pub fn workshops(&self) -> &[WorkshopRule] {
        &self.workshops
    }

    pub fn workshop(&self, kind: WorkshopKind) -> Option<&WorkshopRule> {
        self.workshops.iter().find(|w| w.kind == kind)
    }

    pub fn workshop_level(&self, kind: WorkshopKind, level: u8) -> Option<&LevelRule> {
        self.workshop(kind).and_then(|w| w.level(level))
    }

    pub fn unit(&self, id: &UnitBlueprintId) -> Option<&UnitBlueprint> {
        self.units.iter().find(|u| &u.id == id)
    }

    pub fn units(&self) -> &[UnitBlueprint] {
        &self.units
    }

    /// Blueprint spawned by food growth
    pub fn colonist_blueprint(&self) -> Option<&UnitBlueprintId> {
        self.colonist.as_ref()
    }

    /// Base yield of `good` on `tile`, zero when the tile does not produce it
    pub fn tile_yield(&self, tile: TileKind, good: GoodKind) -> u32 {
        self.tile_yields
            .iter()
            .find(|y| y.tile == tile && y.good == good)
            .map(|y| y.amount)
            .unwrap_or(0)
    }

    /// All goods a tile yields, in rule order
    pub fn yields_of(&self, tile: TileKind) -> impl Iterator<Item = &TileYield> {
        self.tile_yields.iter().filter(move |y| y.tile == tile)
    }

    /// Cost of the next step of a build target.
    ///
    /// For workshops this is the level after `current_level`; `None` when
    /// the target is unknown or already at its last level.
    pub fn cost_of(&self, target: &BuildTarget, current_level: u8) -> Option<BuildCost> {
        match target {
            BuildTarget::Workshop(kind) => {
                let rule = self.workshop(*kind)?;
                if current_level >= rule.max_level() {
                    return None;
                }
                rule.level(current_level + 1).map(LevelRule::cost)
            }
            BuildTarget::Unit(id) => self.unit(id).map(UnitBlueprint::cost),
        }
    }

    /// Load rules from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, RuleLoadError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RuleLoadError::IoError(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse rules from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, RuleLoadError> {
        let toml_data: TomlRules =
            toml::from_str(content).map_err(|e| RuleLoadError::ParseError(e.to_string()))?;

        let mut rules = Self::new();
        for workshop in toml_data.workshops {
            rules.add_workshop(workshop.into_rule()?);
        }
        for unit in toml_data.units {
            rules.add_unit(unit.into_blueprint()?);
        }
        for tile in toml_data.tiles {
            let kind = TileKind::parse(&tile.kind)
                .ok_or_else(|| RuleLoadError::InvalidTileKind(tile.kind.clone()))?;
            for amount in tile.yields {
                let (good, amount) = amount.into_good_amount()?;
                rules.add_tile_yield(TileYield {
                    tile: kind,
                    good,
                    amount,
                });
            }
        }
        if let Some(colonist) = toml_data.colonist {
            let id = UnitBlueprintId::new(colonist);
            if rules.unit(&id).is_none() {
                return Err(RuleLoadError::UnknownUnit(id.0));
            }
            rules.colonist = Some(id);
        }
        Ok(rules)
    }
}

/// Error type for rule loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleLoadError {
    IoError(String),
    ParseError(String),
    InvalidWorkshopKind(String),
    InvalidGoodKind(String),
    InvalidTileKind(String),
    InvalidAbility(String),
    UnknownUnit(String),
}

impl fmt::Display for RuleLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLoadError::IoError(e) => write!(f, "IO error: {}", e),
            RuleLoadError::ParseError(e) => write!(f, "Parse error: {}", e),
            RuleLoadError::InvalidWorkshopKind(e) => write!(f, "Invalid workshop kind: {}", e),
            RuleLoadError::InvalidGoodKind(e) => write!(f, "Invalid good kind: {}", e),
            RuleLoadError::InvalidTileKind(e) => write!(f, "Invalid tile kind: {}", e),
            RuleLoadError::InvalidAbility(e) => write!(f, "Invalid ability: {}", e),
            RuleLoadError::UnknownUnit(e) => write!(f, "Unknown unit blueprint: {}", e),
        }
    }
}

impl std::error::Error for RuleLoadError {}

/// TOML representation of a rules file
#[derive(Debug, Deserialize)]
struct TomlRules {
    colonist: Option<String>,
    #[serde(default)]
    workshops: Vec<TomlWorkshop>,
    #[serde(default)]
    units: Vec<TomlUnit>,
    #[serde(default)]
    tiles: Vec<TomlTile>,
}

#[derive(Debug, Deserialize)]
struct TomlWorkshop {
    kind: String,
    input: Option<String>,
    output: Option<String>,
    #[serde(default)]
    workplaces: u32,
    #[serde(default)]
    initial_level: u8,
    #[serde(default)]
    requires_coast: bool,
    levels: Vec<TomlLevel>,
}

#[derive(Debug, Deserialize)]
struct TomlLevel {
    name: String,
    #[serde(default)]
    hammers: u32,
    #[serde(default)]
    materials: Vec<TomlGoodAmount>,
    #[serde(default)]
    min_population: u32,
    #[serde(default = "default_production_percent")]
    production_percent: u32,
    #[serde(default = "default_true")]
    upgradable: bool,
    requires_ability: Option<String>,
}

fn default_production_percent() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TomlUnit {
    id: String,
    name: String,
    #[serde(default)]
    hammers: u32,
    #[serde(default)]
    materials: Vec<TomlGoodAmount>,
    #[serde(default)]
    min_population: u32,
    requires_workshop: Option<String>,
    #[serde(default)]
    requires_level: u8,
    #[serde(default = "default_true")]
    buildable: bool,
}

#[derive(Debug, Deserialize)]
struct TomlTile {
    kind: String,
    yields: Vec<TomlGoodAmount>,
}

#[derive(Debug, Deserialize)]
struct TomlGoodAmount {
    good: String,
    amount: u32,
}

fn parse_good(name: &str) -> Result<GoodKind, RuleLoadError> {
    GoodKind::parse(name).ok_or_else(|| RuleLoadError::InvalidGoodKind(name.to_string()))
}

fn parse_workshop(name: &str) -> Result<WorkshopKind, RuleLoadError> {
    WorkshopKind::parse(name).ok_or_else(|| RuleLoadError::InvalidWorkshopKind(name.to_string()))
}

fn parse_materials(materials: Vec<TomlGoodAmount>) -> Result<Vec<(GoodKind, u32)>, RuleLoadError> {
    materials
        .into_iter()
        .map(TomlGoodAmount::into_good_amount)
        .collect()
}

impl TomlGoodAmount {
    fn into_good_amount(self) -> Result<(GoodKind, u32), RuleLoadError> {
        Ok((parse_good(&self.good)?, self.amount))
    }
}

impl TomlWorkshop {
    fn into_rule(self) -> Result<WorkshopRule, RuleLoadError> {
        let kind = parse_workshop(&self.kind)?;
        let input = self.input.as_deref().map(parse_good).transpose()?;
        let output = self.output.as_deref().map(parse_good).transpose()?;
        let levels = self
            .levels
            .into_iter()
            .map(TomlLevel::into_rule)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WorkshopRule {
            kind,
            input,
            output,
            workplaces: self.workplaces,
            initial_level: self.initial_level,
            requires_coast: self.requires_coast,
            levels,
        })
    }
}

impl TomlLevel {
    fn into_rule(self) -> Result<LevelRule, RuleLoadError> {
        let requires_ability = match self.requires_ability {
            Some(name) => Some(Ability::parse(&name).ok_or(RuleLoadError::InvalidAbility(name))?),
            None => None,
        };
        Ok(LevelRule {
            name: self.name,
            hammers: self.hammers,
            materials: parse_materials(self.materials)?,
            min_population: self.min_population,
            production_percent: self.production_percent,
            upgradable: self.upgradable,
            requires_ability,
        })
    }
}

impl TomlUnit {
    fn into_blueprint(self) -> Result<UnitBlueprint, RuleLoadError> {
        let requires = match self.requires_workshop.as_deref() {
            Some(kind) => Some((parse_workshop(kind)?, self.requires_level.max(1))),
            None => None,
        };
        Ok(UnitBlueprint {
            id: UnitBlueprintId::new(self.id),
            name: self.name,
            hammers: self.hammers,
            materials: parse_materials(self.materials)?,
            min_population: self.min_population,
            requires,
            buildable: self.buildable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_workshop_kind() {
        let rules = RuleSet::with_defaults();
        for kind in WorkshopKind::ALL {
            assert!(rules.workshop(kind).is_some(), "missing {:?}", kind);
        }
        assert_eq!(
            rules.colonist_blueprint(),
            Some(&UnitBlueprintId::new("free_colonist"))
        );
    }

    #[test]
    fn test_cost_of_next_level() {
        let rules = RuleSet::with_defaults();
        let target = BuildTarget::Workshop(WorkshopKind::Carpenter);

        let cost = rules.cost_of(&target, 1).unwrap();
        assert_eq!(cost.hammers, 52);
        assert!(cost.materials.is_empty());
        assert_eq!(cost.min_population, 3);

        // Lumber mill is the last carpenter level
        assert!(rules.cost_of(&target, 2).is_none());
    }

    #[test]
    fn test_terminal_tier_caps_max_level() {
        let rules = RuleSet::with_defaults();
        let stockade = rules.workshop(WorkshopKind::Stockade).unwrap();
        assert_eq!(stockade.max_level(), 3);

        let mut rule = stockade.clone();
        rule.levels[1].upgradable = false;
        assert_eq!(rule.max_level(), 2);
    }

    #[test]
    fn test_tile_yield_lookup() {
        let rules = RuleSet::with_defaults();
        assert_eq!(rules.tile_yield(TileKind::Forest, GoodKind::Lumber), 6);
        assert_eq!(rules.tile_yield(TileKind::Ocean, GoodKind::Ore), 0);
        assert_eq!(rules.yields_of(TileKind::Hills).count(), 2);
    }

    #[test]
    fn test_unit_cost() {
        let rules = RuleSet::with_defaults();
        let cost = rules
            .cost_of(&BuildTarget::Unit(UnitBlueprintId::new("artillery")), 0)
            .unwrap();
        assert_eq!(cost.hammers, 192);
        assert_eq!(cost.materials, vec![(GoodKind::Tools, 40)]);
        assert!(rules
            .cost_of(&BuildTarget::Unit(UnitBlueprintId::new("dragon")), 0)
            .is_none());
    }

    #[test]
    fn test_rules_toml_parsing() {
        let toml_content = r#"
colonist = "settler"

[[workshops]]
kind = "Carpenter"
input = "lumber"
output = "hammers"
workplaces = 3
initial_level = 1

[[workshops.levels]]
name = "Carpenter's House"

[[workshops.levels]]
name = "Lumber Mill"
hammers = 52
min_population = 3

[[workshops.levels]]
name = "Sawmill"
hammers = 200
production_percent = 150
requires_ability = "factory_tier"

[[workshops.levels.materials]]
good = "Tools"
amount = 75

[[units]]
id = "settler"
name = "Settler"
buildable = false

[[units]]
id = "caravel"
name = "Caravel"
hammers = 128
requires_workshop = "docks"
requires_level = 2

[[tiles]]
kind = "forest"
yields = [{ good = "lumber", amount = 6 }, { good = "furs", amount = 2 }]
"#;

        let rules = RuleSet::parse_toml(toml_content).expect("Failed to parse TOML");

        let carpenter = rules.workshop(WorkshopKind::Carpenter).unwrap();
        assert_eq!(carpenter.input, Some(GoodKind::Lumber));
        assert_eq!(carpenter.output, Some(GoodKind::Hammers));
        assert_eq!(carpenter.max_level(), 3);
        let sawmill = carpenter.level(3).unwrap();
        assert_eq!(sawmill.production_percent, 150);
        assert_eq!(sawmill.requires_ability, Some(Ability::FactoryTier));
        assert_eq!(sawmill.materials, vec![(GoodKind::Tools, 75)]);
        assert_eq!(carpenter.level(1).unwrap().production_percent, 100);

        let caravel = rules.unit(&UnitBlueprintId::new("caravel")).unwrap();
        assert_eq!(caravel.requires, Some((WorkshopKind::Docks, 2)));
        assert!(caravel.buildable);

        assert_eq!(rules.tile_yield(TileKind::Forest, GoodKind::Furs), 2);
        assert_eq!(
            rules.colonist_blueprint(),
            Some(&UnitBlueprintId::new("settler"))
        );
    }

    #[test]
    fn test_rules_toml_invalid_good() {
        let toml_content = r#"
[[workshops]]
kind = "weaver"
input = "silk"

[[workshops.levels]]
name = "Weaver's House"
"#;

        match RuleSet::parse_toml(toml_content).unwrap_err() {
            RuleLoadError::InvalidGoodKind(name) => assert_eq!(name, "silk"),
            other => panic!("Expected InvalidGoodKind, got {:?}", other),
        }
    }

    #[test]
    fn test_rules_toml_unknown_colonist() {
        let toml_content = r#"
colonist = "ghost"
"#;

        assert_eq!(
            RuleSet::parse_toml(toml_content).unwrap_err(),
            RuleLoadError::UnknownUnit("ghost".into())
        );
    }

    #[test]
    fn test_load_rules_from_file() {
        let path = std::path::Path::new("data/rules.toml");
        let rules = RuleSet::load_from_toml(path).expect("Should load data/rules.toml");
        let defaults = RuleSet::with_defaults();

        for kind in WorkshopKind::ALL {
            let loaded = rules.workshop(kind).expect("workshop present in file");
            assert_eq!(Some(loaded), defaults.workshop(kind), "{:?} differs", kind);
        }
        assert_eq!(rules.units().len(), defaults.units().len());
        assert_eq!(rules.tile_yield(TileKind::Plains, GoodKind::Food), 5);
        assert_eq!(rules.colonist_blueprint(), defaults.colonist_blueprint());
    }
}
