//! Colony Engine - headless settlement runner
//!
//! Founds one settlement, places colonists and advances it for a number of
//! turns against in-memory collaborators. Prints a per-turn summary, or the
//! reports and final settlement state as JSON.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use colony_engine::core::config::EngineConfig;
use colony_engine::core::error::Result;
use colony_engine::core::types::{MapLocation, PlayerId, SettlementId, UnitId};
use colony_engine::external::testing::{CountingUnitFactory, FixedMarket, RecordingSink};
use colony_engine::external::{PlayerProfile, PortRegistry};
use colony_engine::rules::{RuleSet, UnitBlueprintId};
use colony_engine::settlement::{
    BuildTarget, GoodKind, Settlement, TileKind, TileSnapshot, TurnContext, TurnReport, Worker,
    WorkshopKind,
};

/// Headless settlement runner
#[derive(Parser, Debug)]
#[command(name = "colony-engine")]
#[command(about = "Advance a sample settlement turn by turn")]
struct Args {
    /// Rule data file (built-in rules when omitted)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Engine constants override file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of turns to run
    #[arg(long, default_value_t = 20)]
    turns: u32,

    /// Owner difficulty level (shifts the government thresholds)
    #[arg(long, default_value_t = 2)]
    difficulty: i32,

    /// Colonists placed at founding
    #[arg(long, default_value_t = 5)]
    colonists: u32,

    /// Print reports and the final settlement as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    reports: &'a [TurnReport],
    settlement: &'a Settlement,
    gold: i64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colony_engine=info".into()),
        )
        .init();

    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => RuleSet::load_from_toml(path)?,
        None => RuleSet::with_defaults(),
    };
    let config = match &args.config {
        Some(path) => EngineConfig::load_from_toml(path)?,
        None => EngineConfig::default(),
    };

    let mut owner = PlayerProfile::new(PlayerId(1), "Player", true);
    owner.difficulty = args.difficulty;
    owner.gold = 1000;

    let mut settlement = Settlement::found(
        SettlementId(1),
        "Jamestown",
        owner.id,
        sample_tiles(),
        true,
        &rules,
    )?;
    place_colonists(&mut settlement, args.colonists, &owner, &rules, &config);
    settlement.ledger_mut().add(GoodKind::Food, 20)?;
    settlement.ledger_mut().add(GoodKind::Lumber, 30)?;

    if let Err(e) = settlement.set_build_target(
        BuildTarget::Workshop(WorkshopKind::Docks),
        &owner,
        &rules,
        &config,
    ) {
        tracing::warn!("Docks not available: {}", e);
    }
    if let Err(e) = settlement.enqueue(
        BuildTarget::Unit(UnitBlueprintId::new("wagon_train")),
        &owner,
        &rules,
    ) {
        tracing::warn!("Wagon train not available: {}", e);
    }

    let mut sink = RecordingSink::new();
    let mut market = sample_market();
    let mut units = CountingUnitFactory::new(1000);
    let mut harbour = PortRegistry::new();

    let mut reports = Vec::with_capacity(args.turns as usize);
    for turn in 1..=args.turns {
        let mut ctx = TurnContext {
            turn,
            rules: &rules,
            config: &config,
            owner: &mut owner,
            notifications: &mut sink,
            market: &mut market,
            units: &mut units,
            harbour: &mut harbour,
        };
        let report = settlement.process_turn(&mut ctx)?;
        if !args.json {
            print_turn(&settlement, &report);
        }
        reports.push(report);
    }

    if args.json {
        let output = RunOutput {
            reports: &reports,
            settlement: &settlement,
            gold: owner.gold,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        println!("=== Notifications ({}) ===", sink.all().len());
        for n in sink.all() {
            println!("  [{:?}] {}", n.severity, n.key.key());
        }
    }

    Ok(())
}

fn sample_tiles() -> Vec<TileSnapshot> {
    let kinds = [
        TileKind::Plains,
        TileKind::Forest,
        TileKind::Grassland,
        TileKind::Hills,
        TileKind::Ocean,
        TileKind::Prairie,
        TileKind::Forest,
        TileKind::Savannah,
        TileKind::Marsh,
    ];
    let offsets = [(0, 0), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
    kinds
        .iter()
        .zip(offsets)
        .map(|(kind, (dx, dy))| TileSnapshot::new(MapLocation::new(10 + dx, 10 + dy), *kind))
        .collect()
}

fn sample_market() -> FixedMarket {
    let mut market = FixedMarket::new();
    for (good, price) in [
        (GoodKind::Tools, 2),
        (GoodKind::Furs, 3),
        (GoodKind::Cotton, 1),
        (GoodKind::Cloth, 10),
        (GoodKind::Ore, 1),
    ] {
        market.set_price(good, price);
    }
    market
}

/// Seat colonists on the forest, the carpenter, the fields and the town hall,
/// skipping locations that reject them
fn place_colonists(
    settlement: &mut Settlement,
    count: u32,
    owner: &PlayerProfile,
    rules: &RuleSet,
    config: &EngineConfig,
) {
    let carpenter = settlement.workshop_index(WorkshopKind::Carpenter);
    let town_hall = settlement.workshop_index(WorkshopKind::TownHall);
    let targets: Vec<usize> = [Some(1), carpenter, Some(3), town_hall, Some(2), Some(5), Some(6)]
        .into_iter()
        .flatten()
        .collect();

    let mut placed = 0;
    for id in 1..=count {
        let expertise = if id == 2 { Some(GoodKind::Hammers) } else { None };
        let worker = Worker::new(UnitId(id), format!("Colonist {}", id), expertise);
        let seated = targets.iter().copied().find(|&index| {
            settlement
                .add_worker(worker.clone(), index, owner, rules, config)
                .is_ok()
        });
        match seated {
            Some(index) => {
                placed += 1;
                tracing::debug!("Colonist {} placed at location {}", id, index);
            }
            None => tracing::warn!("No room for colonist {}", id),
        }
    }
    tracing::info!("{} of {} colonists placed", placed, count);
}

fn print_turn(settlement: &Settlement, report: &TurnReport) {
    let target = settlement
        .build_queue()
        .current()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "Turn {:>3} | pop {:>2} | food {:>3} | hammers {:>3} ({}) | support {:>3}% | bonus {:+}",
        report.turn,
        settlement.headcount(),
        settlement.ledger().quantity_of(GoodKind::Food),
        settlement.hammers(),
        target,
        settlement.civic().support(),
        settlement.civic().production_bonus(),
    );
    if let Some(done) = &report.completed {
        println!("         completed {}", done);
    }
    if let Some(worker) = &report.starved {
        println!("         {} starved", worker.name);
    }
    if let Some(unit) = &report.new_colonist {
        println!("         new colonist {}", unit.name);
    }
}
