use std::path::PathBuf;
use std::sync::Arc;

use caravan_core::app::{FleetBuilder, FleetEngine};
use caravan_core::config::{ConfigError, FleetConfig};
use caravan_core::domain::{ErrorKind, FleetError, Mover, StoreError};
use caravan_core::impls::{InMemoryItemStore, InMemoryMoverStore, JsonlMissionLog};
use caravan_core::ports::MissionLog;
use clap::{Parser, Subcommand};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "caravan", about = "Fleet lifecycle runner")]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the M1/100 walkthrough and print each step
    Scenario,

    /// Run movers concurrently through load/start/end cycles
    Simulate {
        #[arg(long, default_value_t = 4)]
        movers: usize,

        #[arg(long, default_value_t = 3)]
        rounds: usize,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("mission log: {0}")]
    Log(#[from] StoreError),

    #[error("engine: {0}")]
    Build(#[from] caravan_core::app::BuildError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error("output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("simulation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One line of scenario output.
#[derive(Serialize)]
struct Step<'a> {
    step: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mover: Option<&'a Mover>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejected: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => FleetConfig::load(path)?,
        None => FleetConfig::default(),
    };

    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let engine = Arc::new(build_engine(&config)?);

    match cli.command {
        Commands::Scenario => scenario(&engine).await,
        Commands::Simulate { movers, rounds } => simulate(engine, movers, rounds).await,
    }
}

fn build_engine(config: &FleetConfig) -> Result<FleetEngine, CliError> {
    let log: Arc<dyn MissionLog> = match &config.mission_log_path {
        Some(path) => {
            info!(path = %path.display(), "using file-backed mission log");
            Arc::new(JsonlMissionLog::open(path)?)
        }
        None => Arc::new(caravan_core::impls::InMemoryMissionLog::new()),
    };

    Ok(FleetBuilder::new()
        .item_store(Arc::new(InMemoryItemStore::new()))
        .mover_store(Arc::new(InMemoryMoverStore::new()))
        .mission_log(log)
        .config(config)
        .build()?)
}

fn print_step(step: &str, result: &Result<Mover, FleetError>) -> Result<(), CliError> {
    let line = match result {
        Ok(mover) => Step {
            step,
            mover: Some(mover),
            rejected: None,
        },
        Err(err) => Step {
            step,
            mover: None,
            rejected: Some(err.to_string()),
        },
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

async fn scenario(engine: &FleetEngine) -> Result<(), CliError> {
    let mover = engine.add_mover("M1", 100.0).await?;
    print_step("add M1 (limit 100)", &Ok(mover.clone()))?;

    let sixty = engine.create_item("sixty", 60.0).await?;
    let fifty = engine.create_item("fifty", 50.0).await?;

    print_step("load 60", &engine.load_item(mover.id, sixty.id).await)?;
    print_step("load 50", &engine.load_item(mover.id, fifty.id).await)?;
    print_step("start mission", &engine.start_mission(mover.id).await)?;
    print_step("end mission", &engine.end_mission(mover.id).await)?;
    print_step("start mission again", &engine.start_mission(mover.id).await)?;

    let log = engine.mission_log(mover.id).await?;
    println!("{}", serde_json::to_string_pretty(&log)?);
    Ok(())
}

async fn simulate(engine: Arc<FleetEngine>, movers: usize, rounds: usize) -> Result<(), CliError> {
    let mut handles = Vec::with_capacity(movers);
    for i in 0..movers {
        let limit = rand::thread_rng().gen_range(50.0..150.0_f64).round();
        let mover = engine.add_mover(format!("M{i}"), limit).await?;
        let engine = engine.clone();
        handles.push(tokio::spawn(async move { run_mover(&engine, mover.id, rounds).await }));
    }
    for handle in handles {
        handle.await??;
    }

    #[derive(Serialize)]
    struct Summary {
        counts: caravan_core::app::FleetCounts,
        ranking: Vec<Mover>,
    }
    let summary = Summary {
        counts: engine.fleet_counts().await?,
        ranking: engine.top_movers(None).await?,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Fills the mover until an item no longer fits, then runs one mission. Repeats `rounds` times.
async fn run_mover(
    engine: &FleetEngine,
    mover_id: caravan_core::domain::MoverId,
    rounds: usize,
) -> Result<(), FleetError> {
    for round in 0..rounds {
        loop {
            let weight = rand::thread_rng().gen_range(1.0..40.0_f64).round();
            let item = engine
                .create_item(format!("{mover_id}-r{round}"), weight)
                .await?;
            match engine.load_item(mover_id, item.id).await {
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::CapacityExceeded => {
                    engine.delete_item(item.id).await?;
                    break;
                }
                Err(err) => {
                    warn!(%mover_id, error = %err, "load failed");
                    return Err(err);
                }
            }
        }
        engine.start_mission(mover_id).await?;
        engine.end_mission(mover_id).await?;
    }
    Ok(())
}
