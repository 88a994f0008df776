use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use log::{info, warn};
use warrens::{
    init_logging, GameState, ResourceCosts, ResourceKind, SimConfig, SimEvent, Simulation,
    UnitKind,
};

/// Headless driver for the Warrens realtime strategy simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// TOML file overriding the default tuning values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of simulation steps to run
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Seconds of simulated time per step
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Print events as JSON lines instead of logging them
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

/// Populate the scene with a small settlement and issue its opening orders.
fn set_up_scenario(sim: &mut Simulation) {
    let workers: Vec<_> = (0..3)
        .map(|i| sim.spawn_unit(UnitKind::Worker, Vec3::new(i as f32 * 2.0, 0.0, 0.0)))
        .collect();
    let warrior = sim.spawn_unit(UnitKind::Warrior, Vec3::new(0.0, 0.0, 5.0));
    let raider = sim.spawn_unit(UnitKind::Raider, Vec3::new(20.0, 0.0, 20.0));

    for (i, worker) in workers.iter().enumerate() {
        let site = Vec3::new(10.0, 0.0, i as f32 * 3.0);
        if !sim.registry_mut().dispatch_move(worker, site) {
            warn!("worker {} refused to move", worker.borrow().id());
        }
    }
    if !sim
        .registry_mut()
        .dispatch_move(&warrior, raider.borrow().position())
    {
        warn!("warrior refused to move");
    }

    let ledger = sim.ledger_mut();
    for (kind, amount) in [(ResourceKind::Wood, 250), (ResourceKind::Stone, 120)] {
        if !ledger.add(kind, amount) {
            warn!("could not add {amount} {kind}");
        }
    }
    let barracks = ResourceCosts::from([(ResourceKind::Wood, 80), (ResourceKind::Stone, 40)]);
    if ledger.try_consume(&barracks) {
        info!("barracks built");
    }

    if raider.borrow_mut().take_damage(150.0) {
        info!("raider {} fell before reaching the settlement", raider.borrow().id());
    }
}

fn report(events: &[SimEvent], json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    for event in events {
        if json {
            serde_json::to_writer(&mut out, event).context("serialising event")?;
            writeln!(out).context("writing event")?;
        } else {
            info!("{event:?}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_ref())?;
    let mut sim = Simulation::new(&config);
    set_up_scenario(&mut sim);
    report(&sim.drain_events(), args.json)?;

    for _ in 0..args.ticks {
        let tick = sim.step(args.dt);
        if !tick.raids.is_empty() {
            info!("tick {}: raids {:?}", sim.tick_count(), tick.raids);
        }
        report(&sim.drain_events(), args.json)?;
    }

    let _ = sim.change_state(GameState::GameOver);
    info!(
        "finished after {} ticks ({:.1}s): {:?}, {} enemies spawned",
        sim.tick_count(),
        sim.clock(),
        sim.ledger().get_all(),
        sim.monitor().enemy_count()
    );
    Ok(())
}
