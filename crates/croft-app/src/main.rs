//! Terminal front end for the croft field simulation.
//!
//! Usage: `croft-app [STEPS] [CONFIG.json]`

mod console;

use anyhow::Result;
use croft_core::SimConfig;
use croft_world::Simulation;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_STEPS: u64 = 1000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let steps = match args.next() {
        Some(arg) => arg.parse()?,
        None => DEFAULT_STEPS,
    };
    let config = match args.next() {
        Some(path) => SimConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };

    info!(steps, seed = config.seed, "starting croft");

    let mut sim = Simulation::with_view(
        config.field.depth,
        config.field.width,
        config.clone(),
        Box::new(console::ConsoleView::new()),
    );
    sim.populate();
    sim.simulate(steps);

    info!(step = sim.step(), actors = sim.actor_count(), "croft finished");
    Ok(())
}
