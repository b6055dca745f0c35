//! # kestrel_app — Demo driver
//!
//! Runs the kestrel gameplay systems over a small demo scene on a fixed
//! timestep.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the JSON file named by the first argument, or
//!    use defaults.
//! 2. Build the registry and install the gameplay systems.
//! 3. Spawn the demo scene and apply it with one registry update.
//! 4. Enter the fixed-timestep tick loop.

mod config;
mod tick;

use anyhow::Result;
use kestrel_ecs::Registry;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use tick::TickLoop;

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kestrel_app=info".parse()?))
        .init();

    let config = AppConfig::from_args(std::env::args())?;
    info!(?config, "kestrel starting");

    let mut registry = Registry::with_config(config.registry);
    kestrel_game::install(&mut registry, config.arena)?;
    let scene = kestrel_game::scene::spawn_demo(&mut registry)?;
    registry.update();
    info!(player = %scene.player, entities = registry.entity_count(), "world ready");

    let mut tick_loop = TickLoop::new(config.tick, registry);
    tick_loop.run()?;

    info!(
        ticks = tick_loop.tick_id(),
        entities = tick_loop.registry().entity_count(),
        "kestrel shut down"
    );
    Ok(())
}
