//! Fixed-timestep simulation loop.
//!
//! Each tick runs one gameplay step:
//!
//! 1. Reset the event bus and re-subscribe the collision handlers.
//! 2. Move entities.
//! 3. Detect collisions, dispatching damage and bounces.
//! 4. Fire timed projectile emitters.
//! 5. Age projectiles.
//! 6. Apply deferred entity creation and destruction.
//! 7. Advance the tick counter.

use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use kestrel_ecs::{EcsError, Registry};
use kestrel_game::GameBus;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Configuration for the tick loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl TickConfig {
    /// Wall-clock length of one tick at the configured rate.
    ///
    /// # Errors
    ///
    /// Fails unless `tick_rate` is finite and positive.
    pub fn tick_duration(&self) -> anyhow::Result<Duration> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            bail!("tick_rate must be positive, got {}", self.tick_rate);
        }
        Duration::try_from_secs_f64(1.0 / self.tick_rate)
            .with_context(|| format!("tick_rate {} is out of range", self.tick_rate))
    }
}

/// The simulation's tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Current tick counter.
    tick_id: u64,
    /// Tick configuration.
    config: TickConfig,
    /// The world.
    registry: Registry,
    /// Intra-step notifications.
    bus: GameBus,
}

impl TickLoop {
    /// Create a tick loop driving `registry`.
    ///
    /// The registry should already have its systems installed.
    #[must_use]
    pub fn new(config: TickConfig, registry: Registry) -> Self {
        Self {
            tick_id: 0,
            config,
            registry,
            bus: GameBus::new(),
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns a reference to the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run one tick of the simulation, `dt` seconds long.
    ///
    /// # Errors
    ///
    /// Fails if a gameplay system is missing from the registry.
    pub fn tick(&mut self, dt: f64) -> Result<(), EcsError> {
        self.tick_id += 1;

        let collisions = kestrel_game::step(&mut self.registry, &mut self.bus, dt)?;

        debug!(
            tick_id = self.tick_id,
            dt,
            collisions,
            entities = self.registry.entity_count(),
            "tick complete"
        );
        Ok(())
    }

    /// Run the tick loop for the configured number of ticks, or indefinitely.
    ///
    /// # Errors
    ///
    /// Fails on an unusable tick rate, and stops at the first tick that fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let tick_duration = self.config.tick_duration()?;
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            let dt = tick_duration.as_secs_f64();
            self.tick(dt)?;

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(
                    ticks = tick_count,
                    entities = self.registry.entity_count(),
                    "tick loop complete"
                );
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
        Ok(())
    }
}
