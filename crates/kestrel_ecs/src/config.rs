//! Registry configuration.

use serde::Deserialize;

/// Tuning knobs for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of component slots reserved when a pool is first created.
    pub initial_pool_capacity: usize,
}

impl RegistryConfig {
    /// Override the initial pool reservation.
    #[must_use]
    pub fn with_initial_pool_capacity(mut self, capacity: usize) -> Self {
        self.initial_pool_capacity = capacity;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_pool_capacity: 100,
        }
    }
}
