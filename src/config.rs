//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::constructive::SavingsConfig;
use crate::error::{Result, RoutingError};
use crate::lns::{IlsConfig, LnsConfig};

/// Settings of a full savings → LNS → ILS run.
///
/// Missing JSON fields take their defaults, so `{}` is a valid document.
///
/// # Examples
///
/// ```
/// use u_fleet::config::SolverConfig;
///
/// let config = SolverConfig::from_json(r#"{ "seed": 7, "lns": { "iterations": 20 } }"#).unwrap();
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.lns.iterations, 20);
/// assert_eq!(config.ils.max_iterations, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Savings construction parameters.
    pub savings: SavingsConfig,
    /// LNS parameters.
    pub lns: LnsConfig,
    /// ILS parameters.
    pub ils: IlsConfig,
    /// Candidate arcs kept per customer by the local search.
    pub granularity: usize,
    /// Seed of the single random generator of a run.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            savings: SavingsConfig::default(),
            lns: LnsConfig::default(),
            ils: IlsConfig::default(),
            granularity: 20,
            seed: 0,
        }
    }
}

impl SolverConfig {
    /// Decodes and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the savings parameters.
    pub fn with_savings(mut self, savings: SavingsConfig) -> Self {
        self.savings = savings;
        self
    }

    /// Sets the LNS parameters.
    pub fn with_lns(mut self, lns: LnsConfig) -> Self {
        self.lns = lns;
        self
    }

    /// Sets the ILS parameters.
    pub fn with_ils(mut self, ils: IlsConfig) -> Self {
        self.ils = ils;
        self
    }

    /// Sets the local-search granularity.
    pub fn with_granularity(mut self, k: usize) -> Self {
        self.granularity = k;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every nested configuration.
    pub fn validate(&self) -> Result<()> {
        self.savings.validate()?;
        self.lns.validate()?;
        self.ils.validate()?;
        if self.granularity == 0 {
            return Err(RoutingError::InvalidConfig(
                "granularity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
