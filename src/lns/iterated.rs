//! Iterated Local Search.
//!
//! Perturbation is a randomized worst removal followed by best insertion,
//! each perturbed solution is pushed to a local optimum, and only strictly
//! cheaper local optima replace the incumbent. An infeasible local optimum
//! never replaces a feasible incumbent.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, RoutingError};
use crate::evaluation::{RoutingContext, VehicleEvaluator};
use crate::local_search::LocalSearch;
use crate::models::Solution;

use super::{removal_count, BestInsertion, DestroyOperator, WorstRemoval};

/// ILS parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IlsConfig {
    /// Number of perturbation rounds after the first descent.
    pub max_iterations: usize,
    /// Fraction of customers removed per perturbation.
    pub remove_fraction: f64,
    /// Exponent of the randomized worst removal.
    pub worst_removal_randomization: f64,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            remove_fraction: 0.1,
            worst_removal_randomization: 3.0,
        }
    }
}

impl IlsConfig {
    /// Sets the number of rounds.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the removal fraction.
    pub fn with_remove_fraction(mut self, fraction: f64) -> Self {
        self.remove_fraction = fraction;
        self
    }

    /// Sets the worst-removal exponent.
    pub fn with_worst_removal_randomization(mut self, p: f64) -> Self {
        self.worst_removal_randomization = p;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.remove_fraction) {
            return Err(RoutingError::InvalidConfig(format!(
                "ILS remove fraction must be in [0, 1], got {}",
                self.remove_fraction
            )));
        }
        let p = self.worst_removal_randomization;
        if !p.is_finite() || p < 1.0 {
            return Err(RoutingError::InvalidConfig(format!(
                "worst removal randomization must be >= 1, got {p}"
            )));
        }
        Ok(())
    }
}

/// Iterated Local Search orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Ils {
    config: IlsConfig,
}

impl Ils {
    /// Creates an orchestrator.
    pub fn new(config: IlsConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &IlsConfig {
        &self.config
    }

    /// Descends from `initial`, then perturbs and re-descends
    /// `max_iterations` times, keeping the cheapest local optimum.
    #[instrument(skip_all, fields(iterations = self.config.max_iterations))]
    pub fn run<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        local_search: &LocalSearch,
        initial: &Solution,
        rng: &mut R,
    ) -> Solution
    where
        E: VehicleEvaluator + ?Sized,
        R: Rng,
    {
        let num_customers = ctx.instance().num_customers();
        let perturb = WorstRemoval::randomized(self.config.worst_removal_randomization);
        let repair = BestInsertion;

        let mut best = local_search.improve(ctx, initial);
        let start_cost = best.cost();
        debug!(initial = initial.cost(), descended = start_cost, "first descent");

        for iteration in 0..self.config.max_iterations {
            let mut candidate = best.clone();
            let count = removal_count(
                self.config.remove_fraction,
                num_customers,
                candidate.num_served(),
            );
            perturb.destroy(ctx, &mut candidate, count, rng);
            let unrouted = candidate.missing_customers(num_customers);
            repair.insert(ctx, &mut candidate, &unrouted);
            let candidate = local_search.improve(ctx, &candidate);

            let missing = candidate.missing_customers(num_customers);
            if !missing.is_empty() {
                warn!(
                    iteration,
                    ?missing,
                    "customers missing after perturbation, candidate discarded"
                );
                continue;
            }
            if candidate.improves_on(&best) {
                info!(iteration, cost = candidate.cost(), "new best solution");
                best = candidate;
            }
        }

        info!(start_cost, end_cost = best.cost(), "ILS finished");
        best
    }
}
