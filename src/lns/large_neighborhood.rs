//! Large Neighborhood Search with weighted destroy selection.
//!
//! # Algorithm
//!
//! ```text
//! current ← initial
//! repeat iterations times:
//!     candidate ← copy(current)
//!     op ← destroy operator drawn with probability ∝ weight
//!     op removes ⌈fraction × N⌉ customers from candidate
//!     best insertion reinserts every unrouted customer
//!     if candidate misses a customer: log and discard
//!     if cost(candidate) < cost(current)
//!        and (candidate feasible or current infeasible): current ← candidate
//! ```
//!
//! Acceptance is strictly greedy, so the returned cost never exceeds the
//! initial one, and a feasible start never yields an infeasible result.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, RoutingError};
use crate::evaluation::{RoutingContext, VehicleEvaluator};
use crate::models::Solution;

use super::{
    removal_count, BestInsertion, Destroy, DestroyOperator, RandomRemoval, RepairOperator,
};

/// LNS parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LnsConfig {
    /// Number of destroy/repair rounds.
    pub iterations: usize,
    /// Fraction of customers removed per round.
    pub remove_fraction: f64,
    /// Selection weights of random, worst and related removal.
    pub destroy_weights: [f64; 3],
}

impl Default for LnsConfig {
    fn default() -> Self {
        Self {
            iterations: 250,
            remove_fraction: 0.1,
            destroy_weights: [1.0, 0.0, 0.0],
        }
    }
}

impl LnsConfig {
    /// Sets the number of rounds.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the removal fraction.
    pub fn with_remove_fraction(mut self, fraction: f64) -> Self {
        self.remove_fraction = fraction;
        self
    }

    /// Sets the destroy weights (random, worst, related).
    pub fn with_destroy_weights(mut self, weights: [f64; 3]) -> Self {
        self.destroy_weights = weights;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.remove_fraction) {
            return Err(RoutingError::InvalidConfig(format!(
                "LNS remove fraction must be in [0, 1], got {}",
                self.remove_fraction
            )));
        }
        if self.destroy_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RoutingError::InvalidConfig(
                "destroy weights must be finite and non-negative".into(),
            ));
        }
        if self.destroy_weights.iter().sum::<f64>() <= 0.0 {
            return Err(RoutingError::InvalidConfig(
                "at least one destroy weight must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Large Neighborhood Search orchestrator.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_fleet::constructive::{savings, SavingsConfig};
/// use u_fleet::distance::ArcMatrix;
/// use u_fleet::evaluation::{HfvrpEvaluator, RoutingContext};
/// use u_fleet::lns::{Lns, LnsConfig};
/// use u_fleet::models::{CityParams, FleetSpec, Instance, Vertex, VehicleType};
///
/// let mut vertices = vec![Vertex::depot(0.0, 0.0)];
/// for i in 1..=8 {
///     let angle = i as f64;
///     vertices.push(Vertex::customer(i, 10.0 * angle.cos(), 10.0 * angle.sin(), 10.0, 1.0, 60.0));
/// }
/// let arcs = ArcMatrix::euclidean(&vertices, 50.0);
/// let instance = Instance::new(vertices, arcs).unwrap();
/// let fleet = FleetSpec::new(vec![VehicleType::new("van", 40.0, 10.0).with_consumption(1.0)]);
/// let city = CityParams { price_diesel: 1.0, utility_other: 20.0, ..CityParams::default() };
/// let evaluator = HfvrpEvaluator::new(fleet, city);
/// let ctx = RoutingContext::new(&instance, &evaluator);
///
/// let start = savings(&ctx, &SavingsConfig::default());
/// let mut rng = StdRng::seed_from_u64(42);
/// let lns = Lns::new(LnsConfig::default().with_iterations(30));
/// let best = lns.run(&ctx, &start, &mut rng);
/// assert!(best.cost() <= start.cost());
/// assert!(best.missing_customers(8).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lns {
    config: LnsConfig,
}

impl Lns {
    /// Creates an orchestrator.
    pub fn new(config: LnsConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &LnsConfig {
        &self.config
    }

    /// Runs the destroy/repair loop and returns the best solution found.
    #[instrument(skip_all, fields(iterations = self.config.iterations))]
    pub fn run<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        initial: &Solution,
        rng: &mut R,
    ) -> Solution
    where
        E: VehicleEvaluator + ?Sized,
        R: Rng,
    {
        let num_customers = ctx.instance().num_customers();
        let weighted: Vec<(Destroy, f64)> = Destroy::portfolio()
            .into_iter()
            .zip(self.config.destroy_weights)
            .collect();
        let repair = BestInsertion;

        let mut current = initial.clone();
        current.purge_empty_routes();
        let start_cost = current.cost();
        let mut improvements = 0usize;
        let mut weights_warned = false;

        for iteration in 0..self.config.iterations {
            let destroy = match weighted.choose_weighted(rng, |(_, w)| *w) {
                Ok((op, _)) => *op,
                Err(err) => {
                    if !weights_warned {
                        warn!(%err, "unusable destroy weights, falling back to random removal");
                        weights_warned = true;
                    }
                    Destroy::Random(RandomRemoval)
                }
            };

            let mut candidate = current.clone();
            let count = removal_count(
                self.config.remove_fraction,
                num_customers,
                candidate.num_served(),
            );
            let removed = destroy.destroy(ctx, &mut candidate, count, rng);
            let unrouted = candidate.missing_customers(num_customers);
            repair.repair(ctx, &mut candidate, &unrouted, rng);

            let missing = candidate.missing_customers(num_customers);
            if !missing.is_empty() {
                warn!(iteration, ?missing, "customers missing after repair, candidate discarded");
                continue;
            }

            debug!(
                iteration,
                operator = destroy.name(),
                removed = removed.len(),
                cost = candidate.cost(),
                "round finished"
            );
            if candidate.improves_on(&current) {
                info!(iteration, cost = candidate.cost(), "new best solution");
                current = candidate;
                improvements += 1;
            }
        }

        info!(
            start_cost,
            end_cost = current.cost(),
            improvements,
            "LNS finished"
        );
        current
    }
}
