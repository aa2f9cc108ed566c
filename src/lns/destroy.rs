//! Destroy operators for LNS-based HFVRP optimization.
//!
//! # Operators
//!
//! - [`RandomRemoval`]: Removes random customers
//! - [`WorstRemoval`]: Removes customers whose removal saves the most route cost
//! - [`RelatedRemoval`]: Removes geographically related customers
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use rand::Rng;

use crate::evaluation::{RoutingContext, VehicleEvaluator};
use crate::models::Solution;

use super::DestroyOperator;

/// Removes uniformly random customers.
///
/// Simple but effective baseline operator that ensures diversity in the
/// search process.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRemoval;

impl DestroyOperator for RandomRemoval {
    fn name(&self) -> &str {
        "random_removal"
    }

    fn destroy<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &mut Solution,
        count: usize,
        rng: &mut R,
    ) -> Vec<usize>
    where
        E: VehicleEvaluator + ?Sized,
        R: Rng,
    {
        let mut assigned: Vec<usize> = solution
            .routes()
            .iter()
            .flat_map(|r| r.customers().iter().copied())
            .collect();
        let mut removed = Vec::with_capacity(count);
        while removed.len() < count && !assigned.is_empty() {
            let idx = rng.random_range(0..assigned.len());
            let customer = assigned.swap_remove(idx);
            solution.remove_customer(ctx, customer);
            removed.push(customer);
        }
        solution.purge_empty_routes();
        removed
    }
}

/// Removes the customers whose removal saves the most route cost.
///
/// Savings are measured with the evaluator's route cost, so dropping a
/// customer that forces a larger vehicle scores high. With a randomization
/// exponent `p`, the `⌊y^p · n⌋`-th candidate of the descending list is
/// taken for uniform `y`; without one the worst customer is always taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstRemoval {
    randomization: Option<f64>,
}

impl WorstRemoval {
    /// Deterministic worst removal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Randomized worst removal with exponent `p ≥ 1`.
    pub fn randomized(p: f64) -> Self {
        Self {
            randomization: Some(p),
        }
    }

    /// Cost saving of removing every routed customer, highest first.
    fn ranked_savings<E: VehicleEvaluator + ?Sized>(
        ctx: &RoutingContext<'_, E>,
        solution: &Solution,
    ) -> Vec<(usize, f64)> {
        let mut candidates = Vec::new();
        for (r, route) in solution.routes().iter().enumerate() {
            let current = solution.route_cost(r).cost;
            let seq = route.vertices();
            for pos in 1..seq.len() - 1 {
                let mut without = Vec::with_capacity(seq.len() - 1);
                without.extend_from_slice(&seq[..pos]);
                without.extend_from_slice(&seq[pos + 1..]);
                let saving = current - ctx.sequence_cost(&without).cost;
                // NaN when both costs are infinite
                let saving = if saving.is_nan() { 0.0 } else { saving };
                candidates.push((seq[pos], saving));
            }
        }
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        candidates
    }
}

impl DestroyOperator for WorstRemoval {
    fn name(&self) -> &str {
        "worst_removal"
    }

    fn destroy<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &mut Solution,
        count: usize,
        rng: &mut R,
    ) -> Vec<usize>
    where
        E: VehicleEvaluator + ?Sized,
        R: Rng,
    {
        let mut removed = Vec::with_capacity(count);
        while removed.len() < count {
            let ranked = Self::ranked_savings(ctx, solution);
            if ranked.is_empty() {
                break;
            }
            let idx = match self.randomization {
                Some(p) => {
                    let y: f64 = rng.random();
                    ((y.powf(p) * ranked.len() as f64) as usize).min(ranked.len() - 1)
                }
                None => 0,
            };
            let customer = ranked[idx].0;
            solution.remove_customer(ctx, customer);
            removed.push(customer);
        }
        solution.purge_empty_routes();
        removed
    }
}

/// Removes customers close to already removed ones (Shaw-style).
///
/// Relatedness of two customers is the negative Euclidean distance between
/// their coordinates. A random seed customer is removed first; then a
/// random already removed customer is picked and its most related routed
/// customer is removed, until `count` customers are out.
///
/// # Reference
///
/// Shaw, P. (1998). "Using Constraint Programming and Local Search Methods
/// to Solve Vehicle Routing Problems", *CP-98*, LNCS 1520, 417-431.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelatedRemoval;

impl RelatedRemoval {
    fn relatedness<E: VehicleEvaluator + ?Sized>(
        ctx: &RoutingContext<'_, E>,
        a: usize,
        b: usize,
    ) -> f64 {
        let instance = ctx.instance();
        -instance.vertex(a).distance_to(instance.vertex(b))
    }
}

impl DestroyOperator for RelatedRemoval {
    fn name(&self) -> &str {
        "related_removal"
    }

    fn destroy<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &mut Solution,
        count: usize,
        rng: &mut R,
    ) -> Vec<usize>
    where
        E: VehicleEvaluator + ?Sized,
        R: Rng,
    {
        let mut assigned: Vec<usize> = solution
            .routes()
            .iter()
            .flat_map(|r| r.customers().iter().copied())
            .collect();
        if count == 0 || assigned.is_empty() {
            return Vec::new();
        }

        let seed = assigned.swap_remove(rng.random_range(0..assigned.len()));
        solution.remove_customer(ctx, seed);
        let mut removed = vec![seed];

        while removed.len() < count && !assigned.is_empty() {
            let reference = removed[rng.random_range(0..removed.len())];
            let mut best_idx = 0;
            let mut best_rel = f64::NEG_INFINITY;
            for (idx, &c) in assigned.iter().enumerate() {
                let rel = Self::relatedness(ctx, reference, c);
                if rel > best_rel {
                    best_rel = rel;
                    best_idx = idx;
                }
            }
            let next = assigned.swap_remove(best_idx);
            solution.remove_customer(ctx, next);
            removed.push(next);
        }

        solution.purge_empty_routes();
        removed
    }
}

/// Destroy operators selectable by the LNS weights, in weight order.
#[derive(Debug, Clone, Copy)]
pub enum Destroy {
    /// [`RandomRemoval`].
    Random(RandomRemoval),
    /// [`WorstRemoval`].
    Worst(WorstRemoval),
    /// [`RelatedRemoval`].
    Related(RelatedRemoval),
}

impl Destroy {
    /// The three LNS operators: random, deterministic worst, related.
    pub fn portfolio() -> [Destroy; 3] {
        [
            Destroy::Random(RandomRemoval),
            Destroy::Worst(WorstRemoval::new()),
            Destroy::Related(RelatedRemoval),
        ]
    }
}

impl DestroyOperator for Destroy {
    fn name(&self) -> &str {
        match self {
            Destroy::Random(op) => op.name(),
            Destroy::Worst(op) => op.name(),
            Destroy::Related(op) => op.name(),
        }
    }

    fn destroy<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &mut Solution,
        count: usize,
        rng: &mut R,
    ) -> Vec<usize>
    where
        E: VehicleEvaluator + ?Sized,
        R: Rng,
    {
        match self {
            Destroy::Random(op) => op.destroy(ctx, solution, count, rng),
            Destroy::Worst(op) => op.destroy(ctx, solution, count, rng),
            Destroy::Related(op) => op.destroy(ctx, solution, count, rng),
        }
    }
}
