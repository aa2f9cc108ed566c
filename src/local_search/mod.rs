//! Granular local search for heterogeneous-fleet solutions.
//!
//! - [`ArcMask`]: per-customer K-nearest candidate arcs
//! - [`Operator`]: move portfolio (relocate 1 and 2, exchange, 2-opt*)
//! - [`LocalSearch`]: best-improvement descent restricted to the mask
//!
//! Moves are priced with the full route cost of the evaluator, so a vehicle
//! change caused by a move is part of its delta.

mod candidates;
mod moves;

pub use candidates::ArcMask;
pub use moves::Operator;

use tracing::debug;

use crate::evaluation::{RouteCost, RoutingContext, VehicleEvaluator};
use crate::models::{Instance, Route, Solution};

use moves::{rewrite, Rewrite};

const EPSILON: f64 = 1e-9;

/// A priced move ready to apply.
#[derive(Debug, Clone)]
struct PricedMove {
    operator: Operator,
    routes: Vec<(usize, Vec<usize>, RouteCost)>,
    delta: f64,
}

/// Best-improvement local search over a fixed operator portfolio.
///
/// Holds only the immutable arc mask, so one instance can be shared by any
/// number of calls.
///
/// # Examples
///
/// ```
/// use u_fleet::distance::ArcMatrix;
/// use u_fleet::evaluation::{HfvrpEvaluator, RoutingContext};
/// use u_fleet::local_search::LocalSearch;
/// use u_fleet::models::{CityParams, FleetSpec, Instance, Route, Solution, Vertex, VehicleType};
///
/// let vertices = vec![
///     Vertex::depot(0.0, 0.0),
///     Vertex::customer(1, 1.0, 0.0, 10.0, 1.0, 0.0),
///     Vertex::customer(2, 2.0, 0.0, 10.0, 1.0, 0.0),
///     Vertex::customer(3, 3.0, 0.0, 10.0, 1.0, 0.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&vertices, 50.0);
/// let instance = Instance::new(vertices, arcs).unwrap();
/// let fleet = FleetSpec::new(vec![VehicleType::new("van", 100.0, 10.0).with_consumption(1.0)]);
/// let city = CityParams { price_diesel: 1.0, ..CityParams::default() };
/// let evaluator = HfvrpEvaluator::new(fleet, city);
/// let ctx = RoutingContext::new(&instance, &evaluator);
///
/// let start = Solution::from_routes(&ctx, vec![Route::from_customers(&[2, 1, 3])]);
/// let ls = LocalSearch::new(&instance, 2);
/// let improved = ls.improve(&ctx, &start);
/// assert!(improved.cost() < start.cost());
/// assert_eq!(improved.route(0).customers(), &[1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct LocalSearch {
    mask: ArcMask,
    operators: Vec<Operator>,
}

impl LocalSearch {
    /// Creates a local search with the full portfolio and a mask of the
    /// given granularity.
    pub fn new(instance: &Instance, granularity: usize) -> Self {
        Self::with_mask(ArcMask::granular(instance.arcs(), granularity))
    }

    /// Creates a local search over a pre-built mask.
    pub fn with_mask(mask: ArcMask) -> Self {
        Self {
            mask,
            operators: Operator::ALL.to_vec(),
        }
    }

    /// Restricts the portfolio to `operators`.
    pub fn with_operators(mut self, operators: &[Operator]) -> Self {
        self.operators = operators.to_vec();
        self
    }

    /// The candidate mask.
    pub fn mask(&self) -> &ArcMask {
        &self.mask
    }

    /// Operators in evaluation order.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Applies the best improving move until none is left.
    ///
    /// The returned solution never costs more than the input, has no more
    /// infeasible routes than the input and carries no empty route.
    pub fn improve<E: VehicleEvaluator + ?Sized>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &Solution,
    ) -> Solution {
        let mut current = solution.clone();
        current.purge_empty_routes();
        let start_cost = current.cost();
        let mut moves_applied = 0usize;

        while let Some(mv) = self.best_move(ctx, &current) {
            debug!(operator = mv.operator.name(), delta = mv.delta, "apply move");
            apply(ctx, &mut current, mv);
            current.purge_empty_routes();
            moves_applied += 1;
        }

        debug!(
            moves_applied,
            start_cost,
            end_cost = current.cost(),
            "local search converged"
        );
        current
    }

    fn best_move<E: VehicleEvaluator + ?Sized>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &Solution,
    ) -> Option<PricedMove> {
        let n = ctx.instance().vertices().len();
        // (route, position) of every customer
        let mut position = vec![None; n];
        for (r, route) in solution.routes().iter().enumerate() {
            for (p, &c) in route.vertices().iter().enumerate() {
                if c != 0 && c < n {
                    position[c] = Some((r, p));
                }
            }
        }

        let mut best: Option<PricedMove> = None;
        for u in 1..n {
            let Some((ru, pu)) = position[u] else {
                continue;
            };
            let targets = self.mask.neighbors(u).iter().filter_map(|&v| position[v]);
            let depot_targets = solution
                .routes()
                .iter()
                .enumerate()
                .filter(|_| self.mask.is_allowed(u, 0))
                .map(|(r, route)| (r, route.len() - 1));

            for (rv, pv) in targets.chain(depot_targets) {
                for &op in &self.operators {
                    let a = solution.route(ru).vertices();
                    let b = (rv != ru).then(|| solution.route(rv).vertices());
                    let Some(rewritten) = rewrite(op, a, pu, b, pv) else {
                        continue;
                    };
                    if let Some(mv) = price(ctx, solution, op, ru, rv, rewritten) {
                        if best.as_ref().is_none_or(|b| mv.delta < b.delta) {
                            best = Some(mv);
                        }
                    }
                }
            }
        }
        best
    }
}

/// Prices a rewrite; `None` unless it improves by more than epsilon and
/// leaves no more infeasible routes than before.
fn price<E: VehicleEvaluator + ?Sized>(
    ctx: &RoutingContext<'_, E>,
    solution: &Solution,
    operator: Operator,
    ru: usize,
    rv: usize,
    rewritten: Rewrite,
) -> Option<PricedMove> {
    let routes = match rewritten {
        Rewrite::Single(seq) => {
            let cost = ctx.sequence_cost(&seq);
            vec![(ru, seq, cost)]
        }
        Rewrite::Pair(seq_a, seq_b) => {
            let cost_a = ctx.sequence_cost(&seq_a);
            let cost_b = ctx.sequence_cost(&seq_b);
            vec![(ru, seq_a, cost_a), (rv, seq_b, cost_b)]
        }
    };
    let infeasible_before = routes
        .iter()
        .filter(|(r, _, _)| !solution.route_cost(*r).feasible)
        .count();
    let infeasible_after = routes.iter().filter(|(_, _, c)| !c.feasible).count();
    if infeasible_after > infeasible_before {
        return None;
    }
    let old: f64 = routes.iter().map(|(r, _, _)| solution.route_cost(*r).cost).sum();
    let new: f64 = routes.iter().map(|(_, _, c)| c.cost).sum();
    if new < old - EPSILON {
        Some(PricedMove {
            operator,
            routes,
            delta: new - old,
        })
    } else {
        None
    }
}

fn apply<E: VehicleEvaluator + ?Sized>(
    ctx: &RoutingContext<'_, E>,
    solution: &mut Solution,
    mv: PricedMove,
) {
    let mut routes = mv.routes.into_iter();
    match (routes.next(), routes.next()) {
        (Some((a, seq_a, cost_a)), Some((b, seq_b, cost_b))) => solution.replace_pair(
            ctx,
            (a, Route::from_vertices(seq_a), cost_a),
            (b, Route::from_vertices(seq_b), cost_b),
        ),
        (Some((a, seq_a, _)), None) => solution.replace_route(ctx, a, Route::from_vertices(seq_a)),
        _ => {}
    }
}
