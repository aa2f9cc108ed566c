//! Repair operators for LNS-based HFVRP optimization.
//!
//! # Operators
//!
//! - [`BestInsertion`]: Greedy cheapest feasible insertion

use rand::Rng;
use tracing::debug;

use crate::evaluation::{RoutingContext, VehicleEvaluator};
use crate::models::{Route, RouteProfile, Solution};

use super::RepairOperator;

/// Where a customer goes next.
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// Insert after position `pos` of route `route`.
    Existing { route: usize, pos: usize },
    /// Open a new route.
    NewRoute,
}

/// Inserts customers by globally cheapest feasible insertion.
///
/// Each step evaluates every (customer, route, position) triple and commits
/// the one with the lowest route-cost increase among insertions that keep
/// the route feasible. A customer without any feasible insertion is priced
/// as a new single-customer route. Ties keep the first customer in input
/// order, then the lowest route and position.
///
/// # Examples
///
/// ```
/// use u_fleet::distance::ArcMatrix;
/// use u_fleet::evaluation::{HfvrpEvaluator, RoutingContext};
/// use u_fleet::lns::BestInsertion;
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
/// let fleet = FleetSpec::new(vec![VehicleType::new("van", 100.0, 10.0)]);
/// let evaluator = HfvrpEvaluator::new(fleet, CityParams::default());
/// let ctx = RoutingContext::new(&instance, &evaluator);
///
/// let mut solution = Solution::from_routes(&ctx, vec![Route::from_customers(&[1, 3])]);
/// BestInsertion.insert(&ctx, &mut solution, &[2]);
/// assert_eq!(solution.num_routes(), 1);
/// assert_eq!(solution.num_served(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BestInsertion;

impl BestInsertion {
    /// Inserts every customer of `customers`; deterministic.
    pub fn insert<E: VehicleEvaluator + ?Sized>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &mut Solution,
        customers: &[usize],
    ) {
        let instance = ctx.instance();
        let evaluator = ctx.evaluator();
        let mut pending: Vec<usize> = customers.to_vec();
        let mut profiles: Vec<Option<RouteProfile>> =
            solution.routes().iter().map(|r| ctx.profile(r)).collect();

        while !pending.is_empty() {
            let mut best: Option<(usize, Placement, f64)> = None;

            for (k, &customer) in pending.iter().enumerate() {
                let mut own: Option<(Placement, f64)> = None;
                for (r, route) in solution.routes().iter().enumerate() {
                    let Some(profile) = profiles[r] else {
                        continue;
                    };
                    let current = solution.route_cost(r).cost;
                    let seq = route.vertices();
                    for pos in 0..seq.len() - 1 {
                        let Some(after) =
                            profile.with_insertion(instance, seq[pos], customer, seq[pos + 1])
                        else {
                            continue;
                        };
                        let priced = evaluator.route_cost(&after);
                        if !priced.feasible {
                            continue;
                        }
                        let delta = priced.cost - current;
                        if own.is_none_or(|(_, d)| delta < d) {
                            own = Some((Placement::Existing { route: r, pos }, delta));
                        }
                    }
                }
                let (placement, delta) = match own {
                    Some(found) => found,
                    None => (Placement::NewRoute, ctx.sequence_cost(&[0, customer, 0]).cost),
                };
                if best.is_none_or(|(_, _, d)| delta < d) {
                    best = Some((k, placement, delta));
                }
            }

            let Some((k, placement, delta)) = best else {
                break;
            };
            let customer = pending.remove(k);
            debug!(customer, ?placement, delta, "insert");
            match placement {
                Placement::Existing { route, pos } => {
                    let mut updated = solution.route(route).clone();
                    updated.insert_after(pos, &[customer]);
                    profiles[route] = ctx.profile(&updated);
                    solution.replace_route(ctx, route, updated);
                }
                Placement::NewRoute => {
                    let route = Route::from_customers(&[customer]);
                    profiles.push(ctx.profile(&route));
                    solution.add_route(ctx, route);
                }
            }
        }
    }
}

impl RepairOperator for BestInsertion {
    fn name(&self) -> &str {
        "best_insertion"
    }

    fn repair<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &mut Solution,
        customers: &[usize],
        _rng: &mut R,
    ) where
        E: VehicleEvaluator + ?Sized,
        R: Rng,
    {
        self.insert(ctx, solution, customers);
    }
}
