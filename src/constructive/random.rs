//! Random construction for diversification and testing.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::evaluation::{RoutingContext, VehicleEvaluator};
use crate::models::{Route, Solution};

/// Shuffles the customers and cuts the sequence into routes whenever the
/// largest vehicle capacity (weight or volume) would be exceeded.
///
/// Routes are capacity-feasible for the largest type but may still violate
/// range or work-time limits; the evaluator prices such routes with a
/// penalty.
pub fn random_construction<E, R>(ctx: &RoutingContext<'_, E>, rng: &mut R) -> Solution
where
    E: VehicleEvaluator + ?Sized,
    R: Rng,
{
    let instance = ctx.instance();
    let evaluator = ctx.evaluator();
    let types = 0..evaluator.num_vehicle_types();
    let max_weight = types
        .clone()
        .map(|t| evaluator.capacity_weight(t))
        .fold(0.0, f64::max);
    let max_volume = types
        .map(|t| evaluator.capacity_volume(t))
        .fold(0.0, f64::max);

    let mut order: Vec<usize> = instance.customer_ids().collect();
    order.shuffle(rng);

    let mut routes = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let (mut weight, mut volume) = (0.0, 0.0);
    for c in order {
        let vertex = instance.vertex(c);
        let (w, v) = (vertex.demand_weight(), vertex.demand_volume());
        if !current.is_empty() && (weight + w > max_weight || volume + v > max_volume) {
            routes.push(Route::from_customers(&current));
            current.clear();
            weight = 0.0;
            volume = 0.0;
        }
        current.push(c);
        weight += w;
        volume += v;
    }
    if !current.is_empty() {
        routes.push(Route::from_customers(&current));
    }

    Solution::from_routes(ctx, routes)
}
