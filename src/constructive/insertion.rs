//! Sequential cheapest-insertion construction.
//!
//! Starts from an empty solution and lets [`BestInsertion`] route every
//! customer. Slower than savings but independent of the merge order, which
//! makes it a useful baseline for comparing construction quality.

use crate::evaluation::{RoutingContext, VehicleEvaluator};
use crate::lns::BestInsertion;
use crate::models::Solution;

/// Builds a solution by globally cheapest feasible insertion.
///
/// # Examples
///
/// ```
/// use u_fleet::constructive::sequential_best_insertion;
/// use u_fleet::distance::ArcMatrix;
/// use u_fleet::evaluation::{HfvrpEvaluator, RoutingContext};
/// use u_fleet::models::{CityParams, FleetSpec, Instance, Vertex, VehicleType};
///
/// let vertices = vec![
///     Vertex::depot(0.0, 0.0),
///     Vertex::customer(1, 1.0, 0.0, 10.0, 1.0, 0.0),
///     Vertex::customer(2, 2.0, 0.0, 10.0, 1.0, 0.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&vertices, 50.0);
/// let instance = Instance::new(vertices, arcs).unwrap();
/// let fleet = FleetSpec::new(vec![VehicleType::new("van", 30.0, 10.0)]);
/// let evaluator = HfvrpEvaluator::new(fleet, CityParams::default());
/// let ctx = RoutingContext::new(&instance, &evaluator);
///
/// let solution = sequential_best_insertion(&ctx);
/// assert_eq!(solution.num_served(), 2);
/// ```
pub fn sequential_best_insertion<E: VehicleEvaluator + ?Sized>(
    ctx: &RoutingContext<'_, E>,
) -> Solution {
    let customers: Vec<usize> = ctx.instance().customer_ids().collect();
    let mut solution = Solution::new();
    BestInsertion.insert(ctx, &mut solution, &customers);
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ArcMatrix;
    use crate::evaluation::HfvrpEvaluator;
    use crate::models::{CityParams, FleetSpec, Instance, Vertex, VehicleType};

    #[test]
    fn test_routes_all_within_capacity() {
        let mut vertices = vec![Vertex::depot(0.0, 0.0)];
        for i in 1..=6 {
            vertices.push(Vertex::customer(i, i as f64, 1.0, 10.0, 1.0, 0.0));
        }
        let arcs = ArcMatrix::euclidean(&vertices, 50.0);
        let inst = Instance::new(vertices, arcs).expect("valid");
        let fleet = FleetSpec::new(vec![VehicleType::new("van", 20.0, 10.0).with_consumption(1.0)]);
        let city = CityParams {
            price_diesel: 1.0,
            utility_other: 5.0,
            ..CityParams::default()
        };
        let eval = HfvrpEvaluator::new(fleet, city);
        let ctx = RoutingContext::new(&inst, &eval);

        let sol = sequential_best_insertion(&ctx);
        assert!(sol.missing_customers(6).is_empty());
        assert!(sol.is_feasible());
        assert_eq!(sol.num_routes(), 3);
    }
}
