//! Per-route and per-solution cost breakdowns.

use serde::Serialize;
use tracing::warn;

use crate::models::{RouteProfile, Solution};

use super::{RoutingContext, VehicleEvaluator};

/// Cost and utilization breakdown of one route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Travel distance (km).
    pub distance: f64,
    /// Distance inside the toll zone (km).
    pub inside_distance_km: f64,
    /// Work time (s).
    pub duration_seconds: f64,
    /// Assigned vehicle type.
    pub vehicle_type: Option<usize>,
    /// Total route cost.
    pub cost: f64,
    /// Daily fixed cost of the vehicle.
    pub fixed_cost: f64,
    /// Acquisition cost spread over the amortization days.
    pub amortized_acquisition_cost: f64,
    /// Energy cost (fuel or electricity).
    pub fuel_cost: f64,
    /// Daily plus per-km maintenance.
    pub maintenance_cost: f64,
    /// Driver wage prorated by work time.
    pub wage_cost: f64,
    /// Toll for the inside-zone distance.
    pub toll_cost: f64,
    /// Refund on energy and maintenance for green vehicles.
    pub green_discount: f64,
    /// Weight delivered.
    pub load_weight: f64,
    /// Volume delivered.
    pub load_volume: f64,
    /// Weight capacity of the assigned vehicle.
    pub capacity_weight: f64,
    /// Volume capacity of the assigned vehicle.
    pub capacity_volume: f64,
    /// Customers visited.
    pub num_customers: usize,
    /// Whether the assigned vehicle satisfies every constraint.
    pub feasible: bool,
}

impl RouteSummary {
    /// Share of the weight capacity in use, zero without a vehicle.
    pub fn weight_utilization(&self) -> f64 {
        if self.capacity_weight > 0.0 {
            self.load_weight / self.capacity_weight
        } else {
            0.0
        }
    }

    /// Share of the volume capacity in use, zero without a vehicle.
    pub fn volume_utilization(&self) -> f64 {
        if self.capacity_volume > 0.0 {
            self.load_volume / self.capacity_volume
        } else {
            0.0
        }
    }
}

/// Column sums over the routes of a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RouteTotals {
    /// Customers served.
    pub num_customers: usize,
    /// Travel distance (km).
    pub distance: f64,
    /// Distance inside the toll zone (km).
    pub inside_distance_km: f64,
    /// Work time (s).
    pub duration_seconds: f64,
    /// Total cost.
    pub cost: f64,
    /// Daily fixed costs.
    pub fixed_cost: f64,
    /// Amortized acquisition costs.
    pub amortized_acquisition_cost: f64,
    /// Energy costs.
    pub fuel_cost: f64,
    /// Maintenance costs.
    pub maintenance_cost: f64,
    /// Wages.
    pub wage_cost: f64,
    /// Tolls.
    pub toll_cost: f64,
    /// Green-fleet refunds.
    pub green_discount: f64,
}

impl RouteTotals {
    fn add(mut self, r: &RouteSummary) -> Self {
        self.num_customers += r.num_customers;
        self.distance += r.distance;
        self.inside_distance_km += r.inside_distance_km;
        self.duration_seconds += r.duration_seconds;
        self.cost += r.cost;
        self.fixed_cost += r.fixed_cost;
        self.amortized_acquisition_cost += r.amortized_acquisition_cost;
        self.fuel_cost += r.fuel_cost;
        self.maintenance_cost += r.maintenance_cost;
        self.wage_cost += r.wage_cost;
        self.toll_cost += r.toll_cost;
        self.green_discount += r.green_discount;
        self
    }
}

/// Aggregated report of a solution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolutionSummary {
    /// One entry per route, in solution order.
    pub routes: Vec<RouteSummary>,
    /// Sum of route cost components and resources.
    pub totals: RouteTotals,
    /// Mean weight utilization over routes, zero without routes.
    pub avg_weight_utilization: f64,
    /// Mean volume utilization over routes, zero without routes.
    pub avg_volume_utilization: f64,
    /// Number of routes using each vehicle type.
    pub vehicles_per_type: Vec<usize>,
    /// Resale value of owned vehicles the solution leaves unused.
    pub resale_value: f64,
    /// Revenue per served customer times customers served.
    pub revenue: f64,
    /// Whether every route is feasible and every customer served once.
    pub feasible: bool,
}

impl SolutionSummary {
    /// Builds the report for a solution.
    ///
    /// Routes with a missing arc are logged and get a default summary with
    /// infinite cost.
    pub fn new<E: VehicleEvaluator + ?Sized>(
        ctx: &RoutingContext<'_, E>,
        solution: &Solution,
    ) -> Self {
        let evaluator = ctx.evaluator();
        let routes: Vec<RouteSummary> = solution
            .routes()
            .iter()
            .enumerate()
            .map(|(k, r)| match RouteProfile::try_of(ctx.instance(), r.vertices()) {
                Ok(profile) => evaluator.summarize_route(&profile),
                Err(err) => {
                    warn!(route = k, %err, "route cannot be summarized");
                    RouteSummary {
                        cost: f64::INFINITY,
                        num_customers: r.num_customers(),
                        ..RouteSummary::default()
                    }
                }
            })
            .collect();

        let mut vehicles_per_type = vec![0; evaluator.num_vehicle_types()];
        let used: Vec<usize> = routes.iter().filter_map(|r| r.vehicle_type).collect();
        for &t in &used {
            vehicles_per_type[t] += 1;
        }

        let totals = routes.iter().fold(RouteTotals::default(), RouteTotals::add);
        let (avg_weight_utilization, avg_volume_utilization) = if routes.is_empty() {
            (0.0, 0.0)
        } else {
            let n = routes.len() as f64;
            let (w, v) = routes.iter().fold((0.0, 0.0), |(w, v), r| {
                (w + r.weight_utilization(), v + r.volume_utilization())
            });
            (w / n, v / n)
        };

        Self {
            totals,
            avg_weight_utilization,
            avg_volume_utilization,
            vehicles_per_type,
            resale_value: evaluator.resale_value_for_unused_vehicles(&used),
            revenue: evaluator.revenue_per_customer() * solution.num_served() as f64,
            feasible: solution.is_feasible(),
            routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ArcMatrix;
    use crate::evaluation::HfvrpEvaluator;
    use crate::models::{CityParams, FleetSpec, Instance, Route, Vertex, VehicleType};

    #[test]
    fn test_summary_totals() {
        let vertices = vec![
            Vertex::depot(0.0, 0.0),
            Vertex::customer(1, 3.0, 4.0, 10.0, 1.0, 0.0),
            Vertex::customer(2, -3.0, -4.0, 60.0, 1.0, 0.0),
        ];
        let arcs = ArcMatrix::euclidean(&vertices, 50.0);
        let instance = Instance::new(vertices, arcs).expect("valid");
        let fleet = FleetSpec::new(vec![
            VehicleType::new("small", 20.0, 5.0),
            VehicleType::new("large", 100.0, 5.0).with_acquisition_cost(2000.0),
        ])
        .with_owned(0, 2, 100.0);
        let city = CityParams {
            utility_other: 1.0,
            revenue: 5.0,
            ..CityParams::default()
        };
        let evaluator = HfvrpEvaluator::new(fleet, city);
        let ctx = RoutingContext::new(&instance, &evaluator);
        let sol = Solution::from_routes(
            &ctx,
            vec![Route::from_customers(&[1]), Route::from_customers(&[2])],
        );

        let summary = SolutionSummary::new(&ctx, &sol);
        assert_eq!(summary.routes.len(), 2);
        assert_eq!(summary.vehicles_per_type, vec![1, 1]);
        assert!((summary.totals.distance - 20.0).abs() < 1e-9);
        assert!((summary.totals.cost - sol.cost()).abs() < 1e-9);
        assert_eq!(summary.totals.num_customers, 2);
        assert!((summary.totals.fixed_cost - 2.0).abs() < 1e-9);
        // 10/20 on the small van, 60/100 on the large one
        assert!((summary.avg_weight_utilization - 0.55).abs() < 1e-9);
        assert!((summary.resale_value - 100.0).abs() < 1e-9);
        assert!((summary.revenue - 10.0).abs() < 1e-9);
        assert!(summary.feasible);
        assert!((summary.routes[0].weight_utilization() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_arc_route_is_unusable() {
        let vertices = vec![
            Vertex::depot(0.0, 0.0),
            Vertex::customer(1, 3.0, 4.0, 10.0, 1.0, 0.0),
            Vertex::customer(2, 6.0, 8.0, 10.0, 1.0, 0.0),
        ];
        let mut arcs = ArcMatrix::euclidean(&vertices, 50.0);
        arcs.remove(1, 2);
        let instance = Instance::new(vertices, arcs).expect("valid");
        let fleet = FleetSpec::new(vec![VehicleType::new("van", 100.0, 5.0)]);
        let evaluator = HfvrpEvaluator::new(fleet, CityParams::default());
        let ctx = RoutingContext::new(&instance, &evaluator);
        let sol = Solution::from_routes(&ctx, vec![Route::from_customers(&[1, 2])]);

        let summary = SolutionSummary::new(&ctx, &sol);
        assert!(summary.routes[0].cost.is_infinite());
        assert_eq!(summary.routes[0].num_customers, 2);
        assert_eq!(summary.routes[0].vehicle_type, None);
        assert!(!summary.feasible);
    }
}
