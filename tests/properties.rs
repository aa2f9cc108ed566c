//! Property tests for partition, monotonicity, purge and determinism,
//! run against a simple fake evaluator.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_fleet::config::SolverConfig;
use u_fleet::constructive::{savings, SavingsConfig};
use u_fleet::distance::ArcMatrix;
use u_fleet::evaluation::{RouteCost, RouteSummary, RoutingContext, VehicleEvaluator};
use u_fleet::lns::{Ils, IlsConfig, Lns, LnsConfig};
use u_fleet::local_search::LocalSearch;
use u_fleet::models::{Instance, RouteProfile, Solution, Vertex};
use u_fleet::solver::solve;
use u_fleet::{Result, RoutingError};

/// Two vehicle types: a small cheap one and a large one with a higher
/// fixed cost. Cost = fixed + distance × rate.
struct FakeEvaluator {
    capacities: [f64; 2],
    fixed: [f64; 2],
    rate: [f64; 2],
}

impl FakeEvaluator {
    fn new() -> Self {
        Self {
            capacities: [30.0, 60.0],
            fixed: [10.0, 25.0],
            rate: [1.0, 1.3],
        }
    }

    fn fits(&self, t: usize, weight: f64, work_time: f64) -> bool {
        weight <= self.capacities[t] && work_time <= self.work_time_budget()
    }
}

impl VehicleEvaluator for FakeEvaluator {
    fn num_vehicle_types(&self) -> usize {
        2
    }

    fn choose_vehicle(
        &self,
        distance: f64,
        _inside_distance: f64,
        weight: f64,
        volume: f64,
        work_time: f64,
    ) -> Result<usize> {
        (0..2)
            .filter(|&t| self.fits(t, weight, work_time))
            .min_by(|&a, &b| {
                let ca = self.fixed[a] + distance * self.rate[a];
                let cb = self.fixed[b] + distance * self.rate[b];
                ca.total_cmp(&cb)
            })
            .ok_or(RoutingError::NoFeasibleVehicle {
                distance,
                weight,
                volume,
                work_time,
            })
    }

    fn capacity_weight(&self, vehicle_type: usize) -> f64 {
        self.capacities[vehicle_type]
    }

    fn capacity_volume(&self, _vehicle_type: usize) -> f64 {
        f64::INFINITY
    }

    fn hours_per_day(&self) -> f64 {
        8.0
    }

    fn route_cost(&self, profile: &RouteProfile) -> RouteCost {
        match self.choose_vehicle(
            profile.distance,
            profile.inside_distance,
            profile.weight,
            profile.volume,
            profile.duration,
        ) {
            Ok(t) => RouteCost {
                vehicle_type: Some(t),
                cost: self.fixed[t] + profile.distance * self.rate[t],
                feasible: true,
            },
            Err(_) => RouteCost {
                vehicle_type: Some(1),
                cost: self.fixed[1] + profile.distance * self.rate[1] + 1000.0 * profile.weight,
                feasible: false,
            },
        }
    }

    fn summarize_route(&self, profile: &RouteProfile) -> RouteSummary {
        let priced = self.route_cost(profile);
        RouteSummary {
            distance: profile.distance,
            vehicle_type: priced.vehicle_type,
            cost: priced.cost,
            load_weight: profile.weight,
            num_customers: profile.stops,
            feasible: priced.feasible,
            ..RouteSummary::default()
        }
    }

    fn resale_value_for_unused_vehicles(&self, _used_vehicle_types: &[usize]) -> f64 {
        0.0
    }
}

fn build_instance(points: &[(f64, f64, f64)]) -> Instance {
    let mut vertices = vec![Vertex::depot(0.0, 0.0)];
    for (k, &(x, y, w)) in points.iter().enumerate() {
        vertices.push(Vertex::customer(k + 1, x, y, w, 0.0, 60.0));
    }
    let arcs = ArcMatrix::euclidean(&vertices, 40.0);
    Instance::new(vertices, arcs).expect("valid instance")
}

fn points() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((-20.0..20.0f64, -20.0..20.0f64, 1.0..25.0f64), 3..14)
}

fn assert_partition(solution: &Solution, n: usize) {
    let mut seen = vec![0usize; n + 1];
    for route in solution.routes() {
        assert!(!route.is_empty(), "empty route survived");
        for &c in route.customers() {
            seen[c] += 1;
        }
    }
    for (c, &count) in seen.iter().enumerate().skip(1) {
        assert_eq!(count, 1, "customer {c} appears {count} times");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn savings_partitions_customers(pts in points()) {
        let inst = build_instance(&pts);
        let eval = FakeEvaluator::new();
        let ctx = RoutingContext::new(&inst, &eval);
        let built = savings(&ctx, &SavingsConfig::default());
        assert_partition(&built, pts.len());
        for (k, route) in built.routes().iter().enumerate() {
            let weight: f64 = route
                .customers()
                .iter()
                .map(|&c| inst.vertex(c).demand_weight())
                .sum();
            let t = built.route_cost(k).vehicle_type.expect("priced");
            prop_assert!(weight <= eval.capacity_weight(t) + 1e-9);
        }
    }

    #[test]
    fn lns_is_monotone_and_partitions(pts in points(), seed in 0u64..1000) {
        let inst = build_instance(&pts);
        let eval = FakeEvaluator::new();
        let ctx = RoutingContext::new(&inst, &eval);
        let built = savings(&ctx, &SavingsConfig::default());
        let config = LnsConfig::default()
            .with_iterations(15)
            .with_remove_fraction(0.3)
            .with_destroy_weights([1.0, 1.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(seed);
        let out = Lns::new(config).run(&ctx, &built, &mut rng);
        prop_assert!(out.cost() <= built.cost() + 1e-9);
        prop_assert!(out.is_feasible() || !built.is_feasible());
        assert_partition(&out, pts.len());
    }

    #[test]
    fn ils_is_monotone_and_partitions(pts in points(), seed in 0u64..1000) {
        let inst = build_instance(&pts);
        let eval = FakeEvaluator::new();
        let ctx = RoutingContext::new(&inst, &eval);
        let built = savings(&ctx, &SavingsConfig::default());
        let ls = LocalSearch::new(&inst, 5);
        let descended = ls.improve(&ctx, &built);
        let mut rng = StdRng::seed_from_u64(seed);
        let ils = Ils::new(IlsConfig::default().with_max_iterations(5));
        let out = ils.run(&ctx, &ls, &built, &mut rng);
        prop_assert!(descended.cost() <= built.cost() + 1e-9);
        prop_assert!(out.cost() <= descended.cost() + 1e-9);
        prop_assert!(out.is_feasible() || !built.is_feasible());
        assert_partition(&out, pts.len());
    }

    #[test]
    fn pipeline_is_deterministic(pts in points(), seed in 0u64..1000) {
        let inst = build_instance(&pts);
        let eval = FakeEvaluator::new();
        let config = SolverConfig::default()
            .with_lns(
                LnsConfig::default()
                    .with_iterations(10)
                    .with_destroy_weights([1.0, 1.0, 1.0]),
            )
            .with_ils(IlsConfig::default().with_max_iterations(3))
            .with_granularity(5)
            .with_seed(seed);
        let a = solve(&inst, &eval, &config).expect("valid config");
        let b = solve(&inst, &eval, &config).expect("valid config");
        prop_assert_eq!(a.solution.routes(), b.solution.routes());
        prop_assert_eq!(a.savings_cost.to_bits(), b.savings_cost.to_bits());
        prop_assert_eq!(a.lns_cost.to_bits(), b.lns_cost.to_bits());
        prop_assert_eq!(a.ils_cost.to_bits(), b.ils_cost.to_bits());
        assert_partition(&a.solution, pts.len());
    }
}
