//! The savings → LNS → ILS pipeline.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::SolverConfig;
use crate::constructive::savings;
use crate::error::Result;
use crate::evaluation::{RoutingContext, SolutionSummary, VehicleEvaluator};
use crate::lns::{Ils, Lns};
use crate::local_search::LocalSearch;
use crate::models::{Instance, Solution};

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// Cost after savings construction.
    pub savings_cost: f64,
    /// Cost after LNS.
    pub lns_cost: f64,
    /// Cost after ILS.
    pub ils_cost: f64,
    /// Final routes.
    #[serde(skip)]
    pub solution: Solution,
    /// Cost and utilization report of the final routes.
    pub summary: SolutionSummary,
}

/// Runs savings, then LNS, then ILS with one generator seeded from
/// `config.seed`.
///
/// Identical inputs give identical routes and costs. Fails only when the
/// configuration is invalid.
///
/// # Examples
///
/// ```
/// use u_fleet::config::SolverConfig;
/// use u_fleet::distance::ArcMatrix;
/// use u_fleet::evaluation::HfvrpEvaluator;
/// use u_fleet::lns::{IlsConfig, LnsConfig};
/// use u_fleet::models::{CityParams, FleetSpec, Instance, Vertex, VehicleType};
/// use u_fleet::solver::solve;
///
/// let mut vertices = vec![Vertex::depot(0.0, 0.0)];
/// for i in 1..=6 {
///     vertices.push(Vertex::customer(i, i as f64, (i % 3) as f64, 10.0, 1.0, 120.0));
/// }
/// let arcs = ArcMatrix::euclidean(&vertices, 50.0);
/// let instance = Instance::new(vertices, arcs).unwrap();
/// let fleet = FleetSpec::new(vec![
///     VehicleType::new("small", 30.0, 10.0).with_consumption(0.8),
///     VehicleType::new("large", 60.0, 20.0).with_consumption(1.2),
/// ]);
/// let city = CityParams { price_diesel: 1.5, utility_other: 25.0, ..CityParams::default() };
/// let evaluator = HfvrpEvaluator::new(fleet, city);
///
/// let config = SolverConfig::default()
///     .with_lns(LnsConfig::default().with_iterations(20))
///     .with_ils(IlsConfig::default().with_max_iterations(5));
/// let report = solve(&instance, &evaluator, &config).unwrap();
/// assert!(report.ils_cost <= report.lns_cost);
/// assert!(report.lns_cost <= report.savings_cost);
/// assert_eq!(report.solution.num_served(), 6);
/// ```
#[instrument(skip_all, fields(customers = instance.num_customers(), seed = config.seed))]
pub fn solve<E: VehicleEvaluator + ?Sized>(
    instance: &Instance,
    evaluator: &E,
    config: &SolverConfig,
) -> Result<SolveReport> {
    config.validate()?;
    let ctx = RoutingContext::new(instance, evaluator);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let initial = savings(&ctx, &config.savings);
    let savings_cost = initial.cost();

    let after_lns = Lns::new(config.lns.clone()).run(&ctx, &initial, &mut rng);
    let lns_cost = after_lns.cost();

    let local_search = LocalSearch::new(instance, config.granularity);
    let solution = Ils::new(config.ils.clone()).run(&ctx, &local_search, &after_lns, &mut rng);
    let ils_cost = solution.cost();

    let summary = SolutionSummary::new(&ctx, &solution);
    info!(
        savings_cost,
        lns_cost,
        ils_cost,
        routes = solution.num_routes(),
        feasible = solution.is_feasible(),
        "pipeline finished"
    );

    Ok(SolveReport {
        savings_cost,
        lns_cost,
        ils_cost,
        solution,
        summary,
    })
}
