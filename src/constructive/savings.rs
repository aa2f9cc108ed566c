//! Feasibility-gated Clarke-Wright savings.
//!
//! # Algorithm
//!
//! Every customer starts on its own route (depot → customer → depot). For
//! every ordered pair of customers the saving
//!
//! ```text
//! s(i, j) = c(i, 0) + c(0, j) - c(i, j)
//! ```
//!
//! is computed; pairs with `s(i, j) ≤ min_saving` are dropped and the rest
//! are processed in decreasing order (ties on `(i, j)` ascending). A pair
//! merges the route ending at `i` with the route starting at `j` when the
//! merged route fits the customer limit, its work time fits the working day
//! and the evaluator finds a vehicle for the merged load.
//!
//! Merged distance and duration are updated from the three changed arcs only:
//!
//! ```text
//! d(r_i ⊕ r_j) = d(r_i) - c(i, 0) - c(0, j) + c(i, j) + d(r_j)
//! ```
//!
//! The work time checked is the larger of the real duration (arc durations
//! plus customer service times) and the average-speed estimate.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of customers (dominated by sorting savings).
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, RoutingError};
use crate::evaluation::{RoutingContext, VehicleEvaluator};
use crate::models::{Route, Solution};

/// Parameters of the savings constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsConfig {
    /// Upper bound on customers per route; `None` for no bound.
    pub max_customers_per_route: Option<usize>,
    /// Pairs with a saving at or below this value are never merged.
    pub min_saving: f64,
    /// Ceiling on adjacency-valid merge attempts.
    pub max_merge_attempts: usize,
    /// Speed used to turn the estimated distance into travel time.
    pub average_speed_kmh: f64,
    /// Service time charged per stop in the work-time estimate.
    pub stop_service_seconds: f64,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            max_customers_per_route: None,
            min_saving: 0.0,
            max_merge_attempts: 1_000_000,
            average_speed_kmh: 50.0,
            stop_service_seconds: 300.0,
        }
    }
}

impl SavingsConfig {
    /// Sets the per-route customer limit.
    pub fn with_max_customers_per_route(mut self, limit: usize) -> Self {
        self.max_customers_per_route = Some(limit);
        self
    }

    /// Sets the minimum saving.
    pub fn with_min_saving(mut self, min_saving: f64) -> Self {
        self.min_saving = min_saving;
        self
    }

    /// Sets the merge-attempt ceiling.
    pub fn with_max_merge_attempts(mut self, attempts: usize) -> Self {
        self.max_merge_attempts = attempts;
        self
    }

    /// Sets the average speed.
    pub fn with_average_speed(mut self, kmh: f64) -> Self {
        self.average_speed_kmh = kmh;
        self
    }

    /// Sets the per-stop service time.
    pub fn with_stop_service_seconds(mut self, seconds: f64) -> Self {
        self.stop_service_seconds = seconds;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.average_speed_kmh > 0.0 && self.average_speed_kmh.is_finite()) {
            return Err(RoutingError::InvalidConfig(format!(
                "average speed must be positive, got {}",
                self.average_speed_kmh
            )));
        }
        if self.stop_service_seconds < 0.0 {
            return Err(RoutingError::InvalidConfig(
                "stop service time cannot be negative".into(),
            ));
        }
        if self.max_customers_per_route == Some(0) {
            return Err(RoutingError::InvalidConfig(
                "a route must be allowed at least one customer".into(),
            ));
        }
        Ok(())
    }

    fn work_time(&self, distance: f64, stops: usize) -> f64 {
        distance / self.average_speed_kmh * 3600.0 + stops as f64 * self.stop_service_seconds
    }
}

/// A savings value for linking the tail `i` to the head `j`.
#[derive(Debug)]
struct Saving {
    i: usize,
    j: usize,
    value: f64,
}

/// A route slot of the merge arena; retired slots stay empty.
#[derive(Debug, Clone)]
struct Slot {
    customers: Vec<usize>,
    weight: f64,
    volume: f64,
    distance: f64,
    inside_distance: f64,
    /// Arc durations plus service times (s).
    duration: f64,
}

/// Builds a solution with the parallel savings heuristic.
///
/// Every accepted merge is feasible for the vehicle type the evaluator
/// picks for it. Merges that fail a check are skipped; a missing arc only
/// discards the pairs that need it.
///
/// # Examples
///
/// ```
/// use u_fleet::constructive::{savings, SavingsConfig};
/// use u_fleet::distance::ArcMatrix;
/// use u_fleet::evaluation::{HfvrpEvaluator, RoutingContext};
/// use u_fleet::models::{CityParams, FleetSpec, Instance, Vertex, VehicleType};
///
/// let vertices = vec![
///     Vertex::depot(0.0, 0.0),
///     Vertex::customer(1, 1.0, 0.0, 10.0, 1.0, 0.0),
///     Vertex::customer(2, 2.0, 0.0, 10.0, 1.0, 0.0),
///     Vertex::customer(3, 3.0, 0.0, 10.0, 1.0, 0.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&vertices, 50.0);
/// let instance = Instance::new(vertices, arcs).unwrap();
/// let fleet = FleetSpec::new(vec![VehicleType::new("van", 30.0, 10.0)]);
/// let evaluator = HfvrpEvaluator::new(fleet, CityParams::default());
/// let ctx = RoutingContext::new(&instance, &evaluator);
///
/// let solution = savings(&ctx, &SavingsConfig::default());
/// assert_eq!(solution.num_routes(), 1);
/// assert_eq!(solution.num_served(), 3);
/// ```
pub fn savings<E: VehicleEvaluator + ?Sized>(
    ctx: &RoutingContext<'_, E>,
    config: &SavingsConfig,
) -> Solution {
    let instance = ctx.instance();
    let evaluator = ctx.evaluator();
    let arcs = instance.arcs();
    let n = instance.vertices().len();
    let budget = evaluator.work_time_budget();

    // slot 0 is unused so that slot ids equal the seeding customer ids
    let mut slots: Vec<Slot> = Vec::with_capacity(n);
    slots.push(Slot {
        customers: Vec::new(),
        weight: 0.0,
        volume: 0.0,
        distance: 0.0,
        inside_distance: 0.0,
        duration: 0.0,
    });
    let mut route_of: Vec<usize> = (0..n).collect();
    for c in 1..n {
        let vertex = instance.vertex(c);
        let (out, back) = (arcs.get(0, c), arcs.get(c, 0));
        let (distance, inside_distance, duration) = match (out, back) {
            (Some(a), Some(b)) => (
                a.distance + b.distance,
                a.inside_distance + b.inside_distance,
                a.duration + b.duration + vertex.service_time(),
            ),
            _ => (f64::INFINITY, f64::INFINITY, f64::INFINITY),
        };
        slots.push(Slot {
            customers: vec![c],
            weight: vertex.demand_weight(),
            volume: vertex.demand_volume(),
            distance,
            inside_distance,
            duration,
        });
    }

    let mut list = Vec::with_capacity((n - 1) * (n - 2));
    for i in 1..n {
        for j in 1..n {
            if i == j {
                continue;
            }
            let value = instance.cost(i, 0) + instance.cost(0, j) - instance.cost(i, j);
            // NaN and infinities come from missing arcs
            if value.is_finite() && value > config.min_saving {
                list.push(Saving { i, j, value });
            }
        }
    }
    list.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| (a.i, a.j).cmp(&(b.i, b.j)))
    });

    let mut attempts = 0usize;
    let mut merges = 0usize;
    for saving in &list {
        let (i, j) = (saving.i, saving.j);
        let (ri, rj) = (route_of[i], route_of[j]);
        if ri == rj
            || slots[ri].customers.last() != Some(&i)
            || slots[rj].customers.first() != Some(&j)
        {
            continue;
        }

        attempts += 1;
        if attempts > config.max_merge_attempts {
            warn!(
                max_merge_attempts = config.max_merge_attempts,
                merges, "merge attempt ceiling reached, stopping construction early"
            );
            break;
        }

        let stops = slots[ri].customers.len() + slots[rj].customers.len();
        if config.max_customers_per_route.is_some_and(|max| stops > max) {
            continue;
        }

        let (Some(i0), Some(oj), Some(ij)) = (arcs.get(i, 0), arcs.get(0, j), arcs.get(i, j))
        else {
            continue;
        };
        let (a, b) = (&slots[ri], &slots[rj]);
        let distance = a.distance - i0.distance - oj.distance + ij.distance + b.distance;
        let duration = a.duration - i0.duration - oj.duration + ij.duration + b.duration;
        if !distance.is_finite() || !duration.is_finite() {
            continue;
        }
        let inside_distance =
            a.inside_distance - i0.inside_distance - oj.inside_distance
                + ij.inside_distance
                + b.inside_distance;
        let weight = a.weight + b.weight;
        let volume = a.volume + b.volume;
        let work_time = config.work_time(distance, stops).max(duration);
        if work_time > budget {
            debug!(i, j, work_time, budget, "merge exceeds the working day");
            continue;
        }

        let chosen =
            evaluator.choose_vehicle(distance, inside_distance, weight, volume, work_time);
        let vehicle = match chosen {
            Ok(t) => t,
            Err(err) => {
                debug!(i, j, %err, "merge rejected");
                continue;
            }
        };
        debug_assert!(
            weight <= evaluator.capacity_weight(vehicle)
                && volume <= evaluator.capacity_volume(vehicle)
        );

        let tail = std::mem::take(&mut slots[rj].customers);
        for &c in &tail {
            route_of[c] = ri;
        }
        let merged = &mut slots[ri];
        merged.customers.extend(tail);
        merged.weight = weight;
        merged.volume = volume;
        merged.distance = distance;
        merged.inside_distance = inside_distance;
        merged.duration = duration;
        merges += 1;
    }

    let routes: Vec<Route> = slots
        .iter()
        .filter(|s| !s.customers.is_empty())
        .map(|s| Route::from_customers(&s.customers))
        .collect();
    let solution = Solution::from_routes(ctx, routes);
    info!(
        candidates = list.len(),
        merges,
        routes = solution.num_routes(),
        cost = solution.cost(),
        "savings construction finished"
    );
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ArcMatrix;
    use crate::evaluation::HfvrpEvaluator;
    use crate::models::{CityParams, FleetSpec, Instance, Vertex, VehicleType};

    fn instance(customers: &[(f64, f64, f64)]) -> Instance {
        let mut vertices = vec![Vertex::depot(0.0, 0.0)];
        for (k, &(x, y, w)) in customers.iter().enumerate() {
            vertices.push(Vertex::customer(k + 1, x, y, w, 1.0, 0.0));
        }
        let arcs = ArcMatrix::euclidean(&vertices, 50.0);
        Instance::new(vertices, arcs).expect("valid")
    }

    fn evaluator(capacity: f64) -> HfvrpEvaluator {
        let fleet = FleetSpec::new(vec![VehicleType::new("van", capacity, 100.0)]);
        HfvrpEvaluator::new(fleet, CityParams::default())
    }

    #[test]
    fn test_line_merges_into_one_route() {
        let inst = instance(&[(1.0, 0.0, 10.0), (2.0, 0.0, 10.0), (3.0, 0.0, 10.0)]);
        let eval = evaluator(30.0);
        let ctx = RoutingContext::new(&inst, &eval);
        let sol = savings(&ctx, &SavingsConfig::default());
        assert_eq!(sol.num_routes(), 1);
        let profile = ctx.profile(sol.route(0)).expect("complete");
        assert!((profile.distance - 6.0).abs() < 1e-10);
        assert!(sol.is_feasible());
    }

    #[test]
    fn test_capacity_split() {
        let inst = instance(&[(1.0, 0.0, 15.0), (2.0, 0.0, 15.0), (3.0, 0.0, 15.0)]);
        let eval = evaluator(25.0);
        let ctx = RoutingContext::new(&inst, &eval);
        let sol = savings(&ctx, &SavingsConfig::default());
        assert_eq!(sol.num_routes(), 3);
        assert_eq!(sol.num_served(), 3);
        assert!(sol.is_feasible());
    }

    #[test]
    fn test_max_customers_per_route() {
        let inst = instance(&[
            (1.0, 0.0, 1.0),
            (2.0, 0.0, 1.0),
            (3.0, 0.0, 1.0),
            (4.0, 0.0, 1.0),
        ]);
        let eval = evaluator(100.0);
        let ctx = RoutingContext::new(&inst, &eval);
        let sol = savings(&ctx, &SavingsConfig::default().with_max_customers_per_route(2));
        assert_eq!(sol.num_routes(), 2);
        assert!(sol.routes().iter().all(|r| r.num_customers() <= 2));
    }

    #[test]
    fn test_min_saving_blocks_merges() {
        let inst = instance(&[(1.0, 0.0, 1.0), (2.0, 0.0, 1.0)]);
        let eval = evaluator(100.0);
        let ctx = RoutingContext::new(&inst, &eval);
        // the best saving is c(1,0) + c(0,2) - c(1,2) = 2
        let sol = savings(&ctx, &SavingsConfig::default().with_min_saving(2.0));
        assert_eq!(sol.num_routes(), 2);
    }

    #[test]
    fn test_work_time_gate() {
        let inst = instance(&[(100.0, 0.0, 1.0), (100.0, 10.0, 1.0)]);
        let eval = evaluator(100.0);
        let ctx = RoutingContext::new(&inst, &eval);
        // about 210 km at 25 km/h exceeds eight hours
        let config = SavingsConfig::default().with_average_speed(25.0);
        let sol = savings(&ctx, &config);
        assert_eq!(sol.num_routes(), 2);
        let sol = savings(&ctx, &SavingsConfig::default().with_average_speed(60.0));
        assert_eq!(sol.num_routes(), 1);
    }

    #[test]
    fn test_missing_arc_skips_pair_only() {
        let mut vertices = vec![Vertex::depot(0.0, 0.0)];
        for (k, x) in [1.0, 2.0, 3.0].into_iter().enumerate() {
            vertices.push(Vertex::customer(k + 1, x, 0.0, 1.0, 1.0, 0.0));
        }
        let mut arcs = ArcMatrix::euclidean(&vertices, 50.0);
        arcs.remove(1, 2);
        arcs.remove(2, 1);
        let inst = Instance::new(vertices, arcs).expect("valid");
        let eval = evaluator(100.0);
        let ctx = RoutingContext::new(&inst, &eval);
        let sol = savings(&ctx, &SavingsConfig::default());
        assert_eq!(sol.num_served(), 3);
        for route in sol.routes() {
            let c = route.vertices();
            assert!(c.windows(2).all(|w| !matches!((w[0], w[1]), (1, 2) | (2, 1))));
        }
        assert!(sol.num_routes() < 3);
    }

    #[test]
    fn test_merge_ceiling_stops_early() {
        let inst = instance(&[(1.0, 0.0, 1.0), (2.0, 0.0, 1.0), (3.0, 0.0, 1.0)]);
        let eval = evaluator(100.0);
        let ctx = RoutingContext::new(&inst, &eval);
        let sol = savings(&ctx, &SavingsConfig::default().with_max_merge_attempts(1));
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.num_served(), 3);
    }

    #[test]
    fn test_interior_tail_is_skipped() {
        // s(1,2) > s(1,3) > s(2,3); after [1, 2] forms, 1 is no longer a
        // tail, so (1, 3) is skipped and (3, 1) prepends 3
        let inst = instance(&[(10.0, 0.0, 1.0), (10.0, 1.0, 1.0), (10.0, -2.0, 1.0)]);
        let eval = evaluator(100.0);
        let ctx = RoutingContext::new(&inst, &eval);
        let sol = savings(&ctx, &SavingsConfig::default());
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.route(0).customers(), &[3, 1, 2]);

        // skipped pairs do not count as attempts
        let sol = savings(&ctx, &SavingsConfig::default().with_max_merge_attempts(2));
        assert_eq!(sol.route(0).customers(), &[3, 1, 2]);
    }

    #[test]
    fn test_service_time_limits_merges() {
        let mut vertices = vec![Vertex::depot(0.0, 0.0)];
        for k in 1..=10 {
            let a = k as f64 * 0.6;
            vertices.push(Vertex::customer(k, a.cos(), a.sin(), 1.0, 1.0, 3600.0));
        }
        let arcs = ArcMatrix::euclidean(&vertices, 50.0);
        let inst = Instance::new(vertices, arcs).expect("valid");
        let eval = evaluator(100.0);
        let ctx = RoutingContext::new(&inst, &eval);

        let sol = savings(&ctx, &SavingsConfig::default());
        let budget = eval.work_time_budget();
        assert!(sol.num_routes() >= 2);
        for route in sol.routes() {
            let profile = ctx.profile(route).expect("complete");
            assert!(profile.duration <= budget, "{} > {budget}", profile.duration);
        }
        assert!(sol.is_feasible());
        assert_eq!(sol.num_served(), 10);
    }

    #[test]
    fn test_validate() {
        assert!(SavingsConfig::default().validate().is_ok());
        assert!(SavingsConfig::default().with_average_speed(0.0).validate().is_err());
        assert!(SavingsConfig::default()
            .with_max_customers_per_route(0)
            .validate()
            .is_err());
    }
}
