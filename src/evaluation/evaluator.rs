//! Vehicle evaluator contract and the evaluation context.

use crate::error::Result;
use crate::models::{Instance, Route, RouteProfile};

use super::RouteSummary;

/// Cost of serving one route with its best vehicle type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteCost {
    /// Vehicle type assigned to the route; `None` for empty routes or when
    /// the fleet cannot be evaluated at all.
    pub vehicle_type: Option<usize>,
    /// Route cost; includes penalties when infeasible.
    pub cost: f64,
    /// Whether the assigned vehicle satisfies every constraint.
    pub feasible: bool,
}

impl RouteCost {
    /// Cost of a route without customers.
    pub fn empty() -> Self {
        Self {
            vehicle_type: None,
            cost: 0.0,
            feasible: true,
        }
    }

    /// Cost of a route that cannot be evaluated (missing arc, no fleet).
    pub fn unusable() -> Self {
        Self {
            vehicle_type: None,
            cost: f64::INFINITY,
            feasible: false,
        }
    }
}

/// Chooses vehicles and prices routes for a heterogeneous fleet.
///
/// The optimization core only talks to the fleet through this trait, so
/// tests can substitute a simple fake.
pub trait VehicleEvaluator {
    /// Number of vehicle types.
    fn num_vehicle_types(&self) -> usize;

    /// Index of the cheapest vehicle type that can serve the profile.
    ///
    /// Fails with [`RoutingError::NoFeasibleVehicle`](crate::RoutingError::NoFeasibleVehicle)
    /// if no type qualifies.
    fn choose_vehicle(
        &self,
        distance: f64,
        inside_distance: f64,
        weight: f64,
        volume: f64,
        work_time: f64,
    ) -> Result<usize>;

    /// Weight capacity of a vehicle type.
    fn capacity_weight(&self, vehicle_type: usize) -> f64;

    /// Volume capacity of a vehicle type.
    fn capacity_volume(&self, vehicle_type: usize) -> f64;

    /// Length of the working day in hours.
    fn hours_per_day(&self) -> f64;

    /// Prices a route profile with its best vehicle type.
    fn route_cost(&self, profile: &RouteProfile) -> RouteCost;

    /// Cost and utilization breakdown of a route profile.
    fn summarize_route(&self, profile: &RouteProfile) -> RouteSummary;

    /// Resale value of owned vehicles left unused, given one vehicle type
    /// entry per used route.
    fn resale_value_for_unused_vehicles(&self, used_vehicle_types: &[usize]) -> f64;

    /// Revenue earned per served customer, reported in summaries.
    fn revenue_per_customer(&self) -> f64 {
        0.0
    }

    /// Daily work-time budget in seconds.
    fn work_time_budget(&self) -> f64 {
        self.hours_per_day() * 3600.0
    }
}

/// Instance plus evaluator, borrowed for the duration of a run.
#[derive(Debug)]
pub struct RoutingContext<'a, E: ?Sized> {
    instance: &'a Instance,
    evaluator: &'a E,
}

impl<E: ?Sized> Clone for RoutingContext<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: ?Sized> Copy for RoutingContext<'_, E> {}

impl<'a, E: VehicleEvaluator + ?Sized> RoutingContext<'a, E> {
    /// Creates a context.
    pub fn new(instance: &'a Instance, evaluator: &'a E) -> Self {
        Self {
            instance,
            evaluator,
        }
    }

    /// The instance.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// The evaluator.
    pub fn evaluator(&self) -> &'a E {
        self.evaluator
    }

    /// Prices a full depot-terminated vertex sequence.
    pub fn sequence_cost(&self, vertices: &[usize]) -> RouteCost {
        if vertices.len() <= 2 {
            return RouteCost::empty();
        }
        match RouteProfile::of(self.instance, vertices) {
            Some(profile) => self.evaluator.route_cost(&profile),
            None => RouteCost::unusable(),
        }
    }

    /// Prices a route.
    pub fn route_cost(&self, route: &Route) -> RouteCost {
        self.sequence_cost(route.vertices())
    }

    /// Profile of a route, `None` if an arc is missing.
    pub fn profile(&self, route: &Route) -> Option<RouteProfile> {
        RouteProfile::of(self.instance, route.vertices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ArcMatrix;
    use crate::evaluation::HfvrpEvaluator;
    use crate::models::{CityParams, FleetSpec, Vertex, VehicleType};

    fn setup() -> (Instance, HfvrpEvaluator) {
        let vertices = vec![
            Vertex::depot(0.0, 0.0),
            Vertex::customer(1, 3.0, 4.0, 10.0, 1.0, 0.0),
        ];
        let arcs = ArcMatrix::euclidean(&vertices, 50.0);
        let instance = Instance::new(vertices, arcs).expect("valid");
        let fleet = FleetSpec::new(vec![VehicleType::new("van", 100.0, 10.0)]);
        let evaluator = HfvrpEvaluator::new(fleet, CityParams::default());
        (instance, evaluator)
    }

    #[test]
    fn test_empty_sequence_costs_nothing() {
        let (instance, evaluator) = setup();
        let ctx = RoutingContext::new(&instance, &evaluator);
        let cost = ctx.route_cost(&Route::new());
        assert_eq!(cost, RouteCost::empty());
    }

    #[test]
    fn test_sequence_cost_uses_best_vehicle() {
        let (instance, evaluator) = setup();
        let ctx = RoutingContext::new(&instance, &evaluator);
        let cost = ctx.route_cost(&Route::from_customers(&[1]));
        assert_eq!(cost.vehicle_type, Some(0));
        assert!(cost.feasible);
        assert!(cost.cost.is_finite());
    }

    #[test]
    fn test_missing_arc_is_unusable() {
        let vertices = vec![
            Vertex::depot(0.0, 0.0),
            Vertex::customer(1, 3.0, 4.0, 10.0, 1.0, 0.0),
        ];
        let mut arcs = ArcMatrix::euclidean(&vertices, 50.0);
        arcs.remove(0, 1);
        let instance = Instance::new(vertices, arcs).expect("valid");
        let (_, evaluator) = setup();
        let ctx = RoutingContext::new(&instance, &evaluator);
        let cost = ctx.route_cost(&Route::from_customers(&[1]));
        assert!(!cost.feasible);
        assert!(cost.cost.is_infinite());
    }
}
