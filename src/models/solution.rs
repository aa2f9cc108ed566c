//! Evaluated set of routes.

use crate::evaluation::{RouteCost, RoutingContext, VehicleEvaluator};

use super::Route;

/// A set of routes together with their cached costs.
///
/// The total cost is the sum of route costs. A solution is feasible when
/// every route is feasible and every customer is served exactly once.
///
/// # Examples
///
/// ```
/// use u_fleet::distance::ArcMatrix;
/// use u_fleet::evaluation::{HfvrpEvaluator, RoutingContext};
/// use u_fleet::models::{CityParams, FleetSpec, Instance, Route, Solution, Vertex, VehicleType};
///
/// let vertices = vec![
///     Vertex::depot(0.0, 0.0),
///     Vertex::customer(1, 3.0, 4.0, 10.0, 1.0, 0.0),
///     Vertex::customer(2, 6.0, 8.0, 10.0, 1.0, 0.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&vertices, 50.0);
/// let instance = Instance::new(vertices, arcs).unwrap();
/// let fleet = FleetSpec::new(vec![VehicleType::new("van", 100.0, 10.0)]);
/// let evaluator = HfvrpEvaluator::new(fleet, CityParams::default());
/// let ctx = RoutingContext::new(&instance, &evaluator);
///
/// let sol = Solution::from_routes(&ctx, vec![Route::from_customers(&[1, 2]), Route::new()]);
/// assert_eq!(sol.num_routes(), 1);
/// assert_eq!(sol.num_served(), 2);
/// assert!(sol.is_feasible());
/// ```
#[derive(Debug, Clone)]
pub struct Solution {
    routes: Vec<Route>,
    route_costs: Vec<RouteCost>,
    cost: f64,
    feasible: bool,
}

impl Solution {
    /// Creates a solution without routes.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            route_costs: Vec::new(),
            cost: 0.0,
            feasible: false,
        }
    }

    /// Evaluates `routes` and drops the empty ones.
    pub fn from_routes<E: VehicleEvaluator + ?Sized>(
        ctx: &RoutingContext<'_, E>,
        routes: Vec<Route>,
    ) -> Self {
        let mut sol = Self {
            routes,
            ..Self::new()
        };
        sol.purge_empty_routes();
        sol.evaluate(ctx);
        sol
    }

    /// Re-prices every route and refreshes the totals.
    pub fn evaluate<E: VehicleEvaluator + ?Sized>(&mut self, ctx: &RoutingContext<'_, E>) {
        self.route_costs = self.routes.iter().map(|r| ctx.route_cost(r)).collect();
        self.refresh(ctx);
    }

    /// Routes of the solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route by index.
    pub fn route(&self, index: usize) -> &Route {
        &self.routes[index]
    }

    /// Cached cost of a route.
    pub fn route_cost(&self, index: usize) -> &RouteCost {
        &self.route_costs[index]
    }

    /// Cached costs of all routes.
    pub fn route_costs(&self) -> &[RouteCost] {
        &self.route_costs
    }

    /// Number of routes.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Total cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether every route is feasible and every customer served once.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Whether this solution should replace `incumbent`: strictly cheaper,
    /// and feasible unless the incumbent is infeasible too.
    pub fn improves_on(&self, incumbent: &Solution) -> bool {
        self.cost < incumbent.cost && (self.feasible || !incumbent.feasible)
    }

    /// Number of customer visits across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(Route::num_customers).sum()
    }

    /// Vehicle type of every non-empty route that has one.
    pub fn vehicle_types(&self) -> Vec<usize> {
        self.route_costs
            .iter()
            .filter_map(|c| c.vehicle_type)
            .collect()
    }

    /// Index of the route serving `customer`.
    pub fn route_of(&self, customer: usize) -> Option<usize> {
        self.routes
            .iter()
            .position(|r| r.customers().contains(&customer))
    }

    /// Customers in `1..=num_customers` that no route visits, ascending.
    pub fn missing_customers(&self, num_customers: usize) -> Vec<usize> {
        let mut seen = vec![false; num_customers + 1];
        for route in &self.routes {
            for &c in route.customers() {
                if c < seen.len() {
                    seen[c] = true;
                }
            }
        }
        (1..=num_customers).filter(|&c| !seen[c]).collect()
    }

    /// Appends a route and prices it.
    pub fn add_route<E: VehicleEvaluator + ?Sized>(
        &mut self,
        ctx: &RoutingContext<'_, E>,
        route: Route,
    ) {
        self.route_costs.push(ctx.route_cost(&route));
        self.routes.push(route);
        self.refresh(ctx);
    }

    /// Replaces a route and re-prices it.
    pub fn replace_route<E: VehicleEvaluator + ?Sized>(
        &mut self,
        ctx: &RoutingContext<'_, E>,
        index: usize,
        route: Route,
    ) {
        self.route_costs[index] = ctx.route_cost(&route);
        self.routes[index] = route;
        self.refresh(ctx);
    }

    /// Replaces two routes at once with pre-computed costs.
    pub(crate) fn replace_pair<E: VehicleEvaluator + ?Sized>(
        &mut self,
        ctx: &RoutingContext<'_, E>,
        (a, route_a, cost_a): (usize, Route, RouteCost),
        (b, route_b, cost_b): (usize, Route, RouteCost),
    ) {
        self.routes[a] = route_a;
        self.route_costs[a] = cost_a;
        self.routes[b] = route_b;
        self.route_costs[b] = cost_b;
        self.refresh(ctx);
    }

    /// Removes a customer from whichever route serves it.
    ///
    /// The route stays in place even when it becomes empty; call
    /// [`purge_empty_routes`](Self::purge_empty_routes) afterwards.
    pub fn remove_customer<E: VehicleEvaluator + ?Sized>(
        &mut self,
        ctx: &RoutingContext<'_, E>,
        customer: usize,
    ) -> bool {
        let Some(idx) = self.route_of(customer) else {
            return false;
        };
        self.routes[idx].remove_customer(customer);
        self.route_costs[idx] = ctx.route_cost(&self.routes[idx]);
        self.refresh(ctx);
        true
    }

    /// Drops routes without customers.
    pub fn purge_empty_routes(&mut self) {
        if self.route_costs.len() != self.routes.len() {
            self.routes.retain(|r| !r.is_empty());
            return;
        }
        let mut keep = self.routes.iter().map(|r| !r.is_empty());
        self.route_costs.retain(|_| keep.next().unwrap_or(false));
        self.routes.retain(|r| !r.is_empty());
    }

    /// Consumes the solution and returns its routes.
    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }

    fn refresh<E: VehicleEvaluator + ?Sized>(&mut self, ctx: &RoutingContext<'_, E>) {
        self.cost = self.route_costs.iter().map(|c| c.cost).sum();
        let n = ctx.instance().num_customers();
        let mut visits = vec![0usize; n + 1];
        let mut in_range = true;
        for route in &self.routes {
            for &c in route.customers() {
                match visits.get_mut(c) {
                    Some(v) if c > 0 => *v += 1,
                    _ => in_range = false,
                }
            }
        }
        self.feasible = in_range
            && visits[1..].iter().all(|&v| v == 1)
            && self.route_costs.iter().all(|c| c.feasible);
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}
