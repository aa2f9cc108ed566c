//! Heterogeneous-fleet cost model.
//!
//! # Cost of a route served by vehicle type `t`
//!
//! ```text
//! fixed        = utility_other
//! acquisition  = acquisition_cost(t) / amortization_days(t)
//! energy       = distance × consumption(t) × price(drivetrain(t))
//! maintenance  = maintenance_cost + distance × maintenance_per_km(t)
//! wage         = wage(class(t)) × work_time / working_day
//! toll         = inside_distance × toll_per_km_inside
//! green        = green_upside × (energy + maintenance)   if green(t)
//!
//! cost = fixed + acquisition + energy + maintenance + wage + toll − green
//! ```
//!
//! A type is feasible when weight, volume, range and the working day are
//! respected. When no type is feasible the route is priced with the type of
//! lowest penalized cost, the penalty being proportional to the excess of
//! each violated resource.

use std::collections::HashMap;

use crate::error::{Result, RoutingError};
use crate::models::{CityParams, Drivetrain, FleetSpec, RouteProfile, VehicleType};

use super::{RouteCost, RouteSummary, VehicleEvaluator};

/// Cost components of one route for one vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct CostBreakdown {
    fixed: f64,
    acquisition: f64,
    energy: f64,
    maintenance: f64,
    wage: f64,
    toll: f64,
    green_discount: f64,
}

impl CostBreakdown {
    fn total(&self) -> f64 {
        self.fixed + self.acquisition + self.energy + self.maintenance + self.wage + self.toll
            - self.green_discount
    }
}

/// Evaluator for the heterogeneous fleet and city cost model.
///
/// # Examples
///
/// ```
/// use u_fleet::evaluation::{HfvrpEvaluator, VehicleEvaluator};
/// use u_fleet::models::{CityParams, FleetSpec, VehicleType};
///
/// let fleet = FleetSpec::new(vec![
///     VehicleType::new("van", 1000.0, 8.0).with_acquisition_cost(40_000.0),
///     VehicleType::new("truck", 5000.0, 30.0).with_acquisition_cost(90_000.0),
/// ]);
/// let evaluator = HfvrpEvaluator::new(fleet, CityParams::default());
///
/// assert_eq!(evaluator.choose_vehicle(50.0, 0.0, 800.0, 5.0, 3600.0).unwrap(), 0);
/// assert_eq!(evaluator.choose_vehicle(50.0, 0.0, 1800.0, 5.0, 3600.0).unwrap(), 1);
/// assert!(evaluator.choose_vehicle(50.0, 0.0, 9000.0, 5.0, 3600.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct HfvrpEvaluator {
    fleet: FleetSpec,
    city: CityParams,
    penalty_factor: f64,
}

impl HfvrpEvaluator {
    /// Creates an evaluator with a penalty factor of 1000 per unit of excess.
    pub fn new(fleet: FleetSpec, city: CityParams) -> Self {
        Self {
            fleet,
            city,
            penalty_factor: 1000.0,
        }
    }

    /// Sets the penalty per unit of resource excess on infeasible routes.
    pub fn with_penalty_factor(mut self, factor: f64) -> Self {
        self.penalty_factor = factor;
        self
    }

    /// Fleet specification.
    pub fn fleet(&self) -> &FleetSpec {
        &self.fleet
    }

    /// City parameters.
    pub fn city(&self) -> &CityParams {
        &self.city
    }

    fn vehicle(&self, vehicle_type: usize) -> &VehicleType {
        &self.fleet.vehicle_types[vehicle_type]
    }

    fn breakdown(&self, vehicle: &VehicleType, profile: &RouteProfile) -> CostBreakdown {
        let city = &self.city;
        let price = match vehicle.drivetrain {
            Drivetrain::Electric => city.price_elec,
            Drivetrain::Diesel => city.price_diesel,
        };
        let energy = profile.distance * vehicle.consumption_per_km * price;
        let maintenance = city.maintenance_cost + profile.distance * vehicle.maintenance_per_km;
        let acquisition = if vehicle.amortization_days > 0.0 {
            vehicle.acquisition_cost / vehicle.amortization_days
        } else {
            vehicle.acquisition_cost
        };
        let budget = city.work_time_budget();
        let wage = if budget > 0.0 {
            city.wage(vehicle.class) * profile.duration / budget
        } else {
            city.wage(vehicle.class)
        };
        let green_discount = if vehicle.green {
            city.green_upside * (energy + maintenance)
        } else {
            0.0
        };
        CostBreakdown {
            fixed: city.utility_other,
            acquisition,
            energy,
            maintenance,
            wage,
            toll: profile.inside_distance * city.toll_per_km_inside,
            green_discount,
        }
    }

    /// Sum of resource excesses; zero when the vehicle is feasible.
    fn excess(&self, vehicle: &VehicleType, profile: &RouteProfile) -> f64 {
        let over_weight = (profile.weight - vehicle.capacity_weight).max(0.0);
        let over_volume = (profile.volume - vehicle.capacity_volume).max(0.0);
        let over_range = (profile.distance - vehicle.max_range).max(0.0);
        let over_time = (profile.duration - self.city.work_time_budget()).max(0.0) / 3600.0;
        over_weight + over_volume + over_range + over_time
    }

    /// Best feasible type and its cost.
    fn best_feasible(&self, profile: &RouteProfile) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (t, vehicle) in self.fleet.vehicle_types.iter().enumerate() {
            if self.excess(vehicle, profile) > 0.0 {
                continue;
            }
            let cost = self.breakdown(vehicle, profile).total();
            if best.is_none_or(|(_, b)| cost < b) {
                best = Some((t, cost));
            }
        }
        best
    }

    /// Type with the lowest penalized cost and that cost.
    fn best_penalized(&self, profile: &RouteProfile) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (t, vehicle) in self.fleet.vehicle_types.iter().enumerate() {
            let cost = self.breakdown(vehicle, profile).total()
                + self.penalty_factor * self.excess(vehicle, profile);
            if best.is_none_or(|(_, b)| cost < b) {
                best = Some((t, cost));
            }
        }
        best
    }
}

impl VehicleEvaluator for HfvrpEvaluator {
    fn num_vehicle_types(&self) -> usize {
        self.fleet.len()
    }

    fn choose_vehicle(
        &self,
        distance: f64,
        inside_distance: f64,
        weight: f64,
        volume: f64,
        work_time: f64,
    ) -> Result<usize> {
        let profile = RouteProfile {
            distance,
            inside_distance,
            duration: work_time,
            weight,
            volume,
            stops: 0,
        };
        self.best_feasible(&profile)
            .map(|(t, _)| t)
            .ok_or(RoutingError::NoFeasibleVehicle {
                distance,
                weight,
                volume,
                work_time,
            })
    }

    fn capacity_weight(&self, vehicle_type: usize) -> f64 {
        self.vehicle(vehicle_type).capacity_weight
    }

    fn capacity_volume(&self, vehicle_type: usize) -> f64 {
        self.vehicle(vehicle_type).capacity_volume
    }

    fn hours_per_day(&self) -> f64 {
        self.city.hours_per_day
    }

    fn revenue_per_customer(&self) -> f64 {
        self.city.revenue
    }

    fn route_cost(&self, profile: &RouteProfile) -> RouteCost {
        if let Some((t, cost)) = self.best_feasible(profile) {
            return RouteCost {
                vehicle_type: Some(t),
                cost,
                feasible: true,
            };
        }
        match self.best_penalized(profile) {
            Some((t, cost)) => RouteCost {
                vehicle_type: Some(t),
                cost,
                feasible: false,
            },
            None => RouteCost::unusable(),
        }
    }

    fn summarize_route(&self, profile: &RouteProfile) -> RouteSummary {
        let priced = self.route_cost(profile);
        let mut summary = RouteSummary {
            distance: profile.distance,
            inside_distance_km: profile.inside_distance,
            duration_seconds: profile.duration,
            num_customers: profile.stops,
            load_weight: profile.weight,
            load_volume: profile.volume,
            vehicle_type: priced.vehicle_type,
            cost: priced.cost,
            feasible: priced.feasible,
            ..RouteSummary::default()
        };
        if let Some(t) = priced.vehicle_type {
            let vehicle = self.vehicle(t);
            let parts = self.breakdown(vehicle, profile);
            summary.fixed_cost = parts.fixed;
            summary.amortized_acquisition_cost = parts.acquisition;
            summary.fuel_cost = parts.energy;
            summary.maintenance_cost = parts.maintenance;
            summary.wage_cost = parts.wage;
            summary.toll_cost = parts.toll;
            summary.green_discount = parts.green_discount;
            summary.capacity_weight = vehicle.capacity_weight;
            summary.capacity_volume = vehicle.capacity_volume;
        }
        summary
    }

    fn resale_value_for_unused_vehicles(&self, used_vehicle_types: &[usize]) -> f64 {
        let mut used: HashMap<usize, usize> = HashMap::new();
        for &t in used_vehicle_types {
            *used.entry(t).or_default() += 1;
        }
        self.fleet
            .initial_fleet
            .iter()
            .map(|owned| {
                let in_use = used.get(&owned.vehicle_type).copied().unwrap_or(0);
                let unused = owned.count.saturating_sub(in_use);
                // several entries of the same type share the usage count
                if let Some(count) = used.get_mut(&owned.vehicle_type) {
                    *count = count.saturating_sub(owned.count);
                }
                unused as f64 * owned.resale_value
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleClass;

    fn city() -> CityParams {
        CityParams {
            utility_other: 10.0,
            maintenance_cost: 5.0,
            price_elec: 0.3,
            price_diesel: 1.5,
            hours_per_day: 8.0,
            wage_semi: 160.0,
            wage_heavy: 240.0,
            toll_per_km_inside: 0.4,
            revenue: 0.0,
            green_upside: 0.5,
        }
    }

    fn fleet() -> FleetSpec {
        FleetSpec::new(vec![
            VehicleType::new("e-van", 1000.0, 8.0)
                .with_drivetrain(Drivetrain::Electric)
                .with_consumption(0.2)
                .with_max_range(100.0)
                .with_acquisition_cost(50_000.0)
                .with_amortization_days(1000.0)
                .with_green(true),
            VehicleType::new("truck", 6000.0, 30.0)
                .with_consumption(0.25)
                .with_maintenance_per_km(0.1)
                .with_acquisition_cost(120_000.0)
                .with_amortization_days(1000.0)
                .with_class(VehicleClass::Heavy),
        ])
    }

    fn profile(distance: f64, weight: f64) -> RouteProfile {
        RouteProfile {
            distance,
            inside_distance: 10.0,
            duration: 4.0 * 3600.0,
            weight,
            volume: 4.0,
            stops: 3,
        }
    }

    #[test]
    fn test_breakdown_components() {
        let eval = HfvrpEvaluator::new(fleet(), city());
        let p = profile(50.0, 500.0);
        let parts = eval.breakdown(eval.vehicle(0), &p);
        assert!((parts.fixed - 10.0).abs() < 1e-10);
        assert!((parts.acquisition - 50.0).abs() < 1e-10);
        // 50 km × 0.2 kWh × 0.3
        assert!((parts.energy - 3.0).abs() < 1e-10);
        assert!((parts.maintenance - 5.0).abs() < 1e-10);
        // half a day
        assert!((parts.wage - 80.0).abs() < 1e-10);
        assert!((parts.toll - 4.0).abs() < 1e-10);
        assert!((parts.green_discount - 4.0).abs() < 1e-10);
        assert!((parts.total() - 148.0).abs() < 1e-10);
    }

    #[test]
    fn test_choose_cheapest_feasible() {
        let eval = HfvrpEvaluator::new(fleet(), city());
        assert_eq!(eval.choose_vehicle(50.0, 10.0, 500.0, 4.0, 3600.0).expect("van"), 0);
        // over the van's range
        assert_eq!(eval.choose_vehicle(150.0, 10.0, 500.0, 4.0, 3600.0).expect("truck"), 1);
        // over the van's weight
        assert_eq!(eval.choose_vehicle(50.0, 10.0, 2000.0, 4.0, 3600.0).expect("truck"), 1);
    }

    #[test]
    fn test_choose_none_feasible() {
        let eval = HfvrpEvaluator::new(fleet(), city());
        let err = eval
            .choose_vehicle(50.0, 0.0, 7000.0, 4.0, 3600.0)
            .expect_err("too heavy");
        assert!(matches!(err, RoutingError::NoFeasibleVehicle { .. }));
        // over the working day
        assert!(eval.choose_vehicle(50.0, 0.0, 100.0, 1.0, 9.0 * 3600.0).is_err());
    }

    #[test]
    fn test_route_cost_penalizes_infeasible() {
        let eval = HfvrpEvaluator::new(fleet(), city());
        let ok = eval.route_cost(&profile(50.0, 5000.0));
        assert!(ok.feasible);
        let bad = eval.route_cost(&profile(50.0, 6500.0));
        assert!(!bad.feasible);
        assert_eq!(bad.vehicle_type, Some(1));
        assert!(bad.cost > ok.cost + 1000.0 * 499.0);
    }

    #[test]
    fn test_empty_fleet_is_unusable() {
        let eval = HfvrpEvaluator::new(FleetSpec::default(), city());
        assert_eq!(eval.route_cost(&profile(10.0, 1.0)), RouteCost::unusable());
    }

    #[test]
    fn test_summary_matches_cost() {
        let eval = HfvrpEvaluator::new(fleet(), city());
        let p = profile(50.0, 500.0);
        let s = eval.summarize_route(&p);
        assert_eq!(s.vehicle_type, Some(0));
        assert!((s.cost - eval.route_cost(&p).cost).abs() < 1e-10);
        let parts = s.fixed_cost
            + s.amortized_acquisition_cost
            + s.fuel_cost
            + s.maintenance_cost
            + s.wage_cost
            + s.toll_cost
            - s.green_discount;
        assert!((parts - s.cost).abs() < 1e-9);
        assert_eq!(s.capacity_weight, 1000.0);
        assert!((s.weight_utilization() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_resale_value() {
        let fleet = fleet().with_owned(0, 3, 20_000.0).with_owned(1, 1, 50_000.0);
        let eval = HfvrpEvaluator::new(fleet, city());
        assert!((eval.resale_value_for_unused_vehicles(&[]) - 110_000.0).abs() < 1e-9);
        assert!((eval.resale_value_for_unused_vehicles(&[0, 1]) - 40_000.0).abs() < 1e-9);
        assert!((eval.resale_value_for_unused_vehicles(&[0, 0, 0, 0, 1, 1]) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_resale_split_entries_share_usage() {
        let fleet = fleet().with_owned(0, 1, 10.0).with_owned(0, 1, 10.0);
        let eval = HfvrpEvaluator::new(fleet, city());
        assert!((eval.resale_value_for_unused_vehicles(&[0]) - 10.0).abs() < 1e-9);
    }
}
