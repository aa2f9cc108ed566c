//! Vehicle types and fleet specification.

use serde::{Deserialize, Serialize};

/// Energy source of a vehicle type; selects the energy price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drivetrain {
    /// Battery electric, priced per kWh.
    Electric,
    /// Diesel, priced per litre.
    Diesel,
}

/// Driver class of a vehicle type; selects the daily wage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    /// Light and medium trucks.
    Semi,
    /// Heavy trucks.
    Heavy,
}

/// A purchasable vehicle type.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{VehicleType, Drivetrain};
///
/// let van = VehicleType::new("e-van", 1200.0, 8.0)
///     .with_drivetrain(Drivetrain::Electric)
///     .with_max_range(180.0)
///     .with_acquisition_cost(60_000.0);
/// assert_eq!(van.capacity_weight(), 1200.0);
/// assert!(van.fits(1000.0, 7.5));
/// assert!(!van.fits(1300.0, 1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleType {
    /// Display name.
    pub name: String,
    /// Weight capacity (kg).
    pub capacity_weight: f64,
    /// Volume capacity (m³).
    pub capacity_volume: f64,
    /// Maximum range per day (km).
    pub max_range: f64,
    /// Purchase price.
    pub acquisition_cost: f64,
    /// Days over which the purchase price is amortized.
    pub amortization_days: f64,
    /// Energy consumption per km (kWh or litres, per drivetrain).
    pub consumption_per_km: f64,
    /// Maintenance cost per km.
    pub maintenance_per_km: f64,
    /// Energy source.
    pub drivetrain: Drivetrain,
    /// Driver class.
    pub class: VehicleClass,
    /// Eligible for the green-fleet discount.
    pub green: bool,
    /// Number of vehicles of this type that can be acquired.
    pub available: usize,
}

impl Default for VehicleType {
    fn default() -> Self {
        Self {
            name: String::new(),
            capacity_weight: 0.0,
            capacity_volume: 0.0,
            max_range: f64::INFINITY,
            acquisition_cost: 0.0,
            amortization_days: 250.0 * 8.0,
            consumption_per_km: 0.0,
            maintenance_per_km: 0.0,
            drivetrain: Drivetrain::Diesel,
            class: VehicleClass::Semi,
            green: false,
            available: usize::MAX,
        }
    }
}

impl VehicleType {
    /// Creates a vehicle type with the given capacities and neutral costs.
    pub fn new(name: impl Into<String>, capacity_weight: f64, capacity_volume: f64) -> Self {
        Self {
            name: name.into(),
            capacity_weight,
            capacity_volume,
            ..Self::default()
        }
    }

    /// Sets the maximum daily range.
    pub fn with_max_range(mut self, km: f64) -> Self {
        self.max_range = km;
        self
    }

    /// Sets the purchase price.
    pub fn with_acquisition_cost(mut self, cost: f64) -> Self {
        self.acquisition_cost = cost;
        self
    }

    /// Sets the amortization horizon in days.
    pub fn with_amortization_days(mut self, days: f64) -> Self {
        self.amortization_days = days;
        self
    }

    /// Sets energy consumption per km.
    pub fn with_consumption(mut self, per_km: f64) -> Self {
        self.consumption_per_km = per_km;
        self
    }

    /// Sets maintenance cost per km.
    pub fn with_maintenance_per_km(mut self, per_km: f64) -> Self {
        self.maintenance_per_km = per_km;
        self
    }

    /// Sets the drivetrain.
    pub fn with_drivetrain(mut self, drivetrain: Drivetrain) -> Self {
        self.drivetrain = drivetrain;
        self
    }

    /// Sets the driver class.
    pub fn with_class(mut self, class: VehicleClass) -> Self {
        self.class = class;
        self
    }

    /// Marks the type as green.
    pub fn with_green(mut self, green: bool) -> Self {
        self.green = green;
        self
    }

    /// Sets the number of vehicles available.
    pub fn with_available(mut self, count: usize) -> Self {
        self.available = count;
        self
    }

    /// Weight capacity.
    pub fn capacity_weight(&self) -> f64 {
        self.capacity_weight
    }

    /// Volume capacity.
    pub fn capacity_volume(&self) -> f64 {
        self.capacity_volume
    }

    /// Returns `true` if the load fits both capacities.
    pub fn fits(&self, weight: f64, volume: f64) -> bool {
        weight <= self.capacity_weight && volume <= self.capacity_volume
    }
}

/// Vehicles already owned at the start of the planning horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedVehicles {
    /// Index into [`FleetSpec::vehicle_types`].
    pub vehicle_type: usize,
    /// Number of vehicles owned.
    pub count: usize,
    /// Resale value of one unused vehicle.
    pub resale_value: f64,
}

/// The purchasable fleet plus the already-owned initial fleet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetSpec {
    /// Vehicle types, in preference order for ties.
    pub vehicle_types: Vec<VehicleType>,
    /// Vehicles already owned.
    pub initial_fleet: Vec<OwnedVehicles>,
}

impl FleetSpec {
    /// Creates a fleet from vehicle types with no owned vehicles.
    pub fn new(vehicle_types: Vec<VehicleType>) -> Self {
        Self {
            vehicle_types,
            initial_fleet: Vec::new(),
        }
    }

    /// Adds owned vehicles of a type.
    pub fn with_owned(mut self, vehicle_type: usize, count: usize, resale_value: f64) -> Self {
        self.initial_fleet.push(OwnedVehicles {
            vehicle_type,
            count,
            resale_value,
        });
        self
    }

    /// Number of vehicle types.
    pub fn len(&self) -> usize {
        self.vehicle_types.len()
    }

    /// Returns `true` if there are no vehicle types.
    pub fn is_empty(&self) -> bool {
        self.vehicle_types.is_empty()
    }

    /// Largest weight capacity over all types.
    pub fn max_capacity_weight(&self) -> f64 {
        self.vehicle_types
            .iter()
            .map(|v| v.capacity_weight)
            .fold(0.0, f64::max)
    }

    /// Largest volume capacity over all types.
    pub fn max_capacity_volume(&self) -> f64 {
        self.vehicle_types
            .iter()
            .map(|v| v.capacity_volume)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_defaults() {
        let v = VehicleType::new("truck", 3000.0, 20.0);
        assert_eq!(v.name, "truck");
        assert!(v.max_range.is_infinite());
        assert_eq!(v.acquisition_cost, 0.0);
        assert_eq!(v.drivetrain, Drivetrain::Diesel);
        assert_eq!(v.class, VehicleClass::Semi);
        assert!(!v.green);
    }

    #[test]
    fn test_vehicle_builder() {
        let v = VehicleType::new("heavy", 12_000.0, 40.0)
            .with_max_range(400.0)
            .with_acquisition_cost(150_000.0)
            .with_amortization_days(1000.0)
            .with_consumption(0.3)
            .with_maintenance_per_km(0.1)
            .with_class(VehicleClass::Heavy)
            .with_green(true)
            .with_available(3);
        assert_eq!(v.max_range, 400.0);
        assert_eq!(v.acquisition_cost, 150_000.0);
        assert_eq!(v.amortization_days, 1000.0);
        assert_eq!(v.consumption_per_km, 0.3);
        assert_eq!(v.maintenance_per_km, 0.1);
        assert_eq!(v.class, VehicleClass::Heavy);
        assert!(v.green);
        assert_eq!(v.available, 3);
    }

    #[test]
    fn test_fits_checks_both_dimensions() {
        let v = VehicleType::new("van", 100.0, 10.0);
        assert!(v.fits(100.0, 10.0));
        assert!(!v.fits(100.1, 1.0));
        assert!(!v.fits(1.0, 10.1));
    }

    #[test]
    fn test_fleet_max_capacities() {
        let fleet = FleetSpec::new(vec![
            VehicleType::new("a", 100.0, 30.0),
            VehicleType::new("b", 300.0, 10.0),
        ])
        .with_owned(0, 2, 5000.0);
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet.max_capacity_weight(), 300.0);
        assert_eq!(fleet.max_capacity_volume(), 30.0);
        assert_eq!(fleet.initial_fleet[0].count, 2);
    }

    #[test]
    fn test_fleet_deserializes_with_defaults() {
        let json = r#"{
            "vehicle_types": [
                {"name": "e-van", "capacity_weight": 900, "capacity_volume": 6,
                 "drivetrain": "electric", "green": true}
            ],
            "initial_fleet": [{"vehicle_type": 0, "count": 1, "resale_value": 9000}]
        }"#;
        let fleet: FleetSpec = serde_json::from_str(json).expect("valid fleet");
        assert_eq!(fleet.vehicle_types[0].drivetrain, Drivetrain::Electric);
        assert!(fleet.vehicle_types[0].green);
        assert_eq!(fleet.vehicle_types[0].class, VehicleClass::Semi);
        assert_eq!(fleet.initial_fleet[0].resale_value, 9000.0);
    }
}
