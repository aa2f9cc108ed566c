//! Economic constants of the operating city.

use serde::{Deserialize, Serialize};

use super::VehicleClass;

/// Economic constants shared read-only by the evaluator for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityParams {
    /// Other fixed costs per vehicle and day (insurance, parking, ...).
    pub utility_other: f64,
    /// Flat maintenance cost per vehicle and day.
    pub maintenance_cost: f64,
    /// Electricity price per kWh.
    pub price_elec: f64,
    /// Diesel price per litre.
    pub price_diesel: f64,
    /// Length of a working day in hours.
    pub hours_per_day: f64,
    /// Daily wage of a semi-truck driver.
    pub wage_semi: f64,
    /// Daily wage of a heavy-truck driver.
    pub wage_heavy: f64,
    /// Toll per km driven inside the zone.
    pub toll_per_km_inside: f64,
    /// Revenue per served customer (reporting only).
    pub revenue: f64,
    /// Fraction of energy and maintenance cost refunded for green vehicles.
    pub green_upside: f64,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            utility_other: 0.0,
            maintenance_cost: 0.0,
            price_elec: 0.0,
            price_diesel: 0.0,
            hours_per_day: 8.0,
            wage_semi: 0.0,
            wage_heavy: 0.0,
            toll_per_km_inside: 0.0,
            revenue: 0.0,
            green_upside: 0.0,
        }
    }
}

impl CityParams {
    /// Daily wage for a driver class.
    pub fn wage(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Semi => self.wage_semi,
            VehicleClass::Heavy => self.wage_heavy,
        }
    }

    /// Daily work-time budget in seconds.
    pub fn work_time_budget(&self) -> f64 {
        self.hours_per_day * 3600.0
    }

    /// Sets the toll rate.
    pub fn with_toll(mut self, per_km: f64) -> Self {
        self.toll_per_km_inside = per_km;
        self
    }
}
