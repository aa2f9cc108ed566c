//! Depot and customer vertices.

use serde::{Deserialize, Serialize};

/// A location in a routing instance.
///
/// Vertex 0 is the depot; vertices `1..=N` are customers. Demands are split
/// into weight (kg) and volume (m³); service time is in seconds.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Vertex;
///
/// let depot = Vertex::depot(0.0, 0.0);
/// assert!(depot.is_depot());
///
/// let c = Vertex::customer(1, 3.0, 4.0, 120.0, 0.8, 300.0);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.demand_weight(), 120.0);
/// assert!((depot.distance_to(&c) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    id: usize,
    name: String,
    x: f64,
    y: f64,
    demand_weight: f64,
    demand_volume: f64,
    service_time: f64,
}

impl Vertex {
    /// Creates the depot (id 0, no demand, no service time).
    pub fn depot(x: f64, y: f64) -> Self {
        Self {
            id: 0,
            name: "D0".to_string(),
            x,
            y,
            demand_weight: 0.0,
            demand_volume: 0.0,
            service_time: 0.0,
        }
    }

    /// Creates a customer vertex.
    pub fn customer(
        id: usize,
        x: f64,
        y: f64,
        demand_weight: f64,
        demand_volume: f64,
        service_time: f64,
    ) -> Self {
        Self {
            id,
            name: format!("C{id}"),
            x,
            y,
            demand_weight,
            demand_volume,
            service_time,
        }
    }

    /// Replaces the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Vertex id (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// X-coordinate (or longitude).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate (or latitude).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Weight demand.
    pub fn demand_weight(&self) -> f64 {
        self.demand_weight
    }

    /// Volume demand.
    pub fn demand_volume(&self) -> f64 {
        self.demand_volume
    }

    /// Service time in seconds.
    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Returns `true` for the depot.
    pub fn is_depot(&self) -> bool {
        self.id == 0
    }

    /// Euclidean distance to another vertex.
    pub fn distance_to(&self, other: &Vertex) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
