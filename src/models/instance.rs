//! Validated routing instance.

use crate::distance::{ArcData, ArcMatrix};
use crate::error::{Result, RoutingError};

use super::Vertex;

/// Vertices and arcs of a routing problem, immutable after construction.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, Vertex};
/// use u_fleet::distance::ArcMatrix;
///
/// let vertices = vec![
///     Vertex::depot(0.0, 0.0),
///     Vertex::customer(1, 3.0, 4.0, 10.0, 1.0, 0.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&vertices, 50.0);
/// let instance = Instance::new(vertices, arcs).unwrap();
/// assert_eq!(instance.num_customers(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    vertices: Vec<Vertex>,
    arcs: ArcMatrix,
}

impl Instance {
    /// Validates and creates an instance.
    ///
    /// Requires the depot at position 0, at least one customer, vertex ids
    /// equal to their positions, zero depot demand, non-negative demands and
    /// service times, a matching matrix dimension and non-negative arcs.
    pub fn new(vertices: Vec<Vertex>, arcs: ArcMatrix) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(RoutingError::InvalidInstance(
                "expected a depot and at least one customer".into(),
            ));
        }
        for (pos, v) in vertices.iter().enumerate() {
            if v.id() != pos {
                return Err(RoutingError::InvalidInstance(format!(
                    "vertex {} has id {} but expected {pos}",
                    v.name(),
                    v.id()
                )));
            }
            if v.demand_weight() < 0.0 || v.demand_volume() < 0.0 || v.service_time() < 0.0 {
                return Err(RoutingError::InvalidInstance(format!(
                    "vertex {pos} has a negative demand or service time"
                )));
            }
        }
        let depot = &vertices[0];
        if depot.demand_weight() != 0.0 || depot.demand_volume() != 0.0 {
            return Err(RoutingError::InvalidInstance(
                "the depot cannot have a non-zero demand".into(),
            ));
        }
        if arcs.size() != vertices.len() {
            return Err(RoutingError::InvalidInstance(format!(
                "arc matrix covers {} vertices, instance has {}",
                arcs.size(),
                vertices.len()
            )));
        }
        if let Some((i, j, _)) = arcs
            .iter()
            .find(|(_, _, a)| a.distance < 0.0 || a.duration < 0.0 || a.inside_distance < 0.0)
        {
            return Err(RoutingError::InvalidInstance(format!(
                "arc ({i}, {j}) has a negative attribute"
            )));
        }
        Ok(Self { vertices, arcs })
    }

    /// All vertices (index 0 = depot).
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertex by id.
    pub fn vertex(&self, id: usize) -> &Vertex {
        &self.vertices[id]
    }

    /// The depot vertex.
    pub fn depot(&self) -> &Vertex {
        &self.vertices[0]
    }

    /// Arc matrix.
    pub fn arcs(&self) -> &ArcMatrix {
        &self.arcs
    }

    /// Number of customers (excluding the depot).
    pub fn num_customers(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Customer ids `1..=N`.
    pub fn customer_ids(&self) -> impl Iterator<Item = usize> {
        1..self.vertices.len()
    }

    /// Arc between two vertices.
    ///
    /// Fails with [`RoutingError::MissingArc`] if the matrix has no entry.
    pub fn arc(&self, from: usize, to: usize) -> Result<&ArcData> {
        self.arcs
            .get(from, to)
            .ok_or(RoutingError::MissingArc { from, to })
    }

    /// Arc cost, `f64::INFINITY` when missing.
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.arcs.cost(from, to)
    }
}
