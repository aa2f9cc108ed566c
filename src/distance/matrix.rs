//! Dense arc matrix.

use crate::models::Vertex;

/// Attributes of a directed arc.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArcData {
    /// Travel distance in km. This is also the arc cost.
    pub distance: f64,
    /// Travel duration in seconds.
    pub duration: f64,
    /// Share of the distance driven inside the toll zone, in km.
    pub inside_distance: f64,
}

impl ArcData {
    /// Creates an arc without an inside-zone share.
    pub fn new(distance: f64, duration: f64) -> Self {
        Self {
            distance,
            duration,
            inside_distance: 0.0,
        }
    }

    /// Sets the inside-zone distance.
    pub fn with_inside_distance(mut self, km: f64) -> Self {
        self.inside_distance = km;
        self
    }
}

/// A dense n×n table of optional arcs stored in row-major order.
///
/// Self-loops always exist with zero attributes. Arcs that were never set
/// are missing: [`get`](Self::get) returns `None` and [`cost`](Self::cost)
/// returns `f64::INFINITY`.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Vertex;
/// use u_fleet::distance::ArcMatrix;
///
/// let vertices = vec![
///     Vertex::depot(0.0, 0.0),
///     Vertex::customer(1, 3.0, 4.0, 10.0, 1.0, 0.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&vertices, 36.0);
/// assert!((arcs.cost(0, 1) - 5.0).abs() < 1e-10);
/// // 5 km at 36 km/h = 500 s
/// assert!((arcs.get(0, 1).unwrap().duration - 500.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct ArcMatrix {
    data: Vec<Option<ArcData>>,
    size: usize,
}

impl ArcMatrix {
    /// Creates a matrix in which only the self-loops exist.
    pub fn new(size: usize) -> Self {
        let mut data = vec![None; size * size];
        for i in 0..size {
            data[i * size + i] = Some(ArcData::default());
        }
        Self { data, size }
    }

    /// Builds a complete matrix from vertex coordinates, with durations
    /// derived from a constant speed.
    pub fn euclidean(vertices: &[Vertex], speed_kmh: f64) -> Self {
        let n = vertices.len();
        let mut arcs = Self::new(n);
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = vertices[i].distance_to(&vertices[j]);
                arcs.set(i, j, ArcData::new(d, d / speed_kmh * 3600.0));
            }
        }
        arcs
    }

    /// Returns the arc from `from` to `to`, if present.
    pub fn get(&self, from: usize, to: usize) -> Option<&ArcData> {
        self.data[from * self.size + to].as_ref()
    }

    /// Sets the arc from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, arc: ArcData) {
        self.data[from * self.size + to] = Some(arc);
    }

    /// Removes the arc from `from` to `to`.
    pub fn remove(&mut self, from: usize, to: usize) {
        self.data[from * self.size + to] = None;
    }

    /// Arc cost (distance), `f64::INFINITY` when the arc is missing.
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.get(from, to).map_or(f64::INFINITY, |a| a.distance)
    }

    /// Number of vertices covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterates over all present arcs as `(from, to, arc)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &ArcData)> + '_ {
        self.data.iter().enumerate().filter_map(move |(idx, arc)| {
            arc.as_ref().map(|a| (idx / self.size, idx % self.size, a))
        })
    }

    /// Returns `true` if the arc costs are symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (a, b) = (self.cost(i, j), self.cost(j, i));
                if a.is_infinite() != b.is_infinite() {
                    return false;
                }
                if a.is_finite() && (a - b).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}
