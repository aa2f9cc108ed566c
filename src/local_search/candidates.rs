//! Granular candidate lists.
//!
//! # Algorithm
//!
//! For every customer `i`, the other customers are sorted by arc cost
//! `c(i, j)` ascending (stable on index) and only the first `K` arcs stay
//! allowed. Arcs touching the depot are always allowed. Missing arcs are
//! never allowed.
//!
//! # Reference
//!
//! Toth, P. & Vigo, D. (2003). "The Granular Tabu Search and Its Application
//! to the Vehicle-Routing Problem", *INFORMS Journal on Computing* 15(4).

use crate::distance::ArcMatrix;

/// Boolean allowed-arc mask with per-customer neighbor lists.
///
/// # Examples
///
/// ```
/// use u_fleet::distance::ArcMatrix;
/// use u_fleet::local_search::ArcMask;
/// use u_fleet::models::Vertex;
///
/// let vertices = vec![
///     Vertex::depot(0.0, 0.0),
///     Vertex::customer(1, 1.0, 0.0, 1.0, 1.0, 0.0),
///     Vertex::customer(2, 2.0, 0.0, 1.0, 1.0, 0.0),
///     Vertex::customer(3, 9.0, 0.0, 1.0, 1.0, 0.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&vertices, 50.0);
/// let mask = ArcMask::granular(&arcs, 1);
/// assert!(mask.is_allowed(1, 2));
/// assert!(!mask.is_allowed(1, 3));
/// assert!(mask.is_allowed(3, 0));
/// assert_eq!(mask.neighbors(3), &[2]);
/// ```
#[derive(Debug, Clone)]
pub struct ArcMask {
    allowed: Vec<bool>,
    neighbors: Vec<Vec<usize>>,
    size: usize,
}

impl ArcMask {
    /// Builds the mask keeping the `granularity` cheapest arcs out of each
    /// customer.
    ///
    /// With `granularity ≥ N − 1` every existing arc is allowed.
    pub fn granular(arcs: &ArcMatrix, granularity: usize) -> Self {
        let size = arcs.size();
        let mut allowed = vec![false; size * size];
        let mut neighbors = vec![Vec::new(); size];

        for v in 0..size {
            for (from, to) in [(0, v), (v, 0)] {
                if arcs.get(from, to).is_some() {
                    allowed[from * size + to] = true;
                }
            }
        }

        for i in 1..size {
            let mut ranked: Vec<usize> = (1..size)
                .filter(|&j| j != i && arcs.get(i, j).is_some())
                .collect();
            // stable sort keeps index order on ties
            ranked.sort_by(|&a, &b| arcs.cost(i, a).total_cmp(&arcs.cost(i, b)));
            ranked.truncate(granularity);
            for &j in &ranked {
                allowed[i * size + j] = true;
            }
            neighbors[i] = ranked;
        }

        Self {
            allowed,
            neighbors,
            size,
        }
    }

    /// Whether the arc `from → to` may be created by a move.
    pub fn is_allowed(&self, from: usize, to: usize) -> bool {
        from < self.size && to < self.size && self.allowed[from * self.size + to]
    }

    /// Allowed customer successors of `customer`, cheapest first.
    pub fn neighbors(&self, customer: usize) -> &[usize] {
        &self.neighbors[customer]
    }

    /// Number of vertices covered.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of allowed arcs.
    pub fn num_allowed(&self) -> usize {
        self.allowed.iter().filter(|&&a| a).count()
    }
}
