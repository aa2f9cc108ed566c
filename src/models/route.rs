//! Depot-terminated routes and their aggregate profiles.

use crate::error::Result;

use super::Instance;

/// An ordered vertex sequence that starts and ends at the depot.
///
/// A route with only the two depot endpoints is empty and is purged from
/// solutions returned to callers.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Route;
///
/// let mut route = Route::from_customers(&[3, 5]);
/// assert_eq!(route.vertices(), &[0, 3, 5, 0]);
/// route.insert_after(1, &[4]);
/// assert_eq!(route.customers(), &[3, 4, 5]);
/// assert_eq!(route.first_customer(), Some(3));
/// assert_eq!(route.last_customer(), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    vertices: Vec<usize>,
}

impl Route {
    /// Creates an empty route (depot → depot).
    pub fn new() -> Self {
        Self {
            vertices: vec![0, 0],
        }
    }

    /// Creates a route visiting the given customers in order.
    pub fn from_customers(customers: &[usize]) -> Self {
        let mut vertices = Vec::with_capacity(customers.len() + 2);
        vertices.push(0);
        vertices.extend_from_slice(customers);
        vertices.push(0);
        Self { vertices }
    }

    /// Creates a route from a full depot-terminated vertex sequence.
    pub fn from_vertices(vertices: Vec<usize>) -> Self {
        debug_assert!(
            vertices.len() >= 2 && vertices[0] == 0 && vertices[vertices.len() - 1] == 0,
            "route must start and end at the depot"
        );
        Self { vertices }
    }

    /// Full vertex sequence including both depot endpoints.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Interior customer sequence.
    pub fn customers(&self) -> &[usize] {
        &self.vertices[1..self.vertices.len() - 1]
    }

    /// Number of vertices including both depot endpoints.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Number of customers visited.
    pub fn num_customers(&self) -> usize {
        self.vertices.len() - 2
    }

    /// Returns `true` if the route visits no customer.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() <= 2
    }

    /// First customer after the start depot.
    pub fn first_customer(&self) -> Option<usize> {
        self.customers().first().copied()
    }

    /// Last customer before the end depot.
    pub fn last_customer(&self) -> Option<usize> {
        self.customers().last().copied()
    }

    /// Position of a vertex in the full sequence.
    pub fn position_of(&self, vertex: usize) -> Option<usize> {
        self.customers()
            .iter()
            .position(|&c| c == vertex)
            .map(|p| p + 1)
    }

    /// Inserts `customers` directly after the vertex at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end depot or out of bounds.
    pub fn insert_after(&mut self, pos: usize, customers: &[usize]) {
        assert!(pos + 1 < self.vertices.len(), "cannot insert after end depot");
        let tail = self.vertices.split_off(pos + 1);
        self.vertices.extend_from_slice(customers);
        self.vertices.extend(tail);
    }

    /// Removes and returns the customer at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` addresses a depot endpoint.
    pub fn remove_at(&mut self, pos: usize) -> usize {
        assert!(
            pos > 0 && pos + 1 < self.vertices.len(),
            "cannot remove a depot endpoint"
        );
        self.vertices.remove(pos)
    }

    /// Removes a customer by id. Returns `false` if it is not on this route.
    pub fn remove_customer(&mut self, customer: usize) -> bool {
        match self.position_of(customer) {
            Some(pos) => {
                self.vertices.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Swaps the half-open segment `[begin, end)` of this route with
    /// `[other_begin, other_end)` of `other`.
    ///
    /// Empty segments are allowed, so this also moves a segment from one
    /// route into the other.
    pub fn exchange_segments(
        &mut self,
        begin: usize,
        end: usize,
        other: &mut Route,
        other_begin: usize,
        other_end: usize,
    ) {
        let ours: Vec<usize> = self.vertices[begin..end].to_vec();
        let theirs: Vec<usize> = other
            .vertices
            .splice(other_begin..other_end, ours)
            .collect();
        self.vertices.splice(begin..end, theirs);
    }

    /// Moves every customer of `other` onto the tail of this route,
    /// leaving `other` empty.
    pub fn append_route(&mut self, other: &mut Route) {
        let end = self.vertices.len() - 1;
        let other_end = other.vertices.len() - 1;
        self.exchange_segments(end, end, other, 1, other_end);
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregated resources of a vertex sequence.
///
/// Duration is travel duration plus the service time of every visited
/// customer, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteProfile {
    /// Travel distance (km).
    pub distance: f64,
    /// Distance inside the toll zone (km).
    pub inside_distance: f64,
    /// Work time (s).
    pub duration: f64,
    /// Total weight delivered.
    pub weight: f64,
    /// Total volume delivered.
    pub volume: f64,
    /// Number of customer stops.
    pub stops: usize,
}

impl RouteProfile {
    /// Computes the profile of a full depot-terminated vertex sequence.
    ///
    /// Returns `None` if any arc along the sequence is missing.
    pub fn of(instance: &Instance, vertices: &[usize]) -> Option<Self> {
        Self::try_of(instance, vertices).ok()
    }

    /// Like [`RouteProfile::of`], but names the first missing arc.
    pub fn try_of(instance: &Instance, vertices: &[usize]) -> Result<Self> {
        let mut profile = Self::default();
        for pair in vertices.windows(2) {
            let arc = instance.arc(pair[0], pair[1])?;
            profile.distance += arc.distance;
            profile.inside_distance += arc.inside_distance;
            profile.duration += arc.duration;
        }
        for &v in vertices.iter().filter(|&&v| v != 0) {
            let vertex = instance.vertex(v);
            profile.duration += vertex.service_time();
            profile.weight += vertex.demand_weight();
            profile.volume += vertex.demand_volume();
            profile.stops += 1;
        }
        Ok(profile)
    }

    /// Profile after inserting `customer` between `prev` and `next`.
    ///
    /// Returns `None` if one of the two new arcs is missing.
    pub fn with_insertion(
        &self,
        instance: &Instance,
        prev: usize,
        customer: usize,
        next: usize,
    ) -> Option<Self> {
        let arcs = instance.arcs();
        let old = arcs.get(prev, next)?;
        let a = arcs.get(prev, customer)?;
        let b = arcs.get(customer, next)?;
        let vertex = instance.vertex(customer);
        Some(Self {
            distance: self.distance - old.distance + a.distance + b.distance,
            inside_distance: self.inside_distance - old.inside_distance
                + a.inside_distance
                + b.inside_distance,
            duration: self.duration - old.duration
                + a.duration
                + b.duration
                + vertex.service_time(),
            weight: self.weight + vertex.demand_weight(),
            volume: self.volume + vertex.demand_volume(),
            stops: self.stops + 1,
        })
    }
}
