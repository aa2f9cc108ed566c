//! Error type shared by instance loading, configuration and vehicle selection.

use thiserror::Error;

/// Errors raised at the boundaries of the crate.
///
/// The optimization core itself never fails outward: infeasible merges,
/// missing arcs and failed vehicle selections only discard the candidate
/// being examined.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// The instance violates a structural rule (depot, ids, demands, arcs).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An arc needed for a computation is absent from the matrix.
    #[error("arc ({from}, {to}) is missing")]
    MissingArc {
        /// Tail vertex.
        from: usize,
        /// Head vertex.
        to: usize,
    },

    /// No vehicle type can serve the given route profile.
    #[error(
        "no vehicle fits {distance:.2} km, weight {weight:.2}, volume {volume:.2}, {work_time:.0} s"
    )]
    NoFeasibleVehicle {
        /// Route distance in km.
        distance: f64,
        /// Route load weight.
        weight: f64,
        /// Route load volume.
        volume: f64,
        /// Route work time in seconds.
        work_time: f64,
    },

    /// A JSON configuration document could not be decoded.
    #[error("failed to decode configuration")]
    ConfigDecode(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RoutingError>;
