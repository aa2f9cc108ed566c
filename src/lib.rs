//! # u-fleet
//!
//! Heterogeneous-fleet vehicle routing (HFVRP): savings construction,
//! granular local search and destroy/repair metaheuristics over a pluggable
//! vehicle evaluator.
//!
//! ## Modules
//!
//! - [`models`]: Domain model types (Vertex, VehicleType, Route, Solution, Instance)
//! - [`distance`]: Sparse arc matrix with distance, duration and inside-zone km
//! - [`evaluation`]: Vehicle evaluator contract, HFVRP cost model and summaries
//! - [`constructive`]: Savings, sequential best insertion, random construction
//! - [`local_search`]: Granular best-improvement local search
//! - [`lns`]: Destroy/repair operators, LNS and ILS orchestrators
//! - [`config`]: Serde-backed pipeline configuration
//! - [`solver`]: Savings → LNS → ILS pipeline
//!
//! The crate emits `tracing` events but never installs a subscriber.

pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod lns;
pub mod local_search;
pub mod models;
pub mod solver;

pub use error::{Result, RoutingError};
