//! Vehicle choice, route pricing and solution reporting.
//!
//! The search only sees the fleet through [`VehicleEvaluator`].
//! [`HfvrpEvaluator`] implements the heterogeneous fleet and city cost
//! model; [`SolutionSummary`] aggregates per-route breakdowns for reporting.

mod evaluator;
mod hfvrp;
mod summary;

pub use evaluator::{RouteCost, RoutingContext, VehicleEvaluator};
pub use hfvrp::HfvrpEvaluator;
pub use summary::{RouteSummary, RouteTotals, SolutionSummary};
