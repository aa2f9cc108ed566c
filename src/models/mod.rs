//! Domain model types for heterogeneous-fleet routing.
//!
//! Provides vertices with weight and volume demands, the arc matrix-backed
//! instance, vehicle types and the owned fleet, city cost constants, routes
//! as depot-terminated vertex sequences, and evaluated solutions.

mod city;
mod instance;
mod route;
mod solution;
mod vehicle;
mod vertex;

pub use city::CityParams;
pub use instance::Instance;
pub use route::{Route, RouteProfile};
pub use solution::Solution;
pub use vehicle::{Drivetrain, FleetSpec, OwnedVehicles, VehicleClass, VehicleType};
pub use vertex::Vertex;
