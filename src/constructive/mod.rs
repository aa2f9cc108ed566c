//! Constructive heuristics for building initial HFVRP solutions.
//!
//! - [`savings`]: Clarke-Wright parallel savings (1964) with fleet-aware
//!   merge checks, O(n² log n)
//! - [`sequential_best_insertion`]: Globally cheapest feasible insertion
//!   from an empty solution, O(n³)
//! - [`random_construction`]: Shuffled customers cut by the largest
//!   capacity, O(n)

mod insertion;
mod random;
mod savings;

pub use insertion::sequential_best_insertion;
pub use random::random_construction;
pub use savings::{savings, SavingsConfig};
