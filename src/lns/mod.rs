//! Destroy/repair metaheuristics.
//!
//! - [`Lns`]: Large Neighborhood Search with weighted destroy selection
//!   (Shaw, 1998; Ropke & Pisinger, 2006)
//! - [`Ils`]: Iterated Local Search with randomized worst removal
//!   (Lourenço, Martin & Stützle, 2003)
//!
//! Both orchestrators accept only strictly cheaper solutions that keep a
//! feasible incumbent feasible, so their output never costs more than their
//! input and never loses feasibility.

mod destroy;
mod iterated;
mod large_neighborhood;
mod operator;
mod repair;

pub use destroy::{Destroy, RandomRemoval, RelatedRemoval, WorstRemoval};
pub use iterated::{Ils, IlsConfig};
pub use large_neighborhood::{Lns, LnsConfig};
pub use operator::{removal_count, DestroyOperator, RepairOperator};
pub use repair::BestInsertion;
