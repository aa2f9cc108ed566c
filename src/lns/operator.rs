//! Destroy and repair operator contracts.

use rand::Rng;

use crate::evaluation::{RoutingContext, VehicleEvaluator};
use crate::models::Solution;

/// A destroy operator removes customers from a solution.
///
/// Removed customers are absent from every route afterwards and routes
/// emptied by the removal are purged.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 2
pub trait DestroyOperator: Send + Sync {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Removes up to `count` customers and returns their ids in removal
    /// order.
    fn destroy<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &mut Solution,
        count: usize,
        rng: &mut R,
    ) -> Vec<usize>
    where
        E: VehicleEvaluator + ?Sized,
        R: Rng;
}

/// A repair operator routes a set of unrouted customers.
///
/// Every customer passed in is on exactly one route afterwards.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 2
pub trait RepairOperator: Send + Sync {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Inserts every customer of `customers` into `solution`.
    fn repair<E, R>(
        &self,
        ctx: &RoutingContext<'_, E>,
        solution: &mut Solution,
        customers: &[usize],
        rng: &mut R,
    ) where
        E: VehicleEvaluator + ?Sized,
        R: Rng;
}

/// Number of customers to remove: `ceil(fraction × customers)`, clamped to
/// `[0, served]`.
pub fn removal_count(fraction: f64, num_customers: usize, served: usize) -> usize {
    let raw = (fraction.clamp(0.0, 1.0) * num_customers as f64).ceil() as usize;
    raw.min(served)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_count() {
        assert_eq!(removal_count(0.1, 20, 20), 2);
        assert_eq!(removal_count(0.1, 25, 25), 3);
        assert_eq!(removal_count(0.0, 25, 25), 0);
        assert_eq!(removal_count(1.0, 10, 4), 4);
        assert_eq!(removal_count(2.0, 10, 10), 10);
    }
}
