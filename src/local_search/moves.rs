//! Move operators of the local search portfolio.
//!
//! Every move is anchored on a customer `u` and a target vertex `v` and
//! creates the arc `u → v`. The target is either a customer in the
//! granular neighbor list of `u` or the end depot of some route.
//!
//! ```text
//! Swap01            move u before v
//! Swap02            move (pred(u), u) before v
//! Swap11            exchange u with pred(v)
//! InterRouteTwoOpt  A = a[..=u] + b[v..],  B = b[..v] + a[u+1..]
//! ```

use serde::{Deserialize, Serialize};

/// Local search operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Relocate one customer.
    Swap01,
    /// Relocate two consecutive customers.
    Swap02,
    /// Exchange two customers.
    Swap11,
    /// Exchange the tails of two routes (2-opt*).
    InterRouteTwoOpt,
}

impl Operator {
    /// The fixed portfolio, in evaluation order.
    pub const ALL: [Operator; 4] = [
        Operator::Swap01,
        Operator::Swap02,
        Operator::Swap11,
        Operator::InterRouteTwoOpt,
    ];

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Swap01 => "swap01",
            Operator::Swap02 => "swap02",
            Operator::Swap11 => "swap11",
            Operator::InterRouteTwoOpt => "two_opt_star",
        }
    }
}

/// New vertex sequences produced by a move.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rewrite {
    /// One route changes.
    Single(Vec<usize>),
    /// Both routes change.
    Pair(Vec<usize>, Vec<usize>),
}

/// Applies `op` with `u` at `a[pu]` and target `v` at `b[pv]`.
///
/// `b` is `None` when both vertices are on the same route. Returns `None`
/// when the move does not apply or would leave the routes unchanged.
pub(crate) fn rewrite(
    op: Operator,
    a: &[usize],
    pu: usize,
    b: Option<&[usize]>,
    pv: usize,
) -> Option<Rewrite> {
    match (op, b) {
        (Operator::Swap01, None) => relocate_intra(a, pu, 1, pv).map(Rewrite::Single),
        (Operator::Swap02, None) => relocate_intra(a, pu, 2, pv).map(Rewrite::Single),
        (Operator::Swap01, Some(b)) => relocate_inter(a, pu, 1, b, pv),
        (Operator::Swap02, Some(b)) => relocate_inter(a, pu, 2, b, pv),
        (Operator::Swap11, None) => {
            let pw = pv.checked_sub(1)?;
            if pw == 0 || pw == pu {
                return None;
            }
            let mut seq = a.to_vec();
            seq.swap(pu, pw);
            Some(Rewrite::Single(seq))
        }
        (Operator::Swap11, Some(b)) => {
            let pw = pv.checked_sub(1)?;
            if pw == 0 {
                return None;
            }
            let mut new_a = a.to_vec();
            let mut new_b = b.to_vec();
            std::mem::swap(&mut new_a[pu], &mut new_b[pw]);
            Some(Rewrite::Pair(new_a, new_b))
        }
        (Operator::InterRouteTwoOpt, None) => None,
        (Operator::InterRouteTwoOpt, Some(b)) => {
            if pu + 2 == a.len() && pv + 1 == b.len() {
                return None;
            }
            let mut new_a = a[..=pu].to_vec();
            new_a.extend_from_slice(&b[pv..]);
            let mut new_b = b[..pv].to_vec();
            new_b.extend_from_slice(&a[pu + 1..]);
            Some(Rewrite::Pair(new_a, new_b))
        }
    }
}

/// Moves the `len` customers ending at `pu` before `pv` on the same route.
fn relocate_intra(seq: &[usize], pu: usize, len: usize, pv: usize) -> Option<Vec<usize>> {
    let start = (pu + 1).checked_sub(len).filter(|&s| s >= 1)?;
    // target inside the segment or right after it
    if (start..=pu + 1).contains(&pv) {
        return None;
    }
    let segment = &seq[start..=pu];
    let mut rest: Vec<usize> = seq[..start].to_vec();
    rest.extend_from_slice(&seq[pu + 1..]);
    let target = if pv > pu { pv - len } else { pv };
    let mut out = rest[..target].to_vec();
    out.extend_from_slice(segment);
    out.extend_from_slice(&rest[target..]);
    Some(out)
}

/// Moves the `len` customers ending at `a[pu]` before `b[pv]`.
fn relocate_inter(a: &[usize], pu: usize, len: usize, b: &[usize], pv: usize) -> Option<Rewrite> {
    let start = (pu + 1).checked_sub(len).filter(|&s| s >= 1)?;
    let mut new_a = a[..start].to_vec();
    new_a.extend_from_slice(&a[pu + 1..]);
    let mut new_b = b[..pv].to_vec();
    new_b.extend_from_slice(&a[start..=pu]);
    new_b.extend_from_slice(&b[pv..]);
    Some(Rewrite::Pair(new_a, new_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(r: Option<Rewrite>) -> Vec<usize> {
        match r {
            Some(Rewrite::Single(s)) => s,
            other => panic!("expected single rewrite, got {other:?}"),
        }
    }

    fn pair(r: Option<Rewrite>) -> (Vec<usize>, Vec<usize>) {
        match r {
            Some(Rewrite::Pair(a, b)) => (a, b),
            other => panic!("expected pair rewrite, got {other:?}"),
        }
    }

    #[test]
    fn test_swap01_intra() {
        let a = [0, 1, 2, 3, 4, 0];
        // move 1 before 4
        assert_eq!(single(rewrite(Operator::Swap01, &a, 1, None, 4)), vec![0, 2, 3, 1, 4, 0]);
        // move 4 before 2
        assert_eq!(single(rewrite(Operator::Swap01, &a, 4, None, 2)), vec![0, 1, 4, 2, 3, 0]);
        // move 3 to the end
        assert_eq!(single(rewrite(Operator::Swap01, &a, 3, None, 5)), vec![0, 1, 2, 4, 3, 0]);
        // already before its target
        assert!(rewrite(Operator::Swap01, &a, 1, None, 2).is_none());
    }

    #[test]
    fn test_swap02_intra() {
        let a = [0, 1, 2, 3, 4, 0];
        // move (1, 2) before end depot
        assert_eq!(single(rewrite(Operator::Swap02, &a, 2, None, 5)), vec![0, 3, 4, 1, 2, 0]);
        // move (3, 4) before 1
        assert_eq!(single(rewrite(Operator::Swap02, &a, 4, None, 1)), vec![0, 3, 4, 1, 2, 0]);
        // no predecessor customer
        assert!(rewrite(Operator::Swap02, &a, 1, None, 4).is_none());
        // target inside segment
        assert!(rewrite(Operator::Swap02, &a, 3, None, 2).is_none());
    }

    #[test]
    fn test_swap01_inter() {
        let a = [0, 1, 2, 0];
        let b = [0, 5, 6, 0];
        let (na, nb) = pair(rewrite(Operator::Swap01, &a, 2, Some(&b), 2));
        assert_eq!(na, vec![0, 1, 0]);
        assert_eq!(nb, vec![0, 5, 2, 6, 0]);
    }

    #[test]
    fn test_swap02_inter_empties_route() {
        let a = [0, 1, 2, 0];
        let b = [0, 5, 0];
        let (na, nb) = pair(rewrite(Operator::Swap02, &a, 2, Some(&b), 1));
        assert_eq!(na, vec![0, 0]);
        assert_eq!(nb, vec![0, 1, 2, 5, 0]);
    }

    #[test]
    fn test_swap11() {
        let a = [0, 1, 2, 3, 0];
        // exchange 1 with pred(3) = 2
        assert_eq!(single(rewrite(Operator::Swap11, &a, 1, None, 3)), vec![0, 2, 1, 3, 0]);
        let b = [0, 5, 6, 0];
        let (na, nb) = pair(rewrite(Operator::Swap11, &a, 2, Some(&b), 2));
        assert_eq!(na, vec![0, 1, 5, 3, 0]);
        assert_eq!(nb, vec![0, 2, 6, 0]);
        // pred(v) is the depot
        assert!(rewrite(Operator::Swap11, &a, 2, Some(&b), 1).is_none());
    }

    #[test]
    fn test_two_opt_star() {
        let a = [0, 1, 2, 3, 0];
        let b = [0, 5, 6, 7, 0];
        let (na, nb) = pair(rewrite(Operator::InterRouteTwoOpt, &a, 1, Some(&b), 3));
        assert_eq!(na, vec![0, 1, 7, 0]);
        assert_eq!(nb, vec![0, 5, 6, 2, 3, 0]);
        assert!(rewrite(Operator::InterRouteTwoOpt, &a, 1, None, 3).is_none());
        // u is last and v is the end depot
        assert!(rewrite(Operator::InterRouteTwoOpt, &a, 3, Some(&b), 4).is_none());
    }
}
