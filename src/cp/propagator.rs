//! Bounds-consistency propagation for weighted sums.
//!
//! Two linear relations are enforced over the count variables `x_i`:
//!
//! - capacity: `lo <= sum(w_i * x_i) <= hi`
//! - objective: `objective == sum(c_i * x_i)`
//!
//! For each `x_i` the feasible interval is recomputed from the bounds of
//! all other variables:
//!
//! ```text
//! x_i <= floor((hi - sum_{j != i} w_j * min_j) / w_i)
//! x_i >= ceil((lo - sum_{j != i} w_j * max_j) / w_i)
//! ```
//!
//! and analogously from the objective bounds. This is bounds consistency,
//! not arc consistency: interior holes are never removed.
//!
//! # Reference
//!
//! Apt (2003), "Principles of Constraint Programming", ch. 6 (linear
//! constraints over integer intervals)

use super::model::LinearModel;
use super::variables::{Domains, IntVar};

/// Why a propagation step proved the current branch infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// No value of the count variables can bring the weighted sum into
    /// the capacity window.
    CapacityUnreachable,
    /// A count variable's domain became empty.
    EmptyCount {
        /// Index of the variable.
        index: usize,
    },
    /// The objective domain became empty (for instance, below the
    /// branch-and-bound cap).
    EmptyObjective,
    /// A computed bound exceeded the configured ceiling, or a weighted
    /// sum left the `i64` range.
    DomainOverflow,
}

/// Outcome of one propagation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// At least one bound moved; apply again until a fixed point.
    Tightened,
    /// Fixed point: no bound moved.
    Unchanged,
    /// The branch cannot yield a solution.
    Infeasible(Conflict),
}

impl Propagation {
    /// Whether the outcome is a conflict.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Propagation::Infeasible(_))
    }
}

/// Linear weighted-sum propagator shared by the inverted (minimum cost)
/// and forward (maximum value) problems.
#[derive(Debug, Clone)]
pub struct WeightedSumPropagator {
    weights: Vec<i64>,
    coefficients: Vec<i64>,
    capacity_lo: i64,
    capacity_hi: i64,
    max_objective: i64,
}

impl WeightedSumPropagator {
    /// Builds the propagator for a validated model.
    pub fn new(model: &LinearModel) -> Self {
        let (capacity_lo, capacity_hi) = model.capacity_window();
        Self {
            weights: model.weights(),
            coefficients: model.coefficients(),
            capacity_lo,
            capacity_hi,
            max_objective: model.max_objective,
        }
    }

    /// The capacity window `[lo, hi]`.
    pub fn capacity_window(&self) -> (i64, i64) {
        (self.capacity_lo, self.capacity_hi)
    }

    /// Runs one tightening pass over both relations, mutating bounds in
    /// place.
    pub fn propagate(&self, domains: &mut Domains) -> Propagation {
        match self.narrow(domains) {
            Ok(true) => Propagation::Tightened,
            Ok(false) => Propagation::Unchanged,
            Err(conflict) => Propagation::Infeasible(conflict),
        }
    }

    /// Repeats [`propagate`](Self::propagate) until a fixed point or a
    /// conflict. Returns `Tightened` if any pass moved a bound.
    pub fn propagate_to_fixpoint(&self, domains: &mut Domains) -> Propagation {
        let mut moved = false;
        loop {
            match self.propagate(domains) {
                Propagation::Tightened => moved = true,
                Propagation::Unchanged => {
                    return if moved {
                        Propagation::Tightened
                    } else {
                        Propagation::Unchanged
                    };
                }
                conflict @ Propagation::Infeasible(_) => return conflict,
            }
        }
    }

    fn narrow(&self, domains: &mut Domains) -> Result<bool, Conflict> {
        let mut changed = false;

        // Capacity relation
        let (sum_min, sum_max) = weighted_bounds(&self.weights, &domains.counts)?;
        if sum_min > self.capacity_hi || sum_max < self.capacity_lo {
            return Err(Conflict::CapacityUnreachable);
        }
        for (index, (var, &w)) in domains.counts.iter_mut().zip(&self.weights).enumerate() {
            let others_min = sum_min - mul(w, var.min)?;
            let others_max = sum_max - mul(w, var.max)?;
            changed |= var.tighten_max(floor_div(sub(self.capacity_hi, others_min)?, w));
            changed |= var.tighten_min(ceil_div(sub(self.capacity_lo, others_max)?, w));
            if var.is_empty() {
                return Err(Conflict::EmptyCount { index });
            }
        }

        // Objective relation
        let (obj_min, obj_max) = weighted_bounds(&self.coefficients, &domains.counts)?;
        if obj_min > self.max_objective {
            return Err(Conflict::DomainOverflow);
        }
        changed |= domains.objective.tighten_min(obj_min);
        changed |= domains.objective.tighten_max(obj_max);
        if domains.objective.is_empty() {
            return Err(Conflict::EmptyObjective);
        }
        let (target_min, target_max) = (domains.objective.min, domains.objective.max);
        for (index, (var, &c)) in domains
            .counts
            .iter_mut()
            .zip(&self.coefficients)
            .enumerate()
        {
            if c == 0 {
                continue;
            }
            let others_min = obj_min - mul(c, var.min)?;
            let others_max = obj_max - mul(c, var.max)?;
            changed |= var.tighten_max(floor_div(sub(target_max, others_min)?, c));
            changed |= var.tighten_min(ceil_div(sub(target_min, others_max)?, c));
            if var.is_empty() {
                return Err(Conflict::EmptyCount { index });
            }
        }

        Ok(changed)
    }
}

/// `(sum(k_i * min_i), sum(k_i * max_i))` with overflow reported as a
/// conflict.
fn weighted_bounds(coefs: &[i64], vars: &[IntVar]) -> Result<(i64, i64), Conflict> {
    let mut lo = 0i64;
    let mut hi = 0i64;
    for (&k, var) in coefs.iter().zip(vars) {
        lo = lo.checked_add(mul(k, var.min)?).ok_or(Conflict::DomainOverflow)?;
        hi = hi.checked_add(mul(k, var.max)?).ok_or(Conflict::DomainOverflow)?;
    }
    Ok((lo, hi))
}

fn mul(a: i64, b: i64) -> Result<i64, Conflict> {
    a.checked_mul(b).ok_or(Conflict::DomainOverflow)
}

fn sub(a: i64, b: i64) -> Result<i64, Conflict> {
    a.checked_sub(b).ok_or(Conflict::DomainOverflow)
}

/// Floor division for a positive divisor.
fn floor_div(a: i64, b: i64) -> i64 {
    a.div_euclid(b)
}

/// Ceiling division for a positive divisor.
fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a.div_euclid(b);
    if a.rem_euclid(b) == 0 {
        q
    } else {
        q + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{CapacityRelation, ObjectiveSense};

    fn model(weights: &[i64], coefs: &[i64], relation: CapacityRelation) -> LinearModel {
        let mut m = LinearModel::new("test", ObjectiveSense::Minimize, 99_999);
        for (&w, &c) in weights.iter().zip(coefs) {
            m.add_term(w, c, 50);
        }
        m.set_capacity(relation);
        m
    }

    #[test]
    fn test_division_helpers() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(ceil_div(7, 2), 4);
        assert_eq!(ceil_div(-7, 2), -3);
        assert_eq!(ceil_div(6, 3), 2);
    }

    #[test]
    fn test_capacity_upper_bounds() {
        let m = model(&[2, 7, 3], &[50, 71, 20], CapacityRelation::Exactly(14));
        let p = WeightedSumPropagator::new(&m);
        let mut d = m.initial_domains();

        assert_eq!(p.propagate_to_fixpoint(&mut d), Propagation::Tightened);
        assert_eq!(d.counts[0].max, 7);
        assert_eq!(d.counts[1].max, 2);
        assert_eq!(d.counts[2].max, 4);
        assert_eq!(d.objective.max, 50 * 7 + 71 * 2 + 20 * 4);
    }

    #[test]
    fn test_idempotent_at_fixpoint() {
        let m = model(&[2, 7, 3], &[50, 71, 20], CapacityRelation::Exactly(14));
        let p = WeightedSumPropagator::new(&m);
        let mut d = m.initial_domains();
        p.propagate_to_fixpoint(&mut d);

        let before = d.clone();
        assert_eq!(p.propagate(&mut d), Propagation::Unchanged);
        assert_eq!(p.propagate_to_fixpoint(&mut d), Propagation::Unchanged);
        assert_eq!(d, before);
    }

    #[test]
    fn test_lower_bound_from_capacity() {
        // 3 * x0 + 1 * x1 == 10 with x1 <= 1 forces x0 == 3
        let m = model(&[3, 1], &[1, 1], CapacityRelation::Exactly(10));
        let p = WeightedSumPropagator::new(&m);
        let mut d = m.initial_domains();
        d.counts[1].max = 1;

        assert_eq!(p.propagate_to_fixpoint(&mut d), Propagation::Tightened);
        assert_eq!((d.counts[0].min, d.counts[0].max), (3, 3));
        assert_eq!((d.counts[1].min, d.counts[1].max), (1, 1));
        assert_eq!((d.objective.min, d.objective.max), (4, 4));
    }

    #[test]
    fn test_unreachable_target() {
        let m = model(&[5, 5], &[1, 1], CapacityRelation::Exactly(3));
        let p = WeightedSumPropagator::new(&m);
        let mut d = m.initial_domains();

        assert_eq!(
            p.propagate_to_fixpoint(&mut d),
            Propagation::Infeasible(Conflict::CapacityUnreachable)
        );
    }

    #[test]
    fn test_objective_cap_prunes() {
        // without the second type the cheapest exact-14 costs 130
        let m = model(&[2, 7, 3], &[50, 71, 20], CapacityRelation::Exactly(14));
        let p = WeightedSumPropagator::new(&m);
        let mut d = m.initial_domains();
        d.counts[1].max = 0;
        d.objective.max = 129;

        assert_eq!(
            p.propagate_to_fixpoint(&mut d),
            Propagation::Infeasible(Conflict::EmptyObjective)
        );
    }

    #[test]
    fn test_objective_ceiling_overflow() {
        let mut m = model(&[1], &[10], CapacityRelation::Exactly(5));
        m.max_objective = 40;
        let p = WeightedSumPropagator::new(&m);
        let mut d = m.initial_domains();

        assert_eq!(
            p.propagate_to_fixpoint(&mut d),
            Propagation::Infeasible(Conflict::DomainOverflow)
        );
    }

    #[test]
    fn test_at_most_window() {
        let m = model(&[4, 6], &[3, 5], CapacityRelation::AtMost(12));
        let p = WeightedSumPropagator::new(&m);
        let mut d = m.initial_domains();

        p.propagate_to_fixpoint(&mut d);
        assert_eq!(d.counts[0].max, 3);
        assert_eq!(d.counts[1].max, 2);
        assert_eq!(d.counts[0].min, 0);
    }
}
