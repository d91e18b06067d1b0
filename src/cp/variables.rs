//! CP variable types.

/// An integer variable with a bounded domain `[min, max]`.
///
/// Only the bounds are tracked; interior values are never removed.
/// The domain is empty when `min > max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntVar {
    /// Variable name (for logs and reports).
    pub name: String,
    /// Lower bound.
    pub min: i64,
    /// Upper bound.
    pub max: i64,
}

impl IntVar {
    /// Creates a new integer variable with the given bounds.
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// Creates a variable fixed to a single value.
    pub fn fixed(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, value, value)
    }

    /// Whether the domain holds exactly one value.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Whether the domain holds no value.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// The assigned value, if the variable is fixed.
    pub fn value(&self) -> Option<i64> {
        self.is_fixed().then_some(self.min)
    }

    /// Domain size (max - min + 1), zero when empty.
    pub fn domain_size(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.max - self.min + 1
        }
    }

    /// Raises the lower bound. Returns true if the bound moved.
    pub fn tighten_min(&mut self, min: i64) -> bool {
        if min > self.min {
            self.min = min;
            true
        } else {
            false
        }
    }

    /// Lowers the upper bound. Returns true if the bound moved.
    pub fn tighten_max(&mut self, max: i64) -> bool {
        if max < self.max {
            self.max = max;
            true
        } else {
            false
        }
    }
}

/// The live variable state of one search: one count variable per
/// resource type (indexed like the catalog) plus the objective variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    /// Count variables, in catalog order.
    pub counts: Vec<IntVar>,
    /// Objective variable (total cost or total value).
    pub objective: IntVar,
}

impl Domains {
    /// Creates count variables `[0, max_count]` and an objective
    /// variable `[0, max_objective]`.
    pub fn uniform(n: usize, max_count: i64, max_objective: i64) -> Self {
        Self {
            counts: (0..n)
                .map(|i| IntVar::new(format!("count{i}"), 0, max_count))
                .collect(),
            objective: IntVar::new("objective", 0, max_objective),
        }
    }

    /// Index of the first count variable that is not fixed.
    pub fn first_unfixed(&self) -> Option<usize> {
        self.counts.iter().position(|v| v.domain_size() > 1)
    }

    /// Whether every count variable is fixed.
    pub fn all_counts_fixed(&self) -> bool {
        self.counts.iter().all(IntVar::is_fixed)
    }

    /// Fixed count values, if every count variable is fixed.
    pub fn count_values(&self) -> Option<Vec<i64>> {
        self.counts.iter().map(IntVar::value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_var() {
        let v = IntVar::new("x", 0, 10);
        assert_eq!(v.domain_size(), 11);
        assert!(!v.is_fixed());
        assert_eq!(v.value(), None);

        let f = IntVar::fixed("y", 5);
        assert!(f.is_fixed());
        assert_eq!(f.domain_size(), 1);
        assert_eq!(f.value(), Some(5));
    }

    #[test]
    fn test_tighten() {
        let mut v = IntVar::new("x", 0, 10);
        assert!(v.tighten_min(3));
        assert!(!v.tighten_min(2));
        assert!(v.tighten_max(7));
        assert!(!v.tighten_max(9));
        assert_eq!((v.min, v.max), (3, 7));

        v.tighten_min(8);
        assert!(v.is_empty());
        assert_eq!(v.domain_size(), 0);
    }

    #[test]
    fn test_domains() {
        let mut d = Domains::uniform(3, 5, 100);
        assert_eq!(d.first_unfixed(), Some(0));
        d.counts[0].max = 0;
        assert_eq!(d.first_unfixed(), Some(1));
        assert!(d.count_values().is_none());

        d.counts[1].max = 0;
        d.counts[2].min = 2;
        d.counts[2].max = 2;
        assert!(d.all_counts_fixed());
        assert_eq!(d.count_values(), Some(vec![0, 0, 2]));
        assert_eq!(d.first_unfixed(), None);
    }
}
