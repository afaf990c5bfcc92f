//! Sampling operators for a run.

use super::catalogue::{builtin_operators, offset_label, offset_sum};
use crate::core::Operator;
use rand::seq::index;
use rand::Rng;
use std::collections::HashSet;

/// Default upper bound of the random constant in synthesised `x + y + c`.
pub const DEFAULT_MAX_OFFSET: i64 = 5;

/// A catalogue of operators from which run-specific subsets are drawn.
///
/// # Example
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use seqlab::operators::OperatorPool;
///
/// let pool = OperatorPool::new();
/// let mut rng = StdRng::seed_from_u64(11);
///
/// let ops = pool.sample(20, &mut rng);
/// assert_eq!(ops.len(), 20);
/// ```
#[derive(Clone, Debug)]
pub struct OperatorPool {
    catalogue: Vec<Operator>,
    max_offset: i64,
}

impl OperatorPool {
    /// Pool over the built-in catalogue.
    pub fn new() -> Self {
        Self {
            catalogue: builtin_operators(),
            max_offset: DEFAULT_MAX_OFFSET,
        }
    }

    /// Set the upper bound for synthesised offsets (clamped to at least 1).
    pub fn with_max_offset(mut self, max_offset: i64) -> Self {
        self.max_offset = max_offset.max(1);
        self
    }

    pub fn catalogue(&self) -> &[Operator] {
        &self.catalogue
    }

    pub fn max_offset(&self) -> i64 {
        self.max_offset
    }

    /// Draw `n` operators; entry `i` is bound to state `i`.
    ///
    /// Catalogue entries are drawn without replacement. Past the catalogue
    /// size, `x + y + c` operators are synthesised with `c` drawn from
    /// `1..=max_offset` and bumped until the label is unused.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Operator> {
        let drawn = n.min(self.catalogue.len());
        let mut selected: Vec<Operator> = index::sample(rng, self.catalogue.len(), drawn)
            .into_iter()
            .map(|i| self.catalogue[i].clone())
            .collect();

        let mut labels: HashSet<String> =
            selected.iter().map(|op| op.label().to_string()).collect();
        for _ in drawn..n {
            let mut c = rng.gen_range(1..=self.max_offset);
            while labels.contains(&offset_label(c)) {
                c += 1;
            }
            let op = offset_sum(c);
            labels.insert(op.label().to_string());
            selected.push(op);
        }

        selected
    }

    /// Resolve a catalogue label, or an `x + y + c` label, to its operator.
    pub fn find(&self, label: &str) -> Option<Operator> {
        let label = label.trim();
        if let Some(op) = self.catalogue.iter().find(|op| op.label() == label) {
            return Some(op.clone());
        }
        label
            .strip_prefix("x + y + ")
            .and_then(|c| c.trim().parse::<i64>().ok())
            .map(offset_sum)
    }
}

impl Default for OperatorPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw `n` operators from the built-in catalogue.
pub fn sample_operators<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Operator> {
    OperatorPool::new().sample(n, rng)
}
