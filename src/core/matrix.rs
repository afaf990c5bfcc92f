//! Row-stochastic transition matrices.
//!
//! A `TransitionMatrix` maps each state to a probability distribution over
//! next states. Rows are normalised once, at construction, and never touched
//! again; every constructor is therefore responsible for the invariant that
//! each row sums to 1 and every entry lies in `[0, 1]`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default multiplier applied to the diagonal before normalisation.
pub const DEFAULT_DAMPING: f64 = 0.2;

/// Tolerance used when checking that a row sums to 1.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Errors returned when validating caller-supplied rows.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatrixError {
    #[error("Transition matrix must have at least one state")]
    Empty,

    #[error("Row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Entry [{row}][{col}] = {value} is outside [0, 1]")]
    OutOfRange { row: usize, col: usize, value: f64 },

    #[error("Row {row} sums to {sum}, expected 1")]
    NotStochastic { row: usize, sum: f64 },

    #[error("Damping factor {damping} must be a finite value in [0, 1]")]
    InvalidDamping { damping: f64 },
}

/// A row could not be normalised because its entries sum to zero.
/// Recovered inside this module by falling back to a uniform row.
#[derive(Debug, Error)]
#[error("Row {row} has zero total weight")]
struct DegenerateRowError {
    row: usize,
}

/// Square, row-stochastic transition matrix over states `0..n`.
///
/// # Example
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use seqlab::core::TransitionMatrix;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let matrix = TransitionMatrix::build(4, 0.2, &mut rng).unwrap();
///
/// assert_eq!(matrix.num_states(), 4);
/// for row in matrix.rows() {
///     let sum: f64 = row.iter().sum();
///     assert!((sum - 1.0).abs() < 1e-9);
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct TransitionMatrix {
    rows: Vec<Vec<f64>>,
}

/// Wire shape of a matrix; checked by `from_rows` on the way in.
#[derive(Deserialize)]
struct RawMatrix {
    rows: Vec<Vec<f64>>,
}

impl TryFrom<RawMatrix> for TransitionMatrix {
    type Error = MatrixError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        Self::from_rows(raw.rows)
    }
}

impl TransitionMatrix {
    /// Build a random `n x n` matrix biased against self-transition.
    ///
    /// Each row draws `n` uniforms in `[0, 1)`, multiplies the diagonal by
    /// `damping` and divides by the row sum. A row with zero total weight
    /// becomes uniform. Fails with [`MatrixError::InvalidDamping`] unless
    /// `damping` is finite and within `[0, 1]`; no randomness is drawn then.
    pub fn build<R: Rng + ?Sized>(
        n: usize,
        damping: f64,
        rng: &mut R,
    ) -> Result<Self, MatrixError> {
        if !(damping.is_finite() && (0.0..=1.0).contains(&damping)) {
            return Err(MatrixError::InvalidDamping { damping });
        }
        let rows = (0..n)
            .map(|i| {
                let mut weights: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
                weights[i] *= damping;
                normalize_row(i, &weights).unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "falling back to uniform transition row");
                    uniform_row(n)
                })
            })
            .collect();
        Ok(Self { rows })
    }

    /// Matrix in which every state moves to every state with equal probability.
    pub fn uniform(n: usize) -> Self {
        Self {
            rows: (0..n).map(|_| uniform_row(n)).collect(),
        }
    }

    /// Validate caller-supplied rows without renormalising them.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        check_rows(&rows)?;
        Ok(Self { rows })
    }

    /// Re-check the row invariant.
    pub fn validate(&self) -> Result<(), MatrixError> {
        check_rows(&self.rows)
    }

    /// Skip validation so tests can exercise the checks downstream.
    #[cfg(test)]
    pub(crate) fn from_rows_unchecked(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn num_states(&self) -> usize {
        self.rows.len()
    }

    /// Probability distribution over next states for `state`.
    ///
    /// Panics if `state` is out of range; callers hold a validated state.
    pub fn row(&self, state: usize) -> &[f64] {
        &self.rows[state]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Probability of staying in `state`.
    pub fn self_transition(&self, state: usize) -> f64 {
        self.rows[state][state]
    }

    /// Sample the next state from `state`'s row by inverse-transform sampling.
    ///
    /// Draws one uniform `u` and returns the first index whose cumulative
    /// probability exceeds `u`. If rounding leaves the cumulative sum short
    /// of `u`, the last state with positive probability is chosen.
    pub fn sample_next<R: Rng + ?Sized>(&self, state: usize, rng: &mut R) -> usize {
        let row = &self.rows[state];
        let u = rng.gen::<f64>();

        let mut cumulative = 0.0;
        for (j, &p) in row.iter().enumerate() {
            cumulative += p;
            if u < cumulative {
                return j;
            }
        }

        row.iter().rposition(|&p| p > 0.0).unwrap_or(state)
    }
}

fn check_rows(rows: &[Vec<f64>]) -> Result<(), MatrixError> {
    let n = rows.len();
    if n == 0 {
        return Err(MatrixError::Empty);
    }

    for (r, row) in rows.iter().enumerate() {
        if row.len() != n {
            return Err(MatrixError::NotSquare {
                row: r,
                len: row.len(),
                expected: n,
            });
        }
        if let Some((c, &value)) = row
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(MatrixError::OutOfRange {
                row: r,
                col: c,
                value,
            });
        }
        let sum: f64 = row.iter().sum();
        if (sum - 1.0).abs() >= ROW_SUM_TOLERANCE {
            return Err(MatrixError::NotStochastic { row: r, sum });
        }
    }
    Ok(())
}

fn normalize_row(row: usize, weights: &[f64]) -> Result<Vec<f64>, DegenerateRowError> {
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return Err(DegenerateRowError { row });
    }
    Ok(weights.iter().map(|w| w / sum).collect())
}

fn uniform_row(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_stochastic(matrix: &TransitionMatrix) {
        for row in matrix.rows() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < ROW_SUM_TOLERANCE, "row sum {}", sum);
            assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn build_produces_stochastic_rows() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in 1..12 {
            let matrix = TransitionMatrix::build(n, DEFAULT_DAMPING, &mut rng).unwrap();
            assert_eq!(matrix.num_states(), n);
            assert_stochastic(&matrix);
        }
    }

    #[test]
    fn build_damps_the_diagonal_before_normalising() {
        let mut rng = ScriptedRng::new(vec![0.5, 0.25, 0.5, 0.25]);
        let matrix = TransitionMatrix::build(2, 0.2, &mut rng).unwrap();

        // Row 0: [0.5 * 0.2, 0.25] = [0.1, 0.25] -> sum 0.35
        assert!((matrix.row(0)[0] - 0.1 / 0.35).abs() < 1e-12);
        assert!((matrix.row(0)[1] - 0.25 / 0.35).abs() < 1e-12);
        // Row 1: [0.5, 0.25 * 0.2] = [0.5, 0.05] -> sum 0.55
        assert!((matrix.row(1)[0] - 0.5 / 0.55).abs() < 1e-12);
        assert!((matrix.row(1)[1] - 0.05 / 0.55).abs() < 1e-12);
    }

    #[test]
    fn zero_row_falls_back_to_uniform() {
        let mut rng = ScriptedRng::new(vec![0.0]);
        let matrix = TransitionMatrix::build(3, DEFAULT_DAMPING, &mut rng).unwrap();
        for row in matrix.rows() {
            for p in row {
                assert!((p - 1.0 / 3.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn single_state_always_self_transitions() {
        let mut rng = StdRng::seed_from_u64(3);
        let matrix = TransitionMatrix::build(1, DEFAULT_DAMPING, &mut rng).unwrap();
        assert_eq!(matrix.rows(), &[vec![1.0]]);
        for _ in 0..20 {
            assert_eq!(matrix.sample_next(0, &mut rng), 0);
        }
    }

    #[test]
    fn zero_damping_on_single_state_is_recovered() {
        let mut rng = StdRng::seed_from_u64(3);
        let matrix = TransitionMatrix::build(1, 0.0, &mut rng).unwrap();
        assert_eq!(matrix.rows(), &[vec![1.0]]);
    }

    #[test]
    fn sample_next_uses_cumulative_distribution() {
        let matrix =
            TransitionMatrix::from_rows(vec![vec![0.25, 0.25, 0.5]; 3]).expect("valid rows");

        let mut rng = ScriptedRng::new(vec![0.0, 0.24, 0.25, 0.49, 0.5, 0.99]);
        let picks: Vec<usize> = (0..6).map(|_| matrix.sample_next(0, &mut rng)).collect();
        assert_eq!(picks, vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn sample_next_never_picks_zero_probability_states() {
        let matrix =
            TransitionMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).expect("valid rows");
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert_eq!(matrix.sample_next(0, &mut rng), 1);
            assert_eq!(matrix.sample_next(1, &mut rng), 0);
        }
    }

    #[test]
    fn from_rows_rejects_invalid_input() {
        assert_eq!(TransitionMatrix::from_rows(vec![]), Err(MatrixError::Empty));
        assert!(matches!(
            TransitionMatrix::from_rows(vec![vec![1.0], vec![0.5, 0.5]]),
            Err(MatrixError::NotSquare { row: 0, .. })
        ));
        assert!(matches!(
            TransitionMatrix::from_rows(vec![vec![1.5, -0.5], vec![0.5, 0.5]]),
            Err(MatrixError::OutOfRange { row: 0, col: 0, .. })
        ));
        assert!(matches!(
            TransitionMatrix::from_rows(vec![vec![0.5, 0.4], vec![0.5, 0.5]]),
            Err(MatrixError::NotStochastic { row: 0, .. })
        ));
    }

    #[test]
    fn uniform_matrix_is_stochastic() {
        let matrix = TransitionMatrix::uniform(5);
        assert_stochastic(&matrix);
        assert!((matrix.self_transition(2) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn matrix_serializes_correctly() {
        let matrix = TransitionMatrix::uniform(2);
        let json = serde_json::to_string(&matrix).unwrap();
        let deserialized: TransitionMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(matrix, deserialized);
    }

    #[test]
    fn build_rejects_out_of_range_damping() {
        for damping in [-0.5, 1.5, f64::NAN, f64::INFINITY] {
            let mut rng = ScriptedRng::new(vec![0.5]);
            let result = TransitionMatrix::build(3, damping, &mut rng);
            assert!(matches!(result, Err(MatrixError::InvalidDamping { .. })));
            assert_eq!(rng.consumed(), 0);
        }
    }

    #[test]
    fn build_accepts_damping_bounds() {
        let mut rng = StdRng::seed_from_u64(12);
        for damping in [0.0, 1.0] {
            let matrix = TransitionMatrix::build(4, damping, &mut rng).unwrap();
            assert_stochastic(&matrix);
        }
    }

    #[test]
    fn deserialization_validates_rows() {
        let bad = r#"{"rows":[[5.0,-4.0],[0.0,0.0]]}"#;
        assert!(serde_json::from_str::<TransitionMatrix>(bad).is_err());

        let not_square = r#"{"rows":[[1.0],[0.5,0.5]]}"#;
        assert!(serde_json::from_str::<TransitionMatrix>(not_square).is_err());

        let good = r#"{"rows":[[0.0,1.0],[0.5,0.5]]}"#;
        let matrix: TransitionMatrix = serde_json::from_str(good).unwrap();
        assert_eq!(matrix.row(1), &[0.5, 0.5]);
    }

    #[test]
    fn validate_reports_broken_rows() {
        assert_eq!(TransitionMatrix::uniform(3).validate(), Ok(()));
        let broken = TransitionMatrix::from_rows_unchecked(vec![vec![0.3, 0.3], vec![0.5, 0.5]]);
        assert!(matches!(
            broken.validate(),
            Err(MatrixError::NotStochastic { row: 0, .. })
        ));
    }
}
