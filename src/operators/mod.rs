//! Operator pool: the catalogue of recurrence operators and run sampling.
//!
//! Each run of the stochastic engine binds one operator to each state. The
//! operators are drawn from a fixed catalogue without replacement; when more
//! states are requested than the catalogue holds, extra `x + y + c`
//! operators are synthesised with distinct labels.

mod catalogue;
mod pool;

pub use catalogue::{builtin_operators, offset_sum, CATALOGUE_SIZE};
pub use pool::{sample_operators, OperatorPool, DEFAULT_MAX_OFFSET};
