//! Seqlab: numeric sequences driven by a Markov chain of operators
//!
//! The centre of the crate is a stochastic recurrence. Each Markov state owns
//! a binary operator; at every step the operator of the current state is
//! applied to the last two values of the sequence, the result is appended,
//! and the chain moves to its next state according to a random
//! row-stochastic transition matrix.
//!
//! All randomness is injected: every entry point takes `&mut R where R: Rng`,
//! so a seeded `StdRng` makes runs reproducible.
//!
//! # Core Concepts
//!
//! - **Operators**: Labeled pure functions `(x, y) -> value` where `x` is the
//!   last value and `y` the one before
//! - **Transition matrix**: Row-stochastic matrix with a damped diagonal
//! - **Engine**: Owns the sequence, the Markov machine and the step trace
//! - **Static generators**: Classic deterministic sequences behind one trait
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use seqlab::engine::{generate, GenerationRequest};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let request = GenerationRequest::append(vec![2.0, 3.0], 10).with_num_states(6);
//! let result = generate(&request, &mut rng).unwrap();
//!
//! assert_eq!(result.sequence.len(), 12);
//! assert_eq!(result.trace.len(), 10);
//! assert_eq!(result.operator_labels.len(), 6);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod operators;
pub mod repl;
pub mod sequences;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use builder::{BuildError, EngineBuilder};
pub use core::{Operator, StepRecord, Trace, TransitionMatrix, Value};
pub use engine::{generate, GenerationError, GenerationRequest, GenerationResult, StepCount};
pub use operators::{sample_operators, OperatorPool};
pub use sequences::{SequenceGenerator, SequenceState};
