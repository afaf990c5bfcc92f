//! Stochastic sequence engine.
//!
//! A run binds one operator to each Markov state, then repeatedly applies
//! the current state's operator to the two most recent values and samples
//! the next state from a transition matrix biased against staying put.
//!
//! # Key Concepts
//!
//! - **Machine**: current state, transition matrix and operator assignment
//! - **Engine**: owns the sequence and trace, drives the machine
//! - **Randomness**: always injected; nothing here touches a global source
//!
//! # Example
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use seqlab::engine::{generate, GenerationRequest};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let request = GenerationRequest::append(vec![2.0, 3.0], 20).with_num_states(6);
//!
//! let result = generate(&request, &mut rng).unwrap();
//! assert_eq!(result.sequence.len(), 22);
//! assert_eq!(result.operator_labels.len(), 6);
//! assert_eq!(result.trace.len(), 20);
//! ```

mod error;
mod machine;
mod request;
mod stochastic;
mod validation;

pub use error::GenerationError;
pub use machine::MarkovMachine;
pub use request::{GenerationRequest, GenerationResult, StepCount, DEFAULT_NUM_STATES};
pub use stochastic::StochasticEngine;
pub use validation::{validate_request, Checked, MIN_SEEDS};

pub(crate) use validation::{
    check_damping, check_initial_state, check_num_states, check_seeds, first_violation,
};

use crate::builder::EngineBuilder;
use rand::Rng;

/// Generate a stochastic sequence in one call.
///
/// The request is validated before any randomness is consumed. The engine
/// then draws its transition matrix, samples its operators and runs the
/// requested number of steps.
pub fn generate<R: Rng + ?Sized>(
    request: &GenerationRequest,
    rng: &mut R,
) -> Result<GenerationResult, GenerationError> {
    first_violation(validate_request(request))?;

    let mut engine = EngineBuilder::from_request(request).build(rng)?;

    let span = tracing::info_span!("generate", run_id = %engine.run_id());
    let _guard = span.enter();
    tracing::info!(
        num_states = engine.num_states(),
        initial_state = engine.current_state(),
        steps = %request.steps(),
        "starting stochastic run"
    );

    engine.run(request.steps(), rng)?;
    Ok(engine.into_result())
}
