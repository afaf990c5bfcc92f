//! Precondition checks for generation requests.
//!
//! Checks use Stillwater's `Validation` so that every violated precondition
//! is reported together. The fail-fast entry points surface only the first
//! violation, in the order: seeds, step count, state count, initial state,
//! damping.

use crate::builder::BuildError;
use crate::engine::error::GenerationError;
use crate::engine::request::{GenerationRequest, StepCount};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Accumulated result of request validation.
pub type Checked = Validation<(), NonEmptyVec<GenerationError>>;

/// Minimum number of seed values a recurrence needs.
pub const MIN_SEEDS: usize = 2;

/// Validate every precondition of `request`, collecting all violations.
///
/// # Example
///
/// ```rust
/// use seqlab::engine::{validate_request, GenerationError, GenerationRequest};
/// use stillwater::validation::Validation;
///
/// let request = GenerationRequest::append(vec![5.0], 0).with_initial_state(9);
///
/// match validate_request(&request) {
///     Validation::Failure(errors) => {
///         assert_eq!(errors.len(), 3);
///         assert!(errors
///             .iter()
///             .any(|e| matches!(e, GenerationError::InsufficientSeed { provided: 1 })));
///     }
///     Validation::Success(_) => panic!("expected violations"),
/// }
/// ```
pub fn validate_request(request: &GenerationRequest) -> Checked {
    let seeds = request.initial_values().len();
    let checks = vec![
        check_seeds(seeds),
        check_step_count(request.steps(), seeds),
        check_num_states(request.num_states()),
        check_initial_state(request.initial_state(), request.num_states()),
        check_damping(request.damping()),
    ];
    Validation::all_vec(checks).map(|_| ())
}

/// Collapse an accumulated validation into its first violation.
pub(crate) fn first_violation(checked: Checked) -> Result<(), GenerationError> {
    match checked {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => errors.iter().next().cloned().map_or(Ok(()), Err),
    }
}

pub(crate) fn check_seeds(provided: usize) -> Checked {
    if provided < MIN_SEEDS {
        Validation::fail(GenerationError::InsufficientSeed { provided })
    } else {
        Validation::success(())
    }
}

pub(crate) fn check_step_count(steps: StepCount, seeds: usize) -> Checked {
    if steps.values_to_append(seeds) == 0 {
        Validation::fail(GenerationError::InvalidStepCount { requested: steps })
    } else {
        Validation::success(())
    }
}

pub(crate) fn check_num_states(num_states: usize) -> Checked {
    if num_states == 0 {
        Validation::fail(GenerationError::Build(BuildError::NoStates))
    } else {
        Validation::success(())
    }
}

pub(crate) fn check_initial_state(state: usize, num_states: usize) -> Checked {
    // An empty state space is already reported by check_num_states.
    if num_states > 0 && state >= num_states {
        Validation::fail(GenerationError::InvalidState { state, num_states })
    } else {
        Validation::success(())
    }
}

pub(crate) fn check_damping(damping: f64) -> Checked {
    if damping.is_finite() && (0.0..=1.0).contains(&damping) {
        Validation::success(())
    } else {
        Validation::fail(GenerationError::Build(BuildError::InvalidDamping { damping }))
    }
}
