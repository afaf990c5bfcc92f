//! Property-based tests for the stochastic engine and its parts.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use seqlab::core::{TransitionMatrix, Value, ROW_SUM_TOLERANCE};
use seqlab::engine::{generate, GenerationRequest};
use seqlab::operators::{sample_operators, OperatorPool};
use seqlab::sequences::{Session, SequenceState};
use seqlab::EngineBuilder;
use std::collections::HashSet;

prop_compose! {
    fn arbitrary_seeds()(seeds in prop::collection::vec(-50i32..50, 2..5)) -> Vec<Value> {
        seeds.into_iter().map(Value::from).collect()
    }
}

prop_compose! {
    fn arbitrary_request()(
        seeds in arbitrary_seeds(),
        steps in 1usize..40,
        num_states in 1usize..12,
    )(
        initial_state in 0..num_states,
        seeds in Just(seeds),
        steps in Just(steps),
        num_states in Just(num_states),
    ) -> GenerationRequest {
        GenerationRequest::append(seeds, steps)
            .with_num_states(num_states)
            .with_initial_state(initial_state)
    }
}

fn bits(values: &[Value]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}

proptest! {
    #[test]
    fn matrix_rows_are_stochastic(
        n in 1usize..20,
        damping in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let matrix = TransitionMatrix::build(n, damping, &mut rng).unwrap();

        prop_assert_eq!(matrix.num_states(), n);
        for row in matrix.rows() {
            prop_assert_eq!(row.len(), n);
            prop_assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
            let sum: f64 = row.iter().sum();
            prop_assert!((sum - 1.0).abs() <= ROW_SUM_TOLERANCE);
        }
    }

    #[test]
    fn sampled_states_are_in_range(n in 1usize..10, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let matrix = TransitionMatrix::build(n, 0.2, &mut rng).unwrap();
        for state in 0..n {
            let next = matrix.sample_next(state, &mut rng);
            prop_assert!(next < n);
        }
    }

    #[test]
    fn sequence_grows_by_requested_steps(request in arbitrary_request(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = generate(&request, &mut rng).unwrap();

        let seeds = request.initial_values();
        let appended = request.steps().values_to_append(seeds.len());
        prop_assert_eq!(result.sequence.len(), seeds.len() + appended);
        prop_assert_eq!(&result.sequence[..seeds.len()], seeds);
        prop_assert_eq!(result.trace.len(), result.appended().len());
        prop_assert_eq!(result.operator_labels.len(), request.num_states());
    }

    #[test]
    fn trace_is_a_connected_path(request in arbitrary_request(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = generate(&request, &mut rng).unwrap();
        let records = result.trace.records();

        prop_assert_eq!(records[0].from_state, request.initial_state());
        for pair in records.windows(2) {
            prop_assert_eq!(pair[0].new_state, pair[1].from_state);
        }
        for (i, record) in records.iter().enumerate() {
            prop_assert_eq!(record.step_index, i + 1);
            prop_assert_eq!(
                record.operator_label.as_str(),
                result.operator_labels[record.from_state].as_str()
            );
            prop_assert_eq!(
                record.produced().to_bits(),
                result.sequence[result.seed_count + i].to_bits()
            );
        }
    }

    #[test]
    fn same_seed_same_run(request in arbitrary_request(), seed in any::<u64>()) {
        let first = generate(&request, &mut StdRng::seed_from_u64(seed)).unwrap();
        let second = generate(&request, &mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(bits(&first.sequence), bits(&second.sequence));
        prop_assert_eq!(first.transition_matrix, second.transition_matrix);
        prop_assert_eq!(first.operator_labels, second.operator_labels);
        prop_assert_eq!(first.trace.path(), second.trace.path());
    }

    #[test]
    fn sampled_operator_labels_are_distinct(n in 0usize..60, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let operators = sample_operators(n, &mut rng);

        prop_assert_eq!(operators.len(), n);
        let labels: HashSet<_> = operators.iter().map(|op| op.label().to_string()).collect();
        prop_assert_eq!(labels.len(), n);
    }

    #[test]
    fn sampled_labels_resolve_to_same_function(
        n in 1usize..40,
        seed in any::<u64>(),
        x in -100i32..100,
        y in -100i32..100,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let pool = OperatorPool::new();
        for op in pool.sample(n, &mut rng) {
            let found = pool.find(op.label()).unwrap();
            let (x, y) = (Value::from(x), Value::from(y));
            prop_assert_eq!(found.apply(x, y).to_bits(), op.apply(x, y).to_bits());
        }
    }

    #[test]
    fn commutative_operators_ignore_order(x in -1000i32..1000, y in -1000i32..1000) {
        let (x, y) = (Value::from(x), Value::from(y));
        for op in OperatorPool::new().catalogue().iter().filter(|op| op.is_commutative()) {
            prop_assert_eq!(op.apply(x, y), op.apply(y, x), "{}", op.label());
        }
    }

    #[test]
    fn session_history_grows_by_requested_count(steps in prop::collection::vec(1usize..8, 1..6)) {
        let entry = seqlab::sequences::find_entry("2").unwrap();
        let mut session = Session::from_entry(entry);
        let mut expected_len = 2;
        for n in steps {
            let produced = session.advance(n).unwrap();
            prop_assert_eq!(produced.len(), n);
            expected_len += n;
            prop_assert_eq!(session.state().current.len(), expected_len);
        }
    }
}

#[test]
fn damped_diagonal_is_lower_on_average() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 5;
    let (mut diagonal, mut off_diagonal) = (0.0, 0.0);
    for _ in 0..200 {
        let matrix = TransitionMatrix::build(n, 0.2, &mut rng).unwrap();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    diagonal += matrix.rows()[i][j];
                } else {
                    off_diagonal += matrix.rows()[i][j];
                }
            }
        }
    }
    let diagonal_mean = diagonal / (200 * n) as f64;
    let off_diagonal_mean = off_diagonal / (200 * n * (n - 1)) as f64;
    assert!(diagonal_mean < off_diagonal_mean);
}

#[test]
fn fibonacci_through_injected_parts() {
    let mut rng = StdRng::seed_from_u64(0);
    let pool = OperatorPool::new();
    let mut engine = EngineBuilder::new()
        .seeds(vec![2.0, 3.0])
        .transition_matrix(TransitionMatrix::uniform(1))
        .operators(vec![pool.find("x + y").unwrap()])
        .build(&mut rng)
        .unwrap();

    engine.extend(4, &mut rng).unwrap();
    assert_eq!(engine.sequence(), &[2.0, 3.0, 5.0, 8.0, 13.0, 21.0]);
}

#[test]
fn total_length_matches_append() {
    let request = GenerationRequest::total_length(vec![2.0, 3.0], 6).with_num_states(3);
    let result = generate(&request, &mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(result.sequence.len(), 6);
    assert_eq!(result.appended().len(), 4);
}

#[test]
fn static_state_is_reusable() {
    let state = SequenceState::history(vec![0.0, 1.0], 1.0);
    let entry = seqlab::sequences::find_entry("2").unwrap();
    let first = entry.generator.generate(&state, 5).unwrap();
    let second = entry.generator.generate(&state, 5).unwrap();
    assert_eq!(first, second);
}
