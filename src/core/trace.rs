//! Per-step trace of a stochastic run.
//!
//! Every recurrence step produces a `StepRecord` describing which operator
//! fired, which state the chain moved to, and the two most recent values.
//! The engine never prints; callers render the trace however they like.

use super::operator::Value;
use serde::{Deserialize, Serialize};

/// Record of a single recurrence step.
///
/// # Example
///
/// ```rust
/// use seqlab::core::StepRecord;
///
/// let record = StepRecord {
///     step_index: 1,
///     from_state: 0,
///     new_state: 2,
///     operator_label: "x + y".to_string(),
///     last_two_values: [3.0, 5.0],
/// };
/// assert_eq!(record.produced(), 5.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based index of the step within the run
    pub step_index: usize,
    /// State whose operator produced the value
    pub from_state: usize,
    /// State committed after sampling the transition
    pub new_state: usize,
    /// Label of the operator that fired
    pub operator_label: String,
    /// `[sequence[-2], sequence[-1]]` after the value was appended
    pub last_two_values: [Value; 2],
}

impl StepRecord {
    /// Value appended by this step.
    pub fn produced(&self) -> Value {
        self.last_two_values[1]
    }

    pub fn stayed(&self) -> bool {
        self.from_state == self.new_state
    }
}

/// Ordered log of step records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    records: Vec<StepRecord>,
}

impl Trace {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record. Step indices are expected to increase by one.
    pub fn record(&mut self, record: StepRecord) {
        debug_assert!(
            self.records
                .last()
                .map_or(true, |last| last.step_index + 1 == record.step_index),
            "step indices must be consecutive"
        );
        self.records.push(record);
    }

    /// States visited, in order: the first record's starting state followed
    /// by the state committed after each step.
    ///
    /// ```rust
    /// use seqlab::core::{StepRecord, Trace};
    ///
    /// let mut trace = Trace::new();
    /// trace.record(StepRecord {
    ///     step_index: 1,
    ///     from_state: 0,
    ///     new_state: 1,
    ///     operator_label: "x + y".into(),
    ///     last_two_values: [1.0, 2.0],
    /// });
    /// trace.record(StepRecord {
    ///     step_index: 2,
    ///     from_state: 1,
    ///     new_state: 0,
    ///     operator_label: "x - y".into(),
    ///     last_two_values: [2.0, 1.0],
    /// });
    ///
    /// assert_eq!(trace.path(), vec![0, 1, 0]);
    /// ```
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(first.from_state);
        }
        path.extend(self.records.iter().map(|r| r.new_state));
        path
    }

    /// How many times each state's operator fired, indexed by state.
    pub fn operator_usage(&self, num_states: usize) -> Vec<usize> {
        let mut counts = vec![0; num_states];
        for record in &self.records {
            if let Some(count) = counts.get_mut(record.from_state) {
                *count += 1;
            }
        }
        counts
    }

    /// Fraction of steps that stayed in the same state.
    pub fn self_transition_rate(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let stayed = self.records.iter().filter(|r| r.stayed()).count();
        Some(stayed as f64 / self.records.len() as f64)
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step_index: usize, from: usize, to: usize) -> StepRecord {
        StepRecord {
            step_index,
            from_state: from,
            new_state: to,
            operator_label: format!("op{}", from),
            last_two_values: [step_index as Value, step_index as Value + 1.0],
        }
    }

    #[test]
    fn new_trace_is_empty() {
        let trace = Trace::new();
        assert!(trace.is_empty());
        assert!(trace.path().is_empty());
        assert!(trace.self_transition_rate().is_none());
        assert!(trace.last().is_none());
    }

    #[test]
    fn record_appends_in_order() {
        let mut trace = Trace::new();
        trace.record(record(1, 0, 1));
        trace.record(record(2, 1, 2));

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.records()[0].step_index, 1);
        assert_eq!(trace.last().map(|r| r.step_index), Some(2));
    }

    #[test]
    fn path_returns_state_sequence() {
        let mut trace = Trace::new();
        trace.record(record(1, 0, 1));
        trace.record(record(2, 1, 1));
        trace.record(record(3, 1, 0));

        assert_eq!(trace.path(), vec![0, 1, 1, 0]);
    }

    #[test]
    fn operator_usage_counts_firing_states() {
        let mut trace = Trace::new();
        trace.record(record(1, 0, 1));
        trace.record(record(2, 1, 1));
        trace.record(record(3, 1, 0));

        assert_eq!(trace.operator_usage(3), vec![1, 2, 0]);
    }

    #[test]
    fn self_transition_rate_counts_stays() {
        let mut trace = Trace::new();
        trace.record(record(1, 0, 0));
        trace.record(record(2, 0, 1));

        assert_eq!(trace.self_transition_rate(), Some(0.5));
    }

    #[test]
    fn produced_is_the_newest_value() {
        let r = record(4, 0, 0);
        assert_eq!(r.produced(), 5.0);
    }

    #[test]
    fn trace_serializes_correctly() {
        let mut trace = Trace::new();
        trace.record(record(1, 0, 1));

        let json = serde_json::to_string(&trace).unwrap();
        let deserialized: Trace = serde_json::from_str(&json).unwrap();

        assert_eq!(trace, deserialized);
    }
}
