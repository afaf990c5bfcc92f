//! A running static sequence.

use super::{MenuEntry, SequenceError, SequenceGenerator, SequenceState};
use crate::core::Value;

/// Owns a generator and its evolving state.
pub struct Session {
    generator: Box<dyn SequenceGenerator>,
    state: SequenceState,
    iterations: usize,
}

impl Session {
    pub fn new(generator: Box<dyn SequenceGenerator>, state: SequenceState) -> Self {
        Self {
            generator,
            state,
            iterations: 0,
        }
    }

    /// Start a session at the entry's default state.
    pub fn from_entry(entry: MenuEntry) -> Self {
        let state = entry.initial_state();
        Self::new(entry.generator, state)
    }

    pub fn name(&self) -> &str {
        self.generator.name()
    }

    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    /// Number of successful `advance` calls.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Generate `num_steps` values and fold them into the state.
    ///
    /// The state is left untouched on error.
    pub fn advance(&mut self, num_steps: usize) -> Result<Vec<Value>, SequenceError> {
        self.generator.validate(&self.state)?;
        let produced = self.generator.generate(&self.state, num_steps)?;
        self.state.absorb(&produced);
        self.iterations += 1;
        tracing::debug!(
            generator = self.generator.name(),
            produced = produced.len(),
            iteration = self.iterations,
            "Advanced static sequence"
        );
        Ok(produced)
    }
}
