//! Menu entries for the interactive explorer.

use super::generators::{
    Collatz, CountByStep, CustomRecurrence, Factorial, Fibonacci, Geometric, Primes, Squares,
    Tribonacci,
};
use super::{Seed, SequenceGenerator, SequenceState};
use crate::core::Value;
use std::fmt;

/// A selectable generator together with its default starting state.
pub struct MenuEntry {
    pub key: &'static str,
    pub generator: Box<dyn SequenceGenerator>,
    pub initial: Seed,
    pub step: Value,
}

impl MenuEntry {
    fn new(
        key: &'static str,
        generator: impl SequenceGenerator + 'static,
        initial: Seed,
        step: Value,
    ) -> Self {
        Self {
            key,
            generator: Box::new(generator),
            initial,
            step,
        }
    }

    pub fn name(&self) -> &str {
        self.generator.name()
    }

    /// Fresh state at the entry's defaults.
    pub fn initial_state(&self) -> SequenceState {
        SequenceState {
            current: self.initial.clone(),
            step: self.step,
        }
    }
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEntry")
            .field("key", &self.key)
            .field("name", &self.name())
            .field("initial", &self.initial)
            .field("step", &self.step)
            .finish()
    }
}

/// The nine menu entries in display order.
pub fn catalogue() -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("1", CountByStep, Seed::Scalar(0.0), 1.0),
        MenuEntry::new("2", Fibonacci, Seed::History(vec![0.0, 1.0]), 1.0),
        MenuEntry::new("3", Geometric, Seed::Scalar(1.0), 2.0),
        MenuEntry::new("4", Squares, Seed::Scalar(0.0), 1.0),
        MenuEntry::new("5", Primes, Seed::Scalar(1.0), 1.0),
        MenuEntry::new("6", Collatz, Seed::Scalar(10.0), 1.0),
        MenuEntry::new("7", Tribonacci, Seed::History(vec![0.0, 0.0, 1.0]), 1.0),
        MenuEntry::new("8", Factorial, Seed::Scalar(1.0), 1.0),
        MenuEntry::new("9", CustomRecurrence, Seed::History(vec![1.0, 2.0]), 1.0),
    ]
}

/// Look up an entry by its menu key.
pub fn find_entry(key: &str) -> Option<MenuEntry> {
    let key = key.trim();
    catalogue().into_iter().find(|entry| entry.key == key)
}
