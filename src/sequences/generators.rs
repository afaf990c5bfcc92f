//! The built-in static generators.

use super::{SeedRequirement, SequenceError, SequenceGenerator, SequenceState};
use crate::core::Value;

/// Truncate `value` to an integer, failing outside the `i64` range.
fn integer_value(generator: &str, value: Value) -> Result<i64, SequenceError> {
    let truncated = value.trunc();
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    if truncated.is_finite() && truncated >= i64::MIN as Value && truncated < i64::MAX as Value {
        Ok(truncated as i64)
    } else {
        Err(out_of_range(generator, value))
    }
}

fn out_of_range(generator: &str, value: Value) -> SequenceError {
    SequenceError::OutOfRange {
        generator: generator.to_string(),
        value,
    }
}

/// `current + k * step` for `k = 1..=n`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountByStep;

impl SequenceGenerator for CountByStep {
    fn name(&self) -> &str {
        "Count by Step"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::Scalar
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        let current = state.last();
        Ok((1..=num_steps)
            .map(|k| current + k as Value * state.step)
            .collect())
    }
}

/// Each value is the sum of the previous `order` values.
#[derive(Clone, Debug)]
pub struct FixedOrderSum {
    name: String,
    order: usize,
}

impl FixedOrderSum {
    pub fn new(name: impl Into<String>, order: usize) -> Self {
        Self {
            name: name.into(),
            order: order.max(1),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

impl SequenceGenerator for FixedOrderSum {
    fn name(&self) -> &str {
        &self.name
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::History { order: self.order }
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        self.validate(state)?;
        let mut window: Vec<Value> = state.current.values().to_vec();
        let mut produced = Vec::with_capacity(num_steps);
        for _ in 0..num_steps {
            let next: Value = window[window.len() - self.order..].iter().sum();
            window.push(next);
            produced.push(next);
        }
        Ok(produced)
    }
}

/// `a(n) = a(n-1) + a(n-2)`
#[derive(Clone, Copy, Debug, Default)]
pub struct Fibonacci;

impl SequenceGenerator for Fibonacci {
    fn name(&self) -> &str {
        "Fibonacci"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::History { order: 2 }
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        FixedOrderSum::new(self.name(), 2).generate(state, num_steps)
    }
}

/// `a(n) = a(n-1) + a(n-2) + a(n-3)`
#[derive(Clone, Copy, Debug, Default)]
pub struct Tribonacci;

impl SequenceGenerator for Tribonacci {
    fn name(&self) -> &str {
        "Tribonacci"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::History { order: 3 }
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        FixedOrderSum::new(self.name(), 3).generate(state, num_steps)
    }
}

/// `current * ratio^k`, with the step as ratio (0 means 2).
#[derive(Clone, Copy, Debug, Default)]
pub struct Geometric;

impl SequenceGenerator for Geometric {
    fn name(&self) -> &str {
        "Geometric Sequence"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::Scalar
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        let current = state.last();
        let ratio = if state.step == 0.0 { 2.0 } else { state.step };
        Ok((1..=num_steps)
            .map(|k| current * ratio.powi(k as i32))
            .collect())
    }
}

/// Perfect squares after the current value's integer square root.
#[derive(Clone, Copy, Debug, Default)]
pub struct Squares;

impl SequenceGenerator for Squares {
    fn name(&self) -> &str {
        "Perfect Squares"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::Scalar
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        let current = state.last();
        let root = if current >= 0.0 {
            current.sqrt().floor()
        } else {
            0.0
        };
        Ok((1..=num_steps)
            .map(|k| {
                let n = root + k as Value;
                n * n
            })
            .collect())
    }
}

/// The next primes strictly greater than the current value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Primes;

impl Primes {
    fn is_prime(n: i64) -> bool {
        if n < 2 {
            return false;
        }
        if n % 2 == 0 {
            return n == 2;
        }
        let mut i = 3;
        while i <= n / i {
            if n % i == 0 {
                return false;
            }
            i += 2;
        }
        true
    }
}

impl SequenceGenerator for Primes {
    fn name(&self) -> &str {
        "Prime Numbers"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::Scalar
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        let start = integer_value(self.name(), state.last())?;
        let overflow = || out_of_range(self.name(), state.last());
        let mut candidate = start.checked_add(1).ok_or_else(overflow)?;
        let mut primes = Vec::with_capacity(num_steps);
        while primes.len() < num_steps {
            if Self::is_prime(candidate) {
                primes.push(candidate as Value);
                if primes.len() == num_steps {
                    break;
                }
            }
            candidate = candidate.checked_add(1).ok_or_else(overflow)?;
        }
        Ok(primes)
    }
}

/// The 3n + 1 map. Once the value reaches 1 it stays there.
#[derive(Clone, Copy, Debug, Default)]
pub struct Collatz;

impl SequenceGenerator for Collatz {
    fn name(&self) -> &str {
        "Collatz Sequence"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::Scalar
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        let mut current = integer_value(self.name(), state.last())?;
        let mut produced = Vec::with_capacity(num_steps);
        for _ in 0..num_steps {
            if current != 1 {
                current = if current % 2 == 0 {
                    current.div_euclid(2)
                } else {
                    current
                        .checked_mul(3)
                        .and_then(|n| n.checked_add(1))
                        .ok_or_else(|| out_of_range(self.name(), current as Value))?
                };
            }
            produced.push(current as Value);
        }
        Ok(produced)
    }
}

/// Factorials following the smallest `n!` not below the current value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Factorial;

impl SequenceGenerator for Factorial {
    fn name(&self) -> &str {
        "Factorial"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::Scalar
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        let target = state.last();
        let mut n: Value = 1.0;
        let mut fact: Value = 1.0;
        while fact < target && fact.is_finite() {
            n += 1.0;
            fact *= n;
        }

        Ok((0..num_steps)
            .map(|_| {
                n += 1.0;
                fact *= n;
                fact
            })
            .collect())
    }
}

/// `a(n) = 2 a(n-1) - a(n-2) + step`
#[derive(Clone, Copy, Debug, Default)]
pub struct CustomRecurrence;

impl SequenceGenerator for CustomRecurrence {
    fn name(&self) -> &str {
        "Custom Recurrence"
    }

    fn seed_requirement(&self) -> SeedRequirement {
        SeedRequirement::History { order: 2 }
    }

    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError> {
        self.validate(state)?;
        let values = state.current.values();
        let (mut prev, mut last) = (values[values.len() - 2], values[values.len() - 1]);
        let mut produced = Vec::with_capacity(num_steps);
        for _ in 0..num_steps {
            let next = 2.0 * last - prev + state.step;
            produced.push(next);
            prev = last;
            last = next;
        }
        Ok(produced)
    }
}
