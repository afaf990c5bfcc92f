//! Labeled binary operators used as recurrence steps.
//!
//! An operator is a pure function of the two most recent sequence values.
//! Every operator carries an explicit, immutable label supplied at
//! construction; labels are what the trace and the CLI display.

use std::fmt;
use std::sync::Arc;

/// Numeric type of every sequence value.
pub type Value = f64;

/// Shared binary function `(x, y) -> value` where `x` is the most recent
/// value and `y` the one before it.
pub type OperatorFn = Arc<dyn Fn(Value, Value) -> Value + Send + Sync>;

/// A pure binary recurrence operator paired with its display label.
///
/// # Example
///
/// ```rust
/// use seqlab::core::Operator;
///
/// let sub = Operator::new("x - y", |x, y| x - y);
/// assert_eq!(sub.label(), "x - y");
/// assert_eq!(sub.apply(5.0, 3.0), 2.0);
/// assert!(!sub.is_commutative());
/// ```
#[derive(Clone)]
pub struct Operator {
    label: String,
    commutative: bool,
    func: OperatorFn,
}

impl Operator {
    /// Create a non-commutative operator.
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value, Value) -> Value + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            commutative: false,
            func: Arc::new(func),
        }
    }

    /// Create an operator whose result does not depend on argument order.
    pub fn commutative<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value, Value) -> Value + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            commutative: true,
            func: Arc::new(func),
        }
    }

    /// Display label, e.g. `"x + y"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_commutative(&self) -> bool {
        self.commutative
    }

    /// Apply the operator to `(x, y)` = `(sequence[-1], sequence[-2])`.
    pub fn apply(&self, x: Value, y: Value) -> Value {
        (self.func)(x, y)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("label", &self.label)
            .field("commutative", &self.commutative)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Replace a zero divisor with 1.
fn nonzero_divisor(d: Value) -> Value {
    if d == 0.0 {
        1.0
    } else {
        d
    }
}

/// Integer division rounding toward negative infinity.
pub(crate) fn floor_div(a: Value, b: Value) -> Value {
    (a / nonzero_divisor(b)).floor()
}

/// Floor-halve even values; anything else is bumped by one first.
pub(crate) fn half_up(a: Value) -> Value {
    if a.rem_euclid(2.0) == 0.0 {
        (a / 2.0).floor()
    } else {
        ((a + 1.0) / 2.0).floor()
    }
}
