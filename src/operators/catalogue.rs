//! The fixed catalogue of recurrence operators.

use crate::core::{floor_div, half_up, Operator, Value};

/// Number of entries in the built-in catalogue.
pub const CATALOGUE_SIZE: usize = 16;

/// Build the catalogue, in a fixed order.
///
/// `x` is the most recent value and `y` the one before it.
pub fn builtin_operators() -> Vec<Operator> {
    vec![
        Operator::commutative("x + y", |x, y| x + y),
        Operator::new("x - y", |x, y| x - y),
        Operator::new("y - x", |x, y| y - x),
        Operator::commutative("x + y + 1", |x, y| x + y + 1.0),
        Operator::new("x - y + 1", |x, y| x - y + 1.0),
        Operator::commutative("abs(x - y)", |x, y| (x - y).abs()),
        Operator::commutative("(x + y) // 2", |x, y| ((x + y) / 2.0).floor()),
        Operator::new("(x - y) // 2", |x, y| half_up(x - y)),
        Operator::new("(y - x) // 2", |x, y| half_up(y - x)),
        Operator::commutative("max(x, y)", Value::max),
        Operator::commutative("min(x, y)", Value::min),
        Operator::new("x * 2", |x, _| x * 2.0),
        Operator::new("y * 2", |_, y| y * 2.0),
        Operator::commutative("(x + y) * 2", |x, y| (x + y) * 2.0),
        Operator::new("x // y", floor_div),
        Operator::new("y // x", |x, y| floor_div(y, x)),
    ]
}

/// Operator of the form `x + y + c`, used when more operators are needed
/// than the catalogue holds.
pub fn offset_sum(c: i64) -> Operator {
    let offset = c as Value;
    Operator::commutative(offset_label(c), move |x, y| x + y + offset)
}

pub(crate) fn offset_label(c: i64) -> String {
    format!("x + y + {}", c)
}
