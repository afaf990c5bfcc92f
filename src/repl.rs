//! Input parsing and text rendering for the interactive runners.
//!
//! Everything here returns strings; the binary decides where they go.

use crate::core::{StepRecord, TransitionMatrix, Value};
use std::fmt::Write as _;
use thiserror::Error;

/// Lists longer than this are elided in the middle.
pub const ELIDE_ABOVE: usize = 10;
const EDGE: usize = 5;

/// One line of user input, interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Generate(usize),
    Exit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a positive number.")]
    NotPositive,

    #[error("Invalid input '{0}'. Press Enter, type a number, or 'x' to exit.")]
    Invalid(String),
}

/// Empty input generates one value, `x` exits, a positive integer generates
/// that many values.
pub fn parse_action(line: &str) -> Result<Action, InputError> {
    let input = line.trim();
    if input.is_empty() {
        return Ok(Action::Generate(1));
    }
    if input.eq_ignore_ascii_case("x") {
        return Ok(Action::Exit);
    }
    match input.parse::<i64>() {
        Ok(n) if n > 0 => Ok(Action::Generate(n as usize)),
        Ok(_) => Err(InputError::NotPositive),
        Err(_) => Err(InputError::Invalid(input.to_string())),
    }
}

/// `[a, b, c]`
pub fn format_values(values: &[Value]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Numbered listing of freshly generated values, eliding long runs to the
/// first and last five.
pub fn render_values(values: &[Value]) -> String {
    let mut out = String::new();
    if values.len() <= ELIDE_ABOVE {
        for (i, v) in values.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}", i + 1, v);
        }
        return out;
    }

    let _ = writeln!(out, "First {EDGE}:");
    for (i, v) in values.iter().enumerate().take(EDGE) {
        let _ = writeln!(out, "  {:>3}. {}", i + 1, v);
    }
    let _ = writeln!(out, "... ({} more) ...", values.len() - 2 * EDGE);
    let _ = writeln!(out, "Last {EDGE}:");
    let tail = values.len() - EDGE;
    for (i, v) in values.iter().enumerate().skip(tail) {
        let _ = writeln!(out, "  {:>3}. {}", i + 1, v);
    }
    out
}

/// The whole history when short, otherwise its last ten values.
pub fn summarize_history(values: &[Value]) -> String {
    if values.len() <= ELIDE_ABOVE {
        format!("Complete sequence: {}", format_values(values))
    } else {
        let tail = &values[values.len() - ELIDE_ABOVE..];
        format!("Last {ELIDE_ABOVE} values: {}", format_values(tail))
    }
}

/// One line per row, probabilities to three decimals.
pub fn format_matrix(matrix: &TransitionMatrix) -> String {
    let mut out = String::new();
    for (i, row) in matrix.rows().iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|p| format!("'{p:.3}'")).collect();
        let _ = writeln!(out, "  State {i}: [{}]", cells.join(", "));
    }
    out
}

pub fn format_operators(labels: &[String]) -> String {
    let mut out = String::new();
    for (i, label) in labels.iter().enumerate() {
        let _ = writeln!(out, "  State {i}: {label}");
    }
    out
}

pub fn format_step(record: &StepRecord) -> String {
    let [x, value] = record.last_two_values;
    format!(
        "Step {}: State {} -> {} | {} | {} -> {}",
        record.step_index, record.from_state, record.new_state, record.operator_label, x, value
    )
}
