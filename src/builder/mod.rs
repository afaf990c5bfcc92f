//! Builder API for assembling stochastic engines.
//!
//! The builder validates seeds, state count, initial state and damping
//! before touching the random source, and lets tests inject a fixed
//! transition matrix or operator assignment.

pub mod engine;
pub mod error;

pub use engine::EngineBuilder;
pub use error::BuildError;
