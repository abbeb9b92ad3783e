//! Procedure Execution Module
//!
//! Provides the engine that walks a procedure, the step lifecycle, and the
//! operator seam through which steps reach the human running the release.
//!
//! # Architecture
//!
//! - [`engine`]: Sequential, resumable runner
//! - [`step`]: Step trait and the concrete step kinds
//! - [`operator`]: Operator trait and message helpers
//! - [`console`]: Interactive terminal operator

pub mod console;
pub mod engine;
pub mod operator;
pub mod step;

pub use console::ConsoleOperator;
pub use engine::Engine;
pub use operator::{Operator, ScriptedOperator, Tone};
pub use step::Step;
