//! Core library for music-file-naming
pub mod config;
pub mod error;
pub mod formatting;
pub mod models;
pub mod naming;
pub mod util;

pub use error::{FormatError, Result};
pub use formatting::{evaluate, evaluate_with_diagnostics, Evaluation, Value};
