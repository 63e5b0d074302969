//! Naming template engine.
//!
//! A template mixes literal text, `%KEY%` placeholders and nested
//! `$function(arg,...)` calls, e.g.
//! `%ALBARTIST%/[%YEAR%] %ALBTITLE%/$num(%TRACK%,2) %TITLE%%TYPE%`.
//! Placeholders are substituted first, then a single scan evaluates the calls
//! inside-out.

pub mod command;
pub mod functions;
pub mod placeholder;
pub mod scanner;
pub mod value;

use crate::error::Result;
use std::collections::HashMap;
use tracing::debug;

pub use placeholder::resolve_placeholders;
pub use scanner::{scan, split_top_level, Evaluation};
pub use value::Value;

/// Resolve `template` against `metadata`, discarding diagnostics.
///
/// Recoverable problems still show up as sentinel text in the result.
pub fn evaluate(template: &str, metadata: &HashMap<String, String>) -> Result<String> {
    evaluate_with_diagnostics(template, metadata).map(|eval| eval.output)
}

/// Resolve `template` against `metadata`, keeping the list of recoverable
/// problems that were replaced by sentinels.
pub fn evaluate_with_diagnostics(
    template: &str,
    metadata: &HashMap<String, String>,
) -> Result<Evaluation> {
    let resolved = resolve_placeholders(template, metadata);
    debug!(template, resolved = %resolved, "placeholders resolved");
    scan(&resolved)
}

/// Check that a template evaluates cleanly with every placeholder blank.
pub fn validate(template: &str) -> Result<Evaluation> {
    evaluate_with_diagnostics(template, &HashMap::new())
}
