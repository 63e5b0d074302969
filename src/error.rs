//! Errors raised while evaluating a naming template.
//!
//! Two severities exist:
//! - Recoverable (unknown function, malformed argument list): the engine
//!   substitutes a visible sentinel and keeps going.
//! - Fatal (unterminated call, wrong arity, wrong argument type, bad integer):
//!   evaluation stops and the error is returned to the caller.

use thiserror::Error;

/// Sentinel spliced in place of a call to an unregistered function.
pub const UNKNOWN_COMMAND: &str = "unknown command";

/// Sentinel spliced in place of a call whose argument list cannot be located.
pub const MALFORMED_ARGUMENTS: &str = "cannot parse arguments";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    // =========================================================================
    // Recoverable - replaced by a sentinel in the output
    // =========================================================================
    #[error("unknown function '${name}'")]
    UnknownFunction { name: String },

    #[error("cannot parse argument list of '{command}'")]
    MalformedArguments { command: String },

    // =========================================================================
    // Fatal - the template is broken for every track
    // =========================================================================
    #[error("unterminated expression: {open} function call(s) still open at end of template")]
    UnterminatedExpression { open: usize },

    #[error("${function} expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        function: &'static str,
        expected: String,
        got: usize,
    },

    #[error("${function}: argument {position} must be a boolean, got string '{got}'")]
    TypeMismatch {
        function: &'static str,
        position: usize,
        got: String,
    },

    #[error("${function}: '{value}' is not an integer")]
    InvalidInteger { function: &'static str, value: String },

    #[error("$num: width {width} is larger than {max}")]
    WidthOutOfRange { width: i64, max: usize },
}

pub type Result<T> = std::result::Result<T, FormatError>;

impl FormatError {
    /// Returns true if evaluation continues with a sentinel instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FormatError::UnknownFunction { .. } | FormatError::MalformedArguments { .. }
        )
    }

    /// The text spliced into the output for a recoverable error.
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            FormatError::UnknownFunction { .. } => Some(UNKNOWN_COMMAND),
            FormatError::MalformedArguments { .. } => Some(MALFORMED_ARGUMENTS),
            _ => None,
        }
    }
}
