//! Built-in template functions.
//!
//! The catalogue is closed: a call can only ever dispatch to one of the
//! entries registered here.

use super::command::Command;
use super::value::Value;
use crate::error::{FormatError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

type Handler = fn(&[Value]) -> Result<Value>;

/// A registered function and the number of arguments it accepts.
pub struct Function {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    handler: Handler,
}

impl Function {
    fn new(name: &'static str, min_args: usize, max_args: usize, handler: Handler) -> Self {
        Function { name, min_args, max_args, handler }
    }

    /// Check arity, then run the function.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if args.len() < self.min_args || args.len() > self.max_args {
            return Err(FormatError::ArgumentCountMismatch {
                function: self.name,
                expected: self.arity(),
                got: args.len(),
            });
        }
        (self.handler)(args)
    }

    /// Human readable arity, e.g. "2" or "2-3".
    pub fn arity(&self) -> String {
        if self.min_args == self.max_args {
            self.min_args.to_string()
        } else {
            format!("{}-{}", self.min_args, self.max_args)
        }
    }
}

static REGISTRY: Lazy<HashMap<&'static str, Function>> = Lazy::new(|| {
    [
        Function::new("num", 2, 2, num),
        Function::new("strcmp", 2, 2, strcmp),
        Function::new("if1", 2, 3, if1),
        Function::new("ifequal", 4, 4, ifequal),
        Function::new("ifgreater", 4, 4, ifgreater),
    ]
    .into_iter()
    .map(|f| (f.name, f))
    .collect()
});

pub fn lookup(name: &str) -> Option<&'static Function> {
    REGISTRY.get(name)
}

/// Registered function names, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Dispatch a parsed command to its implementation.
pub fn call(command: &Command) -> Result<Value> {
    let function = lookup(&command.name)
        .ok_or_else(|| FormatError::UnknownFunction { name: command.name.clone() })?;
    function.call(&command.args)
}

/// Widest padding `$num` accepts; longer names are not legal path components anyway.
pub const MAX_PAD_WIDTH: usize = 255;

/// Left-pad `value` with zeros to `width` characters. Never truncates.
pub fn zero_pad(value: &str, width: usize) -> String {
    let mut padded = "0".repeat(width.saturating_sub(value.chars().count()));
    padded.push_str(value);
    padded
}

/// `$num(value,width)`: left-pad with zeros, never truncate.
fn num(args: &[Value]) -> Result<Value> {
    let value = args[0].to_string();
    let requested = integer("num", &args[1])?;
    let width = usize::try_from(requested).unwrap_or(0);
    if width > MAX_PAD_WIDTH {
        return Err(FormatError::WidthOutOfRange { width: requested, max: MAX_PAD_WIDTH });
    }
    Ok(Value::Str(zero_pad(&value, width)))
}

fn strcmp(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args[0].to_string() == args[1].to_string()))
}

/// `$if1(cond,then[,else])`: `cond` has to be a boolean produced by a comparison.
fn if1(args: &[Value]) -> Result<Value> {
    let cond = args[0].as_bool().ok_or_else(|| FormatError::TypeMismatch {
        function: "if1",
        position: 1,
        got: args[0].to_string(),
    })?;
    if cond {
        Ok(args[1].clone())
    } else {
        Ok(args.get(2).cloned().unwrap_or_else(|| Value::Str(String::new())))
    }
}

fn ifequal(args: &[Value]) -> Result<Value> {
    let a = integer("ifequal", &args[0])?;
    let b = integer("ifequal", &args[1])?;
    Ok(if a == b { args[2].clone() } else { args[3].clone() })
}

fn ifgreater(args: &[Value]) -> Result<Value> {
    let a = integer("ifgreater", &args[0])?;
    let b = integer("ifgreater", &args[1])?;
    Ok(if a > b { args[2].clone() } else { args[3].clone() })
}

/// Integer coercion shared by the numeric functions; blank counts as 0.
fn integer(function: &'static str, value: &Value) -> Result<i64> {
    let text = value.to_string();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| FormatError::InvalidInteger { function, value: text.clone() })
}
