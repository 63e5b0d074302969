use super::functions;
use super::value::Value;
use crate::error::{FormatError, Result};
use std::ops::Range;

/// Text collected for one open function call.
///
/// Results of inner calls are spliced in as text; the byte ranges of spliced
/// booleans are remembered so the argument that consists of exactly such a
/// range is handed on as `Value::Bool`.
#[derive(Debug, Clone)]
pub struct Buffer {
    text: String,
    booleans: Vec<Range<usize>>,
}

impl Buffer {
    /// A buffer for a call whose `$` was just read.
    pub fn open() -> Self {
        Buffer { text: String::from("$"), booleans: Vec::new() }
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    /// Append the result of an inner call.
    pub fn splice(&mut self, value: Value) {
        let start = self.text.len();
        let is_bool = value.is_bool();
        self.text.push_str(&value.into_string());
        if is_bool {
            self.booleans.push(start..self.text.len());
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// A closed call split into its function name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<Value>,
}

impl Command {
    /// Parse a closed buffer of the form `$name(arg1,arg2,...)`.
    ///
    /// Arguments are split on commas not directly preceded by a backslash.
    /// Nested calls have already been evaluated, so arguments are plain text.
    pub fn parse(buffer: &Buffer) -> Result<Command> {
        let text = buffer.as_str();
        let malformed = || FormatError::MalformedArguments { command: text.to_string() };

        let body = text.strip_prefix('$').ok_or_else(malformed)?;
        let open = body.find('(').ok_or_else(malformed)?;
        let name = &body[..open];
        if functions::lookup(name).is_none() {
            return Err(FormatError::UnknownFunction { name: name.to_string() });
        }
        if !text.ends_with(')') {
            return Err(malformed());
        }

        // byte offsets into `text`: skip "$", the name and "("
        let args_start = 1 + open + 1;
        let args_end = text.len() - 1;
        if args_end < args_start {
            return Err(malformed());
        }

        let mut args = Vec::new();
        let mut start = args_start;
        let mut prev = '(';
        for (i, c) in text[args_start..args_end].char_indices() {
            let at = args_start + i;
            if c == ',' && prev != '\\' {
                args.push(buffer.argument(start..at));
                start = at + 1;
            }
            prev = c;
        }
        args.push(buffer.argument(start..args_end));

        Ok(Command { name: name.to_string(), args })
    }
}

impl Buffer {
    fn argument(&self, range: Range<usize>) -> Value {
        let raw = &self.text[range.clone()];
        if self.booleans.contains(&range) {
            return Value::Bool(raw == "true");
        }
        Value::Str(unquote(raw).to_string())
    }
}

/// Strip one pair of matching quotes wrapping the whole argument.
fn unquote(raw: &str) -> &str {
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}
