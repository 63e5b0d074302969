use super::command::{Buffer, Command};
use super::functions;
use super::value::Value;
use crate::error::{FormatError, Result};
use tracing::{debug, warn};

/// Output of a scan: the resolved text plus any recoverable problems that
/// were replaced by sentinels along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub output: String,
    pub diagnostics: Vec<FormatError>,
}

impl Evaluation {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Walk a placeholder-resolved template once, left to right.
///
/// Every `$` opens a call buffer on the stack; an unescaped `)` closes the
/// innermost one, which is evaluated right away and spliced into its parent
/// (or the output at top level). A character is escaped when the character
/// just before it is a backslash; only one character of lookback is used.
pub fn scan(input: &str) -> Result<Evaluation> {
    let mut stack: Vec<Buffer> = Vec::new();
    let mut eval =
        Evaluation { output: String::with_capacity(input.len()), diagnostics: Vec::new() };
    let mut last: Option<char> = None;

    for c in input.chars() {
        let escaped = last == Some('\\');
        match c {
            '$' => stack.push(Buffer::open()),
            ')' if !escaped => match stack.pop() {
                Some(mut buffer) => {
                    buffer.push(c);
                    let value = close(&buffer, &mut eval.diagnostics)?;
                    match stack.last_mut() {
                        Some(parent) => parent.splice(value),
                        None => eval.output.push_str(&value.into_string()),
                    }
                }
                // stray ")" at top level is plain text, e.g. "Album (Live)"
                None => eval.output.push(c),
            },
            _ => match stack.last_mut() {
                Some(buffer) => buffer.push(c),
                None => eval.output.push(c),
            },
        }
        last = Some(c);
    }

    if !stack.is_empty() {
        return Err(FormatError::UnterminatedExpression { open: stack.len() });
    }
    Ok(eval)
}

/// Split a template on `sep` wherever no function call is open.
///
/// Depth follows the same rules as [`scan`]: `$` opens a call, an unescaped
/// `)` closes one. Separators inside call arguments stay in their component.
pub fn split_top_level(template: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut last: Option<char> = None;
    for (i, c) in template.char_indices() {
        let escaped = last == Some('\\');
        match c {
            '$' => depth += 1,
            ')' if !escaped && depth > 0 => depth -= 1,
            _ if c == sep && depth == 0 => {
                parts.push(&template[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
        last = Some(c);
    }
    parts.push(&template[start..]);
    parts
}

/// Parse and run one closed call. Recoverable errors turn into a sentinel.
fn close(buffer: &Buffer, diagnostics: &mut Vec<FormatError>) -> Result<Value> {
    let outcome = Command::parse(buffer).and_then(|command| {
        let value = functions::call(&command)?;
        debug!(function = %command.name, result = %value, "evaluated call");
        Ok(value)
    });
    match outcome {
        Ok(value) => Ok(value),
        Err(e) => match e.sentinel() {
            Some(sentinel) => {
                warn!("{} in '{}'; substituting '{}'", e, buffer.as_str(), sentinel);
                diagnostics.push(e);
                Ok(Value::Str(sentinel.to_string()))
            }
            None => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MALFORMED_ARGUMENTS, UNKNOWN_COMMAND};

    fn out(input: &str) -> String {
        scan(input).unwrap().output
    }

    #[test]
    fn literal_text_passes_through() {
        assert_eq!(out("Advance/[2014] Deus Ex Machina"), "Advance/[2014] Deus Ex Machina");
        assert_eq!(out("Album (Live)"), "Album (Live)");
    }

    #[test]
    fn nested_calls_resolve_inside_out() {
        assert_eq!(out("$if1($strcmp(a,a),same,diff)"), "same");
        assert_eq!(out("$if1($strcmp(a,b),same,diff)"), "diff");
        assert_eq!(out("$num($if1($strcmp(x,x),7,8),3)"), "007");
    }

    #[test]
    fn top_level_boolean_is_printed() {
        assert_eq!(out("[$strcmp(a,a)]"), "[true]");
    }

    #[test]
    fn boolean_consumed_two_levels_up_is_text() {
        // the inner boolean is spliced into $num's argument, then $if1 sees a string
        let err = scan("$if1($num($strcmp(a,a),0),x)").unwrap_err();
        assert!(matches!(err, FormatError::TypeMismatch { .. }));
    }

    #[test]
    fn unterminated_call_is_an_error() {
        assert_eq!(scan("abc $num(1,2"), Err(FormatError::UnterminatedExpression { open: 1 }));
        assert_eq!(scan("$if1($strcmp(a,b"), Err(FormatError::UnterminatedExpression { open: 2 }));
        assert_eq!(scan("price $5"), Err(FormatError::UnterminatedExpression { open: 1 }));
    }

    #[test]
    fn unknown_function_leaves_sentinel() {
        let eval = scan("a $upper(x) b").unwrap();
        assert_eq!(eval.output, format!("a {} b", UNKNOWN_COMMAND));
        assert_eq!(eval.diagnostics, vec![FormatError::UnknownFunction { name: "upper".into() }]);
        assert!(!eval.is_clean());
    }

    #[test]
    fn call_without_parenthesis_is_malformed() {
        let eval = scan("$num)x").unwrap();
        assert_eq!(eval.output, format!("{}x", MALFORMED_ARGUMENTS));
        assert!(matches!(eval.diagnostics[0], FormatError::MalformedArguments { .. }));
    }

    #[test]
    fn escaped_parenthesis_and_comma_are_literal() {
        assert_eq!(out(r"$num(1\),4)"), r"01\)");
        assert_eq!(out(r"$if1($strcmp(a\,b,a\,b),yes,no)"), "yes");
        assert_eq!(out(r"top \) level"), r"top \) level");
    }

    #[test]
    fn double_backslash_still_escapes() {
        // single character lookback: "\\)" is an escaped ")"
        assert_eq!(scan(r"$num(1\\),5)").unwrap().output, r"01\\)");
        assert!(matches!(scan(r"$num(1\\)"), Err(FormatError::UnterminatedExpression { .. })));
    }

    #[test]
    fn split_ignores_separators_inside_calls() {
        assert_eq!(
            split_top_level("%A%/$if1($strcmp(%A%,x),VA/%B%,%A%)/[%Y%]", '/'),
            vec!["%A%", "$if1($strcmp(%A%,x),VA/%B%,%A%)", "[%Y%]"]
        );
        assert_eq!(split_top_level(r"a\)/b", '/'), vec![r"a\)", "b"]);
        assert_eq!(split_top_level("single", '/'), vec!["single"]);
    }

    #[test]
    fn hard_errors_abort() {
        assert!(matches!(scan("$num(1)"), Err(FormatError::ArgumentCountMismatch { .. })));
        assert!(matches!(scan("$if1(true,a,b)"), Err(FormatError::TypeMismatch { .. })));
    }
}
