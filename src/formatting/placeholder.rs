use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%([A-Za-z0-9_]+)%").expect("placeholder pattern is valid")
});

/// Replace every `%KEY%` token with its value from `metadata`.
///
/// Missing keys become the empty string. Substituted text is not scanned
/// again, neither for placeholders nor for function syntax; a value that
/// contains `$`, `(`, `)` or `,` is handed to the scanner verbatim.
pub fn resolve_placeholders(template: &str, metadata: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            metadata.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn replaces_known_and_blanks_unknown() {
        let m = meta(&[("ARTIST", "Advance"), ("YEAR", "2014")]);
        assert_eq!(resolve_placeholders("%ARTIST% [%YEAR%] %GENRE%!", &m), "Advance [2014] !");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let m = meta(&[("A", "%B%"), ("B", "nope")]);
        assert_eq!(resolve_placeholders("%A%", &m), "%B%");
    }

    #[test]
    fn lone_percent_signs_are_literal() {
        let m = meta(&[("TITLE", "Mix")]);
        assert_eq!(resolve_placeholders("100% %TITLE% %%", &m), "100% Mix %%");
    }

    #[test]
    fn keys_are_case_sensitive() {
        let m = meta(&[("artist", "lower")]);
        assert_eq!(resolve_placeholders("%ARTIST%|%artist%", &m), "|lower");
    }
}
