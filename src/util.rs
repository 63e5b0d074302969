use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

/// Split a `KEY=VALUE` command line assignment. The value may be empty or
/// contain further `=` characters.
pub fn parse_assignment(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Read a JSON (`.json`) or TOML (anything else) file into `T`.
pub fn read_data_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let s = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        serde_json::from_str(&s).with_context(|| format!("parsing JSON in {}", path.display()))
    } else {
        toml::from_str(&s).with_context(|| format!("parsing TOML in {}", path.display()))
    }
}

/// Flat placeholder metadata from a file; every value is stringified.
pub fn load_metadata(path: &Path) -> Result<HashMap<String, String>> {
    let raw: HashMap<String, serde_json::Value> = read_data_file(path)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (k, v)
        })
        .collect())
}
