//! Configuration domains and their dotenv-backed key/value stores.
//!
//! Every domain owns its own [`EnvMap`]. Loading never touches the process
//! environment, so two domains that declare the same key (both declare
//! `SUPABASE_URL`) cannot leak values into each other.

pub mod domain;
pub mod validator;

#[cfg(test)]
mod validator_proptest;

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub use domain::{ConfigDomain, FormatRule};
pub use validator::{DomainValidator, FormatViolation, ValidationResult};

/// Key/value pairs loaded from a single dotenv file.
pub type EnvMap = BTreeMap<String, String>;

/// One `KEY=VALUE` (or `KEY: VALUE`) assignment, optionally prefixed by `export`.
/// Quoted values may span lines; unquoted values end at `#` or end of line.
const ENV_LINE_PATTERN: &str = r##"(?m)^\s*(?:export\s+)?([\w.-]+)(?:\s*=\s*?|:\s+?)(\s*'(?:\\'|[^'])*'|\s*"(?:\\"|[^"])*"|\s*`(?:\\`|[^`])*`|[^#\r\n]+)?\s*(?:#.*)?$"##;

/// Read a dotenv file into a fresh map.
///
/// Only I/O failures are errors; see [`parse_env`] for the accepted format.
pub fn load_env_file(path: &Path) -> Result<EnvMap> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_env(&content)
}

/// Parse dotenv text into a map.
///
/// Values are taken literally: `$VAR` references are not expanded and the
/// process environment is never read. Blank lines, `#` comments and lines
/// that are not assignments are skipped. When a key repeats the last
/// assignment wins.
pub fn parse_env(content: &str) -> Result<EnvMap> {
    let line_re = Regex::new(ENV_LINE_PATTERN).context("Invalid dotenv line pattern")?;
    let content = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut env = EnvMap::new();
    let mut covered = Vec::new();
    for caps in line_re.captures_iter(&content) {
        if let Some(whole) = caps.get(0) {
            covered.push(whole.range());
        }
        let key = caps[1].to_string();
        let raw = caps.get(2).map_or("", |m| m.as_str());
        env.insert(key, unquote(raw));
    }

    let mut offset = 0;
    for (index, line) in content.split('\n').enumerate() {
        let trimmed = line.trim();
        let is_assignment = covered
            .iter()
            .any(|range| range.start <= offset && offset < range.end.max(range.start + 1));
        if !trimmed.is_empty() && !trimmed.starts_with('#') && !is_assignment {
            tracing::warn!(line = index + 1, "Skipping line that is not a KEY=VALUE pair");
        }
        offset += line.len() + 1;
    }

    Ok(env)
}

fn unquote(raw: &str) -> String {
    let value = raw.trim();
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '\'' | '"' | '`') => {
            let inner = &value[1..value.len() - 1];
            if open == '"' {
                inner.replace("\\n", "\n").replace("\\r", "\r")
            } else {
                inner.to_string()
            }
        }
        _ => value.to_string(),
    }
}

/// Look up a key, treating blank values as absent.
pub fn non_empty<'a>(env: &'a EnvMap, key: &str) -> Option<&'a str> {
    env.get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}
