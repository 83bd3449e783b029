// src/config/args.rs

//! Parsing of the raw `args` option into an [`ArgMap`].
//!
//! Supported forms: `--key=value`, `--key value`, `--flag` (`"true"`) and
//! `--no-flag` (`"false"`). Tokens that are not flags are ignored, as is
//! everything after a bare `--`. Keys are kept as written; lookups go
//! through [`camel_case`].

use crate::errors::{Result, RunCommandsError};
use crate::types::ArgMap;

pub fn parse_args(raw: &str) -> Result<ArgMap> {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);

    let tokens = shell_words::split(unquoted).map_err(|e| {
        RunCommandsError::ConfigError(format!("invalid `args` string {raw:?}: {e}"))
    })?;

    let mut map = ArgMap::new();
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        if token == "--" {
            break;
        }
        let Some(flag) = token.strip_prefix("--") else {
            continue;
        };

        if let Some((key, value)) = flag.split_once('=') {
            map.insert(key, value);
        } else if let Some(negated) = flag.strip_prefix("no-") {
            map.insert(negated, "false");
        } else if tokens.peek().is_some_and(|next| !next.starts_with("--")) {
            if let Some(value) = tokens.next() {
                map.insert(flag, value);
            }
        } else {
            map.insert(flag, "true");
        }
    }

    Ok(map)
}

/// Normalize a key to camel form: `my-arg`, `my_arg` and `MY_ARG` all
/// become `myArg`.
pub fn camel_case(input: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in input.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::with_capacity(input.len());
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}
