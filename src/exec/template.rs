// src/exec/template.rs

//! Turning a configured command plus resolved arguments into the final
//! shell string.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::args::camel_case;
use crate::types::ArgMap;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{args\.([^}]+)\}").expect("placeholder regex is valid"));

/// Render `command` against `args`.
///
/// - `{args.<name>}` placeholders are substituted; names are compared in
///   camel form, and a name missing from `args` renders as `undefined`.
/// - Without placeholders and with `forward_all_args`, every argument is
///   appended as `--key=value` in map order.
/// - Otherwise the command is returned unchanged.
pub fn render(command: &str, args: &ArgMap, forward_all_args: bool) -> String {
    if command.contains("{args.") {
        return PLACEHOLDER
            .replace_all(command, |caps: &Captures| {
                lookup(args, &caps[1]).unwrap_or("undefined").to_string()
            })
            .into_owned();
    }

    if forward_all_args && !args.is_empty() {
        return format!("{command} {args}");
    }

    command.to_string()
}

fn lookup<'a>(args: &'a ArgMap, name: &str) -> Option<&'a str> {
    let wanted = camel_case(name);
    args.iter()
        .find(|(key, _)| camel_case(key) == wanted)
        .map(|(_, value)| value)
}
