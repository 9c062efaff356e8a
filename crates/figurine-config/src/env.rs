use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Failure while substituting `{{ env.VAR }}` placeholders
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    /// Referenced variable is unset and no default was given
    #[error("environment variable not found: `{0}`")]
    MissingVar(String),
    /// Placeholder is not scoped with `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

/// Expand `{{ env.VAR }}` and `{{ env.VAR | default("x") }}` placeholders
///
/// Runs on the raw TOML text before deserialization. Comment lines are
/// copied through untouched so commented-out secrets never need to exist.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    fn re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let lines = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return Ok(line.to_owned());
            }

            let mut failure = None;
            let expanded = re().replace_all(line, |captures: &Captures<'_>| {
                match resolve(&captures[1], captures.get(2).map(|m| m.as_str())) {
                    Ok(value) => value,
                    Err(e) => {
                        failure.get_or_insert(e);
                        String::new()
                    }
                }
            });

            failure.map_or_else(|| Ok(expanded.into_owned()), Err)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, ExpandError> {
    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_owned()));
    };

    match (std::env::var(var_name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(ExpandError::MissingVar(var_name.to_owned())),
    }
}
