//! Shared helpers for command handlers.

use std::collections::HashMap;

use armlink_core::{Provider, Region};

use crate::error::CliError;

/// Look up the selected region; listing regions is the only command that
/// runs without one.
pub async fn resolve_region(provider: &Provider, name: Option<&str>) -> Result<Region, CliError> {
    let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
        return Err(CliError::NoRegion);
    };
    Ok(provider.region(name.trim()).await?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse `key=value` pairs. Values may contain `=`; keys may not be empty.
pub fn parse_tags(pairs: &[String]) -> Result<HashMap<String, String>, CliError> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_owned(), value.to_owned()))
            }
            _ => Err(CliError::Validation {
                field: "tag".into(),
                reason: format!("expected key=value, got '{pair}'"),
            }),
        })
        .collect()
}

/// Print a success line to stderr unless `--quiet`.
pub fn report(quiet: bool, message: &str) {
    if !quiet {
        eprintln!("{message}");
    }
}

/// `a, b, c`, or `-` for nothing.
pub fn join_or_dash<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "-".into()
    } else {
        items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tags_split_on_first_equals() {
        let tags = parse_tags(&["env=prod".into(), "query=a=b".into(), "empty=".into()]).unwrap();
        assert_eq!(tags["env"], "prod");
        assert_eq!(tags["query"], "a=b");
        assert_eq!(tags["empty"], "");
    }

    #[test]
    fn tags_without_key_are_rejected() {
        assert!(parse_tags(&["=x".into()]).is_err());
        assert!(parse_tags(&["novalue".into()]).is_err());
    }

    #[test]
    fn dash_helpers() {
        assert_eq!(join_or_dash::<String>(&[]), "-");
        assert_eq!(join_or_dash(&["a", "b"]), "a, b");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("x")), "x");
    }
}
