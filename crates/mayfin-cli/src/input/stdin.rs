use serde::de::DeserializeOwned;
use std::io::{self, Read};
use tracing::debug;

/// Deserialise the command input from piped stdin.
///
/// `None` when stdin is a terminal or nothing was piped, so the caller can
/// report the missing `--input` instead.
pub fn read_stdin<T: DeserializeOwned>(
    what: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    parse_piped(io::stdin().lock(), what)
}

fn parse_piped<T: DeserializeOwned>(
    mut reader: impl Read,
    what: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read {what} input from stdin: {e}"))?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    debug!(bytes = trimmed.len(), what, "input read from stdin");

    let parsed = serde_json::from_str(trimmed)
        .map_err(|e| format!("Invalid {what} input on stdin: {e}"))?;
    Ok(Some(parsed))
}
