pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Read the command's JSON input from `--input`, or from piped stdin.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    stdin::read_stdin(what)?
        .ok_or_else(|| format!("--input file (or JSON on stdin) is required for {what}").into())
}
