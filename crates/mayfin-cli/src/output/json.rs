use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print the computation output on stdout.
///
/// A closed pipe (`mayfin analyse | head`) ends the output quietly.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_json(stdout.lock(), value) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("Failed to write JSON output: {e}");
        }
    }
}

fn write_json(mut out: impl Write, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_ends_with_newline_and_keeps_decimal_strings() {
        let mut buf = Vec::new();
        write_json(&mut buf, &json!({ "result": { "financeable_amount": "352941" } })).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"financeable_amount\": \"352941\""));
    }
}
