//! Payload input and JSON output for the CLI

use std::io::{Read, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Reads the whole payload from `input`.
pub fn read_payload<R: Read>(input: &mut R) -> CliResult<Vec<u8>> {
    let mut payload = Vec::new();
    input.read_to_end(&mut payload)?;
    Ok(payload)
}

/// Writes one JSON object followed by a newline.
pub fn write_json<W: Write>(output: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *output, value)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

/// Lowercase hex, two digits per byte.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0x24, 0xff]), "0024ff");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_write_json_one_line() {
        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({"status": "valid"})).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"status\":\"valid\"}\n");
    }

    #[test]
    fn test_read_payload() {
        let mut input: &[u8] = &[1, 2, 3];
        assert_eq!(read_payload(&mut input).unwrap(), vec![1, 2, 3]);
    }
}
