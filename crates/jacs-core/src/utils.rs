/*!
 * Jacs Utils
 *
 * Common helpers used across the Jacs workspace
 */

use crate::error::Result;
use crate::types::JacError;

/// Formats bytes as lowercase hex pairs separated by spaces
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a hex string, with or without `0x` prefix and whitespace
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let compact: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(hex::decode(compact)?)
}

/// Prints a compiler diagnostic to stderr
pub fn print_jac_error(err: &JacError) {
    tracing::debug!(file = %err.filename, line = err.line, "reporting compiler diagnostic");
    eprintln!("{}", err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[]), "");
        assert_eq!(to_hex(&[0x0d, 0xf8, 0x00]), "0d f8 00");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x0df8").unwrap(), vec![0x0d, 0xf8]);
        assert_eq!(parse_hex(" 0d f8 00 ").unwrap(), vec![0x0d, 0xf8, 0x00]);
        assert!(parse_hex("0xzz").is_err());
    }
}
