//! Small shared helpers.

/// Strips the '0x' prefix off of a hex string so it can be decoded.
pub fn strip_0x_prefix(s: &str) -> &str {
    if s.len() < 2 || &s[..2] != "0x" {
        s
    } else {
        &s[2..]
    }
}

/// Formats a byte slice as a 0x-prefixed hex string for log output.
pub fn fmt_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
