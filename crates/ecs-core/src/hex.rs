//! Lowercase hex helpers shared by handles, addresses, keys and signatures.

use crate::error::CoreError;

/// Render bytes as lowercase hex without a prefix.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string, accepting an optional `0x` prefix.
pub fn decode(hex: &str) -> Result<Vec<u8>, CoreError> {
    let hex = hex.trim();
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.len() % 2 != 0 {
        return Err(CoreError::InvalidHex(
            "hex string must have even length".to_string(),
        ));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CoreError::InvalidHex(format!("invalid hex at position {i}")))
        })
        .collect()
}

/// Decode a hex string into a fixed-size array.
pub fn decode_array<const N: usize>(hex: &str) -> Result<[u8; N], CoreError> {
    let bytes = decode(hex)?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        CoreError::InvalidHex(format!("expected {N} bytes, got {}", v.len()))
    })
}

/// First four bytes as hex, for log lines and `Debug` output.
pub fn prefix(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}
