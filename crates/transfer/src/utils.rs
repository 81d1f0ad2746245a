// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hex helpers shared by the decoder, builder and RPC layer.

/// Format bytes as hex string with "0x" prefix
pub fn hex_with_prefix(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Decode hex with or without the "0x" prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}

/// Parse a `0x`-prefixed big-endian hex quantity as returned by
/// `payment_queryFeeDetails`.
pub fn parse_hex_u128(s: &str) -> Option<u128> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}
