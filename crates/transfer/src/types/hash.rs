// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use sp_core::H256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashParseError {
    #[error("Invalid hex format: {0}")]
    InvalidHex(String),

    #[error("Expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// 32-byte chain hash (block, parent, genesis) with `0x`-prefixed formatting.
///
/// SCALE-encodes as the raw 32 bytes, which is how block and genesis hashes
/// appear inside a signing payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode)]
pub struct BlockHash(pub H256);

impl BlockHash {
    pub fn new(hash: H256) -> Self {
        Self(hash)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_fixed_bytes()
    }

    /// Hex without the `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl From<H256> for BlockHash {
    fn from(hash: H256) -> Self {
        Self(hash)
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(H256::from(bytes))
    }
}

/// Accepts hex with or without the `0x` prefix.
impl FromStr for BlockHash {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(hex_str).map_err(|e| HashParseError::InvalidHex(format!("{}: {}", s, e)))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HashParseError::InvalidLength(bytes.len()))?;
        Ok(Self::from(bytes))
    }
}

/// Format: "0x" followed by 64 lowercase hex characters
impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Serialize for BlockHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
