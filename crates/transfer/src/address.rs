// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Public key <-> SS58 address conversion.

use crate::consts::DEFAULT_SS58_PREFIX;
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};
use ss58_registry::Ss58AddressFormatRegistry;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Public key must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Encode a 32-byte public key with the given network prefix.
pub fn encode(public_key: &[u8], prefix: u16) -> Result<String, AddressError> {
    let bytes: [u8; 32] = public_key
        .try_into()
        .map_err(|_| AddressError::InvalidLength(public_key.len()))?;

    Ok(AccountId32::new(bytes).to_ss58check_with_version(Ss58AddressFormat::custom(prefix)))
}

/// Decode an SS58 address (any prefix) or a `0x`-prefixed hex public key.
pub fn decode(address: &str) -> Result<[u8; 32], AddressError> {
    if let Ok((account, _version)) = AccountId32::from_ss58check_with_version(address) {
        return Ok(account.into());
    }

    if let Some(hex_str) = address.strip_prefix("0x") {
        let bytes = hex::decode(hex_str)
            .map_err(|e| AddressError::InvalidAddress(format!("{}: {}", address, e)))?;
        return bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()));
    }

    Err(AddressError::InvalidAddress(address.to_string()))
}

/// Registry prefix for a runtime spec name, or the generic Substrate prefix
/// when the network is not registered.
pub fn prefix_for_chain(spec_name: &str) -> u16 {
    match Ss58AddressFormatRegistry::try_from(spec_name) {
        Ok(registry) => Ss58AddressFormat::from(registry).prefix(),
        Err(_) => {
            tracing::debug!(
                spec_name = %spec_name,
                prefix = DEFAULT_SS58_PREFIX,
                "Spec name not in SS58 registry, using default prefix"
            );
            DEFAULT_SS58_PREFIX
        }
    }
}
