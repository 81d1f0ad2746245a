// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::ConfigError;
use std::path::Path;

/// How the signer of an extrinsic is written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFormat {
    /// `MultiAddress` enum, variant byte followed by the payload.
    #[default]
    MultiAddress,
    /// Bare 32-byte account id, used by chains built without pallet indices
    /// on the address type.
    AccountId,
}

#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    /// SS58 prefix overriding the one detected from the runtime spec name
    ///
    /// Env: STX_CHAIN_SS58_PREFIX
    /// Default: unset (auto-detect)
    pub ss58_prefix: Option<u16>,

    /// Signer addresses are bare account ids instead of `MultiAddress`
    ///
    /// Env: STX_CHAIN_NO_PALLET_INDICES
    /// Default: false
    pub no_pallet_indices: bool,

    /// Runtime metadata for offline decoding and signing, either the hex
    /// string returned by `state_getMetadata` or the raw SCALE bytes
    ///
    /// Env: STX_CHAIN_METADATA_PATH
    /// Default: unset
    pub metadata_path: Option<String>,
}

impl ChainConfig {
    pub fn address_format(&self) -> AddressFormat {
        if self.no_pallet_indices {
            AddressFormat::AccountId
        } else {
            AddressFormat::MultiAddress
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        // Prefixes above 16383 cannot be represented in an SS58 address.
        if let Some(prefix) = self.ss58_prefix
            && prefix > 16_383
        {
            return Err(ConfigError::ValidateError(format!(
                "SS58 prefix {} is out of range (0..=16383)",
                prefix
            )));
        }

        if let Some(path) = &self.metadata_path
            && !Path::new(path).is_file()
        {
            return Err(ConfigError::ValidateError(format!(
                "Runtime metadata file '{}' does not exist",
                path
            )));
        }

        Ok(())
    }
}
