// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::ConfigError;

pub const SUPPORTED_SCHEMES: [&str; 3] = ["ed25519", "sr25519", "ecdsa"];

#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// Default signature scheme for the `sign` command
    ///
    /// Env: STX_SIGNER_SCHEME
    /// Valid values: ed25519, sr25519, ecdsa
    /// Default: sr25519
    pub scheme: String,
}

pub(crate) fn default_scheme() -> String {
    "sr25519".to_string()
}

impl SignerConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_SCHEMES.contains(&self.scheme.as_str()) {
            return Err(ConfigError::ValidateError(format!(
                "Unsupported signer scheme '{}'. Must be one of: {}",
                self.scheme,
                SUPPORTED_SCHEMES.join(", ")
            )));
        }
        Ok(())
    }
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
        }
    }
}
