// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

mod args;
mod chain;
mod error;
mod log;
mod signer;

pub use args::Args;
pub use chain::{AddressFormat, ChainConfig};
pub use error::ConfigError;
pub use log::LogConfig;
pub use signer::{SUPPORTED_SCHEMES, SignerConfig};

use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "STX_";

#[derive(Debug, Clone, Default)]
pub struct TransferConfig {
    pub log: LogConfig,
    pub chain: ChainConfig,
    pub signer: SignerConfig,
}

/// Flat view of the environment as `envy` sees it.
#[derive(Debug, Deserialize)]
struct EnvConfig {
    #[serde(default = "log::default_level")]
    log_level: String,
    #[serde(default)]
    log_json: bool,
    #[serde(default)]
    log_strip_ansi: bool,
    #[serde(default)]
    log_write: bool,
    #[serde(default = "log::default_write_path")]
    log_write_path: String,
    #[serde(default = "log::default_write_max_file_size")]
    log_write_max_file_size: u64,
    #[serde(default = "log::default_write_max_files")]
    log_write_max_files: usize,

    #[serde(default)]
    chain_ss58_prefix: Option<u16>,
    #[serde(default)]
    chain_no_pallet_indices: bool,
    #[serde(default)]
    chain_metadata_path: Option<String>,

    #[serde(default = "signer::default_scheme")]
    signer_scheme: String,
}

impl From<EnvConfig> for TransferConfig {
    fn from(env: EnvConfig) -> Self {
        Self {
            log: LogConfig {
                level: env.log_level.to_lowercase(),
                json: env.log_json,
                strip_ansi: env.log_strip_ansi,
                write: env.log_write,
                write_path: env.log_write_path,
                write_max_file_size: env.log_write_max_file_size,
                write_max_files: env.log_write_max_files,
            },
            chain: ChainConfig {
                ss58_prefix: env.chain_ss58_prefix,
                no_pallet_indices: env.chain_no_pallet_indices,
                metadata_path: env.chain_metadata_path,
            },
            signer: SignerConfig {
                scheme: env.signer_scheme.to_lowercase(),
            },
        }
    }
}

impl TransferConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = envy::prefixed(ENV_PREFIX).from_env::<EnvConfig>()?;
        let config = Self::from(env);
        config.validate()?;
        Ok(config)
    }

    /// Load variables from `path` (when it exists) and then read the environment.
    ///
    /// Variables already present in the process environment take precedence
    /// over the file.
    pub fn from_env_file(path: &str) -> Result<Self, ConfigError> {
        if Path::new(path).is_file() {
            dotenv::from_path(path).map_err(|source| ConfigError::EnvFileError {
                path: path.to_string(),
                source,
            })?;
        }
        Self::from_env()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.log.validate()?;
        self.chain.validate()?;
        self.signer.validate()?;
        Ok(())
    }
}
