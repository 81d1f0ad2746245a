// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::TransferConfig;
use std::path::PathBuf;
use substrate_transfer::context::ChainContext;
use substrate_transfer::extrinsic::{Era, decode_extrinsic_hex};
use substrate_transfer::logging::{self, LoggingConfig};
use substrate_transfer::metadata::RuntimeSchema;
use substrate_transfer::transaction::{SignatureScheme, TransactionRequest};
use zeroize::Zeroizing;

/// Environment variable holding the hex private key for `sign`.
const SIGNER_KEY_VAR: &str = "STX_SIGNER_KEY";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: config::Args,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a hex extrinsic and print it as JSON
    Decode {
        /// Length-prefixed extrinsic, `0x` optional
        extrinsic: String,
    },
    /// Print the era bytes for a mortal transaction
    Era { block: u64, period: u64 },
    /// Sign an unsigned transaction request and print the extrinsic hex
    Sign {
        /// JSON file describing the transaction
        request: PathBuf,
        /// Signature scheme, overrides STX_SIGNER_SCHEME
        #[arg(long)]
        scheme: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = TransferConfig::from_env_file(&cli.args.env_file)?;
    let _log_guard = logging::init_with_config(LoggingConfig::from(&config.log))?;

    match cli.command {
        Command::Decode { extrinsic } => {
            let ctx = chain_context(&config)?;
            let decoded = decode_extrinsic_hex(&ctx, &extrinsic)?;
            println!("{}", serde_json::to_string_pretty(&decoded.to_json(ctx.prefix()))?);
        }
        Command::Era { block, period } => {
            println!("{}", Era::mortal(block, period).descriptor());
        }
        Command::Sign { request, scheme } => {
            let scheme: SignatureScheme = scheme
                .as_deref()
                .unwrap_or(&config.signer.scheme)
                .parse()?;
            let body = std::fs::read_to_string(&request)
                .with_context(|| format!("Failed to read {}", request.display()))?;
            let request: TransactionRequest = serde_json::from_str(&body)?;
            let key = Zeroizing::new(
                std::env::var(SIGNER_KEY_VAR)
                    .with_context(|| format!("{} is not set", SIGNER_KEY_VAR))?,
            );

            let ctx = chain_context(&config)?;
            let signed = request
                .into_unsigned(&ctx)?
                .sign(&key, scheme)?;
            tracing::info!(txid = %signed.tx_hash(), scheme = %scheme, "Signed transaction");
            println!("{}", signed.to_hex());
        }
    }

    Ok(())
}

/// Offline chain context over the metadata file named by the config.
fn chain_context(config: &TransferConfig) -> anyhow::Result<ChainContext> {
    let path = config
        .chain
        .metadata_path
        .as_deref()
        .context("STX_CHAIN_METADATA_PATH is required to decode or sign offline")?;
    let schema = RuntimeSchema::from_file(path)
        .with_context(|| format!("Failed to load runtime metadata from {}", path))?;

    Ok(ChainContext::new(schema)
        .with_prefix_override(config.chain.ss58_prefix)
        .with_address_format(config.chain.address_format()))
}
