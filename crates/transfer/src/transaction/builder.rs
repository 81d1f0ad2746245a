// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use super::call::Call;
use super::signer::{self, SignError, SignatureScheme};
use crate::address::{self, AddressError};
use crate::codec::{CallData, EncodeError};
use crate::consts::{EXTRINSIC_VERSION, MAX_UNHASHED_PAYLOAD_LEN};
use crate::context::ChainContext;
use crate::extrinsic::{Era, MultiSignature, SignatureData, SignedExtrinsic, SignerAddress};
use crate::types::{BlockHash, Value, ValueError};
use std::fmt::Display;
use config::AddressFormat;
use parity_scale_codec::{Compact, Encode, Output};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Unsupported extrinsic version {0}, only v4 is supported")]
    UnsupportedVersion(u8),

    #[error("No call attached to the transaction")]
    MissingCall,

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Transaction {field} {request} does not match the chain's {context}")]
    ContextMismatch {
        field: &'static str,
        request: String,
        context: String,
    },

    #[error("Invalid sender: {0}")]
    InvalidSender(#[from] AddressError),

    #[error("Failed to encode call: {0}")]
    InvalidCall(#[from] EncodeError),

    #[error("Invalid call description: {0}")]
    InvalidCallValue(#[from] ValueError),
}

/// A transaction being assembled. Every field except tip and era must be
/// set before [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    sender: [u8; 32],
    nonce: u64,
    genesis_hash: Option<BlockHash>,
    block_hash: Option<BlockHash>,
    spec_version: Option<u32>,
    transaction_version: Option<u32>,
    tip: u128,
    era: Era,
    call: Option<Call>,
    extrinsic_version: u8,
    address_format: AddressFormat,
}

impl UnsignedTransaction {
    /// `sender` is an SS58 address or a `0x` public key.
    pub fn new(sender: &str, nonce: u64) -> Result<Self, BuildError> {
        Ok(Self::from_public_key(address::decode(sender)?, nonce))
    }

    pub fn from_public_key(sender: [u8; 32], nonce: u64) -> Self {
        Self {
            sender,
            nonce,
            genesis_hash: None,
            block_hash: None,
            spec_version: None,
            transaction_version: None,
            tip: 0,
            era: Era::Immortal,
            call: None,
            extrinsic_version: EXTRINSIC_VERSION,
            address_format: AddressFormat::default(),
        }
    }

    /// Genesis hash and the block the era is anchored to (the genesis hash
    /// again for immortal transactions).
    pub fn with_hashes(mut self, genesis_hash: BlockHash, block_hash: BlockHash) -> Self {
        self.genesis_hash = Some(genesis_hash);
        self.block_hash = Some(block_hash);
        self
    }

    /// Genesis hash, versions and address format of `ctx`, where known.
    pub fn with_context(mut self, ctx: &ChainContext) -> Self {
        if let Some(genesis_hash) = ctx.genesis_hash {
            self.genesis_hash = Some(genesis_hash);
        }
        if ctx.spec_version != 0 {
            self.spec_version = Some(ctx.spec_version);
            self.transaction_version = Some(ctx.transaction_version);
        }
        self.address_format = ctx.address_format;
        self
    }

    pub fn with_versions(mut self, spec_version: u32, transaction_version: u32) -> Self {
        self.spec_version = Some(spec_version);
        self.transaction_version = Some(transaction_version);
        self
    }

    pub fn with_tip(mut self, tip: u128) -> Self {
        self.tip = tip;
        self
    }

    /// Mortal era anchored at `block_number`; immortal if either is zero.
    pub fn with_era(mut self, block_number: u64, period: u64) -> Self {
        self.era = Era::mortal(block_number, period);
        self
    }

    pub fn with_call(mut self, call: Call) -> Self {
        self.call = Some(call);
        self
    }

    pub fn with_extrinsic_version(mut self, version: u8) -> Self {
        self.extrinsic_version = version;
        self
    }

    pub fn with_address_format(mut self, format: AddressFormat) -> Self {
        self.address_format = format;
        self
    }

    pub fn build(&self) -> Result<SigningPayload, BuildError> {
        if self.extrinsic_version != EXTRINSIC_VERSION {
            return Err(BuildError::UnsupportedVersion(self.extrinsic_version));
        }
        let call = self.call.clone().ok_or(BuildError::MissingCall)?;

        Ok(SigningPayload {
            signer: SignerAddress::from_public_key(self.sender, self.address_format),
            sender: self.sender,
            call,
            era: self.era,
            nonce: self.nonce,
            tip: self.tip,
            spec_version: self.spec_version.ok_or(BuildError::MissingField("spec_version"))?,
            transaction_version: self
                .transaction_version
                .ok_or(BuildError::MissingField("transaction_version"))?,
            genesis_hash: self
                .genesis_hash
                .ok_or(BuildError::MissingField("genesis_hash"))?,
            block_hash: self.block_hash.ok_or(BuildError::MissingField("block_hash"))?,
        })
    }

    /// Build, then sign with a hex private key.
    pub fn sign(&self, key_hex: &str, scheme: SignatureScheme) -> Result<SignedExtrinsic, SignError> {
        self.build()?.sign(key_hex, scheme)
    }
}

/// Everything covered by the signature, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload {
    pub signer: SignerAddress,
    pub sender: [u8; 32],
    pub call: Call,
    pub era: Era,
    pub nonce: u64,
    pub tip: u128,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub genesis_hash: BlockHash,
    pub block_hash: BlockHash,
}

impl Encode for SigningPayload {
    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.call.encode_to(dest);
        self.era.encode_to(dest);
        Compact(self.nonce).encode_to(dest);
        Compact(self.tip).encode_to(dest);
        self.spec_version.encode_to(dest);
        self.transaction_version.encode_to(dest);
        self.genesis_hash.encode_to(dest);
        self.block_hash.encode_to(dest);
    }
}

impl SigningPayload {
    /// Bytes the signature is made over: the payload itself, or its
    /// blake2-256 hash when longer than 256 bytes.
    pub fn signing_message(&self) -> Vec<u8> {
        let payload = self.encode();
        if payload.len() > MAX_UNHASHED_PAYLOAD_LEN {
            sp_core::blake2_256(&payload).to_vec()
        } else {
            payload
        }
    }

    /// Sign with a hex private key. The key buffer is wiped before returning.
    pub fn sign(&self, key_hex: &str, scheme: SignatureScheme) -> Result<SignedExtrinsic, SignError> {
        let (signature, account) = {
            let seed = signer::decode_key(key_hex)?;
            signer::sign_message(scheme, &seed, &self.signing_message())?
        };

        if account != self.sender {
            return Err(SignError::KeyMismatch {
                sender: self.sender,
            });
        }

        Ok(self.clone().into_signed(signature))
    }

    /// Attach a signature produced elsewhere over [`Self::signing_message`].
    pub fn into_signed(self, signature: MultiSignature) -> SignedExtrinsic {
        SignedExtrinsic {
            signature: SignatureData {
                signer: self.signer,
                signature,
                era: self.era,
                nonce: self.nonce,
                tip: self.tip,
            },
            call: self.call.encode(),
        }
    }
}

/// JSON form of an unsigned transaction, as read by the `sign` command.
///
/// Genesis hash and versions may be left out and are then taken from the
/// chain context; when both are given they must agree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub sender: String,
    pub nonce: u64,
    #[serde(default)]
    pub genesis_hash: Option<BlockHash>,
    pub block_hash: BlockHash,
    #[serde(default)]
    pub spec_version: Option<u32>,
    #[serde(default)]
    pub transaction_version: Option<u32>,
    #[serde(default)]
    pub tip: u128,
    #[serde(default)]
    pub block_number: u64,
    #[serde(default)]
    pub era_period: u64,
    /// `{ "module": .., "function": .., "args": { .. } }`
    pub call: serde_json::Value,
    #[serde(default = "default_extrinsic_version")]
    pub extrinsic_version: u8,
}

fn default_extrinsic_version() -> u8 {
    EXTRINSIC_VERSION
}

impl TransactionRequest {
    /// Resolve against `ctx` and encode the call through its schema.
    pub fn into_unsigned(&self, ctx: &ChainContext) -> Result<UnsignedTransaction, BuildError> {
        let known_versions = ctx.spec_version != 0;
        let genesis_hash = agree("genesis_hash", self.genesis_hash, ctx.genesis_hash)?;
        let spec_version = agree(
            "spec_version",
            self.spec_version,
            known_versions.then_some(ctx.spec_version),
        )?;
        let transaction_version = agree(
            "transaction_version",
            self.transaction_version,
            known_versions.then_some(ctx.transaction_version),
        )?;

        let call = CallData::from_value(&Value::try_from(&self.call)?)?;
        Ok(UnsignedTransaction::new(&self.sender, self.nonce)?
            .with_context(ctx)
            .with_hashes(genesis_hash, self.block_hash)
            .with_versions(spec_version, transaction_version)
            .with_tip(self.tip)
            .with_era(self.block_number, self.era_period)
            .with_call(Call::from_call_data(&ctx.schema, &call)?)
            .with_extrinsic_version(self.extrinsic_version))
    }
}

fn agree<T: PartialEq + Display>(
    field: &'static str,
    request: Option<T>,
    context: Option<T>,
) -> Result<T, BuildError> {
    match (request, context) {
        (Some(request), Some(context)) if request != context => Err(BuildError::ContextMismatch {
            field,
            request: request.to_string(),
            context: context.to_string(),
        }),
        (Some(value), _) | (None, Some(value)) => Ok(value),
        (None, None) => Err(BuildError::MissingField(field)),
    }
}
