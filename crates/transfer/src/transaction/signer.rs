// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Private key handling and signing.
//!
//! Key bytes live in [`Zeroizing`] buffers for exactly one signing call and
//! are wiped when the buffer drops, on success and error paths alike.

use super::builder::BuildError;
use crate::extrinsic::MultiSignature;
use crate::utils::decode_hex;
use sp_core::{Pair, ecdsa, ed25519, sr25519};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum SignError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Unsupported signature algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Private key does not belong to sender 0x{}", hex::encode(.sender))]
    KeyMismatch { sender: [u8; 32] },

    #[error("Signing produced {0} bytes")]
    InvalidSignature(usize),
}

/// Signature algorithm, numbered like the `MultiSignature` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    Ed25519,
    Sr25519,
    Ecdsa,
}

impl TryFrom<u8> for SignatureScheme {
    type Error = SignError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(SignatureScheme::Ed25519),
            1 => Ok(SignatureScheme::Sr25519),
            2 => Ok(SignatureScheme::Ecdsa),
            other => Err(SignError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Accepts names (any case) or numeric ids.
impl FromStr for SignatureScheme {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u8>() {
            return Self::try_from(id);
        }
        match s.to_lowercase().as_str() {
            "ed25519" => Ok(SignatureScheme::Ed25519),
            "sr25519" => Ok(SignatureScheme::Sr25519),
            "ecdsa" => Ok(SignatureScheme::Ecdsa),
            _ => Err(SignError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureScheme::Ed25519 => write!(f, "ed25519"),
            SignatureScheme::Sr25519 => write!(f, "sr25519"),
            SignatureScheme::Ecdsa => write!(f, "ecdsa"),
        }
    }
}

/// Decode a hex (optional `0x`) 32-byte seed into a wiping buffer.
pub fn decode_key(key_hex: &str) -> Result<Zeroizing<Vec<u8>>, SignError> {
    let key = Zeroizing::new(
        decode_hex(key_hex.trim()).map_err(|e| SignError::InvalidKey(e.to_string()))?,
    );
    if key.len() != 32 {
        return Err(SignError::InvalidKey(format!(
            "expected 32 bytes, got {}",
            key.len()
        )));
    }
    Ok(key)
}

/// Account id (32 bytes) controlled by `seed` under `scheme`. Ecdsa accounts
/// are the blake2-256 hash of the compressed public key.
pub fn account_id(scheme: SignatureScheme, seed: &[u8]) -> Result<[u8; 32], SignError> {
    match scheme {
        SignatureScheme::Ed25519 => {
            let pair = ed25519::Pair::from_seed_slice(seed).map_err(key_error)?;
            public_32(pair.public().as_ref())
        }
        SignatureScheme::Sr25519 => {
            let pair = sr25519::Pair::from_seed_slice(seed).map_err(key_error)?;
            public_32(pair.public().as_ref())
        }
        SignatureScheme::Ecdsa => {
            let pair = ecdsa::Pair::from_seed_slice(seed).map_err(key_error)?;
            Ok(sp_core::blake2_256(pair.public().as_ref()))
        }
    }
}

/// Sign `message` with `seed`, returning the tagged signature and the
/// signer's account id.
pub fn sign_message(
    scheme: SignatureScheme,
    seed: &[u8],
    message: &[u8],
) -> Result<(MultiSignature, [u8; 32]), SignError> {
    let account = account_id(scheme, seed)?;
    let signature = match scheme {
        SignatureScheme::Ed25519 => {
            let pair = ed25519::Pair::from_seed_slice(seed).map_err(key_error)?;
            MultiSignature::Ed25519(fixed_64(pair.sign(message).as_ref())?)
        }
        SignatureScheme::Sr25519 => {
            let pair = sr25519::Pair::from_seed_slice(seed).map_err(key_error)?;
            MultiSignature::Sr25519(fixed_64(pair.sign(message).as_ref())?)
        }
        SignatureScheme::Ecdsa => {
            let pair = ecdsa::Pair::from_seed_slice(seed).map_err(key_error)?;
            let signature = pair.sign(message);
            let bytes: &[u8] = signature.as_ref();
            MultiSignature::Ecdsa(bytes.to_vec())
        }
    };

    tracing::debug!(scheme = %scheme, message_len = message.len(), "Signed payload");
    Ok((signature, account))
}

fn key_error(e: impl fmt::Debug) -> SignError {
    SignError::InvalidKey(format!("{:?}", e))
}

fn public_32(public: &[u8]) -> Result<[u8; 32], SignError> {
    public
        .try_into()
        .map_err(|_| SignError::InvalidKey(format!("public key is {} bytes", public.len())))
}

fn fixed_64(signature: &[u8]) -> Result<[u8; 64], SignError> {
    signature
        .try_into()
        .map_err(|_| SignError::InvalidSignature(signature.len()))
}
