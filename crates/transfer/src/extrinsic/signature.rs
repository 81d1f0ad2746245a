// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::codec::{Address, DecodeError};
use config::AddressFormat;
use parity_scale_codec::{Decode, Encode};
use sp_core::crypto::AccountId32;

/// Algorithm-tagged signature.
///
/// Ed25519 and Sr25519 carry exactly 64 bytes. Ecdsa is written as a
/// length-prefixed byte vector, so recoverable (65 byte) and compact
/// signatures round-trip alike.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum MultiSignature {
    #[codec(index = 0)]
    Ed25519([u8; 64]),
    #[codec(index = 1)]
    Sr25519([u8; 64]),
    #[codec(index = 2)]
    Ecdsa(Vec<u8>),
}

impl MultiSignature {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MultiSignature::Ed25519(sig) | MultiSignature::Sr25519(sig) => sig,
            MultiSignature::Ecdsa(sig) => sig,
        }
    }
}

/// Signer address in whichever layout the chain uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerAddress {
    Multi(Address),
    AccountId([u8; 32]),
}

impl SignerAddress {
    /// Address for a 32-byte public key.
    pub fn from_public_key(public_key: [u8; 32], format: AddressFormat) -> Self {
        match format {
            AddressFormat::MultiAddress => {
                SignerAddress::Multi(Address::Id(AccountId32::new(public_key)))
            }
            AddressFormat::AccountId => SignerAddress::AccountId(public_key),
        }
    }

    pub fn decode_with(format: AddressFormat, input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(match format {
            AddressFormat::MultiAddress => SignerAddress::Multi(Address::decode(input)?),
            AddressFormat::AccountId => SignerAddress::AccountId(<[u8; 32]>::decode(input)?),
        })
    }

    /// The 32-byte account behind the address, when it names one directly.
    pub fn public_key(&self) -> Option<[u8; 32]> {
        match self {
            SignerAddress::Multi(Address::Id(account)) => Some(account.clone().into()),
            SignerAddress::Multi(Address::Address32(bytes)) => Some(*bytes),
            SignerAddress::Multi(_) => None,
            SignerAddress::AccountId(bytes) => Some(*bytes),
        }
    }
}

impl Encode for SignerAddress {
    fn encode_to<T: parity_scale_codec::Output + ?Sized>(&self, dest: &mut T) {
        match self {
            SignerAddress::Multi(address) => address.encode_to(dest),
            SignerAddress::AccountId(bytes) => bytes.encode_to(dest),
        }
    }
}
