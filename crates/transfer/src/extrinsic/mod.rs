// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version 4 extrinsics.
//!
//! Wire layout (after the compact length prefix):
//!
//! ```text
//! unsigned: 0x04 ++ call
//! signed:   0x84 ++ signer ++ MultiSignature ++ era ++ Compact(nonce) ++ Compact(tip) ++ call
//! ```

mod decoder;
mod era;
mod signature;

pub use decoder::{DecodedCall, decode_extrinsic, decode_extrinsic_hex};
pub use era::Era;
pub use signature::{MultiSignature, SignerAddress};

use crate::consts::{EXTRINSIC_VERSION, SIGNED_BIT};
use crate::utils::hex_with_prefix;
use parity_scale_codec::{Compact, Encode};

/// Everything a signed extrinsic carries besides the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureData {
    pub signer: SignerAddress,
    pub signature: MultiSignature,
    pub era: Era,
    pub nonce: u64,
    pub tip: u128,
}

impl Encode for SignatureData {
    fn encode_to<T: parity_scale_codec::Output + ?Sized>(&self, dest: &mut T) {
        self.signer.encode_to(dest);
        self.signature.encode_to(dest);
        self.era.encode_to(dest);
        Compact(self.nonce).encode_to(dest);
        Compact(self.tip).encode_to(dest);
    }
}

/// A submittable signed extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtrinsic {
    pub signature: SignatureData,
    /// SCALE-encoded call, pallet and call index first.
    pub call: Vec<u8>,
}

impl SignedExtrinsic {
    /// Length-prefixed wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = vec![EXTRINSIC_VERSION | SIGNED_BIT];
        self.signature.encode_to(&mut body);
        body.extend_from_slice(&self.call);
        length_prefixed(body)
    }

    /// `0x`-prefixed hex of [`Self::to_bytes`], ready for `author_submitExtrinsic`.
    pub fn to_hex(&self) -> String {
        hex_with_prefix(&self.to_bytes())
    }

    pub fn tx_hash(&self) -> String {
        tx_hash(&self.to_bytes())
    }
}

/// Length-prefixed unsigned (inherent) extrinsic around an encoded call.
pub fn encode_unsigned(call: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(call.len() + 1);
    body.push(EXTRINSIC_VERSION);
    body.extend_from_slice(call);
    length_prefixed(body)
}

/// Transaction id: `0x` + blake2-256 of the raw, length-prefixed extrinsic.
pub fn tx_hash(raw: &[u8]) -> String {
    hex_with_prefix(&sp_core::blake2_256(raw))
}

fn length_prefixed(body: Vec<u8>) -> Vec<u8> {
    let mut out = Compact(body.len() as u32).encode();
    out.extend(body);
    out
}
