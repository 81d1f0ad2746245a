// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Era, MultiSignature, SignatureData, SignerAddress};
use crate::address;
use crate::codec::{self, DecodeError};
use crate::consts::{EXTRINSIC_VERSION, SIGNED_BIT};
use crate::context::ChainContext;
use crate::types::Record;
use crate::utils::{decode_hex, hex_with_prefix};
use parity_scale_codec::{Compact, Decode};
use serde_json::json;

/// One extrinsic, decoded against the runtime schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    pub module: String,
    pub function: String,
    pub args: Record,
    /// `None` for unsigned (inherent) extrinsics.
    pub signature: Option<SignatureData>,
    /// Declared byte length, excluding the compact length prefix.
    pub length: usize,
}

impl DecodedCall {
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn signer_public_key(&self) -> Option<[u8; 32]> {
        self.signature.as_ref()?.signer.public_key()
    }

    /// `0x` hex of the raw signature bytes, empty when unsigned.
    pub fn signature_hex(&self) -> String {
        self.signature
            .as_ref()
            .map(|s| hex_with_prefix(s.signature.as_bytes()))
            .unwrap_or_default()
    }

    pub fn nonce(&self) -> u64 {
        self.signature.as_ref().map(|s| s.nonce).unwrap_or_default()
    }

    pub fn tip(&self) -> u128 {
        self.signature.as_ref().map(|s| s.tip).unwrap_or_default()
    }

    pub fn era(&self) -> Era {
        self.signature.as_ref().map(|s| s.era).unwrap_or_default()
    }

    /// JSON view for display, addresses rendered with `prefix`.
    pub fn to_json(&self, prefix: u16) -> serde_json::Value {
        let mut value = json!({
            "module": self.module,
            "function": self.function,
            "args": self.args,
            "length": self.length,
        });

        if let Some(signed) = &self.signature {
            let signer = signed
                .signer
                .public_key()
                .and_then(|key| address::encode(&key, prefix).ok());
            value["signer"] = json!(signer);
            value["signature"] = json!(self.signature_hex());
            value["era"] = json!(signed.era.descriptor());
            value["nonce"] = json!(signed.nonce);
            value["tip"] = json!(signed.tip.to_string());
        }

        value
    }
}

pub fn decode_extrinsic_hex(ctx: &ChainContext, raw_hex: &str) -> Result<DecodedCall, DecodeError> {
    decode_extrinsic(ctx, &decode_hex(raw_hex)?)
}

/// Decode one length-prefixed extrinsic as returned by `chain_getBlock`.
pub fn decode_extrinsic(ctx: &ChainContext, raw: &[u8]) -> Result<DecodedCall, DecodeError> {
    let mut input = raw;

    let declared = Compact::<u32>::decode(&mut input)?.0 as usize;
    if declared != input.len() {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: input.len(),
        });
    }

    let version = u8::decode(&mut input)?;
    if version & !SIGNED_BIT != EXTRINSIC_VERSION {
        return Err(DecodeError::UnsupportedVersion(version & !SIGNED_BIT));
    }

    let signature = if version & SIGNED_BIT != 0 {
        Some(decode_signature_data(ctx, &mut input)?)
    } else {
        None
    };

    let call = codec::decode_call(&ctx.schema, &mut input)?;
    if !input.is_empty() {
        return Err(DecodeError::TrailingBytes(input.len()));
    }

    Ok(DecodedCall {
        module: call.module,
        function: call.function,
        args: call.args,
        signature,
        length: declared,
    })
}

/// Reads the signer and signature, then the extra data of each signed
/// extension the runtime declares, in declaration order.
fn decode_signature_data(
    ctx: &ChainContext,
    input: &mut &[u8],
) -> Result<SignatureData, DecodeError> {
    let signer = SignerAddress::decode_with(ctx.address_format, input)?;
    let signature = MultiSignature::decode(input)?;

    let extensions = ctx.schema.signed_extensions();
    if extensions.is_empty() {
        return Ok(SignatureData {
            signer,
            signature,
            era: Era::decode(input)?,
            nonce: Compact::<u64>::decode(input)?.0,
            tip: Compact::<u128>::decode(input)?.0,
        });
    }

    let mut era = Era::Immortal;
    let mut nonce = 0;
    let mut tip = 0;
    for extension in extensions {
        match extension.identifier.as_str() {
            "CheckMortality" | "CheckEra" => era = Era::decode(input)?,
            "CheckNonce" => nonce = Compact::<u64>::decode(input)?.0,
            "ChargeTransactionPayment" => tip = Compact::<u128>::decode(input)?.0,
            "ChargeAssetTxPayment" => {
                let extra = codec::decode_value(&ctx.schema, extension.ty, input)?;
                tip = extra.field("tip")?.as_u128()?;
            }
            _ => {
                codec::decode_value(&ctx.schema, extension.ty, input)?;
            }
        }
    }

    Ok(SignatureData {
        signer,
        signature,
        era,
        nonce,
        tip,
    })
}
