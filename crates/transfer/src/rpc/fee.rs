// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! `payment_queryInfo` / `payment_queryFeeDetails` responses.

use super::RpcError;
use crate::utils::parse_hex_u128;
use serde_json::Value;

/// Inclusion fee breakdown from `payment_queryFeeDetails`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeDetails {
    /// Fee based on transaction length in bytes
    pub len_fee: u128,
    /// Base fee for transaction inclusion
    pub base_fee: u128,
    /// Adjusted weight fee (estimated_weight * fee_adjustment)
    pub adjusted_weight_fee: u128,
}

impl FeeDetails {
    pub fn total(&self) -> u128 {
        self.len_fee
            .saturating_add(self.base_fee)
            .saturating_add(self.adjusted_weight_fee)
    }
}

/// Read `partialFee` (a decimal string) from a `payment_queryInfo` result.
pub fn parse_partial_fee(response: &Value) -> Result<String, RpcError> {
    match response.get("partialFee") {
        Some(Value::String(fee)) => Ok(fee.clone()),
        Some(Value::Number(fee)) => Ok(fee.to_string()),
        Some(other) => Err(RpcError::invalid_response(
            "payment_queryInfo",
            format!("partialFee is not a string: {}", other),
        )),
        None => Err(RpcError::invalid_response(
            "payment_queryInfo",
            "partialFee is missing",
        )),
    }
}

/// Parse the hex quantities under `inclusionFee`.
///
/// Expected response format:
/// ```json
/// {
///   "inclusionFee": {
///     "baseFee": "0x...",
///     "lenFee": "0x...",
///     "adjustedWeightFee": "0x..."
///   }
/// }
/// ```
/// A `null` inclusion fee (fee-less call) yields all zeroes.
pub fn parse_fee_details(response: &Value) -> Result<FeeDetails, RpcError> {
    const METHOD: &str = "payment_queryFeeDetails";

    let inclusion_fee = response
        .get("inclusionFee")
        .ok_or_else(|| RpcError::invalid_response(METHOD, "inclusionFee is missing"))?;
    if inclusion_fee.is_null() {
        return Ok(FeeDetails::default());
    }

    let field = |name: &str| -> Result<u128, RpcError> {
        inclusion_fee
            .get(name)
            .and_then(Value::as_str)
            .and_then(parse_hex_u128)
            .ok_or_else(|| RpcError::invalid_response(METHOD, format!("invalid {}", name)))
    };

    Ok(FeeDetails {
        len_fee: field("lenFee")?,
        base_fee: field("baseFee")?,
        adjusted_weight_fee: field("adjustedWeightFee")?,
    })
}
