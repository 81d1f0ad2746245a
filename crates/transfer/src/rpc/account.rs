// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! `System.Account` storage values.

use super::RpcError;
use parity_scale_codec::Decode;
use serde::Serialize;

/// Account state in the shape reported to callers, independent of the
/// runtime's storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub nonce: u32,
    pub ref_count: u32,
    #[serde(serialize_with = "as_string")]
    pub free: u128,
    #[serde(serialize_with = "as_string")]
    pub reserved: u128,
    #[serde(serialize_with = "as_string")]
    pub misc_frozen: u128,
    #[serde(serialize_with = "as_string")]
    pub fee_frozen: u128,
}

fn as_string<S: serde::Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[derive(Decode)]
struct LegacyAccountInfo {
    nonce: u32,
    ref_count: u32,
    free: u128,
    reserved: u128,
    misc_frozen: u128,
    fee_frozen: u128,
}

#[derive(Decode)]
struct ProvidersAccountInfo {
    nonce: u32,
    consumers: u32,
    _providers: u32,
    _sufficients: u32,
    free: u128,
    reserved: u128,
    frozen: u128,
    _flags: u128,
}

/// Chains whose `System.Account` carries consumer/provider counters and a
/// single `frozen` balance.
fn uses_providers_layout(spec_name: &str) -> bool {
    spec_name.eq_ignore_ascii_case("polkadot") || spec_name.eq_ignore_ascii_case("kusama")
}

/// Decode a raw `System.Account` value for the chain named `spec_name`.
pub fn decode_account_info(spec_name: &str, bytes: &[u8]) -> Result<AccountInfo, RpcError> {
    let input = &mut &bytes[..];
    if uses_providers_layout(spec_name) {
        let info = ProvidersAccountInfo::decode(input)?;
        Ok(AccountInfo {
            nonce: info.nonce,
            ref_count: info.consumers,
            free: info.free,
            reserved: info.reserved,
            misc_frozen: info.frozen,
            fee_frozen: info.frozen,
        })
    } else {
        let info = LegacyAccountInfo::decode(input)?;
        Ok(AccountInfo {
            nonce: info.nonce,
            ref_count: info.ref_count,
            free: info.free,
            reserved: info.reserved,
            misc_frozen: info.misc_frozen,
            fee_frozen: info.fee_frozen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parity_scale_codec::Encode;

    #[test]
    fn test_legacy_layout() {
        let mut bytes = Vec::new();
        7u32.encode_to(&mut bytes);
        1u32.encode_to(&mut bytes);
        for v in [1_000u128, 20, 3, 4] {
            v.encode_to(&mut bytes);
        }

        let info = decode_account_info("node-template", &bytes).unwrap();
        assert_eq!(
            info,
            AccountInfo {
                nonce: 7,
                ref_count: 1,
                free: 1_000,
                reserved: 20,
                misc_frozen: 3,
                fee_frozen: 4,
            }
        );
    }

    #[test]
    fn test_providers_layout() {
        let mut bytes = Vec::new();
        for v in [12u32, 2, 1, 0] {
            v.encode_to(&mut bytes);
        }
        for v in [10_000_000_000u128, 5, 42, 1u128 << 127] {
            v.encode_to(&mut bytes);
        }

        let info = decode_account_info("polkadot", &bytes).unwrap();
        assert_eq!(info.nonce, 12);
        assert_eq!(info.ref_count, 2);
        assert_eq!(info.free, 10_000_000_000);
        assert_eq!(info.reserved, 5);
        assert_eq!(info.misc_frozen, 42);
        assert_eq!(info.fee_frozen, 42);
    }

    #[test]
    fn test_providers_layout_ignores_spec_name_case() {
        let mut bytes = Vec::new();
        for v in [3u32, 1, 1, 0] {
            v.encode_to(&mut bytes);
        }
        for v in [9u128, 0, 8, 0] {
            v.encode_to(&mut bytes);
        }

        for spec_name in ["Polkadot", "KUSAMA"] {
            let info = decode_account_info(spec_name, &bytes).unwrap();
            assert_eq!(info.nonce, 3);
            assert_eq!(info.free, 9);
            assert_eq!(info.fee_frozen, 8);
        }
    }

    #[test]
    fn test_truncated_value() {
        assert!(matches!(
            decode_account_info("kusama", &[0u8; 10]),
            Err(RpcError::StorageDecode(_))
        ));
    }

    #[test]
    fn test_serializes_balances_as_strings() {
        let info = AccountInfo {
            free: u128::MAX,
            ..Default::default()
        };
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["free"], u128::MAX.to_string());
        assert_eq!(json["refCount"], 0);
    }
}
