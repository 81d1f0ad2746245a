// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Storage keys for the `System` pallet entries the engine reads.

use crate::utils::hex_with_prefix;
use sp_crypto_hashing::{blake2_128, twox_128};

fn pallet_prefix(pallet: &str, item: &str) -> Vec<u8> {
    let mut key = twox_128(pallet.as_bytes()).to_vec();
    key.extend_from_slice(&twox_128(item.as_bytes()));
    key
}

/// `System.Events`
pub fn events_storage_key() -> String {
    hex_with_prefix(&pallet_prefix("System", "Events"))
}

/// `System.Account`, keyed with `Blake2_128Concat`.
pub fn account_storage_key(public_key: &[u8; 32]) -> String {
    let mut key = pallet_prefix("System", "Account");
    key.extend_from_slice(&blake2_128(public_key));
    key.extend_from_slice(public_key);
    hex_with_prefix(&key)
}
