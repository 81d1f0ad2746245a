// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

/// The only extrinsic format version this crate reads or writes.
pub const EXTRINSIC_VERSION: u8 = 4;

/// Set on the version byte of a signed extrinsic.
pub const SIGNED_BIT: u8 = 0b1000_0000;

/// Signing payloads longer than this are replaced by their blake2-256 hash.
pub const MAX_UNHASHED_PAYLOAD_LEN: usize = 256;

/// Generic Substrate network prefix.
pub const DEFAULT_SS58_PREFIX: u16 = 42;

/// Trailing-zero index the mortal era encoder is pinned to. The class nibble
/// is this minus one, so every mortal era it emits has a 64-block period.
pub const ERA_TRAILING_ZEROS: u64 = 6;

pub const TRANSFER_TYPE: &str = "transfer";
