// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Outgoing transactions: call encoding, payload assembly and signing.

mod builder;
mod call;
mod signer;

pub use builder::{BuildError, SigningPayload, TransactionRequest, UnsignedTransaction};
pub use call::Call;
pub use signer::{SignError, SignatureScheme, account_id, decode_key, sign_message};
