// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common type wrappers shared by the decoder, the report and the builder.

pub mod hash;
pub mod value;

pub use hash::{BlockHash, HashParseError};
pub use value::{Record, Value, ValueError};
