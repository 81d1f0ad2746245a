// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Block-level transfer extraction: decode every extrinsic, pick out
//! transfers, then confirm them against the block's events.

mod correlate;
mod events;
mod parser;
mod types;

pub use correlate::{CorrelationError, EventSource, correlate, resolve};
pub use events::{EventRecord, Phase, decode_event_records};
pub use parser::{BlockError, BlockParser, FeeEstimator};
pub use types::{RawBlock, TransferCandidate, TransferEntry, TransferReport, TransferStatus};
