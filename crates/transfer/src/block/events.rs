// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! `System.Events` storage decoding.

use crate::codec::{self, DecodeError};
use crate::metadata::RuntimeSchema;
use crate::types::Record;
use parity_scale_codec::{Compact, Decode, Encode};

/// When in the block an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum Phase {
    #[codec(index = 0)]
    ApplyExtrinsic(u32),
    #[codec(index = 1)]
    Finalization,
    #[codec(index = 2)]
    Initialization,
}

impl Phase {
    pub fn extrinsic_index(&self) -> Option<u32> {
        match self {
            Phase::ApplyExtrinsic(index) => Some(*index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub phase: Phase,
    pub module: String,
    pub name: String,
    pub fields: Record,
    pub topics: Vec<[u8; 32]>,
}

impl EventRecord {
    pub fn is(&self, module: &str, name: &str) -> bool {
        self.module == module && self.name == name
    }
}

/// Decode the SCALE `Vec<EventRecord>` stored under `System.Events`.
pub fn decode_event_records(
    schema: &RuntimeSchema,
    bytes: &[u8],
) -> Result<Vec<EventRecord>, DecodeError> {
    let mut input = bytes;
    let count = Compact::<u32>::decode(&mut input)?.0 as usize;
    let mut records = Vec::with_capacity(count.min(input.len()));

    for _ in 0..count {
        let phase = Phase::decode(&mut input)?;
        let pallet = u8::decode(&mut input)?;
        let event = u8::decode(&mut input)?;
        let def = schema
            .event(pallet, event)
            .ok_or(DecodeError::UnknownEvent { pallet, event })?;
        let fields = codec::decode_args(schema, &def.args, &mut input)?;
        let topics = Vec::<[u8; 32]>::decode(&mut input)?;

        records.push(EventRecord {
            phase,
            module: def.module.clone(),
            name: def.name.clone(),
            fields,
            topics,
        });
    }

    if !input.is_empty() {
        return Err(DecodeError::TrailingBytes(input.len()));
    }

    tracing::trace!(count = records.len(), "Decoded event records");
    Ok(records)
}
