// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::codec::{self, CallData, EncodeError};
use crate::metadata::RuntimeSchema;
use crate::types::{Record, Value};
use parity_scale_codec::{Compact, Encode, Output};

/// An encoded runtime call ready to be placed in a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub pallet_index: u8,
    pub call_index: u8,
    /// SCALE-encoded arguments, in declaration order.
    pub args: Vec<u8>,
}

impl Call {
    /// Encode `module.function(args)` through the runtime schema.
    pub fn from_values(
        schema: &RuntimeSchema,
        module: &str,
        function: &str,
        args: Record,
    ) -> Result<Self, EncodeError> {
        Self::from_call_data(
            schema,
            &CallData {
                module: module.to_string(),
                function: function.to_string(),
                args,
            },
        )
    }

    pub fn from_call_data(schema: &RuntimeSchema, call: &CallData) -> Result<Self, EncodeError> {
        let mut bytes = Vec::new();
        codec::encode_call(schema, call, &mut bytes)?;
        Ok(Self {
            pallet_index: bytes[0],
            call_index: bytes[1],
            args: bytes.split_off(2),
        })
    }

    /// `Balances.transfer`; `dest` is an SS58 address or `0x` public key.
    pub fn balances_transfer(
        schema: &RuntimeSchema,
        dest: &str,
        value: u128,
    ) -> Result<Self, EncodeError> {
        Self::from_values(schema, "Balances", "transfer", transfer_args(dest, value))
    }

    pub fn transfer_keep_alive(
        schema: &RuntimeSchema,
        dest: &str,
        value: u128,
    ) -> Result<Self, EncodeError> {
        Self::from_values(
            schema,
            "Balances",
            "transfer_keep_alive",
            transfer_args(dest, value),
        )
    }

    /// `Utility.batch` over already encoded calls.
    pub fn utility_batch(schema: &RuntimeSchema, calls: &[Call]) -> Result<Self, EncodeError> {
        let (pallet_index, call_index) = schema.call_index("Utility", "batch")?;
        let mut args = Compact(calls.len() as u32).encode();
        for call in calls {
            call.encode_to(&mut args);
        }
        Ok(Self {
            pallet_index,
            call_index,
            args,
        })
    }
}

fn transfer_args(dest: &str, value: u128) -> Record {
    Record::new()
        .with("dest", Value::String(dest.to_string()))
        .with("value", Value::Number(value))
}

impl Encode for Call {
    fn size_hint(&self) -> usize {
        2 + self.args.len()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        dest.push_byte(self.pallet_index);
        dest.push_byte(self.call_index);
        dest.write(&self.args);
    }
}
