// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(dead_code)]

pub mod runtime;

use config::AddressFormat;
use parity_scale_codec::{Compact, Encode};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use substrate_transfer::block::Phase;
use substrate_transfer::extrinsic::{
    Era, MultiSignature, SignatureData, SignedExtrinsic, SignerAddress, encode_unsigned,
};
use substrate_transfer::metadata::RuntimeSchema;
use substrate_transfer::rpc::{RpcError, RpcTransport, events_storage_key};
use substrate_transfer::transaction::Call;
use substrate_transfer::types::{BlockHash, Record, Value as CallValue};
use substrate_transfer::utils::hex_with_prefix;

pub const PARTIAL_FEE: &str = "1500";
pub const SENDER: [u8; 32] = [1; 32];

/// In-memory node answering the JSON-RPC methods the client uses.
#[derive(Default)]
pub struct MockNode {
    pub spec_name: String,
    pub spec_version: u32,
    hashes: HashMap<u64, BlockHash>,
    blocks: HashMap<BlockHash, Value>,
    events: HashMap<BlockHash, Vec<u8>>,
    pub calls: RefCell<Vec<String>>,
    pub close_next: Cell<usize>,
    pub reconnects: Cell<usize>,
}

impl MockNode {
    pub fn new(spec_name: &str) -> Self {
        Self {
            spec_name: spec_name.to_string(),
            spec_version: 1_002_000,
            ..Default::default()
        }
    }

    /// Register block `number` with the given raw extrinsics and events.
    pub fn with_block(
        mut self,
        number: u64,
        extrinsics: &[Vec<u8>],
        events: Option<Vec<u8>>,
    ) -> Self {
        let hash = block_hash(number);
        self.hashes.insert(number, hash);
        self.blocks.insert(
            hash,
            json!({
                "block": {
                    "header": {
                        "number": format!("0x{:x}", number),
                        "parentHash": parent_hash(number).to_string(),
                        "stateRoot": format!("0x{}", "00".repeat(32)),
                        "extrinsicsRoot": format!("0x{}", "00".repeat(32)),
                        "digest": {"logs": []}
                    },
                    "extrinsics": extrinsics.iter().map(|xt| hex_with_prefix(xt)).collect::<Vec<_>>()
                },
                "justifications": null
            }),
        );
        if let Some(events) = events {
            self.events.insert(hash, events);
        }
        self
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|m| *m == method).count()
    }
}

impl RpcTransport for MockNode {
    fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        self.calls.borrow_mut().push(method.to_string());
        if self.close_next.get() > 0 {
            self.close_next.set(self.close_next.get() - 1);
            return Err(RpcError::ConnectionClosed);
        }

        let hash_param = |i: usize| -> Option<BlockHash> {
            params.get(i).and_then(Value::as_str).and_then(|h| h.parse().ok())
        };

        match method {
            "state_getRuntimeVersion" => Ok(json!({
                "specName": self.spec_name,
                "implName": "parity-polkadot",
                "specVersion": self.spec_version,
                "transactionVersion": 26
            })),
            "state_getMetadata" => Ok(json!(runtime::metadata_hex())),
            "chain_getBlockHash" => {
                let number = params.first().and_then(Value::as_u64).unwrap_or_default();
                Ok(self
                    .hashes
                    .get(&number)
                    .map(|h| json!(h.to_string()))
                    .unwrap_or(Value::Null))
            }
            "chain_getBlock" => Ok(hash_param(0)
                .and_then(|h| self.blocks.get(&h).cloned())
                .unwrap_or(Value::Null)),
            "state_getStorage" => {
                assert_eq!(params[0], json!(events_storage_key()));
                Ok(hash_param(1)
                    .and_then(|h| self.events.get(&h))
                    .map(|bytes| json!(hex_with_prefix(bytes)))
                    .unwrap_or(Value::Null))
            }
            "payment_queryInfo" => Ok(json!({
                "weight": {"refTime": 150_000_000, "proofSize": 3_593},
                "class": "normal",
                "partialFee": PARTIAL_FEE
            })),
            _ => Err(RpcError::Call {
                method: method.to_string(),
                message: "Method not found".to_string(),
            }),
        }
    }

    fn reconnect(&self) -> Result<(), RpcError> {
        self.reconnects.set(self.reconnects.get() + 1);
        Ok(())
    }
}

pub fn block_hash(number: u64) -> BlockHash {
    BlockHash::from([number as u8 | 0x80; 32])
}

pub fn parent_hash(number: u64) -> BlockHash {
    BlockHash::from([number as u8; 32])
}

pub fn schema() -> RuntimeSchema {
    RuntimeSchema::from_metadata(runtime::metadata()).unwrap()
}

pub fn account_hex(key: [u8; 32]) -> String {
    hex_with_prefix(&key)
}

pub fn timestamp(now: u64) -> Vec<u8> {
    let call = Call::from_values(
        &schema(),
        "Timestamp",
        "set",
        Record::new().with("now", CallValue::Number(now as u128)),
    )
    .unwrap();
    encode_unsigned(&call.encode())
}

pub fn signed(call: &Call, nonce: u64, signature_byte: u8) -> Vec<u8> {
    SignedExtrinsic {
        signature: SignatureData {
            signer: SignerAddress::from_public_key(SENDER, AddressFormat::MultiAddress),
            signature: MultiSignature::Sr25519([signature_byte; 64]),
            era: Era::mortal(90, 64),
            nonce,
            tip: 0,
        },
        call: call.encode(),
    }
    .to_bytes()
}

pub fn transfer(to: [u8; 32], value: u128) -> Call {
    Call::balances_transfer(&schema(), &account_hex(to), value).unwrap()
}

pub fn transfer_event(index: u32, from: [u8; 32], to: [u8; 32], amount: u128) -> Vec<u8> {
    let mut bytes = Phase::ApplyExtrinsic(index).encode();
    bytes.extend([5, 2]);
    bytes.extend(from);
    bytes.extend(to);
    bytes.extend(amount.encode());
    bytes.extend(Vec::<[u8; 32]>::new().encode());
    bytes
}

fn dispatch_info() -> Vec<u8> {
    let mut bytes = Compact(250_000_000u64).encode();
    bytes.extend(Compact(3_593u64).encode());
    // class Normal, pays Yes
    bytes.extend([0, 0]);
    bytes
}

pub fn success_event(index: u32) -> Vec<u8> {
    let mut bytes = Phase::ApplyExtrinsic(index).encode();
    bytes.extend([0, 0]);
    bytes.extend(dispatch_info());
    bytes.extend(Vec::<[u8; 32]>::new().encode());
    bytes
}

pub fn failed_event(index: u32) -> Vec<u8> {
    let mut bytes = Phase::ApplyExtrinsic(index).encode();
    bytes.extend([0, 1]);
    // DispatchError::BadOrigin
    bytes.push(2);
    bytes.extend(dispatch_info());
    bytes.extend(Vec::<[u8; 32]>::new().encode());
    bytes
}

pub fn events_storage(events: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Compact(events.len() as u32).encode();
    for event in events {
        bytes.extend(event);
    }
    bytes
}
