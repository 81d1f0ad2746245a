// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client session: one transport, one chain context, one genesis hash.

use super::account::{AccountInfo, decode_account_info};
use super::fee::{FeeDetails, parse_fee_details, parse_partial_fee};
use super::storage::{account_storage_key, events_storage_key};
use super::{RpcError, RpcTransport};
use crate::address;
use crate::block::{BlockError, BlockParser, EventSource, FeeEstimator, RawBlock, TransferReport};
use crate::context::{ChainContext, ChainContextStore, ContextError, LoadError, RuntimeVersion};
use crate::metadata::RuntimeSchema;
use crate::types::BlockHash;
use crate::utils::decode_hex;
use serde_json::{Value, json};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Block(#[from] BlockError),
}

pub struct TransferClient<T> {
    transport: T,
    store: ChainContextStore,
    genesis_hash: OnceLock<BlockHash>,
}

impl<T: RpcTransport> TransferClient<T> {
    /// The schema in `context` is replaced from `state_getMetadata` the
    /// first time the node reports a different spec version.
    pub fn new(transport: T, context: ChainContext) -> Self {
        Self {
            transport,
            store: ChainContextStore::new(context),
            genesis_hash: OnceLock::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of the current chain context.
    pub fn context(&self) -> Arc<ChainContext> {
        self.store.current()
    }

    /// Override the detected SS58 prefix; `None` restores detection.
    pub fn set_prefix(&self, prefix: Option<u16>) {
        self.store.set_prefix(prefix);
    }

    /// Issue a request, reconnecting and retrying once if the connection was
    /// closed.
    fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        match self.transport.request(method, params.clone()) {
            Err(RpcError::ConnectionClosed) => {
                tracing::warn!(method = %method, "Connection closed, reconnecting");
                self.transport.reconnect()?;
                self.transport.request(method, params)
            }
            other => other,
        }
    }

    pub fn runtime_version(&self) -> Result<RuntimeVersion, RpcError> {
        const METHOD: &str = "state_getRuntimeVersion";
        let response = self.request(METHOD, vec![])?;
        serde_json::from_value(response)
            .map_err(|e| RpcError::invalid_response(METHOD, e.to_string()))
    }

    /// Decode the runtime metadata the node currently serves.
    pub fn runtime_schema(&self) -> Result<RuntimeSchema, LoadError> {
        const METHOD: &str = "state_getMetadata";
        let response = self.request(METHOD, vec![])?;
        let metadata = response
            .as_str()
            .ok_or_else(|| RpcError::invalid_response(METHOD, "metadata is not a string"))?;
        Ok(RuntimeSchema::from_hex(metadata)?)
    }

    /// Bring the chain context up to date with the node's runtime version.
    pub fn refresh(&self) -> Result<Arc<ChainContext>, ClientError> {
        let version = self.runtime_version()?;
        self.store.refresh(&version, |v| {
            tracing::debug!(spec_version = v.spec_version, "Fetching runtime metadata");
            self.runtime_schema()
        })?;
        Ok(self.store.current())
    }

    /// Genesis hash, fetched once per session.
    pub fn genesis_hash(&self) -> Result<BlockHash, RpcError> {
        if let Some(hash) = self.genesis_hash.get() {
            return Ok(*hash);
        }
        let hash = self.block_hash(0)?;
        self.store.set_genesis_hash(hash);
        Ok(*self.genesis_hash.get_or_init(|| hash))
    }

    pub fn block_hash(&self, number: u64) -> Result<BlockHash, RpcError> {
        const METHOD: &str = "chain_getBlockHash";
        match self.request(METHOD, vec![json!(number)])? {
            Value::Null => Err(RpcError::BlockNotFound(number)),
            Value::String(hash) => hash
                .parse()
                .map_err(|e: crate::types::HashParseError| {
                    RpcError::invalid_response(METHOD, e.to_string())
                }),
            other => Err(RpcError::invalid_response(
                METHOD,
                format!("expected a hash, got {}", other),
            )),
        }
    }

    /// Fetch a block with its raw extrinsics.
    pub fn raw_block(&self, hash: &BlockHash) -> Result<RawBlock, RpcError> {
        const METHOD: &str = "chain_getBlock";
        let response = self.request(METHOD, vec![json!(hash.to_string())])?;
        let block = response
            .get("block")
            .ok_or_else(|| RpcError::invalid_response(METHOD, "block is missing"))?;
        let header = block
            .get("header")
            .ok_or_else(|| RpcError::invalid_response(METHOD, "header is missing"))?;

        let number = header
            .get("number")
            .and_then(Value::as_str)
            .and_then(|n| u64::from_str_radix(n.trim_start_matches("0x"), 16).ok())
            .ok_or_else(|| RpcError::invalid_response(METHOD, "invalid header number"))?;
        let parent_hash = header
            .get("parentHash")
            .and_then(Value::as_str)
            .and_then(|h| h.parse::<BlockHash>().ok())
            .ok_or_else(|| RpcError::invalid_response(METHOD, "invalid parentHash"))?;

        let extrinsics = block
            .get("extrinsics")
            .and_then(Value::as_array)
            .ok_or_else(|| RpcError::invalid_response(METHOD, "extrinsics is missing"))?
            .iter()
            .map(|xt| {
                let xt = xt
                    .as_str()
                    .ok_or_else(|| RpcError::invalid_response(METHOD, "extrinsic is not a string"))?;
                decode_hex(xt).map_err(|source| RpcError::InvalidHex {
                    method: METHOD.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawBlock {
            number,
            parent_hash,
            hash: *hash,
            extrinsics,
        })
    }

    /// Transfer report for the block with `hash`.
    pub fn block_by_hash(&self, hash: &BlockHash) -> Result<TransferReport, ClientError> {
        let ctx = self.refresh()?;
        let block = self.raw_block(hash)?;
        tracing::debug!(
            block = block.number,
            hash = %block.hash,
            extrinsics = block.extrinsics.len(),
            "Parsing block"
        );
        let report = BlockParser::new(ctx, self, self).parse(&block)?;
        Ok(report)
    }

    /// Transfer report for the block at `number`.
    pub fn block_by_number(&self, number: u64) -> Result<TransferReport, ClientError> {
        let hash = self.block_hash(number)?;
        self.block_by_hash(&hash)
    }

    /// Nonce and balances of `address` (SS58 or hex public key) at the best
    /// block.
    pub fn account_info(&self, address: &str) -> Result<AccountInfo, ClientError> {
        const METHOD: &str = "state_getStorage";
        let ctx = self.refresh()?;
        let public_key = address::decode(address).map_err(RpcError::from)?;
        let key = account_storage_key(&public_key);

        let bytes = match self.request(METHOD, vec![json!(key)])? {
            Value::Null => return Err(RpcError::AccountNotFound(address.to_string()).into()),
            value => storage_bytes(METHOD, &value)?,
        };
        Ok(decode_account_info(&ctx.spec_name, &bytes)?)
    }

    /// Partial fee (decimal string) of a hex extrinsic at `parent_hash`.
    pub fn partial_fee(
        &self,
        extrinsic_hex: &str,
        parent_hash: &BlockHash,
    ) -> Result<String, RpcError> {
        let response = self.request(
            "payment_queryInfo",
            vec![json!(extrinsic_hex), json!(parent_hash.to_string())],
        )?;
        parse_partial_fee(&response)
    }

    pub fn fee_details(
        &self,
        extrinsic_hex: &str,
        parent_hash: &BlockHash,
    ) -> Result<FeeDetails, RpcError> {
        let response = self.request(
            "payment_queryFeeDetails",
            vec![json!(extrinsic_hex), json!(parent_hash.to_string())],
        )?;
        parse_fee_details(&response)
    }
}

fn storage_bytes(method: &str, value: &Value) -> Result<Vec<u8>, RpcError> {
    let hex = value
        .as_str()
        .ok_or_else(|| RpcError::invalid_response(method, "storage value is not a string"))?;
    decode_hex(hex).map_err(|source| RpcError::InvalidHex {
        method: method.to_string(),
        source,
    })
}

impl<T: RpcTransport> FeeEstimator for TransferClient<T> {
    fn partial_fee(&self, extrinsic_hex: &str, parent_hash: &BlockHash) -> Result<String, RpcError> {
        TransferClient::partial_fee(self, extrinsic_hex, parent_hash)
    }
}

impl<T: RpcTransport> EventSource for TransferClient<T> {
    fn events_storage(&self, block_hash: &BlockHash) -> Result<Option<Vec<u8>>, RpcError> {
        const METHOD: &str = "state_getStorage";
        match self.request(
            METHOD,
            vec![json!(events_storage_key()), json!(block_hash.to_string())],
        )? {
            Value::Null => Ok(None),
            value => storage_bytes(METHOD, &value).map(Some),
        }
    }
}
