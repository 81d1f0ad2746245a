// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Node queries on top of a caller-supplied JSON-RPC transport.
//!
//! The transport (websocket, http, in-memory) and its timeouts belong to the
//! caller; this module only knows method names, parameters and how to read
//! the results.

mod account;
mod client;
mod fee;
mod storage;

pub use account::{AccountInfo, decode_account_info};
pub use client::{ClientError, TransferClient};
pub use fee::{FeeDetails, parse_fee_details, parse_partial_fee};
pub use storage::{account_storage_key, events_storage_key};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("RPC call '{method}' failed: {message}")]
    Call { method: String, message: String },

    #[error("Unexpected response to '{method}': {reason}")]
    InvalidResponse { method: String, reason: String },

    #[error("Invalid hex in response to '{method}': {source}")]
    InvalidHex {
        method: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("Failed to decode storage value: {0}")]
    StorageDecode(#[from] parity_scale_codec::Error),

    #[error("Invalid address: {0}")]
    Address(#[from] crate::address::AddressError),

    #[error("No block at height {0}")]
    BlockNotFound(u64),

    #[error("No account state stored for {0}")]
    AccountNotFound(String),
}

impl RpcError {
    pub(crate) fn invalid_response(method: &str, reason: impl Into<String>) -> Self {
        RpcError::InvalidResponse {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

/// Synchronous JSON-RPC request/response channel to a node.
pub trait RpcTransport {
    fn request(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, RpcError>;

    /// Re-establish the connection after [`RpcError::ConnectionClosed`].
    fn reconnect(&self) -> Result<(), RpcError> {
        Ok(())
    }
}
