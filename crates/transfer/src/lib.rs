// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transfer processing for Substrate chains.
//!
//! Decodes the extrinsics and events of a block into a [`block::TransferReport`]
//! of balance transfers with success/fail status, and builds and signs v4
//! extrinsics for outgoing transfers. Talking to a node goes through a
//! caller-supplied [`rpc::RpcTransport`].

pub mod address;
pub mod block;
pub mod codec;
pub mod consts;
pub mod context;
pub mod extrinsic;
pub mod logging;
pub mod metadata;
pub mod rpc;
pub mod transaction;
pub mod types;
pub mod utils;

#[cfg(test)]
#[path = "../tests/common/runtime.rs"]
pub(crate) mod test_runtime;
