// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Chain identity shared by every decode and build call.
//!
//! A [`ChainContext`] is immutable; readers take an `Arc` snapshot from the
//! [`ChainContextStore`] and keep it for the whole operation, so a refresh
//! racing with a block decode never changes the schema under its feet.

use crate::address;
use crate::metadata::{RuntimeSchema, SchemaError};
use crate::rpc::RpcError;
use crate::types::BlockHash;
use config::AddressFormat;
use serde::Deserialize;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Why the runtime schema for a new spec version could not be produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to fetch runtime metadata: {0}")]
    Fetch(#[from] RpcError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to load runtime schema for spec version {spec_version}: {source}")]
    SchemaLoadFailed {
        spec_version: u32,
        #[source]
        source: LoadError,
    },
}

/// `state_getRuntimeVersion` response, reduced to what the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    pub spec_name: String,
    pub spec_version: u32,
    pub transaction_version: u32,
}

#[derive(Debug, Clone)]
pub struct ChainContext {
    pub genesis_hash: Option<BlockHash>,
    pub spec_name: String,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub schema: Arc<RuntimeSchema>,
    /// Prefix detected from the spec name.
    pub ss58_prefix: u16,
    /// Caller override, wins over the detected prefix.
    pub prefix_override: Option<u16>,
    pub address_format: AddressFormat,
}

impl ChainContext {
    /// Context for an as yet unidentified chain.
    pub fn new(schema: RuntimeSchema) -> Self {
        Self {
            genesis_hash: None,
            spec_name: String::new(),
            spec_version: 0,
            transaction_version: 0,
            schema: Arc::new(schema),
            ss58_prefix: address::prefix_for_chain(""),
            prefix_override: None,
            address_format: AddressFormat::default(),
        }
    }

    pub fn with_runtime_version(mut self, version: &RuntimeVersion) -> Self {
        self.spec_name = version.spec_name.clone();
        self.spec_version = version.spec_version;
        self.transaction_version = version.transaction_version;
        self.ss58_prefix = address::prefix_for_chain(&version.spec_name);
        self
    }

    pub fn with_genesis_hash(mut self, hash: BlockHash) -> Self {
        self.genesis_hash = Some(hash);
        self
    }

    pub fn with_prefix_override(mut self, prefix: Option<u16>) -> Self {
        self.prefix_override = prefix;
        self
    }

    pub fn with_address_format(mut self, format: AddressFormat) -> Self {
        self.address_format = format;
        self
    }

    /// Prefix used when rendering addresses.
    pub fn prefix(&self) -> u16 {
        self.prefix_override.unwrap_or(self.ss58_prefix)
    }
}

/// Single-writer, many-reader holder of the current [`ChainContext`].
#[derive(Debug)]
pub struct ChainContextStore {
    current: RwLock<Arc<ChainContext>>,
}

impl ChainContextStore {
    pub fn new(context: ChainContext) -> Self {
        Self {
            current: RwLock::new(Arc::new(context)),
        }
    }

    /// Snapshot of the current context.
    pub fn current(&self) -> Arc<ChainContext> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply an observed runtime version.
    ///
    /// The schema is reloaded through `load_schema` only when the spec
    /// version differs from the stored one; spec name and transaction version
    /// are taken as reported. Returns whether the schema was reloaded.
    pub fn refresh<F>(&self, version: &RuntimeVersion, load_schema: F) -> Result<bool, ContextError>
    where
        F: FnOnce(&RuntimeVersion) -> Result<RuntimeSchema, LoadError>,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let reload = guard.spec_version != version.spec_version;
        if !reload
            && guard.transaction_version == version.transaction_version
            && guard.spec_name == version.spec_name
        {
            return Ok(false);
        }

        let mut next = (**guard).clone().with_runtime_version(version);
        if reload {
            let schema = load_schema(version).map_err(|source| ContextError::SchemaLoadFailed {
                spec_version: version.spec_version,
                source,
            })?;
            next.schema = Arc::new(schema);
            tracing::info!(
                spec_name = %version.spec_name,
                old_spec_version = guard.spec_version,
                new_spec_version = version.spec_version,
                "Runtime upgraded, reloaded schema"
            );
        }

        *guard = Arc::new(next);
        Ok(reload)
    }

    pub fn set_genesis_hash(&self, hash: BlockHash) {
        self.update(|ctx| ctx.genesis_hash = Some(hash));
    }

    /// Override (or with `None`, stop overriding) the detected SS58 prefix.
    pub fn set_prefix(&self, prefix: Option<u16>) {
        self.update(|ctx| ctx.prefix_override = prefix);
    }

    fn update(&self, f: impl FnOnce(&mut ChainContext)) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = (**guard).clone();
        f(&mut next);
        *guard = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(spec_name: &str, spec_version: u32, tx: u32) -> RuntimeVersion {
        RuntimeVersion {
            spec_name: spec_name.to_string(),
            spec_version,
            transaction_version: tx,
        }
    }

    fn schema() -> Result<RuntimeSchema, LoadError> {
        Ok(RuntimeSchema::from_metadata(crate::test_runtime::metadata())?)
    }

    fn store() -> ChainContextStore {
        ChainContextStore::new(ChainContext::new(RuntimeSchema::default()))
    }

    #[test]
    fn test_refresh_loads_schema_on_spec_change_only() {
        let store = store();
        let mut loads = 0;

        let reloaded = store
            .refresh(&version("polkadot", 1_002_000, 26), |_| {
                loads += 1;
                schema()
            })
            .unwrap();
        assert!(reloaded);

        let reloaded = store
            .refresh(&version("polkadot", 1_002_000, 26), |_| {
                loads += 1;
                schema()
            })
            .unwrap();
        assert!(!reloaded);

        let reloaded = store
            .refresh(&version("polkadot", 1_002_000, 27), |_| {
                loads += 1;
                schema()
            })
            .unwrap();
        assert!(!reloaded);
        assert_eq!(store.current().transaction_version, 27);

        store
            .refresh(&version("polkadot", 1_003_000, 27), |_| {
                loads += 1;
                schema()
            })
            .unwrap();
        assert_eq!(loads, 2);
        assert_eq!(store.current().spec_version, 1_003_000);
    }

    #[test]
    fn test_refresh_failure_keeps_previous_context() {
        let store = store();
        let err = store
            .refresh(&version("polkadot", 5, 1), |_| Ok(RuntimeSchema::from_hex("0x00")?))
            .unwrap_err();
        assert!(matches!(
            err,
            ContextError::SchemaLoadFailed {
                spec_version: 5,
                source: LoadError::Schema(_)
            }
        ));
        assert_eq!(store.current().spec_version, 0);
    }

    #[test]
    fn test_snapshot_survives_refresh() {
        let store = store();
        let before = store.current();
        store
            .refresh(&version("kusama", 9_430, 24), |_| schema())
            .unwrap();
        assert_eq!(before.spec_version, 0);
        assert_eq!(store.current().spec_name, "kusama");
    }

    #[test]
    fn test_prefix_detection_and_override() {
        let store = store();
        assert_eq!(store.current().prefix(), 42);

        store
            .refresh(&version("polkadot", 1, 1), |_| schema())
            .unwrap();
        assert_eq!(store.current().prefix(), 0);

        store.set_prefix(Some(7));
        assert_eq!(store.current().prefix(), 7);
        store.set_prefix(None);
        assert_eq!(store.current().prefix(), 0);
    }

    #[test]
    fn test_runtime_version_json() {
        let json = r#"{"specName":"polkadot","implName":"parity-polkadot","specVersion":1002000,"transactionVersion":26,"apis":[]}"#;
        let v: RuntimeVersion = serde_json::from_str(json).unwrap();
        assert_eq!(v, version("polkadot", 1_002_000, 26));
    }
}
