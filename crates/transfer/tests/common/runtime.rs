// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Polkadot-shaped runtime types described through `scale-info`, and the V14
//! metadata built from them. Pallet and call indices follow the relay chain.
//!
//! Shared by the unit tests (mounted as `crate::test_runtime`) and the
//! integration tests, so it only depends on external crates.

#![allow(dead_code, non_camel_case_types)]

use frame_metadata::v14::{
    ExtrinsicMetadata, PalletCallMetadata, PalletEventMetadata, PalletMetadata, RuntimeMetadataV14,
    SignedExtensionMetadata,
};
use frame_metadata::{META_RESERVED, RuntimeMetadata, RuntimeMetadataPrefixed};
use parity_scale_codec::Encode;
use scale_info::{MetaType, TypeInfo, meta_type};
use sp_core::crypto::AccountId32;
use sp_runtime::generic::Era;
use sp_runtime::{DispatchError, MultiAddress};
use std::marker::PhantomData;

pub type Address = MultiAddress<AccountId32, u32>;

#[derive(Encode, TypeInfo)]
pub enum RuntimeCall {
    #[codec(index = 0)]
    System(SystemCall),
    #[codec(index = 3)]
    Timestamp(TimestampCall),
    #[codec(index = 5)]
    Balances(BalancesCall),
    #[codec(index = 7)]
    Staking(StakingCall),
    #[codec(index = 26)]
    Utility(UtilityCall),
    #[codec(index = 29)]
    Proxy(ProxyCall),
}

#[derive(Encode, TypeInfo)]
pub enum SystemCall {
    #[codec(index = 0)]
    remark { remark: Vec<u8> },
}

#[derive(Encode, TypeInfo)]
pub enum TimestampCall {
    #[codec(index = 0)]
    set {
        #[codec(compact)]
        now: u64,
    },
}

#[derive(Encode, TypeInfo)]
pub enum BalancesCall {
    #[codec(index = 0)]
    transfer {
        dest: Address,
        #[codec(compact)]
        value: u128,
    },
    #[codec(index = 2)]
    force_transfer {
        source: Address,
        dest: Address,
        #[codec(compact)]
        value: u128,
    },
    #[codec(index = 3)]
    transfer_keep_alive {
        dest: Address,
        #[codec(compact)]
        value: u128,
    },
    #[codec(index = 4)]
    transfer_all { dest: Address, keep_alive: bool },
}

#[derive(Encode, TypeInfo)]
pub enum StakingCall {
    #[codec(index = 1)]
    bond_extra {
        #[codec(compact)]
        max_additional: u128,
    },
    #[codec(index = 6)]
    chill,
}

#[derive(Encode, TypeInfo)]
pub enum UtilityCall {
    #[codec(index = 0)]
    batch { calls: Vec<RuntimeCall> },
    #[codec(index = 2)]
    batch_all { calls: Vec<RuntimeCall> },
    #[codec(index = 4)]
    force_batch { calls: Vec<RuntimeCall> },
}

#[derive(Encode, TypeInfo)]
pub enum ProxyType {
    Any,
    NonTransfer,
    Governance,
    Staking,
}

#[derive(Encode, TypeInfo)]
pub enum ProxyCall {
    #[codec(index = 0)]
    proxy {
        real: Address,
        force_proxy_type: Option<ProxyType>,
        call: Box<RuntimeCall>,
    },
}

#[derive(Encode, TypeInfo)]
pub struct Weight {
    #[codec(compact)]
    pub ref_time: u64,
    #[codec(compact)]
    pub proof_size: u64,
}

#[derive(Encode, TypeInfo)]
pub enum DispatchClass {
    Normal,
    Operational,
    Mandatory,
}

#[derive(Encode, TypeInfo)]
pub enum Pays {
    Yes,
    No,
}

#[derive(Encode, TypeInfo)]
pub struct DispatchInfo {
    pub weight: Weight,
    pub class: DispatchClass,
    pub pays_fee: Pays,
}

#[derive(Encode, TypeInfo)]
pub enum SystemEvent {
    #[codec(index = 0)]
    ExtrinsicSuccess { dispatch_info: DispatchInfo },
    #[codec(index = 1)]
    ExtrinsicFailed {
        dispatch_error: DispatchError,
        dispatch_info: DispatchInfo,
    },
}

#[derive(Encode, TypeInfo)]
pub enum BalancesEvent {
    #[codec(index = 0)]
    Endowed {
        account: AccountId32,
        free_balance: u128,
    },
    #[codec(index = 2)]
    Transfer {
        from: AccountId32,
        to: AccountId32,
        amount: u128,
    },
}

/// Carries the `Call` type parameter the outer call enum is found through.
#[derive(TypeInfo)]
pub struct UncheckedExtrinsic<Call>(Vec<u8>, PhantomData<Call>);

#[derive(TypeInfo)]
pub struct CheckSpecVersion;

#[derive(TypeInfo)]
pub struct CheckTxVersion;

#[derive(TypeInfo)]
pub struct CheckGenesis;

#[derive(TypeInfo)]
pub struct CheckMortality(pub Era);

#[derive(TypeInfo)]
pub struct CheckNonce(#[codec(compact)] pub u32);

#[derive(TypeInfo)]
pub struct CheckWeight;

#[derive(TypeInfo)]
pub struct ChargeTransactionPayment(#[codec(compact)] pub u128);

fn pallet(
    name: &'static str,
    index: u8,
    calls: Option<MetaType>,
    event: Option<MetaType>,
) -> PalletMetadata {
    PalletMetadata {
        name,
        storage: None,
        calls: calls.map(|ty| PalletCallMetadata { ty }),
        event: event.map(|ty| PalletEventMetadata { ty }),
        constants: vec![],
        error: None,
        index,
    }
}

fn extension<T: TypeInfo + 'static>(identifier: &'static str) -> SignedExtensionMetadata {
    SignedExtensionMetadata {
        identifier,
        ty: meta_type::<T>(),
        additional_signed: meta_type::<()>(),
    }
}

pub fn metadata() -> RuntimeMetadataPrefixed {
    let pallets = vec![
        pallet(
            "System",
            0,
            Some(meta_type::<SystemCall>()),
            Some(meta_type::<SystemEvent>()),
        ),
        pallet("Timestamp", 3, Some(meta_type::<TimestampCall>()), None),
        pallet(
            "Balances",
            5,
            Some(meta_type::<BalancesCall>()),
            Some(meta_type::<BalancesEvent>()),
        ),
        pallet("Staking", 7, Some(meta_type::<StakingCall>()), None),
        pallet("Utility", 26, Some(meta_type::<UtilityCall>()), None),
        pallet("Proxy", 29, Some(meta_type::<ProxyCall>()), None),
    ];

    let extrinsic = ExtrinsicMetadata {
        ty: meta_type::<UncheckedExtrinsic<RuntimeCall>>(),
        version: 4,
        signed_extensions: vec![
            extension::<CheckSpecVersion>("CheckSpecVersion"),
            extension::<CheckTxVersion>("CheckTxVersion"),
            extension::<CheckGenesis>("CheckGenesis"),
            extension::<CheckMortality>("CheckMortality"),
            extension::<CheckNonce>("CheckNonce"),
            extension::<CheckWeight>("CheckWeight"),
            extension::<ChargeTransactionPayment>("ChargeTransactionPayment"),
        ],
    };

    RuntimeMetadataPrefixed(
        META_RESERVED,
        RuntimeMetadata::V14(RuntimeMetadataV14::new(
            pallets,
            extrinsic,
            meta_type::<()>(),
        )),
    )
}

/// Metadata as `state_getMetadata` returns it.
pub fn metadata_hex() -> String {
    format!("0x{}", hex::encode(metadata().encode()))
}

pub fn account(byte: u8) -> AccountId32 {
    AccountId32::new([byte; 32])
}
