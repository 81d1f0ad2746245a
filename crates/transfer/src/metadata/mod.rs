// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runtime schema read from the chain's own metadata.
//!
//! `state_getMetadata` returns a SCALE-encoded [`RuntimeMetadataPrefixed`].
//! Only V14 and later carry a type registry, so earlier layouts are rejected.
//! Calls and events are indexed by `(pallet index, variant index)`; each
//! argument keeps the registry type id it is decoded with.

use crate::utils::decode_hex;
use frame_metadata::{META_RESERVED, RuntimeMetadata, RuntimeMetadataPrefixed};
use parity_scale_codec::Decode;
use scale_info::form::PortableForm;
use scale_info::{PortableRegistry, Registry, Type, TypeDef, TypeDefPrimitive, Variant};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid metadata hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Failed to decode runtime metadata: {0}")]
    DecodeFailed(#[from] parity_scale_codec::Error),

    #[error("Metadata does not start with the 'meta' magic number")]
    InvalidMagic,

    #[error("Unsupported metadata version V{0}, expected V14 or V15")]
    UnsupportedVersion(u32),

    #[error("Failed to read metadata file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Type {0} not found in the metadata registry")]
    TypeNotFound(u32),

    #[error("The {kind} type of pallet {pallet} is not an enum")]
    NotAnEnum { kind: &'static str, pallet: String },

    #[error("Call {module}.{function} not found in runtime schema")]
    CallNotFound { module: String, function: String },
}

/// One call or event argument. Unnamed fields are named by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDef {
    pub name: String,
    /// Id in the metadata type registry.
    pub ty: u32,
}

/// A call or event variant resolved to its owning pallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSchema {
    pub module: String,
    pub name: String,
    pub pallet_index: u8,
    pub index: u8,
    pub args: Vec<ArgDef>,
}

/// Signed extension in the order its extra data follows the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtension {
    pub identifier: String,
    pub ty: u32,
}

#[derive(Debug, Clone)]
pub struct RuntimeSchema {
    registry: PortableRegistry,
    calls: HashMap<(u8, u8), VariantSchema>,
    events: HashMap<(u8, u8), VariantSchema>,
    /// Outer `RuntimeCall` enum, which nested calls are decoded as.
    call_ty: Option<u32>,
    signed_extensions: Vec<SignedExtension>,
}

/// Pallet type ids, collected before the registry is moved out of the
/// metadata.
struct PalletTypes {
    name: String,
    index: u8,
    calls: Option<u32>,
    event: Option<u32>,
}

impl Default for RuntimeSchema {
    fn default() -> Self {
        Self {
            registry: Registry::new().into(),
            calls: HashMap::new(),
            events: HashMap::new(),
            call_ty: None,
            signed_extensions: Vec::new(),
        }
    }
}

impl RuntimeSchema {
    pub fn from_metadata(metadata: RuntimeMetadataPrefixed) -> Result<Self, SchemaError> {
        if metadata.0 != META_RESERVED {
            return Err(SchemaError::InvalidMagic);
        }

        match metadata.1 {
            RuntimeMetadata::V14(m) => {
                let pallets = m
                    .pallets
                    .iter()
                    .map(|p| PalletTypes {
                        name: p.name.clone(),
                        index: p.index,
                        calls: p.calls.as_ref().map(|c| c.ty.id),
                        event: p.event.as_ref().map(|e| e.ty.id),
                    })
                    .collect();
                let extensions = m
                    .extrinsic
                    .signed_extensions
                    .iter()
                    .map(|e| SignedExtension {
                        identifier: e.identifier.clone(),
                        ty: e.ty.id,
                    })
                    .collect();
                let call_ty = call_type_param(&m.types, m.extrinsic.ty.id);
                Self::build(m.types, pallets, call_ty, extensions)
            }
            RuntimeMetadata::V15(m) => {
                let pallets = m
                    .pallets
                    .iter()
                    .map(|p| PalletTypes {
                        name: p.name.clone(),
                        index: p.index,
                        calls: p.calls.as_ref().map(|c| c.ty.id),
                        event: p.event.as_ref().map(|e| e.ty.id),
                    })
                    .collect();
                let extensions = m
                    .extrinsic
                    .signed_extensions
                    .iter()
                    .map(|e| SignedExtension {
                        identifier: e.identifier.clone(),
                        ty: e.ty.id,
                    })
                    .collect();
                let call_ty = Some(m.outer_enums.call_enum_ty.id);
                Self::build(m.types, pallets, call_ty, extensions)
            }
            other => Err(SchemaError::UnsupportedVersion(other.version())),
        }
    }

    /// Raw SCALE bytes of `RuntimeMetadataPrefixed`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SchemaError> {
        let metadata = RuntimeMetadataPrefixed::decode(&mut &bytes[..])?;
        Self::from_metadata(metadata)
    }

    /// The hex string returned by `state_getMetadata`.
    pub fn from_hex(metadata_hex: &str) -> Result<Self, SchemaError> {
        Self::from_bytes(&decode_hex(metadata_hex.trim())?)
    }

    /// A file holding either the `state_getMetadata` hex or the raw bytes.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let bytes = std::fs::read(path)?;
        match std::str::from_utf8(&bytes) {
            Ok(text) if text.trim_start().starts_with("0x") => Self::from_hex(text),
            _ => Self::from_bytes(&bytes),
        }
    }

    fn build(
        registry: PortableRegistry,
        pallets: Vec<PalletTypes>,
        call_ty: Option<u32>,
        signed_extensions: Vec<SignedExtension>,
    ) -> Result<Self, SchemaError> {
        let mut calls = HashMap::new();
        let mut events = HashMap::new();

        for pallet in &pallets {
            if let Some(ty) = pallet.calls {
                for variant in variants(&registry, ty, "call", &pallet.name)? {
                    calls.insert((pallet.index, variant.index), variant_schema(pallet, variant));
                }
            }
            if let Some(ty) = pallet.event {
                for variant in variants(&registry, ty, "event", &pallet.name)? {
                    events.insert((pallet.index, variant.index), variant_schema(pallet, variant));
                }
            }
        }

        tracing::debug!(
            pallets = pallets.len(),
            calls = calls.len(),
            events = events.len(),
            types = registry.types.len(),
            "Loaded runtime schema from metadata"
        );

        Ok(Self {
            registry,
            calls,
            events,
            call_ty,
            signed_extensions,
        })
    }

    pub fn registry(&self) -> &PortableRegistry {
        &self.registry
    }

    /// Type id of the outer call enum, when the metadata names one.
    pub fn call_type(&self) -> Option<u32> {
        self.call_ty
    }

    pub fn signed_extensions(&self) -> &[SignedExtension] {
        &self.signed_extensions
    }

    pub fn resolve(&self, ty: u32) -> Result<&Type<PortableForm>, SchemaError> {
        self.registry.resolve(ty).ok_or(SchemaError::TypeNotFound(ty))
    }

    pub(crate) fn is_u8(&self, ty: u32) -> bool {
        matches!(
            self.registry.resolve(ty).map(|t| &t.type_def),
            Some(TypeDef::Primitive(TypeDefPrimitive::U8))
        )
    }

    pub(crate) fn is_option(&self, ty: u32) -> bool {
        self.registry
            .resolve(ty)
            .and_then(|t| t.path.segments.last())
            .is_some_and(|ident| ident == "Option")
    }

    pub fn call(&self, pallet_index: u8, call_index: u8) -> Option<&VariantSchema> {
        self.calls.get(&(pallet_index, call_index))
    }

    pub fn event(&self, pallet_index: u8, event_index: u8) -> Option<&VariantSchema> {
        self.events.get(&(pallet_index, event_index))
    }

    /// Look a call up by name, as the transaction builder addresses calls.
    pub fn call_by_name(&self, module: &str, function: &str) -> Result<&VariantSchema, SchemaError> {
        self.calls
            .values()
            .find(|c| c.module == module && c.name == function)
            .ok_or_else(|| SchemaError::CallNotFound {
                module: module.to_string(),
                function: function.to_string(),
            })
    }

    /// `(pallet index, call index)` for a named call.
    pub fn call_index(&self, module: &str, function: &str) -> Result<(u8, u8), SchemaError> {
        self.call_by_name(module, function)
            .map(|c| (c.pallet_index, c.index))
    }
}

/// V14 has no outer enum list; the call type is the `Call` parameter of the
/// extrinsic type.
fn call_type_param(registry: &PortableRegistry, extrinsic_ty: u32) -> Option<u32> {
    registry
        .resolve(extrinsic_ty)?
        .type_params
        .iter()
        .find(|param| param.name == "Call")?
        .ty
        .as_ref()
        .map(|ty| ty.id)
}

fn variants<'a>(
    registry: &'a PortableRegistry,
    ty: u32,
    kind: &'static str,
    pallet: &str,
) -> Result<&'a [Variant<PortableForm>], SchemaError> {
    let resolved = registry.resolve(ty).ok_or(SchemaError::TypeNotFound(ty))?;
    let TypeDef::Variant(def) = &resolved.type_def else {
        return Err(SchemaError::NotAnEnum {
            kind,
            pallet: pallet.to_string(),
        });
    };
    Ok(&def.variants)
}

fn variant_schema(pallet: &PalletTypes, variant: &Variant<PortableForm>) -> VariantSchema {
    VariantSchema {
        module: pallet.name.clone(),
        name: variant.name.clone(),
        pallet_index: pallet.index,
        index: variant.index,
        args: variant
            .fields
            .iter()
            .enumerate()
            .map(|(position, field)| ArgDef {
                name: field
                    .name
                    .clone()
                    .unwrap_or_else(|| position.to_string()),
                ty: field.ty.id,
            })
            .collect(),
    }
}
