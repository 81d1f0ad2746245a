// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Metadata-directed SCALE codec between wire bytes and [`Value`]s.
//!
//! Arguments are decoded with `scale_value::scale::decode_as_type` against
//! the schema's type registry and then mapped onto [`Value`]:
//!
//! | decoded as                          | value                               |
//! |-------------------------------------|-------------------------------------|
//! | unsigned integer, `Compact`         | `Number`                            |
//! | `bool`                              | `Bool`                              |
//! | `str`, `char`                       | `String`                            |
//! | `Vec<u8>`, `[u8; N]`                | `Bytes`                             |
//! | single-field tuple struct           | the inner value (`AccountId32` -> `Bytes`) |
//! | struct                              | `Record`                            |
//! | sequence, array, tuple              | `List`                              |
//! | enum variant without fields         | `String` (variant name)             |
//! | enum variant with fields            | `Record { name: fields }`           |
//! | outer call enum                     | `Record { module, function, args }` |
//!
//! Encoding runs the other way, directed by the same registry types, and
//! accepts caller-friendly forms: numbers may be decimal strings, 32-byte
//! accounts may be SS58 or hex strings, byte fields may be hex strings.

use crate::address::{self, AddressError};
use crate::metadata::{ArgDef, RuntimeSchema, SchemaError};
use crate::types::{Record, Value, ValueError};
use crate::utils::decode_hex;
use parity_scale_codec::Decode;
use scale_info::form::PortableForm;
use scale_info::{Field, TypeDef, TypeDefPrimitive};
use scale_value::{Composite, Primitive, ValueDef};
use sp_core::crypto::AccountId32;
use sp_runtime::MultiAddress;
use thiserror::Error;

/// Signer address type used by the supported runtimes.
pub type Address = MultiAddress<AccountId32, u32>;

type ScaleValue<T = ()> = scale_value::Value<T>;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("SCALE decoding error: {0}")]
    Scale(#[from] parity_scale_codec::Error),

    #[error("Failed to decode value against its metadata type: {0}")]
    Type(#[from] scale_value::scale::DecodeError),

    #[error("Call {pallet}/{call} not found in runtime schema")]
    UnknownCall { pallet: u8, call: u8 },

    #[error("Event {pallet}/{event} not found in runtime schema")]
    UnknownEvent { pallet: u8, event: u8 },

    #[error("Unsupported extrinsic version {0}")]
    UnsupportedVersion(u8),

    #[error("Extrinsic declares {declared} bytes but {actual} follow the length prefix")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("{0} trailing bytes after decoding")]
    TrailingBytes(usize),

    #[error("Unexpected decoded value: {0}")]
    UnexpectedValue(#[from] ValueError),
}

impl DecodeError {
    /// Schema misses are expected for pallets the loaded metadata does not
    /// describe.
    pub fn is_unknown_call(&self) -> bool {
        matches!(self, DecodeError::UnknownCall { .. })
    }
}

impl From<hex::FromHexError> for DecodeError {
    fn from(e: hex::FromHexError) -> Self {
        DecodeError::InvalidHex(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("Failed to encode value against its metadata type: {0}")]
    Scale(#[from] scale_value::scale::EncodeError),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Expected {expected} items, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("{value} does not fit in {ty}")]
    OutOfRange { ty: &'static str, value: String },

    #[error("No variant of type {ty} matches the given {found}")]
    UnknownVariant { ty: u32, found: &'static str },

    #[error("Encoding {0} is not supported")]
    Unsupported(&'static str),
}

/// A runtime call addressed by name, with its decoded or caller-supplied
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallData {
    pub module: String,
    pub function: String,
    pub args: Record,
}

impl CallData {
    pub fn into_value(self) -> Value {
        Value::Record(
            Record::new()
                .with("module", Value::String(self.module))
                .with("function", Value::String(self.function))
                .with("args", Value::Record(self.args)),
        )
    }

    /// Read back the `{ module, function, args }` record form.
    pub fn from_value(value: &Value) -> Result<Self, ValueError> {
        let record = value.as_record()?;
        Ok(Self {
            module: record.field("module")?.as_str()?.to_string(),
            function: record.field("function")?.as_str()?.to_string(),
            args: match record.get("args") {
                Some(args) => args.as_record()?.clone(),
                None => Record::new(),
            },
        })
    }
}

/// The 32-byte account behind a decoded address: raw bytes, or the `Id` /
/// `Address32` variant of a `MultiAddress`.
pub fn account_id(value: &Value) -> Option<[u8; 32]> {
    match value {
        Value::Bytes(bytes) => bytes.as_slice().try_into().ok(),
        Value::Record(record) if record.len() == 1 => match record.iter().next()? {
            ("Id" | "Address32", inner) => account_id(inner),
            _ => None,
        },
        _ => None,
    }
}

// ================================================================================================
// Decoding
// ================================================================================================

/// Decode `pallet index ++ call index ++ args` from the front of `input`.
pub fn decode_call(schema: &RuntimeSchema, input: &mut &[u8]) -> Result<CallData, DecodeError> {
    let pallet = u8::decode(input)?;
    let call = u8::decode(input)?;
    let def = schema
        .call(pallet, call)
        .ok_or(DecodeError::UnknownCall { pallet, call })?;

    tracing::trace!(
        module = %def.module,
        function = %def.name,
        "Decoding call arguments"
    );

    Ok(CallData {
        module: def.module.clone(),
        function: def.name.clone(),
        args: decode_args(schema, &def.args, input)?,
    })
}

/// Decode an argument list in declaration order.
pub fn decode_args(
    schema: &RuntimeSchema,
    defs: &[ArgDef],
    input: &mut &[u8],
) -> Result<Record, DecodeError> {
    let mut args = Record::new();
    for def in defs {
        args.push(def.name.clone(), decode_value(schema, def.ty, input)?);
    }
    Ok(args)
}

/// Decode one value of registry type `ty`.
pub fn decode_value(
    schema: &RuntimeSchema,
    ty: u32,
    input: &mut &[u8],
) -> Result<Value, DecodeError> {
    let decoded = scale_value::scale::decode_as_type(input, ty, schema.registry())?;
    Ok(from_scale(schema, decoded))
}

/// How a decoded composite or variant is presented, decided by its type.
enum Shape {
    Bytes,
    Wrapper,
    Call,
    Plain,
}

fn shape_of(schema: &RuntimeSchema, ty: u32) -> Shape {
    if schema.call_type() == Some(ty) {
        return Shape::Call;
    }
    match schema.registry().resolve(ty).map(|t| &t.type_def) {
        Some(TypeDef::Sequence(seq)) if schema.is_u8(seq.type_param.id) => Shape::Bytes,
        Some(TypeDef::Array(array)) if schema.is_u8(array.type_param.id) => Shape::Bytes,
        Some(TypeDef::Composite(composite))
            if composite.fields.len() == 1 && composite.fields[0].name.is_none() =>
        {
            Shape::Wrapper
        }
        _ => Shape::Plain,
    }
}

fn from_scale(schema: &RuntimeSchema, value: ScaleValue<u32>) -> Value {
    let shape = shape_of(schema, value.context);
    match value.value {
        ValueDef::Primitive(primitive) => from_primitive(primitive),
        ValueDef::BitSequence(bits) => Value::List(bits.iter().map(Value::Bool).collect()),
        ValueDef::Composite(composite) => match shape {
            Shape::Bytes => match byte_values(&composite) {
                Some(bytes) => Value::Bytes(bytes),
                None => from_composite(schema, composite),
            },
            Shape::Wrapper => match composite.into_values().next() {
                Some(inner) => from_scale(schema, inner),
                None => Value::List(Vec::new()),
            },
            Shape::Call | Shape::Plain => from_composite(schema, composite),
        },
        ValueDef::Variant(variant) => match shape {
            Shape::Call => from_call(schema, variant),
            _ => from_variant(schema, variant),
        },
    }
}

fn from_primitive(primitive: Primitive) -> Value {
    match primitive {
        Primitive::Bool(b) => Value::Bool(b),
        Primitive::Char(c) => Value::String(c.to_string()),
        Primitive::String(s) => Value::String(s),
        Primitive::U128(n) => Value::Number(n),
        Primitive::I128(n) => match u128::try_from(n) {
            Ok(n) => Value::Number(n),
            Err(_) => Value::String(n.to_string()),
        },
        Primitive::U256(bytes) | Primitive::I256(bytes) => Value::Bytes(bytes.to_vec()),
    }
}

fn byte_values(composite: &Composite<u32>) -> Option<Vec<u8>> {
    composite
        .values()
        .map(|v| match &v.value {
            ValueDef::Primitive(Primitive::U128(n)) => u8::try_from(*n).ok(),
            _ => None,
        })
        .collect()
}

fn from_composite(schema: &RuntimeSchema, composite: Composite<u32>) -> Value {
    match composite {
        Composite::Named(fields) => Value::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name, from_scale(schema, value)))
                .collect(),
        ),
        Composite::Unnamed(values) => Value::List(
            values
                .into_iter()
                .map(|value| from_scale(schema, value))
                .collect(),
        ),
    }
}

fn fields_record(schema: &RuntimeSchema, composite: Composite<u32>) -> Record {
    match composite {
        Composite::Named(fields) => fields
            .into_iter()
            .map(|(name, value)| (name, from_scale(schema, value)))
            .collect(),
        Composite::Unnamed(values) => values
            .into_iter()
            .enumerate()
            .map(|(position, value)| (position.to_string(), from_scale(schema, value)))
            .collect(),
    }
}

fn from_variant(schema: &RuntimeSchema, variant: scale_value::Variant<u32>) -> Value {
    let inner = match variant.values {
        Composite::Named(fields) if !fields.is_empty() => {
            from_composite(schema, Composite::Named(fields))
        }
        Composite::Unnamed(mut values) if values.len() == 1 => {
            from_scale(schema, values.remove(0))
        }
        Composite::Unnamed(values) if !values.is_empty() => {
            from_composite(schema, Composite::Unnamed(values))
        }
        _ => return Value::String(variant.name),
    };
    Value::Record(Record::new().with(variant.name, inner))
}

/// `Pallet(function { args })` -> `{ module, function, args }`.
fn from_call(schema: &RuntimeSchema, variant: scale_value::Variant<u32>) -> Value {
    let module = variant.name;
    let Some(inner) = variant.values.into_values().next() else {
        return Value::String(module);
    };
    match inner.value {
        ValueDef::Variant(call) => CallData {
            module,
            function: call.name,
            args: fields_record(schema, call.values),
        }
        .into_value(),
        other => Value::Record(Record::new().with(
            module,
            from_scale(
                schema,
                ScaleValue {
                    value: other,
                    context: inner.context,
                },
            ),
        )),
    }
}

// ================================================================================================
// Encoding
// ================================================================================================

/// Encode a named call: `pallet index ++ call index ++ args`.
pub fn encode_call(
    schema: &RuntimeSchema,
    call: &CallData,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    let def = schema.call_by_name(&call.module, &call.function)?;
    out.push(def.pallet_index);
    out.push(def.index);

    for arg in &def.args {
        let value = field_to_scale(schema, &call.args, &arg.name, arg.ty)?;
        scale_value::scale::encode_as_type(&value, arg.ty, schema.registry(), out)?;
    }
    Ok(())
}

/// Encode `value` as registry type `ty`.
pub fn encode_value(
    schema: &RuntimeSchema,
    ty: u32,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    let value = to_scale(schema, value, ty)?;
    scale_value::scale::encode_as_type(&value, ty, schema.registry(), out)?;
    Ok(())
}

/// A named field of `record`; an absent `Option` field encodes as `None`.
fn field_to_scale(
    schema: &RuntimeSchema,
    record: &Record,
    name: &str,
    ty: u32,
) -> Result<ScaleValue, EncodeError> {
    match record.get(name) {
        Some(value) => to_scale(schema, value, ty),
        None if schema.is_option(ty) => Ok(ScaleValue::unnamed_variant(
            "None",
            Vec::<ScaleValue>::new(),
        )),
        None => Err(ValueError::MissingField(name.to_string()).into()),
    }
}

fn to_scale(schema: &RuntimeSchema, value: &Value, ty: u32) -> Result<ScaleValue, EncodeError> {
    if schema.call_type() == Some(ty) {
        return call_to_scale(schema, &CallData::from_value(value)?);
    }

    let encoded = match &schema.resolve(ty)?.type_def {
        TypeDef::Primitive(primitive) => primitive_to_scale(primitive, value)?,
        TypeDef::Compact(compact) => to_scale(schema, value, compact.type_param.id)?,
        TypeDef::Sequence(seq) if schema.is_u8(seq.type_param.id) => {
            ScaleValue::from_bytes(bytes_of(value)?)
        }
        TypeDef::Array(array) if schema.is_u8(array.type_param.id) => {
            ScaleValue::from_bytes(fixed_bytes(value, array.len as usize)?)
        }
        TypeDef::Sequence(seq) => ScaleValue::unnamed_composite(
            value
                .as_list()?
                .iter()
                .map(|item| to_scale(schema, item, seq.type_param.id))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        TypeDef::Array(array) => {
            let items = value.as_list()?;
            check_len(array.len as usize, items.len())?;
            ScaleValue::unnamed_composite(
                items
                    .iter()
                    .map(|item| to_scale(schema, item, array.type_param.id))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        }
        TypeDef::Tuple(tuple) => {
            let items = value.as_list()?;
            check_len(tuple.fields.len(), items.len())?;
            ScaleValue::unnamed_composite(
                items
                    .iter()
                    .zip(&tuple.fields)
                    .map(|(item, field)| to_scale(schema, item, field.id))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        }
        TypeDef::Composite(composite) => ScaleValue {
            value: ValueDef::Composite(fields_to_scale(schema, &composite.fields, value)?),
            context: (),
        },
        TypeDef::Variant(variant) => {
            let (chosen, inner) = select_variant(&variant.variants, value).ok_or(
                EncodeError::UnknownVariant {
                    ty,
                    found: value.kind(),
                },
            )?;
            let values = match (chosen.fields.is_empty(), inner) {
                (true, _) => Composite::Unnamed(Vec::new()),
                (false, Some(inner)) => fields_to_scale(schema, &chosen.fields, inner)?,
                (false, None) => {
                    return Err(ValueError::MissingField(chosen.name.clone()).into());
                }
            };
            ScaleValue {
                value: ValueDef::Variant(scale_value::Variant {
                    name: chosen.name.clone(),
                    values,
                }),
                context: (),
            }
        }
        TypeDef::BitSequence(_) => return Err(EncodeError::Unsupported("bit sequences")),
    };
    Ok(encoded)
}

/// `{ module, function, args }` -> `Pallet(function { args })`.
fn call_to_scale(schema: &RuntimeSchema, call: &CallData) -> Result<ScaleValue, EncodeError> {
    let def = schema.call_by_name(&call.module, &call.function)?;
    let args = def
        .args
        .iter()
        .map(|arg| Ok((arg.name.clone(), field_to_scale(schema, &call.args, &arg.name, arg.ty)?)))
        .collect::<Result<Vec<_>, EncodeError>>()?;

    Ok(ScaleValue::unnamed_variant(
        def.module.clone(),
        [ScaleValue::named_variant(def.name.clone(), args)],
    ))
}

fn fields_to_scale(
    schema: &RuntimeSchema,
    fields: &[Field<PortableForm>],
    value: &Value,
) -> Result<Composite<()>, EncodeError> {
    match fields {
        [] => Ok(Composite::Unnamed(Vec::new())),
        [field] if field.name.is_none() => Ok(Composite::Unnamed(vec![to_scale(
            schema,
            value,
            field.ty.id,
        )?])),
        fields if fields.iter().all(|f| f.name.is_some()) => {
            let record = value.as_record()?;
            fields
                .iter()
                .map(|field| {
                    let name = field.name.clone().unwrap_or_default();
                    let encoded = field_to_scale(schema, record, &name, field.ty.id)?;
                    Ok((name, encoded))
                })
                .collect::<Result<Vec<_>, EncodeError>>()
                .map(Composite::Named)
        }
        fields => {
            let items = value.as_list()?;
            check_len(fields.len(), items.len())?;
            items
                .iter()
                .zip(fields)
                .map(|(item, field)| to_scale(schema, item, field.ty.id))
                .collect::<Result<Vec<_>, _>>()
                .map(Composite::Unnamed)
        }
    }
}

/// Pick the enum variant `value` describes: a variant name, a single-entry
/// record keyed by variant name, or a bare payload for the `Id` variant of an
/// address or the `Some` variant of an option.
fn select_variant<'a>(
    variants: &'a [scale_info::Variant<PortableForm>],
    value: &'a Value,
) -> Option<(&'a scale_info::Variant<PortableForm>, Option<&'a Value>)> {
    let named = |name: &str| variants.iter().find(|v| v.name == name);

    match value {
        Value::String(name) => {
            if let Some(variant) = named(name) {
                return Some((variant, None));
            }
        }
        Value::Record(record) if record.len() == 1 => {
            if let Some((name, inner)) = record.iter().next()
                && let Some(variant) = named(name)
            {
                return Some((variant, Some(inner)));
            }
        }
        _ => {}
    }

    named("Id")
        .or_else(|| named("Some"))
        .map(|variant| (variant, Some(value)))
}

fn primitive_to_scale(
    primitive: &TypeDefPrimitive,
    value: &Value,
) -> Result<ScaleValue, EncodeError> {
    let encoded = match primitive {
        TypeDefPrimitive::Bool => ScaleValue::bool(value.as_bool()?),
        TypeDefPrimitive::Str => ScaleValue::string(value.as_str()?),
        TypeDefPrimitive::Char => {
            let s = value.as_str()?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => ScaleValue::char(c),
                _ => {
                    return Err(EncodeError::OutOfRange {
                        ty: "char",
                        value: s.to_string(),
                    });
                }
            }
        }
        TypeDefPrimitive::U8 => bounded(value, "u8", u8::MAX.into())?,
        TypeDefPrimitive::U16 => bounded(value, "u16", u16::MAX.into())?,
        TypeDefPrimitive::U32 => bounded(value, "u32", u32::MAX.into())?,
        TypeDefPrimitive::U64 => bounded(value, "u64", u64::MAX.into())?,
        TypeDefPrimitive::U128 => ScaleValue::u128(value.as_u128()?),
        TypeDefPrimitive::I8
        | TypeDefPrimitive::I16
        | TypeDefPrimitive::I32
        | TypeDefPrimitive::I64
        | TypeDefPrimitive::I128 => ScaleValue::i128(signed(value)?),
        TypeDefPrimitive::U256 | TypeDefPrimitive::I256 => {
            return Err(EncodeError::Unsupported("256-bit integers"));
        }
    };
    Ok(encoded)
}

fn bounded(value: &Value, ty: &'static str, max: u128) -> Result<ScaleValue, EncodeError> {
    let n = value.as_u128()?;
    if n > max {
        return Err(EncodeError::OutOfRange {
            ty,
            value: n.to_string(),
        });
    }
    Ok(ScaleValue::u128(n))
}

fn signed(value: &Value) -> Result<i128, EncodeError> {
    match value {
        Value::Number(n) => i128::try_from(*n).map_err(|_| EncodeError::OutOfRange {
            ty: "i128",
            value: n.to_string(),
        }),
        Value::String(s) => s
            .parse()
            .map_err(|_| ValueError::OutOfRange(s.clone()).into()),
        other => Err(ValueError::TypeMismatch {
            expected: "number",
            found: other.kind(),
        }
        .into()),
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), EncodeError> {
    if expected != actual {
        return Err(EncodeError::InvalidLength { expected, actual });
    }
    Ok(())
}

/// Exactly `len` bytes; a 32-byte field also takes an SS58 address.
fn fixed_bytes(value: &Value, len: usize) -> Result<Vec<u8>, EncodeError> {
    let bytes = match value {
        Value::String(s) if len == 32 => address::decode(s)?.to_vec(),
        other => bytes_of(other)?,
    };
    check_len(len, bytes.len())?;
    Ok(bytes)
}

/// Raw bytes, `0x` hex, or (for remarks) plain UTF-8 text.
fn bytes_of(value: &Value) -> Result<Vec<u8>, EncodeError> {
    match value {
        Value::Bytes(bytes) => Ok(bytes.clone()),
        Value::String(s) if s.starts_with("0x") => {
            decode_hex(s).map_err(|e| EncodeError::InvalidHex(format!("{}: {}", s, e)))
        }
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        other => Err(ValueError::TypeMismatch {
            expected: "bytes",
            found: other.kind(),
        }
        .into()),
    }
}
