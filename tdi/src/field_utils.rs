// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

//! Validation and byte-order conversion of key and data field values.
//!
//! The driver takes every field value as a network-order byte stream exactly
//! `ceil(size_bits / 8)` bytes long, with byte 0 the most significant.  A
//! value headed for a field is validated in order: a compatibility check of
//! its representation, a bounds check against the field's width, and finally
//! conversion to or from network order.

use crate::FieldInfo;
use crate::KeyFieldInfo;
use crate::MatchType;
use crate::TableInfo;
use crate::TdiError;
use crate::TdiId;
use crate::TdiResult;

/// The size of the largest value that can be carried as a scalar.
const SCALAR_BYTES: usize = std::mem::size_of::<u64>();

/// A field value, either as a host-order scalar or as a network-order byte
/// stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Scalar(u64),
    Bytes(&'a [u8]),
}

/// A value for one key field, shaped by how that field is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFieldValue<'a> {
    Exact {
        value: FieldValue<'a>,
    },
    Ternary {
        value: FieldValue<'a>,
        mask: FieldValue<'a>,
    },
    Lpm {
        value: FieldValue<'a>,
        prefix_len: u16,
    },
    Range {
        low: FieldValue<'a>,
        high: FieldValue<'a>,
    },
    Optional {
        value: FieldValue<'a>,
        is_valid: bool,
    },
    /// A key matched by an architecture or device specific match type.
    Arch {
        match_type: MatchType,
        value: FieldValue<'a>,
    },
}

impl KeyFieldValue<'_> {
    pub fn match_type(&self) -> MatchType {
        match self {
            KeyFieldValue::Exact { .. } => MatchType::EXACT,
            KeyFieldValue::Ternary { .. } => MatchType::TERNARY,
            KeyFieldValue::Lpm { .. } => MatchType::LPM,
            KeyFieldValue::Range { .. } => MatchType::RANGE,
            KeyFieldValue::Optional { .. } => MatchType::OPTIONAL,
            KeyFieldValue::Arch { match_type, .. } => *match_type,
        }
    }

    /// Whether the value was supplied as scalars rather than byte streams.
    pub fn is_scalar(&self) -> bool {
        let primary = match self {
            KeyFieldValue::Exact { value }
            | KeyFieldValue::Ternary { value, .. }
            | KeyFieldValue::Lpm { value, .. }
            | KeyFieldValue::Optional { value, .. }
            | KeyFieldValue::Arch { value, .. } => value,
            KeyFieldValue::Range { low, .. } => low,
        };
        matches!(primary, FieldValue::Scalar(_))
    }
}

/// The number of bytes in a field's network-order representation.
pub fn field_bytes<F: FieldInfo + ?Sized>(field: &F) -> usize {
    field.field_size_bits().div_ceil(8)
}

/// Convert a network-order byte stream of at most 8 bytes into a host-order
/// value.
pub fn to_host_order(bytes: &[u8]) -> TdiResult<u64> {
    if bytes.len() > SCALAR_BYTES {
        return Err(TdiError::InvalidArg(format!(
            "can't convert a {}-byte stream into a 64-bit value",
            bytes.len()
        )));
    }
    let mut buf = [0u8; SCALAR_BYTES];
    buf[SCALAR_BYTES - bytes.len()..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf))
}

/// Write the low `out.len()` bytes of `value` into `out` in network order.
/// Higher-order bytes of `value` are dropped.
pub fn to_network_order(value: u64, out: &mut [u8]) -> TdiResult<()> {
    if out.len() > SCALAR_BYTES {
        return Err(TdiError::InvalidArg(format!(
            "can't convert a 64-bit value into a {}-byte stream",
            out.len()
        )));
    }
    let buf = value.to_be_bytes();
    out.copy_from_slice(&buf[SCALAR_BYTES - out.len()..]);
    Ok(())
}

/// Convert a field's network-order representation into a host-order value.
pub fn to_host_order_data<F: FieldInfo + ?Sized>(
    field: &F,
    bytes: &[u8],
) -> TdiResult<u64> {
    let size = field_bytes(field);
    let bytes = bytes.get(..size).ok_or_else(|| {
        TdiError::InvalidArg(format!(
            "field {} needs {size} bytes, got {}",
            field.field_id(),
            bytes.len()
        ))
    })?;
    to_host_order(bytes)
}

/// Produce a field's network-order representation of `value`.
pub fn to_network_order_data<F: FieldInfo + ?Sized>(
    field: &F,
    value: u64,
) -> TdiResult<Vec<u8>> {
    let mut out = vec![0u8; field_bytes(field)];
    to_network_order(value, &mut out)?;
    Ok(out)
}

/// Verify that a value fits within the field's width.
///
/// A scalar must not exceed `2^size_bits - 1`.  A byte stream must be
/// exactly as long as the field, and the unused high-order bits of its
/// first byte must be clear.
pub fn bounds_check<F: FieldInfo + ?Sized>(
    field: &F,
    value: FieldValue<'_>,
) -> TdiResult<()> {
    let size_bits = field.field_size_bits();
    match value {
        FieldValue::Scalar(v) => {
            // A 64-bit field holds any value.  Wider fields are rejected by
            // the compatibility check.
            if size_bits < 64 {
                let limit = (1u64 << size_bits) - 1;
                if v > limit {
                    return Err(TdiError::InvalidArg(format!(
                        "value {v} exceeds the {size_bits}-bit field {}",
                        field.field_id()
                    )));
                }
            }
        }
        FieldValue::Bytes(bytes) => {
            let expected = field_bytes(field);
            if bytes.len() != expected {
                return Err(TdiError::InvalidArg(format!(
                    "array of {} bytes doesn't match the {expected}-byte \
                     field {}",
                    bytes.len(),
                    field.field_id()
                )));
            }
            let shift = size_bits % 8;
            if shift != 0 && bytes.first().is_some_and(|b| b >> shift > 0) {
                return Err(TdiError::InvalidArg(format!(
                    "value exceeds the {size_bits}-bit field {}",
                    field.field_id()
                )));
            }
        }
    }
    Ok(())
}

/// Verify that a value's representation can be used with the field: scalars
/// only for fields of at most 64 bits, byte streams only of exactly the
/// field's length.
pub fn field_type_compatibility_check<F: FieldInfo + ?Sized>(
    field: &F,
    value: FieldValue<'_>,
) -> TdiResult<()> {
    let size_bits = field.field_size_bits();
    match value {
        FieldValue::Scalar(_) if size_bits > 64 => {
            Err(TdiError::InvalidArg(format!(
                "field {} is {size_bits} bits wide and must be set with a \
                 byte array",
                field.field_id()
            )))
        }
        FieldValue::Bytes(bytes) if bytes.len() != field_bytes(field) => {
            Err(TdiError::InvalidArg(format!(
                "array of {} bytes doesn't match the {}-byte field {}",
                bytes.len(),
                field_bytes(field),
                field.field_id()
            )))
        }
        _ => Ok(()),
    }
}

/// Validate a value and produce the network-order bytes handed to the driver
/// for a field.
pub fn field_value_to_network<F: FieldInfo + ?Sized>(
    field: &F,
    value: FieldValue<'_>,
) -> TdiResult<Vec<u8>> {
    field_type_compatibility_check(field, value)?;
    bounds_check(field, value)?;
    match value {
        FieldValue::Scalar(v) => to_network_order_data(field, v),
        FieldValue::Bytes(bytes) => Ok(bytes.to_vec()),
    }
}

/// Validate the network-order bytes read back from the driver for a field
/// and convert them into a host-order value.
pub fn field_value_from_network<F: FieldInfo + ?Sized>(
    field: &F,
    bytes: &[u8],
) -> TdiResult<u64> {
    let value = FieldValue::Bytes(bytes);
    field_type_compatibility_check(field, value)?;
    bounds_check(field, value)?;
    to_host_order_data(field, bytes)
}

/// Look up the key field a value is about to be stored in, verifying that
/// the value's shape matches the field.
///
/// Fails with `ObjectNotFound` for an unknown field, `InvalidArg` if the
/// value's match type differs from the field's, and `NotSupported` when a
/// field that must be set with byte streams is given scalars.
pub fn key_field_safe_get<'t>(
    table: &'t TableInfo,
    field_id: TdiId,
    value: &KeyFieldValue<'_>,
) -> TdiResult<&'t KeyFieldInfo> {
    let key = table.key_field_get(field_id)?;
    if key.match_type() != value.match_type() {
        return Err(TdiError::InvalidArg(format!(
            "{}: key field {field_id} is matched as {}, not {}",
            table.name(),
            key.match_type(),
            value.match_type()
        )));
    }
    if key.is_ptr() && value.is_scalar() {
        return Err(TdiError::NotSupported(format!(
            "{}: key field {field_id} is wider than 64 bits, use byte arrays",
            table.name()
        )));
    }
    Ok(key)
}
