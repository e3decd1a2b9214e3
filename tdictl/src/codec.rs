// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use structopt::*;

use tdi::field_utils;
use tdi::field_utils::FieldValue;
use tdi::FieldInfo;
use tdi::TdiId;
use tdi::TdiInfo;

use crate::table::action_id;

#[derive(Debug, StructOpt)]
pub(crate) struct FieldRef {
    #[structopt(short = "a")]
    /// Look the field up among the data fields of this action.
    action: Option<String>,
    #[structopt(long)]
    /// The field is a key field rather than a data field.
    key: bool,
    /// The name of the table.
    table: String,
    /// The name or id of the field.
    field: String,
}

#[derive(Debug, StructOpt)]
pub(crate) struct Encode {
    #[structopt(flatten)]
    field: FieldRef,
    /// The value to store, in decimal or as 0x-prefixed hex.
    value: String,
}

#[derive(Debug, StructOpt)]
pub(crate) struct Decode {
    #[structopt(flatten)]
    field: FieldRef,
    /// The network-order bytes stored in the field, as hex.
    bytes: String,
}

// Fields are looked up by name first.  A name that doesn't resolve is tried
// as a numeric id.
fn resolve<'a>(
    info: &'a TdiInfo,
    r: &FieldRef,
) -> anyhow::Result<&'a dyn FieldInfo> {
    let t = info.table_from_name_get(&r.table)?;
    let id = r.field.parse::<TdiId>().ok();

    if r.key {
        let key: &dyn FieldInfo =
            match (t.key_field_get_by_name(&r.field), id) {
                (Ok(k), _) => k,
                (Err(_), Some(id)) => t.key_field_get(id)?,
                (Err(e), None) => return Err(e.into()),
            };
        return Ok(key);
    }

    let action = match &r.action {
        Some(a) => action_id(t, a)?,
        None => 0,
    };
    let data: &dyn FieldInfo =
        match (t.data_field_get_by_name(&r.field, action), id) {
            (Ok(f), _) => f,
            (Err(_), Some(id)) => t.data_field_get(id, action)?,
            (Err(e), None) => return Err(e.into()),
        };
    Ok(data)
}

fn parse_hex_bytes(s: &str) -> anyhow::Result<Vec<u8>> {
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if s.is_empty() {
        anyhow::bail!("no hex digits given");
    }
    // Pad to even length so we can decode full bytes.
    let padded = if s.len() % 2 != 0 {
        format!("0{s}")
    } else {
        s.to_string()
    };
    (0..padded.len())
        .step_by(2)
        .map(|i| {
            padded
                .get(i..i + 2)
                .and_then(|b| u8::from_str_radix(b, 16).ok())
                .ok_or_else(|| anyhow::anyhow!("invalid hex value: {s}"))
        })
        .collect()
}

fn to_hex(bytes: &[u8]) -> String {
    let digits: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("0x{digits}")
}

enum Parsed {
    Scalar(u64),
    Bytes(Vec<u8>),
}

fn parse_value(s: &str) -> anyhow::Result<Parsed> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) if digits.len() > 16 => {
            parse_hex_bytes(digits).map(Parsed::Bytes)
        }
        Some(digits) => u64::from_str_radix(digits, 16)
            .map(Parsed::Scalar)
            .map_err(|e| anyhow::anyhow!("invalid hex value {s}: {e}")),
        None => s
            .parse::<u64>()
            .map(Parsed::Scalar)
            .map_err(|e| anyhow::anyhow!("invalid value {s}: {e}")),
    }
}

// Left-pad a big-endian byte stream with zeroes out to the field's length.
fn widen(mut bytes: Vec<u8>, len: usize) -> Vec<u8> {
    if bytes.len() < len {
        let mut padded = vec![0u8; len - bytes.len()];
        padded.append(&mut bytes);
        padded
    } else {
        bytes
    }
}

pub(crate) fn encode(info: &TdiInfo, e: Encode) -> anyhow::Result<()> {
    let field = resolve(info, &e.field)?;
    let len = field_utils::field_bytes(field);

    // Fields too wide for a scalar are always handled as byte streams.
    let bytes = match parse_value(&e.value)? {
        Parsed::Scalar(v) if field.field_size_bits() <= 64 => {
            field_utils::field_value_to_network(field, FieldValue::Scalar(v))?
        }
        Parsed::Scalar(v) => {
            let bytes = widen(v.to_be_bytes().to_vec(), len);
            field_utils::field_value_to_network(
                field,
                FieldValue::Bytes(&bytes),
            )?
        }
        Parsed::Bytes(bytes) => {
            let bytes = widen(bytes, len);
            field_utils::field_value_to_network(
                field,
                FieldValue::Bytes(&bytes),
            )?
        }
    };
    println!("{}", to_hex(&bytes));
    Ok(())
}

pub(crate) fn decode(info: &TdiInfo, d: Decode) -> anyhow::Result<()> {
    let field = resolve(info, &d.field)?;
    let len = field_utils::field_bytes(field);
    let bytes = widen(parse_hex_bytes(&d.bytes)?, len);
    let value = field_utils::field_value_from_network(field, &bytes)?;
    println!("{value}");
    Ok(())
}
