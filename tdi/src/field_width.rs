// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use crate::schema::TypeNode;
use crate::FieldDataType;
use crate::TdiError;
use crate::TdiResult;

// The default reported for a string field that doesn't declare one.
const INVALID_STRING_DEFAULT: &str = "INVALID";

/// The semantic type, width and defaults derived from a field's `type`
/// descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWidthSpec {
    pub data_type: FieldDataType,
    pub width_bits: usize,
    pub default_uint: u64,
    pub default_float: f32,
    pub default_string: String,
    pub choices: Vec<String>,
}

fn scalar_type(repeated: bool, single: FieldDataType) -> FieldDataType {
    if repeated {
        FieldDataType::IntArr
    } else {
        single
    }
}

impl FieldWidthSpec {
    /// Resolve a field's type descriptor.  A `container` node only matters
    /// when the type tag isn't one of the known scalar types.
    pub fn resolve(
        ftype: Option<&TypeNode>,
        repeated: bool,
        has_container: bool,
    ) -> TdiResult<Self> {
        let type_name = ftype.map(|t| t.type_name.as_str()).unwrap_or("");
        let default = ftype.and_then(|t| t.default_value.as_ref());

        let mut spec = FieldWidthSpec {
            data_type: FieldDataType::Unknown,
            width_bits: 0,
            default_uint: default.map(|d| d.as_u64()).unwrap_or(0),
            default_float: 0.0,
            default_string: String::new(),
            choices: Vec::new(),
        };

        match type_name {
            "bytes" => {
                spec.data_type = FieldDataType::ByteStream;
                spec.width_bits =
                    ftype.and_then(|t| t.width).ok_or_else(|| {
                        TdiError::InvalidArg(
                            "bytes field has no width".to_string(),
                        )
                    })?;
            }
            "uint64" | "uint32" | "uint16" | "uint8" => {
                spec.data_type = scalar_type(repeated, FieldDataType::Uint64);
                spec.width_bits = int_width(&type_name[4..]);
            }
            "int64" | "int32" | "int16" | "int8" => {
                spec.data_type = scalar_type(repeated, FieldDataType::Int64);
                spec.width_bits = int_width(&type_name[3..]);
            }
            "bool" => {
                spec.data_type = if repeated {
                    FieldDataType::BoolArr
                } else {
                    FieldDataType::Bool
                };
                spec.width_bits = 1;
            }
            "float" => {
                spec.data_type = FieldDataType::Float;
                spec.default_float = default.map(|d| d.as_f32()).unwrap_or(0.0);
            }
            "string" => {
                spec.data_type = if repeated {
                    FieldDataType::StringArr
                } else {
                    FieldDataType::String
                };
                if let Some(t) = ftype {
                    spec.width_bits = t.width.unwrap_or(0);
                    spec.choices = t.choices.clone();
                }
                spec.default_string = match default {
                    Some(d) => d.as_string(),
                    None => INVALID_STRING_DEFAULT.to_string(),
                };
            }
            _ if has_container => spec.data_type = FieldDataType::Container,
            _ => {}
        }

        Ok(spec)
    }
}

// "64" -> 64, etc.  Only called with one of the four known suffixes.
fn int_width(suffix: &str) -> usize {
    match suffix {
        "64" => 64,
        "32" => 32,
        "16" => 16,
        _ => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DefaultValue;
    use pretty_assertions::assert_eq;

    fn tnode(t: &str) -> TypeNode {
        TypeNode {
            type_name: t.to_string(),
            ..Default::default()
        }
    }

    fn resolve(t: &str, repeated: bool) -> (FieldDataType, usize) {
        let spec =
            FieldWidthSpec::resolve(Some(&tnode(t)), repeated, false).unwrap();
        (spec.data_type, spec.width_bits)
    }

    #[test]
    fn test_fixed_widths() {
        use FieldDataType as F;
        let expected = [
            ("uint64", false, F::Uint64, 64),
            ("uint64", true, F::IntArr, 64),
            ("uint32", false, F::Uint64, 32),
            ("uint32", true, F::IntArr, 32),
            ("uint16", false, F::Uint64, 16),
            ("uint16", true, F::IntArr, 16),
            ("uint8", false, F::Uint64, 8),
            ("uint8", true, F::IntArr, 8),
            ("int64", false, F::Int64, 64),
            ("int64", true, F::IntArr, 64),
            ("int32", false, F::Int64, 32),
            ("int32", true, F::IntArr, 32),
            ("int16", false, F::Int64, 16),
            ("int16", true, F::IntArr, 16),
            ("int8", false, F::Int64, 8),
            ("int8", true, F::IntArr, 8),
            ("bool", false, F::Bool, 1),
            ("bool", true, F::BoolArr, 1),
            ("float", false, F::Float, 0),
            ("string", false, F::String, 0),
            ("string", true, F::StringArr, 0),
        ];
        for (t, repeated, dtype, width) in expected {
            assert_eq!(resolve(t, repeated), (dtype, width), "{t} {repeated}");
        }
    }

    #[test]
    fn test_bytes() {
        let t = TypeNode {
            width: Some(48),
            ..tnode("bytes")
        };
        let spec = FieldWidthSpec::resolve(Some(&t), false, false).unwrap();
        assert_eq!(spec.data_type, FieldDataType::ByteStream);
        assert_eq!(spec.width_bits, 48);

        assert!(FieldWidthSpec::resolve(Some(&tnode("bytes")), false, false)
            .is_err());
    }

    #[test]
    fn test_string_defaults() {
        let spec =
            FieldWidthSpec::resolve(Some(&tnode("string")), false, false)
                .unwrap();
        assert_eq!(spec.default_string, "INVALID");

        let t = TypeNode {
            width: Some(16),
            default_value: Some(DefaultValue::String("BOTH".to_string())),
            choices: vec!["INGRESS".to_string(), "BOTH".to_string()],
            ..tnode("string")
        };
        let spec = FieldWidthSpec::resolve(Some(&t), false, false).unwrap();
        assert_eq!(spec.width_bits, 16);
        assert_eq!(spec.default_string, "BOTH");
        assert_eq!(spec.choices, vec!["INGRESS", "BOTH"]);
        assert_eq!(spec.default_uint, 0);
    }

    #[test]
    fn test_numeric_defaults() {
        let t = TypeNode {
            default_value: Some(DefaultValue::Float(2.5)),
            ..tnode("float")
        };
        let spec = FieldWidthSpec::resolve(Some(&t), false, false).unwrap();
        assert_eq!(spec.default_float, 2.5);
        // The integer default is derived for every type, floats included.
        assert_eq!(spec.default_uint, 2);

        let t = TypeNode {
            default_value: Some(DefaultValue::Uint(7)),
            ..tnode("uint16")
        };
        let spec = FieldWidthSpec::resolve(Some(&t), false, false).unwrap();
        assert_eq!(spec.default_uint, 7);
        assert_eq!(spec.default_string, "");
    }

    #[test]
    fn test_container_and_unknown() {
        let spec = FieldWidthSpec::resolve(None, false, true).unwrap();
        assert_eq!(spec.data_type, FieldDataType::Container);
        assert_eq!(spec.width_bits, 0);

        // A known scalar type wins over the container node.
        let spec = FieldWidthSpec::resolve(Some(&tnode("uint8")), false, true)
            .unwrap();
        assert_eq!(spec.data_type, FieldDataType::Uint64);

        let spec =
            FieldWidthSpec::resolve(Some(&tnode("double")), false, false)
                .unwrap();
        assert_eq!(spec.data_type, FieldDataType::Unknown);
        assert_eq!(spec.width_bits, 0);
    }
}
