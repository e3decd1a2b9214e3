// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

//! The json schema document as emitted by the P4 compiler.
//!
//! Lists of tables, fields and actions are kept as raw json values at this
//! level.  Each element is deserialized individually by the parser, so one
//! malformed node costs only that node rather than the whole document.

use serde::Deserialize;
use serde_json::Value;

use crate::TdiId;

/// Root of a single schema document.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub tables: Vec<Value>,
    #[serde(default)]
    pub learn_filters: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AnnotationNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// A `default_value` may be any json scalar, depending on the field's type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Uint(u64),
    Int(i64),
    Float(f64),
    String(String),
}

impl DefaultValue {
    /// The value as an unsigned integer.  Negative and fractional values are
    /// truncated the way a C cast would truncate them.
    pub fn as_u64(&self) -> u64 {
        match self {
            DefaultValue::Bool(b) => u64::from(*b),
            DefaultValue::Uint(u) => *u,
            DefaultValue::Int(i) => *i as u64,
            DefaultValue::Float(f) => *f as u64,
            DefaultValue::String(_) => 0,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            DefaultValue::Bool(b) => f32::from(u8::from(*b)),
            DefaultValue::Uint(u) => *u as f32,
            DefaultValue::Int(i) => *i as f32,
            DefaultValue::Float(f) => *f as f32,
            DefaultValue::String(_) => 0.0,
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Uint(u) => u.to_string(),
            DefaultValue::Int(i) => i.to_string(),
            DefaultValue::Float(f) => f.to_string(),
            DefaultValue::String(s) => s.clone(),
        }
    }
}

/// The `type` descriptor of a key or data field.
#[derive(Debug, Default, Deserialize)]
pub struct TypeNode {
    #[serde(rename = "type", default)]
    pub type_name: String,
    pub width: Option<usize>,
    pub default_value: Option<DefaultValue>,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TableNode {
    pub id: TdiId,
    pub name: String,
    #[serde(default)]
    pub table_type: String,
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub has_const_default_action: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub key: Vec<Value>,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub action_specs: Vec<Value>,
    #[serde(default)]
    pub depends_on: Vec<TdiId>,
    #[serde(default)]
    pub supported_operations: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<AnnotationNode>,
}

#[derive(Debug, Deserialize)]
pub struct KeyNode {
    pub id: TdiId,
    pub name: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub match_type: String,
    #[serde(default)]
    pub repeated: bool,
    #[serde(rename = "type")]
    pub ktype: Option<TypeNode>,
    pub container: Option<Value>,
    #[serde(default)]
    pub annotations: Vec<AnnotationNode>,
}

/// A data field, as found in a table's common data, an action's data or a
/// learn record.
///
/// Table data wraps the field in a `singleton` or a `oneof` node, with the
/// `mandatory` and `read_only` flags on the outer wrapper.  Action and learn
/// data carry the field inline.  All of these shapes share this one node
/// type.
#[derive(Debug, Default, Deserialize)]
pub struct DataNode {
    pub id: Option<TdiId>,
    pub name: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub repeated: bool,
    #[serde(rename = "type")]
    pub dtype: Option<TypeNode>,
    pub container: Option<Value>,
    #[serde(default)]
    pub annotations: Vec<AnnotationNode>,
    pub singleton: Option<Box<DataNode>>,
    pub oneof: Option<Vec<DataNode>>,
}

impl DataNode {
    /// The node describing the field itself, below any `singleton` wrapper.
    pub fn field(&self) -> &DataNode {
        match &self.singleton {
            Some(s) => s,
            None => self,
        }
    }

    /// How many distinct fields this node expands into.
    pub fn oneof_len(&self) -> usize {
        match &self.field().oneof {
            Some(alternatives) => alternatives.len(),
            None => 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionNode {
    pub id: TdiId,
    pub name: String,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub annotations: Vec<AnnotationNode>,
}

#[derive(Debug, Deserialize)]
pub struct LearnNode {
    pub id: TdiId,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Value>,
    #[serde(default)]
    pub annotations: Vec<AnnotationNode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_value() {
        let v: DefaultValue = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(v, DefaultValue::Uint(5));
        assert_eq!(v.as_u64(), 5);

        let v: DefaultValue = serde_json::from_value(json!(-1)).unwrap();
        assert_eq!(v, DefaultValue::Int(-1));
        assert_eq!(v.as_u64(), u64::MAX);

        let v: DefaultValue = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(v.as_u64(), 1);
        assert_eq!(v.as_f32(), 1.5);

        let v: DefaultValue = serde_json::from_value(json!("INGRESS")).unwrap();
        assert_eq!(v.as_string(), "INGRESS");
        assert_eq!(v.as_u64(), 0);

        let v: DefaultValue = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(v.as_u64(), 1);
    }

    #[test]
    fn test_singleton_descent() {
        let node: DataNode = serde_json::from_value(json!({
            "mandatory": false,
            "read_only": true,
            "singleton": {
                "id": 65556,
                "name": "$COUNTER_SPEC_PKTS",
                "repeated": false,
                "annotations": [],
                "type": { "type": "uint64", "default_value": 0 }
            }
        }))
        .unwrap();
        assert!(node.read_only);
        assert_eq!(node.field().id, Some(65556));
        assert_eq!(node.oneof_len(), 1);
    }

    #[test]
    fn test_oneof_len() {
        let node: DataNode = serde_json::from_value(json!({
            "mandatory": false,
            "read_only": false,
            "oneof": [
                { "id": 1, "name": "a", "type": { "type": "uint32" } },
                { "id": 2, "name": "b", "type": { "type": "uint32" } },
                { "id": 3, "name": "c", "type": { "type": "bool" } }
            ]
        }))
        .unwrap();
        assert_eq!(node.oneof_len(), 3);
    }

    #[test]
    fn test_empty_document() {
        let doc: SchemaDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.tables.is_empty());
        assert!(doc.learn_filters.is_empty());
    }
}
