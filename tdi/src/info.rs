// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::Annotations;
use crate::FieldDataType;
use crate::MatchType;
use crate::TdiError;
use crate::TdiId;
use crate::TdiResult;

/// Metadata shared by key and data fields, used by the marshalling helpers
/// in [`crate::field_utils`].
pub trait FieldInfo {
    fn field_id(&self) -> TdiId;
    fn field_size_bits(&self) -> usize;
}

/// One component of a table's lookup key.
#[derive(Debug, Clone)]
pub struct KeyFieldInfo {
    pub(crate) id: TdiId,
    pub(crate) name: String,
    pub(crate) size_bits: usize,
    pub(crate) match_type: MatchType,
    pub(crate) data_type: FieldDataType,
    pub(crate) mandatory: bool,
    pub(crate) choices: Vec<String>,
    pub(crate) annotations: Annotations,
    pub(crate) default_value: u64,
    pub(crate) default_fl_value: f32,
    pub(crate) default_str_value: String,
    pub(crate) is_field_slice: bool,
    pub(crate) is_ptr: bool,
    pub(crate) match_priority: bool,
}

impl KeyFieldInfo {
    pub fn id(&self) -> TdiId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bits(&self) -> usize {
        self.size_bits
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn data_type(&self) -> FieldDataType {
        self.data_type
    }

    pub fn mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn default_value(&self) -> u64 {
        self.default_value
    }

    pub fn default_fl_value(&self) -> f32 {
        self.default_fl_value
    }

    pub fn default_str_value(&self) -> &str {
        &self.default_str_value
    }

    /// Whether this key addresses a sub-range of a larger logical field.
    pub fn is_field_slice(&self) -> bool {
        self.is_field_slice
    }

    /// Whether values for this field must be passed as byte streams rather
    /// than as scalars.
    pub fn is_ptr(&self) -> bool {
        self.is_ptr
    }

    pub fn match_priority(&self) -> bool {
        self.match_priority
    }
}

impl FieldInfo for KeyFieldInfo {
    fn field_id(&self) -> TdiId {
        self.id
    }

    fn field_size_bits(&self) -> usize {
        self.size_bits
    }
}

/// A data field, either common to a table or scoped to one action or learn
/// record.
#[derive(Debug, Clone)]
pub struct DataFieldInfo {
    pub(crate) id: TdiId,
    pub(crate) name: String,
    pub(crate) size_bits: usize,
    pub(crate) data_type: FieldDataType,
    pub(crate) is_ptr: bool,
    pub(crate) mandatory: bool,
    pub(crate) read_only: bool,
    pub(crate) choices: Vec<String>,
    pub(crate) annotations: Annotations,
    pub(crate) default_value: u64,
    pub(crate) default_fl_value: f32,
    pub(crate) default_str_value: String,
    pub(crate) repeated: bool,
    pub(crate) container_valid: bool,
    pub(crate) oneof_siblings: BTreeSet<TdiId>,
    pub(crate) container: BTreeMap<TdiId, DataFieldInfo>,
}

impl DataFieldInfo {
    pub fn id(&self) -> TdiId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bits(&self) -> usize {
        self.size_bits
    }

    pub fn data_type(&self) -> FieldDataType {
        self.data_type
    }

    pub fn is_ptr(&self) -> bool {
        self.is_ptr
    }

    pub fn mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn allowed_choices(&self) -> &[String] {
        &self.choices
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn default_value(&self) -> u64 {
        self.default_value
    }

    pub fn default_fl_value(&self) -> f32 {
        self.default_fl_value
    }

    pub fn default_str_value(&self) -> &str {
        &self.default_str_value
    }

    pub fn repeated(&self) -> bool {
        self.repeated
    }

    /// Whether the schema declared nested fields under this one.
    pub fn container_valid(&self) -> bool {
        self.container_valid
    }

    /// The other members of this field's `oneof` group.  Never includes the
    /// field itself.
    pub fn oneof_siblings(&self) -> &BTreeSet<TdiId> {
        &self.oneof_siblings
    }

    /// Ids of the fields nested in this container field, in ascending order.
    ///
    /// Nested fields are recognized but not parsed, so this is currently
    /// always empty.
    pub fn container_data_field_id_list_get(&self) -> Vec<TdiId> {
        self.container.keys().copied().collect()
    }
}

impl FieldInfo for DataFieldInfo {
    fn field_id(&self) -> TdiId {
        self.id
    }

    fn field_size_bits(&self) -> usize {
        self.size_bits
    }
}

/// An action a table entry may invoke, with the data fields scoped to it.
#[derive(Debug, Clone)]
pub struct ActionInfo {
    pub(crate) id: TdiId,
    pub(crate) name: String,
    pub(crate) data_fields: BTreeMap<TdiId, DataFieldInfo>,
    pub(crate) annotations: Annotations,
}

impl ActionInfo {
    pub fn id(&self) -> TdiId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn data_fields(&self) -> &BTreeMap<TdiId, DataFieldInfo> {
        &self.data_fields
    }

    /// Ids of this action's own data fields, in ascending order.
    pub fn data_field_id_list_get(&self) -> Vec<TdiId> {
        self.data_fields.keys().copied().collect()
    }

    pub fn data_field_get(&self, id: TdiId) -> TdiResult<&DataFieldInfo> {
        self.data_fields.get(&id).ok_or_else(|| {
            TdiError::ObjectNotFound(format!(
                "no data field {id} in action {}",
                self.name
            ))
        })
    }
}

/// Look up a data field by name in a map of fields.
pub(crate) fn data_field_by_name<'a>(
    fields: &'a BTreeMap<TdiId, DataFieldInfo>,
    name: &str,
) -> Option<&'a DataFieldInfo> {
    fields.values().find(|f| f.name == name)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    pub fn key_field(
        id: TdiId,
        name: &str,
        size_bits: usize,
        match_type: MatchType,
    ) -> KeyFieldInfo {
        KeyFieldInfo {
            id,
            name: name.to_string(),
            size_bits,
            match_type,
            data_type: if size_bits > 64 {
                FieldDataType::ByteStream
            } else {
                FieldDataType::Uint64
            },
            mandatory: true,
            choices: Vec::new(),
            annotations: Annotations::new(),
            default_value: 0,
            default_fl_value: 0.0,
            default_str_value: String::new(),
            is_field_slice: false,
            is_ptr: false,
            match_priority: false,
        }
    }

    pub fn data_field(
        id: TdiId,
        name: &str,
        size_bits: usize,
    ) -> DataFieldInfo {
        DataFieldInfo {
            id,
            name: name.to_string(),
            size_bits,
            data_type: FieldDataType::Uint64,
            is_ptr: false,
            mandatory: false,
            read_only: false,
            choices: Vec::new(),
            annotations: Annotations::new(),
            default_value: 0,
            default_fl_value: 0.0,
            default_str_value: String::new(),
            repeated: false,
            container_valid: false,
            oneof_siblings: BTreeSet::new(),
            container: BTreeMap::new(),
        }
    }
}
