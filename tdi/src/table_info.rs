// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::info::data_field_by_name;
use crate::ActionInfo;
use crate::Annotations;
use crate::AttributesType;
use crate::DataFieldInfo;
use crate::KeyFieldInfo;
use crate::OperationsType;
use crate::SupportedApis;
use crate::TableType;
use crate::TdiError;
use crate::TdiId;
use crate::TdiResult;

/// The parsed, read-only description of one table.
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub(crate) id: TdiId,
    pub(crate) name: String,
    pub(crate) table_type: TableType,
    pub(crate) size: usize,
    pub(crate) has_const_default_action: bool,
    pub(crate) is_const: bool,
    pub(crate) key_fields: BTreeMap<TdiId, KeyFieldInfo>,
    pub(crate) data_fields: BTreeMap<TdiId, DataFieldInfo>,
    pub(crate) actions: BTreeMap<TdiId, ActionInfo>,
    pub(crate) depends_on: BTreeSet<TdiId>,
    pub(crate) table_apis: SupportedApis,
    pub(crate) operations: BTreeSet<OperationsType>,
    pub(crate) attributes: BTreeSet<AttributesType>,
    pub(crate) annotations: Annotations,
}

impl TableInfo {
    pub fn id(&self) -> TdiId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_type(&self) -> TableType {
        self.table_type
    }

    /// The number of entries the table was compiled to hold.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn has_const_default_action(&self) -> bool {
        self.has_const_default_action
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Ids of the tables that must hold a corresponding entry before an
    /// entry can be added to this one.
    pub fn depends_on(&self) -> &BTreeSet<TdiId> {
        &self.depends_on
    }

    pub fn api_supported(&self) -> &SupportedApis {
        &self.table_apis
    }

    pub fn operations_supported(&self) -> &BTreeSet<OperationsType> {
        &self.operations
    }

    pub fn attributes_supported(&self) -> &BTreeSet<AttributesType> {
        &self.attributes
    }

    pub fn key_fields(&self) -> &BTreeMap<TdiId, KeyFieldInfo> {
        &self.key_fields
    }

    /// The data fields common to every action.
    pub fn data_fields(&self) -> &BTreeMap<TdiId, DataFieldInfo> {
        &self.data_fields
    }

    pub fn actions(&self) -> &BTreeMap<TdiId, ActionInfo> {
        &self.actions
    }

    fn missing(&self, what: &str, which: impl std::fmt::Display) -> TdiError {
        TdiError::ObjectNotFound(format!(
            "no {what} {which} in table {}",
            self.name
        ))
    }

    pub fn key_field_id_list_get(&self) -> Vec<TdiId> {
        self.key_fields.keys().copied().collect()
    }

    pub fn key_field_get(&self, id: TdiId) -> TdiResult<&KeyFieldInfo> {
        self.key_fields
            .get(&id)
            .ok_or_else(|| self.missing("key field", id))
    }

    pub fn key_field_get_by_name(
        &self,
        name: &str,
    ) -> TdiResult<&KeyFieldInfo> {
        self.key_fields
            .values()
            .find(|k| k.name == name)
            .ok_or_else(|| self.missing("key field", name))
    }

    pub fn key_field_id_get(&self, name: &str) -> TdiResult<TdiId> {
        self.key_field_get_by_name(name).map(|k| k.id)
    }

    /// Ids of the data fields visible to an action: its own fields and the
    /// table's common fields, in ascending order.  An `action_id` of 0
    /// selects the common fields alone.
    pub fn data_field_id_list_get(
        &self,
        action_id: TdiId,
    ) -> TdiResult<Vec<TdiId>> {
        let mut ids: BTreeSet<TdiId> =
            self.data_fields.keys().copied().collect();
        if action_id != 0 {
            let action = self
                .actions
                .get(&action_id)
                .ok_or_else(|| self.missing("action", action_id))?;
            ids.extend(action.data_fields.keys().copied());
        }
        Ok(ids.into_iter().collect())
    }

    pub fn common_data_field_id_list_get(&self) -> Vec<TdiId> {
        self.data_fields.keys().copied().collect()
    }

    // The action's own map is searched before the common map.  An action id
    // that doesn't resolve falls through to the common map.
    fn data_field_lookup<'a, F>(
        &'a self,
        action_id: TdiId,
        find: F,
    ) -> Option<&'a DataFieldInfo>
    where
        F: Fn(&'a BTreeMap<TdiId, DataFieldInfo>) -> Option<&'a DataFieldInfo>,
    {
        let scoped = match action_id {
            0 => None,
            id => self.actions.get(&id).and_then(|a| find(&a.data_fields)),
        };
        scoped.or_else(|| find(&self.data_fields))
    }

    pub fn data_field_get(
        &self,
        id: TdiId,
        action_id: TdiId,
    ) -> TdiResult<&DataFieldInfo> {
        self.data_field_lookup(action_id, |fields| fields.get(&id))
            .ok_or_else(|| self.missing("data field", id))
    }

    pub fn data_field_get_by_name(
        &self,
        name: &str,
        action_id: TdiId,
    ) -> TdiResult<&DataFieldInfo> {
        self.data_field_lookup(action_id, |fields| {
            data_field_by_name(fields, name)
        })
        .ok_or_else(|| self.missing("data field", name))
    }

    pub fn data_field_id_get(
        &self,
        name: &str,
        action_id: TdiId,
    ) -> TdiResult<TdiId> {
        self.data_field_get_by_name(name, action_id).map(|f| f.id)
    }

    pub fn action_id_list_get(&self) -> Vec<TdiId> {
        self.actions.keys().copied().collect()
    }

    pub fn action_get(&self, id: TdiId) -> TdiResult<&ActionInfo> {
        self.actions.get(&id).ok_or_else(|| self.missing("action", id))
    }

    pub fn action_get_by_name(&self, name: &str) -> TdiResult<&ActionInfo> {
        self.actions
            .values()
            .find(|a| a.name == name)
            .ok_or_else(|| self.missing("action", name))
    }

    pub fn action_id_get(&self, name: &str) -> TdiResult<TdiId> {
        self.action_get_by_name(name).map(|a| a.id)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use crate::info::test_utils::*;
    use crate::MatchType;

    // A table with common fields {1, 2} and an action 10 with fields {5, 6}.
    // Field 2 also appears, under a different name, inside the action.
    pub fn sample_table() -> TableInfo {
        let mut key_fields = BTreeMap::new();
        for k in [
            key_field(3, "vlan", 12, MatchType::EXACT),
            key_field(1, "dst_addr", 128, MatchType::LPM),
            key_field(2, "port", 9, MatchType::TERNARY),
        ] {
            key_fields.insert(k.id, k);
        }

        let mut data_fields = BTreeMap::new();
        for f in [
            data_field(2, "$COUNTER_SPEC_BYTES", 64),
            data_field(1, "$ENTRY_TTL", 32),
        ] {
            data_fields.insert(f.id, f);
        }

        let mut action_fields = BTreeMap::new();
        for f in [
            data_field(6, "port", 9),
            data_field(5, "mac", 48),
            data_field(2, "shadow", 8),
        ] {
            action_fields.insert(f.id, f);
        }
        let mut actions = BTreeMap::new();
        actions.insert(
            10,
            ActionInfo {
                id: 10,
                name: "SwitchIngress.hit".to_string(),
                data_fields: action_fields,
                annotations: Annotations::new(),
            },
        );

        TableInfo {
            id: 37882547,
            name: "pipe.SwitchIngress.forward".to_string(),
            table_type: TableType::DEVICE,
            size: 1024,
            has_const_default_action: false,
            is_const: false,
            key_fields,
            data_fields,
            actions,
            depends_on: BTreeSet::new(),
            table_apis: SupportedApis::new(),
            operations: BTreeSet::new(),
            attributes: BTreeSet::new(),
            annotations: Annotations::new(),
        }
    }
}
