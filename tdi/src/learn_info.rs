// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::collections::BTreeMap;

use crate::info::data_field_by_name;
use crate::Annotations;
use crate::DataFieldInfo;
use crate::TdiError;
use crate::TdiId;
use crate::TdiResult;

/// The format of an asynchronous learn notification.
#[derive(Debug, Clone)]
pub struct LearnInfo {
    pub(crate) id: TdiId,
    pub(crate) name: String,
    pub(crate) data_fields: BTreeMap<TdiId, DataFieldInfo>,
    pub(crate) annotations: Annotations,
}

impl LearnInfo {
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

    pub fn data_field_id_list_get(&self) -> Vec<TdiId> {
        self.data_fields.keys().copied().collect()
    }

    pub fn data_field_get(&self, id: TdiId) -> TdiResult<&DataFieldInfo> {
        self.data_fields.get(&id).ok_or_else(|| {
            TdiError::ObjectNotFound(format!(
                "no field {id} in learn {}",
                self.name
            ))
        })
    }

    pub fn data_field_id_get(&self, name: &str) -> TdiResult<TdiId> {
        data_field_by_name(&self.data_fields, name)
            .map(|f| f.id)
            .ok_or_else(|| {
                TdiError::ObjectNotFound(format!(
                    "no field {name} in learn {}",
                    self.name
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::test_utils::data_field;

    #[test]
    fn test_learn_fields() {
        let mut data_fields = BTreeMap::new();
        for f in [data_field(3, "src_mac", 48), data_field(1, "port", 9)] {
            data_fields.insert(f.id, f);
        }
        let learn = LearnInfo {
            id: 0x1000,
            name: "SwitchIngressDeparser.digest".to_string(),
            data_fields,
            annotations: Annotations::new(),
        };

        assert_eq!(learn.data_field_id_list_get(), vec![1, 3]);
        assert_eq!(learn.data_field_id_get("src_mac").unwrap(), 3);
        assert_eq!(learn.data_field_get(1).unwrap().size_bits(), 9);
        assert!(matches!(
            learn.data_field_id_get("dst_mac"),
            Err(TdiError::ObjectNotFound(_))
        ));
        assert!(learn.data_field_get(2).is_err());
    }
}
