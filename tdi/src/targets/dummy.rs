// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

//! A placeholder device target.  It understands the TNA table types but
//! drives no hardware, which makes it useful for exercising schema loading.
//!
//! The operation and attribute names, the target attributes and the
//! per-type API sets published here belong to this target alone.  They
//! give the schema fixtures something to resolve against and don't mirror
//! any hardware target.

use crate::mapper::EnumMapper;
use crate::AttributesType;
use crate::OperationsType;
use crate::SupportedApis;
use crate::TableApiType;
use crate::TableFactory;
use crate::TableInfo;
use crate::TableType;
use crate::TdiResult;

/// Table types of the dummy target, allocated from the device range.
pub struct DummyTableType;

impl DummyTableType {
    pub const MATCH_DIRECT: TableType = TableType::DEVICE;
    pub const MATCH_INDIRECT: TableType = TableType(0x0801);
    pub const MATCH_INDIRECT_SELECTOR: TableType = TableType(0x0802);
    pub const ACTION_PROFILE: TableType = TableType(0x0803);
    pub const SELECTOR: TableType = TableType(0x0804);
    pub const COUNTER: TableType = TableType(0x0805);
    pub const METER: TableType = TableType(0x0806);
    pub const REGISTER: TableType = TableType(0x0807);
    pub const PORT_CFG: TableType = TableType(0x0808);
    pub const PORT_STAT: TableType = TableType(0x0809);
    pub const INVALID: TableType = TableType(0x080a);
}

const TABLE_TYPES: [(&str, TableType); 10] = [
    ("MatchAction_Direct", DummyTableType::MATCH_DIRECT),
    ("MatchAction_Indirect", DummyTableType::MATCH_INDIRECT),
    (
        "MatchAction_Indirect_Selector",
        DummyTableType::MATCH_INDIRECT_SELECTOR,
    ),
    ("Action", DummyTableType::ACTION_PROFILE),
    ("Selector", DummyTableType::SELECTOR),
    ("Meter", DummyTableType::METER),
    ("Counter", DummyTableType::COUNTER),
    ("Register", DummyTableType::REGISTER),
    ("PortConfigure", DummyTableType::PORT_CFG),
    ("PortStat", DummyTableType::PORT_STAT),
];

const OPERATIONS: [(&str, OperationsType); 3] = [
    ("SyncCounters", OperationsType::DEVICE),
    ("SyncRegisters", OperationsType(0x81)),
    ("UpdateHitState", OperationsType(0x82)),
];

const ATTRIBUTES: [(&str, AttributesType); 3] = [
    ("EntryScope", AttributesType::DEVICE),
    ("IdleTimeout", AttributesType(0x81)),
    ("MeterByteCountAdjust", AttributesType(0x82)),
];

// The target attributes every dummy table honors.
const TARGET_ATTRS: [&str; 3] = ["dev_id", "pipe_id", "direction"];

/// The TNA mapper extended with the dummy target's names.  A name
/// registered twice fails with `AlreadyExists`.
pub fn mapper() -> TdiResult<EnumMapper> {
    let mut m = EnumMapper::tna();
    for (name, table_type) in TABLE_TYPES {
        m.table_enum_add(name, table_type)?;
    }
    for (name, op) in OPERATIONS {
        m.operations_enum_add(name, op)?;
    }
    for (name, attr) in ATTRIBUTES {
        m.attributes_enum_add(name, attr)?;
    }
    Ok(m)
}

/// Display name of a dummy table type.
pub fn table_type_name(table_type: TableType) -> Option<&'static str> {
    TABLE_TYPES
        .iter()
        .find(|(_, t)| *t == table_type)
        .map(|(name, _)| *name)
}

/// The dummy target implements every table type it names except registers,
/// which are reported as optimized out.
#[derive(Debug, Default)]
pub struct Factory;

impl TableFactory for Factory {
    fn accepts(&self, table: &TableInfo) -> bool {
        matches!(
            table.table_type(),
            DummyTableType::MATCH_DIRECT
                | DummyTableType::MATCH_INDIRECT
                | DummyTableType::MATCH_INDIRECT_SELECTOR
                | DummyTableType::ACTION_PROFILE
                | DummyTableType::SELECTOR
                | DummyTableType::COUNTER
                | DummyTableType::METER
                | DummyTableType::PORT_CFG
                | DummyTableType::PORT_STAT
        )
    }

    fn supported_apis(&self, table: &TableInfo) -> SupportedApis {
        use TableApiType::*;

        let apis: &[TableApiType] = match table.table_type() {
            DummyTableType::MATCH_DIRECT => &[
                Add,
                Modify,
                Delete,
                Clear,
                DefaultEntrySet,
                DefaultEntryReset,
                DefaultEntryGet,
                Get,
                GetFirst,
                GetNextN,
                UsageGet,
            ],
            DummyTableType::MATCH_INDIRECT
            | DummyTableType::MATCH_INDIRECT_SELECTOR => &[
                Add, Modify, Delete, Clear, Get, GetFirst, GetNextN, UsageGet,
            ],
            DummyTableType::ACTION_PROFILE | DummyTableType::SELECTOR => {
                &[Add, Modify, Delete, Get, GetFirst, GetNextN]
            }
            DummyTableType::COUNTER | DummyTableType::METER => {
                &[Modify, Clear, Get, GetFirst, GetNextN]
            }
            DummyTableType::PORT_CFG => {
                &[Add, Modify, Delete, Clear, Get, GetFirst, GetNextN]
            }
            DummyTableType::PORT_STAT => {
                &[Modify, Clear, Get, GetFirst, GetNextN]
            }
            _ => &[],
        };

        let attrs: Vec<String> =
            TARGET_ATTRS.iter().map(|a| a.to_string()).collect();
        apis.iter().map(|api| (*api, attrs.clone())).collect()
    }
}
