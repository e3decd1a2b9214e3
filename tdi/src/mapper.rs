// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

//! Resolution of the symbolic type names used in a schema document.
//!
//! Each architecture and device target names its own table, match,
//! operation and attribute types.  The parser is handed an [`InfoMapper`]
//! for the target it is loading a program for, and falls back to the CORE
//! value of a category for any name the mapper doesn't know.

use std::collections::BTreeMap;

use crate::AttributesType;
use crate::MatchType;
use crate::OperationsType;
use crate::TableType;
use crate::TdiError;
use crate::TdiResult;

/// Maps schema type names onto target-specific enum values.
pub trait InfoMapper: Send + Sync {
    fn table_type(&self, name: &str) -> Option<TableType>;
    fn match_type(&self, name: &str) -> Option<MatchType>;
    fn operations_type(&self, name: &str) -> Option<OperationsType>;
    fn attributes_type(&self, name: &str) -> Option<AttributesType>;
}

/// A map-backed [`InfoMapper`], seeded with the core match types.
#[derive(Debug, Clone, Default)]
pub struct EnumMapper {
    tables: BTreeMap<String, TableType>,
    matches: BTreeMap<String, MatchType>,
    operations: BTreeMap<String, OperationsType>,
    attributes: BTreeMap<String, AttributesType>,
}

fn add<T>(
    map: &mut BTreeMap<String, T>,
    what: &str,
    name: &str,
    value: T,
) -> TdiResult<()> {
    if map.contains_key(name) {
        return Err(TdiError::AlreadyExists(format!("{what} type {name}")));
    }
    map.insert(name.to_string(), value);
    Ok(())
}

impl EnumMapper {
    /// A mapper holding only the core match types.
    pub fn core() -> Self {
        let mut m = EnumMapper::default();
        m.matches.insert("Exact".to_string(), MatchType::EXACT);
        m.matches.insert("Ternary".to_string(), MatchType::TERNARY);
        m.matches.insert("LPM".to_string(), MatchType::LPM);
        m.matches.insert("Range".to_string(), MatchType::RANGE);
        m.matches.insert("Optional".to_string(), MatchType::OPTIONAL);
        m
    }

    /// The mapper for programs built for the Tofino Native Architecture.
    pub fn tna() -> Self {
        let mut m = EnumMapper::core();
        m.matches.insert("ATCAM".to_string(), MatchType::ATCAM);
        // TNA range keys are also emitted as "LPM".  That name is already
        // claimed by the core mapping, which keeps it.
        m
    }

    /// The mapper for programs built for the Portable NIC Architecture.
    pub fn pna() -> Self {
        let mut m = EnumMapper::core();
        m.matches.insert("RANGE".to_string(), MatchType::RANGE);
        m
    }

    pub fn table_enum_add(
        &mut self,
        name: &str,
        value: TableType,
    ) -> TdiResult<()> {
        add(&mut self.tables, "table", name, value)
    }

    pub fn match_enum_add(
        &mut self,
        name: &str,
        value: MatchType,
    ) -> TdiResult<()> {
        add(&mut self.matches, "match", name, value)
    }

    pub fn operations_enum_add(
        &mut self,
        name: &str,
        value: OperationsType,
    ) -> TdiResult<()> {
        add(&mut self.operations, "operations", name, value)
    }

    pub fn attributes_enum_add(
        &mut self,
        name: &str,
        value: AttributesType,
    ) -> TdiResult<()> {
        add(&mut self.attributes, "attributes", name, value)
    }
}

impl InfoMapper for EnumMapper {
    fn table_type(&self, name: &str) -> Option<TableType> {
        self.tables.get(name).copied()
    }

    fn match_type(&self, name: &str) -> Option<MatchType> {
        self.matches.get(name).copied()
    }

    fn operations_type(&self, name: &str) -> Option<OperationsType> {
        self.operations.get(name).copied()
    }

    fn attributes_type(&self, name: &str) -> Option<AttributesType> {
        self.attributes.get(name).copied()
    }
}
