// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use slog::{debug, o, warn};

use crate::LearnInfo;
use crate::SupportedApis;
use crate::TableInfo;
use crate::TdiError;
use crate::TdiId;
use crate::TdiInfoParser;
use crate::TdiResult;

/// The target's hook into program loading.  A target decides which of the
/// parsed tables it can implement and which entry APIs each one supports.
pub trait TableFactory {
    /// Tables that aren't accepted are treated as optimized out of the
    /// program.
    fn accepts(&self, _table: &TableInfo) -> bool {
        true
    }

    fn supported_apis(&self, _table: &TableInfo) -> SupportedApis {
        SupportedApis::new()
    }
}

/// A factory that accepts every table and advertises no APIs.
#[derive(Debug, Default)]
pub struct DefaultFactory;

impl TableFactory for DefaultFactory {}

// Every dot-separated suffix of a name: "a.b.c" yields "c", "b.c" and
// "a.b.c".
fn partial_names(name: &str) -> impl Iterator<Item = &str> {
    std::iter::once(name)
        .chain(name.match_indices('.').map(move |(idx, _)| &name[idx + 1..]))
}

// Map every unambiguous partial name onto the full name it abbreviates.  A
// partial name shared by two objects refers to neither.
fn full_name_map<'a>(
    names: impl Iterator<Item = &'a str>,
) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let mut ambiguous = BTreeSet::new();
    for name in names {
        for partial in partial_names(name) {
            if map.contains_key(partial) {
                ambiguous.insert(partial.to_string());
            } else {
                map.insert(partial.to_string(), name.to_string());
            }
        }
    }
    for partial in ambiguous {
        map.remove(&partial);
    }
    map
}

/// The metadata of a loaded P4 program, indexed for lookup by name and id.
#[derive(Debug)]
pub struct TdiInfo {
    p4_name: String,
    tables: BTreeMap<String, TableInfo>,
    table_names: BTreeMap<String, String>,
    table_ids: BTreeMap<TdiId, String>,
    invalid_table_names: BTreeSet<String>,
    learns: BTreeMap<String, LearnInfo>,
    learn_names: BTreeMap<String, String>,
    learn_ids: BTreeMap<TdiId, String>,
    log: slog::Logger,
}

impl TdiInfo {
    pub fn new(
        p4_name: &str,
        parser: TdiInfoParser,
        factory: &dyn TableFactory,
        log: &slog::Logger,
    ) -> Self {
        let log = log.new(o!("p4" => p4_name.to_string()));
        let (parsed_tables, parsed_learns) = parser.into_parts();

        let mut tables = BTreeMap::new();
        let mut table_ids = BTreeMap::new();
        let mut invalid_table_names = BTreeSet::new();
        for (name, mut table) in parsed_tables {
            if !factory.accepts(&table) {
                warn!(log, "table {name} is not supported by the target");
                invalid_table_names.insert(name);
                continue;
            }
            table.table_apis = factory.supported_apis(&table);
            if let Some(other) = table_ids.get(&table.id) {
                warn!(log, "table {name} id {} already used by {other}",
                    table.id);
            } else {
                table_ids.insert(table.id, name.clone());
            }
            tables.insert(name, table);
        }
        let table_names = full_name_map(tables.keys().map(String::as_str));

        let mut learn_ids = BTreeMap::new();
        for (name, learn) in &parsed_learns {
            if let Some(other) = learn_ids.get(&learn.id) {
                warn!(log, "learn {name} id {} already used by {other}",
                    learn.id);
            } else {
                learn_ids.insert(learn.id, name.clone());
            }
        }
        let learn_names =
            full_name_map(parsed_learns.keys().map(String::as_str));

        debug!(log, "program loaded";
            "tables" => tables.len(),
            "optimized_out" => invalid_table_names.len(),
            "learns" => parsed_learns.len());

        TdiInfo {
            p4_name: p4_name.to_string(),
            tables,
            table_names,
            table_ids,
            invalid_table_names,
            learns: parsed_learns,
            learn_names,
            learn_ids,
            log,
        }
    }

    pub fn p4_name_get(&self) -> &str {
        &self.p4_name
    }

    /// All tables, in name order.
    pub fn tables_get(&self) -> Vec<&TableInfo> {
        self.tables.values().collect()
    }

    /// Look up a table by its full name or by any unambiguous suffix of it,
    /// e.g. `SwitchIngress.forward` or `forward` for
    /// `pipe.SwitchIngress.forward`.
    pub fn table_from_name_get(&self, name: &str) -> TdiResult<&TableInfo> {
        if self.invalid_table_names.contains(name) {
            debug!(self.log, "table {name} was optimized out");
            return Err(TdiError::InvalidArg(format!(
                "table {name} was optimized out"
            )));
        }
        self.tables
            .get(name)
            .or_else(|| {
                self.table_names
                    .get(name)
                    .and_then(|full| self.tables.get(full))
            })
            .ok_or_else(|| {
                TdiError::ObjectNotFound(format!("table {name} not found"))
            })
    }

    pub fn table_from_id_get(&self, id: TdiId) -> TdiResult<&TableInfo> {
        self.table_ids
            .get(&id)
            .and_then(|name| self.tables.get(name))
            .ok_or_else(|| {
                TdiError::ObjectNotFound(format!("table id {id} not found"))
            })
    }

    /// Names of the tables the target declined to implement.
    pub fn invalid_table_names(&self) -> &BTreeSet<String> {
        &self.invalid_table_names
    }

    pub fn learns_get(&self) -> Vec<&LearnInfo> {
        self.learns.values().collect()
    }

    pub fn learn_from_name_get(&self, name: &str) -> TdiResult<&LearnInfo> {
        self.learns
            .get(name)
            .or_else(|| {
                self.learn_names
                    .get(name)
                    .and_then(|full| self.learns.get(full))
            })
            .ok_or_else(|| {
                TdiError::ObjectNotFound(format!("learn {name} not found"))
            })
    }

    pub fn learn_from_id_get(&self, id: TdiId) -> TdiResult<&LearnInfo> {
        self.learn_ids
            .get(&id)
            .and_then(|name| self.learns.get(name))
            .ok_or_else(|| {
                TdiError::ObjectNotFound(format!("learn id {id} not found"))
            })
    }
}
