// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use slog::{crit, debug, error, o};

use crate::schema::ActionNode;
use crate::schema::AnnotationNode;
use crate::schema::DataNode;
use crate::schema::KeyNode;
use crate::schema::LearnNode;
use crate::schema::SchemaDocument;
use crate::schema::TableNode;
use crate::ActionInfo;
use crate::Annotation;
use crate::Annotations;
use crate::AttributesType;
use crate::DataFieldInfo;
use crate::FieldWidthSpec;
use crate::InfoMapper;
use crate::KeyFieldInfo;
use crate::LearnInfo;
use crate::MatchType;
use crate::OperationsType;
use crate::SupportedApis;
use crate::TableInfo;
use crate::TableType;
use crate::TdiError;
use crate::TdiId;
use crate::TdiResult;

fn parse_annotations(nodes: &[AnnotationNode]) -> Annotations {
    nodes
        .iter()
        .map(|a| Annotation::new(a.name.as_str(), a.value.as_str()))
        .collect()
}

// A key is a field slice if it carries the annotation isFieldSlice=true.
fn is_field_slice(nodes: &[AnnotationNode]) -> bool {
    nodes
        .iter()
        .any(|a| a.name == "isFieldSlice" && a.value == "true")
}

fn decode<'a, T: Deserialize<'a>>(node: &'a Value, what: &str) -> TdiResult<T> {
    T::deserialize(node)
        .map_err(|e| TdiError::InvalidArg(format!("malformed {what}: {e}")))
}

/// Insert a field unless its id is already taken, returning whether the
/// field was kept.
fn insert_data_field(
    fields: &mut BTreeMap<TdiId, DataFieldInfo>,
    field: DataFieldInfo,
) -> bool {
    if fields.contains_key(&field.id) {
        return false;
    }
    fields.insert(field.id, field);
    true
}

/// Parses one or more schema documents into table and learn metadata.
///
/// Documents are processed in order.  A table or learn record defined by
/// more than one document is replaced by each later definition.
pub struct TdiInfoParser {
    mapper: Box<dyn InfoMapper>,
    tables: BTreeMap<String, TableInfo>,
    learns: BTreeMap<String, LearnInfo>,
    failed_tables: BTreeSet<String>,
    log: slog::Logger,
}

impl TdiInfoParser {
    pub fn new(mapper: Box<dyn InfoMapper>, log: &slog::Logger) -> Self {
        TdiInfoParser {
            mapper,
            tables: BTreeMap::new(),
            learns: BTreeMap::new(),
            failed_tables: BTreeSet::new(),
            log: log.new(o!("unit" => "tdi-info-parser")),
        }
    }

    /// All successfully parsed tables, keyed by name.
    pub fn table_info_map(&self) -> &BTreeMap<String, TableInfo> {
        &self.tables
    }

    pub fn learn_info_map(&self) -> &BTreeMap<String, LearnInfo> {
        &self.learns
    }

    /// Names of the tables whose most recent definition couldn't be parsed.
    pub fn failed_tables(&self) -> &BTreeSet<String> {
        &self.failed_tables
    }

    pub(crate) fn into_parts(
        self,
    ) -> (BTreeMap<String, TableInfo>, BTreeMap<String, LearnInfo>) {
        (self.tables, self.learns)
    }

    /// Load each of the schema documents at `paths`.
    ///
    /// Fails if no paths are given, or at the first document that can't be
    /// read or isn't valid json.  Tables and learn records that fail to
    /// parse are logged and skipped without failing the load.
    pub fn parse_tdi_info<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
    ) -> TdiResult<()> {
        if paths.is_empty() {
            crit!(self.log, "no tdi json schema files provided");
            return Err(TdiError::ObjectNotFound(
                "no schema files provided".to_string(),
            ));
        }

        for path in paths {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path).map_err(|err| {
                crit!(self.log, "unable to read tdi json file";
                    "path" => %path.display(),
                    "error" => %err);
                TdiError::Io {
                    ctx: format!("reading schema file {}", path.display()),
                    err,
                }
            })?;
            self.parse_document(&content, &path.display().to_string())?;
        }
        Ok(())
    }

    /// Load a single schema document.  `source` identifies the document in
    /// log messages and errors.
    pub fn parse_document(
        &mut self,
        content: &str,
        source: &str,
    ) -> TdiResult<()> {
        let doc: SchemaDocument =
            serde_json::from_str(content).map_err(|err| {
                crit!(self.log, "malformed tdi json file";
                    "source" => source,
                    "error" => %err);
                TdiError::Json {
                    ctx: format!("parsing {source}"),
                    err,
                }
            })?;
        debug!(self.log, "parsing {source}";
            "tables" => doc.tables.len(),
            "learns" => doc.learn_filters.len());

        for node in &doc.tables {
            let Some(name) = node.get("name").and_then(Value::as_str) else {
                error!(self.log, "skipping unnamed table in {source}");
                continue;
            };
            match self.parse_table(node) {
                Ok(table) => {
                    self.failed_tables.remove(name);
                    self.tables.insert(name.to_string(), table);
                }
                Err(e) => {
                    error!(self.log, "failed to parse table {name}: {e}");
                    self.tables.remove(name);
                    self.failed_tables.insert(name.to_string());
                }
            }
        }

        for node in &doc.learn_filters {
            let Some(name) = node.get("name").and_then(Value::as_str) else {
                error!(self.log, "skipping unnamed learn in {source}");
                continue;
            };
            match self.parse_learn(node) {
                Ok(learn) => {
                    self.learns.insert(name.to_string(), learn);
                }
                Err(e) => {
                    error!(self.log, "failed to parse learn {name}: {e}");
                    self.learns.remove(name);
                }
            }
        }
        Ok(())
    }

    fn table_type(&self, name: &str) -> TableType {
        self.mapper.table_type(name).unwrap_or(TableType::CORE)
    }

    fn match_type(&self, name: &str) -> MatchType {
        self.mapper.match_type(name).unwrap_or(MatchType::CORE)
    }

    fn operations_type(&self, name: &str) -> OperationsType {
        self.mapper
            .operations_type(name)
            .unwrap_or(OperationsType::CORE)
    }

    fn attributes_type(&self, name: &str) -> AttributesType {
        self.mapper
            .attributes_type(name)
            .unwrap_or(AttributesType::CORE)
    }

    fn parse_key_field(&self, node: &Value) -> TdiResult<KeyFieldInfo> {
        let key: KeyNode = decode(node, "key field")?;
        let spec = FieldWidthSpec::resolve(
            key.ktype.as_ref(),
            key.repeated,
            key.container.is_some(),
        )
        .map_err(|e| {
            TdiError::InvalidArg(format!("key field {}: {e}", key.name))
        })?;

        Ok(KeyFieldInfo {
            id: key.id,
            match_type: self.match_type(&key.match_type),
            data_type: spec.data_type,
            size_bits: spec.width_bits,
            mandatory: key.mandatory,
            choices: spec.choices,
            is_field_slice: is_field_slice(&key.annotations),
            annotations: parse_annotations(&key.annotations),
            default_value: spec.default_uint,
            default_fl_value: spec.default_float,
            default_str_value: spec.default_string,
            is_ptr: false,
            match_priority: false,
            name: key.name,
        })
    }

    /// Materialize alternative `oneof_index` of a data field node.  Nodes
    /// without a `oneof` group only have alternative 0.
    fn parse_data_field(
        &self,
        node: &DataNode,
        oneof_index: usize,
    ) -> TdiResult<DataFieldInfo> {
        // These two flags live on the outermost wrapper.
        let mandatory = node.mandatory;
        let read_only = node.read_only;

        let mut field = node.field();
        let mut oneof_siblings = BTreeSet::new();
        if let Some(alternatives) = &field.oneof {
            oneof_siblings =
                alternatives.iter().filter_map(|alt| alt.id).collect();
            field = alternatives.get(oneof_index).ok_or_else(|| {
                TdiError::InvalidArg(format!(
                    "oneof index {oneof_index} out of range"
                ))
            })?;
            if let Some(id) = field.id {
                oneof_siblings.remove(&id);
            }
        }

        let name = field.name.clone().ok_or_else(|| {
            TdiError::InvalidArg("data field has no name".to_string())
        })?;
        let id = field.id.ok_or_else(|| {
            TdiError::InvalidArg(format!("data field {name} has no id"))
        })?;
        let spec = FieldWidthSpec::resolve(
            field.dtype.as_ref(),
            field.repeated,
            field.container.is_some(),
        )
        .map_err(|e| TdiError::InvalidArg(format!("data field {name}: {e}")))?;

        // Nested container fields are flagged but not parsed.
        Ok(DataFieldInfo {
            id,
            name,
            size_bits: spec.width_bits,
            data_type: spec.data_type,
            is_ptr: false,
            mandatory,
            read_only,
            choices: spec.choices,
            annotations: parse_annotations(&field.annotations),
            default_value: spec.default_uint,
            default_fl_value: spec.default_float,
            default_str_value: spec.default_string,
            repeated: field.repeated,
            container_valid: field.container.is_some(),
            oneof_siblings,
            container: BTreeMap::new(),
        })
    }

    /// Parse a list of data field nodes into a map, expanding each `oneof`
    /// group into one field per alternative.  Malformed fields and fields
    /// whose id is already present are logged and skipped.
    fn parse_data_fields(
        &self,
        nodes: &[Value],
        owner: &str,
    ) -> BTreeMap<TdiId, DataFieldInfo> {
        let mut fields = BTreeMap::new();
        for raw in nodes {
            let node: DataNode = match decode(raw, "data field") {
                Ok(n) => n,
                Err(e) => {
                    error!(self.log, "{owner}: skipping data field: {e}");
                    continue;
                }
            };
            for idx in 0..node.oneof_len() {
                match self.parse_data_field(&node, idx) {
                    Ok(f) => {
                        let id = f.id;
                        if !insert_data_field(&mut fields, f) {
                            error!(self.log,
                                "{owner}: id {id} exists for data field");
                        }
                    }
                    Err(e) => {
                        error!(self.log, "{owner}: skipping data field: {e}")
                    }
                }
            }
        }
        fields
    }

    fn parse_action(
        &self,
        node: &Value,
        table: &str,
    ) -> TdiResult<ActionInfo> {
        let action: ActionNode = decode(node, "action")?;
        let owner = format!("{table}/{}", action.name);
        Ok(ActionInfo {
            id: action.id,
            data_fields: self.parse_data_fields(&action.data, &owner),
            annotations: parse_annotations(&action.annotations),
            name: action.name,
        })
    }

    fn parse_learn(&self, node: &Value) -> TdiResult<LearnInfo> {
        let learn: LearnNode = decode(node, "learn")?;
        debug!(self.log, "learn {}", learn.name; "id" => learn.id);
        Ok(LearnInfo {
            id: learn.id,
            data_fields: self.parse_data_fields(&learn.fields, &learn.name),
            annotations: parse_annotations(&learn.annotations),
            name: learn.name,
        })
    }

    /// Parse a single table.  Duplicate key field ids and duplicate action
    /// ids fail the whole table.  Other malformed content is skipped.
    fn parse_table(&self, node: &Value) -> TdiResult<TableInfo> {
        let table: TableNode = decode(node, "table")?;
        debug!(self.log, "table {}", table.name;
            "type" => &table.table_type,
            "id" => table.id,
            "size" => table.size);

        let mut key_fields = BTreeMap::new();
        for raw in &table.key {
            let key = match self.parse_key_field(raw) {
                Ok(k) => k,
                Err(e) => {
                    error!(self.log, "{}: skipping key field: {e}", table.name);
                    continue;
                }
            };
            if key_fields.contains_key(&key.id) {
                return Err(TdiError::AlreadyExists(format!(
                    "key field id {} is repeated",
                    key.id
                )));
            }
            key_fields.insert(key.id, key);
        }

        let data_fields = self.parse_data_fields(&table.data, &table.name);

        let mut actions = BTreeMap::new();
        for raw in &table.action_specs {
            let action = match self.parse_action(raw, &table.name) {
                Ok(a) => a,
                Err(e) => {
                    error!(self.log, "{}: skipping action: {e}", table.name);
                    continue;
                }
            };
            if actions.contains_key(&action.id) {
                return Err(TdiError::AlreadyExists(format!(
                    "action id {} is repeated",
                    action.id
                )));
            }
            actions.insert(action.id, action);
        }

        Ok(TableInfo {
            id: table.id,
            table_type: self.table_type(&table.table_type),
            size: table.size,
            has_const_default_action: table.has_const_default_action,
            is_const: table.is_const,
            key_fields,
            data_fields,
            actions,
            depends_on: table.depends_on.iter().copied().collect(),
            table_apis: SupportedApis::new(),
            operations: table
                .supported_operations
                .iter()
                .map(|op| self.operations_type(op))
                .collect(),
            attributes: table
                .attributes
                .iter()
                .map(|attr| self.attributes_type(attr))
                .collect(),
            annotations: parse_annotations(&table.annotations),
            name: table.name,
        })
    }
}
