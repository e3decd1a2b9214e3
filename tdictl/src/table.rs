// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::io::stdout;
use std::io::Write;

use colored::Colorize;
use tabwriter::TabWriter;

use tdi::targets::dummy;
use tdi::Annotations;
use tdi::DataFieldInfo;
use tdi::TableInfo;
use tdi::TableType;
use tdi::TdiId;
use tdi::TdiInfo;

pub(crate) fn table_type_name(table_type: TableType) -> String {
    dummy::table_type_name(table_type)
        .map(str::to_string)
        .unwrap_or_else(|| table_type.to_string())
}

pub(crate) fn annotation_list(annotations: &Annotations) -> String {
    annotations
        .iter()
        .map(|a| a.full_name())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Resolve an action given by name or by id.
pub(crate) fn action_id(
    table: &TableInfo,
    action: &str,
) -> anyhow::Result<TdiId> {
    if let Ok(id) = action.parse::<TdiId>() {
        if table.action_get(id).is_ok() {
            return Ok(id);
        }
    }
    Ok(table.action_id_get(action)?)
}

pub(crate) fn table_list(
    info: &TdiInfo,
    parseable: bool,
) -> anyhow::Result<()> {
    let mut tw = TabWriter::new(stdout());
    if !parseable {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}",
            "Name".underline(),
            "Id".underline(),
            "Type".underline(),
            "Size".underline()
        )?;
    }
    for t in info.tables_get() {
        let fields = [
            t.name().to_string(),
            t.id().to_string(),
            table_type_name(t.table_type()),
            t.size().to_string(),
        ];
        if parseable {
            writeln!(tw, "{}", fields.join(","))?;
        } else {
            writeln!(tw, "{}", fields.join("\t"))?;
        }
    }
    tw.flush()?;

    for name in info.invalid_table_names() {
        eprintln!("{name}: optimized out");
    }
    Ok(())
}

fn data_row(f: &DataFieldInfo, owner: &str) -> Vec<String> {
    vec![
        f.id().to_string(),
        f.name().to_string(),
        f.data_type().to_string(),
        f.size_bits().to_string(),
        f.mandatory().to_string(),
        f.read_only().to_string(),
        owner.to_string(),
    ]
}

pub(crate) fn table_dump(
    info: &TdiInfo,
    name: &str,
    action: Option<String>,
    parseable: bool,
) -> anyhow::Result<()> {
    let t = info.table_from_name_get(name)?;
    let action_id = match &action {
        Some(a) => Some(action_id(t, a)?),
        None => None,
    };

    // Common fields first, then those of the selected action.
    let mut data: Vec<Vec<String>> = t
        .data_fields()
        .values()
        .map(|f| data_row(f, ""))
        .collect();
    if let Some(id) = action_id {
        let a = t.action_get(id)?;
        data.extend(a.data_fields().values().map(|f| data_row(f, a.name())));
    }

    let depends: Vec<String> =
        t.depends_on().iter().map(|id| id.to_string()).collect();

    if parseable {
        println!(
            "table,{},{},{},{}",
            t.name(),
            t.id(),
            table_type_name(t.table_type()),
            t.size()
        );
        for k in t.key_fields().values() {
            println!(
                "key,{},{},{},{},{},{}",
                k.id(),
                k.name(),
                k.match_type(),
                k.data_type(),
                k.size_bits(),
                k.mandatory()
            );
        }
        for a in t.actions().values() {
            println!("action,{},{}", a.id(), a.name());
        }
        for row in &data {
            println!("data,{}", row.join(","));
        }
        for id in &depends {
            println!("depends_on,{id}");
        }
        return Ok(());
    }

    let mut tw = TabWriter::new(stdout());
    writeln!(tw, "Table:\t{}", t.name())?;
    writeln!(tw, "Id:\t{}", t.id())?;
    writeln!(tw, "Type:\t{}", table_type_name(t.table_type()))?;
    writeln!(tw, "Size:\t{}", t.size())?;
    if !depends.is_empty() {
        writeln!(tw, "Depends on:\t{}", depends.join(" "))?;
    }
    if !t.annotations().is_empty() {
        writeln!(tw, "Annotations:\t{}", annotation_list(t.annotations()))?;
    }
    tw.flush()?;

    let mut tw = TabWriter::new(stdout());
    writeln!(tw)?;
    writeln!(
        tw,
        "{}\t{}\t{}\t{}\t{}\t{}",
        "Key".underline(),
        "Name".underline(),
        "Match".underline(),
        "Type".underline(),
        "Width".underline(),
        "Mandatory".underline()
    )?;
    for k in t.key_fields().values() {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t{}\t{}",
            k.id(),
            k.name(),
            k.match_type(),
            k.data_type(),
            k.size_bits(),
            k.mandatory()
        )?;
    }

    if !t.actions().is_empty() {
        writeln!(tw)?;
        writeln!(
            tw,
            "{}\t{}\t{}",
            "Action".underline(),
            "Name".underline(),
            "Fields".underline()
        )?;
        for a in t.actions().values() {
            let fields = a.data_fields().len();
            writeln!(tw, "{}\t{}\t{fields}", a.id(), a.name())?;
        }
    }

    if !data.is_empty() {
        writeln!(tw)?;
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            "Field".underline(),
            "Name".underline(),
            "Type".underline(),
            "Width".underline(),
            "Mandatory".underline(),
            "Read-only".underline(),
            "Action".underline()
        )?;
        for row in &data {
            writeln!(tw, "{}", row.join("\t"))?;
        }
    }
    tw.flush().map_err(|e| e.into())
}
