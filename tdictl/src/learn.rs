// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::io::stdout;
use std::io::Write;

use colored::Colorize;
use tabwriter::TabWriter;

use tdi::TdiInfo;

use crate::table::annotation_list;

pub(crate) fn learn_list(
    info: &TdiInfo,
    parseable: bool,
) -> anyhow::Result<()> {
    let mut tw = TabWriter::new(stdout());
    if !parseable {
        writeln!(
            tw,
            "{}\t{}\t{}",
            "Name".underline(),
            "Id".underline(),
            "Fields".underline()
        )?;
    }
    for l in info.learns_get() {
        let sep = if parseable { "," } else { "\t" };
        writeln!(
            tw,
            "{}{sep}{}{sep}{}",
            l.name(),
            l.id(),
            l.data_fields().len()
        )?;
    }
    tw.flush().map_err(|e| e.into())
}

pub(crate) fn learn_dump(
    info: &TdiInfo,
    name: &str,
    parseable: bool,
) -> anyhow::Result<()> {
    let l = info.learn_from_name_get(name)?;
    if parseable {
        println!("learn,{},{}", l.name(), l.id());
        for f in l.data_fields().values() {
            println!(
                "field,{},{},{},{}",
                f.id(),
                f.name(),
                f.data_type(),
                f.size_bits()
            );
        }
        return Ok(());
    }

    let mut tw = TabWriter::new(stdout());
    writeln!(tw, "Learn:\t{}", l.name())?;
    writeln!(tw, "Id:\t{}", l.id())?;
    if !l.annotations().is_empty() {
        writeln!(tw, "Annotations:\t{}", annotation_list(l.annotations()))?;
    }
    writeln!(tw)?;
    writeln!(
        tw,
        "{}\t{}\t{}\t{}",
        "Field".underline(),
        "Name".underline(),
        "Type".underline(),
        "Width".underline()
    )?;
    for f in l.data_fields().values() {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}",
            f.id(),
            f.name(),
            f.data_type(),
            f.size_bits()
        )?;
    }
    tw.flush().map_err(|e| e.into())
}
