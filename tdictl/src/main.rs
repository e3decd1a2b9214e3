// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use anyhow::Context;
use slog::info;
use slog::o;
use structopt::*;

use tdi::TdiInfo;
use tdi::TdiInfoParser;

mod codec;
mod config;
mod learn;
mod table;

use config::Arch;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tdictl",
    about = "inspects the tables described by TDI json schema files",
    version = "0.0.1"
)]
pub(crate) struct Opt {
    #[structopt(
        short,
        long,
        number_of_values = 1,
        help = "tdi json schema file, may be repeated"
    )]
    schema: Vec<String>,

    #[structopt(
        long,
        help = "architecture of the program: core, tna, pna or dummy"
    )]
    arch: Option<Arch>,

    #[structopt(long, help = "name of the P4 program")]
    p4_name: Option<String>,

    #[structopt(long, about = "log file")]
    log_file: Option<String>,

    #[structopt(
        long,
        short = "l",
        about = "log format",
        help = "format logs for 'human' or 'json' consumption"
    )]
    log_format: Option<common::logging::LogFormat>,

    #[structopt(subcommand)]
    cmd: Commands,
}

#[derive(Debug, StructOpt)]
pub(crate) enum Commands {
    /// List the tables defined by the program.
    #[structopt(visible_alias = "ls")]
    Tables {
        #[structopt(short = "p")]
        /// Display the data in a parseable format rather then user-friendly.
        parseable: bool,
    },
    /// Display the keys, actions and data fields of a table.
    Table {
        #[structopt(short = "a")]
        /// Include the data fields of the specified action.
        action: Option<String>,
        #[structopt(short = "p")]
        /// Display the data in a parseable format rather then user-friendly.
        parseable: bool,
        /// The name of the table to display.
        name: String,
    },
    /// List the learn records defined by the program.
    Learns {
        #[structopt(short = "p")]
        /// Display the data in a parseable format rather then user-friendly.
        parseable: bool,
    },
    /// Display the fields of a learn record.
    Learn {
        #[structopt(short = "p")]
        /// Display the data in a parseable format rather then user-friendly.
        parseable: bool,
        /// The name of the learn record to display.
        name: String,
    },
    /// Convert a value into the byte stream stored in a field.
    Encode(codec::Encode),
    /// Convert the byte stream stored in a field into a value.
    Decode(codec::Decode),
}

fn load_program(
    config: &config::Config,
    log: &slog::Logger,
) -> anyhow::Result<TdiInfo> {
    let mapper = config
        .arch
        .mapper()
        .context("failed to build the enum mapper")?;
    let mut parser = TdiInfoParser::new(mapper, log);
    parser
        .parse_tdi_info(&config.schema_files)
        .context("failed to load the tdi schema")?;
    for name in parser.failed_tables() {
        eprintln!("warning: table {name} could not be parsed");
    }

    let info = TdiInfo::new(
        &config.p4_name,
        parser,
        config.arch.factory().as_ref(),
        log,
    );
    info!(log, "loaded program";
        "arch" => %config.arch,
        "tables" => info.tables_get().len(),
        "learns" => info.learns_get().len());
    Ok(info)
}

fn main() -> anyhow::Result<()> {
    let opts = Opt::from_args();
    let config = config::build_config(&opts)?;

    let log = match &config.log_file {
        Some(_) => common::logging::init(
            "tdictl",
            &config.log_file,
            config.log_format,
        )?,
        None => slog::Logger::root(slog::Discard, o!()),
    };
    let info = load_program(&config, &log)?;

    match opts.cmd {
        Commands::Tables { parseable } => table::table_list(&info, parseable),
        Commands::Table {
            action,
            parseable,
            name,
        } => table::table_dump(&info, &name, action, parseable),
        Commands::Learns { parseable } => learn::learn_list(&info, parseable),
        Commands::Learn { parseable, name } => {
            learn::learn_dump(&info, &name, parseable)
        }
        Commands::Encode(e) => codec::encode(&info, e),
        Commands::Decode(d) => codec::decode(&info, d),
    }
}
