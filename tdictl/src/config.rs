// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

//! Configuration for tdictl.

use std::fmt;
use std::str::FromStr;

use tdi::mapper::EnumMapper;
use tdi::targets::dummy;
use tdi::DefaultFactory;
use tdi::InfoMapper;
use tdi::TableFactory;
use tdi::TdiResult;

/// Environment variable holding a colon-separated list of schema files,
/// consulted when none are given on the command line.
pub(crate) const SCHEMA_FILES_ENV: &str = "TDI_SCHEMA_FILES";

/// The architecture a P4 program was compiled for.  This selects how the
/// type names in its schema are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arch {
    Core,
    Tna,
    Pna,
    Dummy,
}

impl Arch {
    pub fn mapper(&self) -> TdiResult<Box<dyn InfoMapper>> {
        Ok(match self {
            Arch::Core => Box::new(EnumMapper::core()),
            Arch::Tna => Box::new(EnumMapper::tna()),
            Arch::Pna => Box::new(EnumMapper::pna()),
            Arch::Dummy => Box::new(dummy::mapper()?),
        })
    }

    pub fn factory(&self) -> Box<dyn TableFactory> {
        match self {
            Arch::Dummy => Box::new(dummy::Factory),
            _ => Box::new(DefaultFactory),
        }
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "core" => Ok(Arch::Core),
            "tna" => Ok(Arch::Tna),
            "pna" => Ok(Arch::Pna),
            "dummy" => Ok(Arch::Dummy),
            _ => Err(format!("invalid architecture: {s}")),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arch::Core => "core",
            Arch::Tna => "tna",
            Arch::Pna => "pna",
            Arch::Dummy => "dummy",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug)]
pub struct Config {
    /// If set, where the log should be written.  If not set, nothing is
    /// logged.
    pub log_file: Option<String>,

    /// Output log info in unstructured text or json?
    pub log_format: common::logging::LogFormat,

    /// The schema documents describing the program, loaded in order.
    pub schema_files: Vec<String>,

    /// Architecture the program was compiled for.
    pub arch: Arch,

    /// Name of the P4 program.
    pub p4_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_file: None,
            log_format: common::logging::LogFormat::Human,
            schema_files: Vec::new(),
            arch: Arch::Tna,
            p4_name: "$SHARED".to_string(),
        }
    }
}

// Pick up the schema files from the environment.  An unset or empty
// variable leaves the config alone.
fn update_from_env(config: &mut Config) {
    if let Ok(list) = std::env::var(SCHEMA_FILES_ENV) {
        config.schema_files = list
            .split(':')
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
    }
}

// Use the command-line arguments to update the run-time config.
fn update_from_cli(opts: &crate::Opt, config: &mut Config) {
    if let Some(log_file) = &opts.log_file {
        config.log_file = Some(log_file.to_string());
    }

    if let Some(log_format) = opts.log_format {
        config.log_format = log_format;
    }

    if !opts.schema.is_empty() {
        config.schema_files = opts.schema.clone();
    }

    if let Some(arch) = opts.arch {
        config.arch = arch;
    }

    if let Some(p4_name) = &opts.p4_name {
        config.p4_name = p4_name.to_string();
    }
}

/// Build the config from the defaults, then the environment, then the
/// command line.  At least one schema file must be named by the
/// environment or the command line.
pub(crate) fn build_config(opts: &crate::Opt) -> anyhow::Result<Config> {
    let mut config = Config::default();
    update_from_env(&mut config);
    update_from_cli(opts, &mut config);

    if config.schema_files.is_empty() {
        anyhow::bail!(
            "no schema files: use --schema or set {SCHEMA_FILES_ENV}"
        );
    }
    Ok(config)
}
