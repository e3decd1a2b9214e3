// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::fmt;
use std::fs::File;
use std::fs::OpenOptions;
use std::str::FromStr;

use anyhow::Context;
use slog::o;
use slog::Drain;

// Number of records the async drain will buffer before it starts dropping.
const CHANNEL_SIZE: usize = 0x2000;

/// The format in which log records are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Unstructured, human-readable text.
    Human,
    /// Bunyan-style json, one record per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "h" | "human" => Ok(LogFormat::Human),
            "j" | "json" => Ok(LogFormat::Json),
            _ => Err(format!("invalid log format: {s}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

fn open_log(path: &str) -> anyhow::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {path}"))
}

fn async_root<D>(drain: D, name: &str) -> slog::Logger
where
    D: Drain<Ok = (), Err = slog::Never> + Send + 'static,
{
    let drain = slog_async::Async::new(drain)
        .chan_size(CHANNEL_SIZE)
        .build()
        .fuse();
    slog::Logger::root(drain, o!("unit" => name.to_string()))
}

/// Build the root logger for a component.  If `log_file` is set, records are
/// appended to that file.  Otherwise they are written to stdout.
pub fn init(
    name: &str,
    log_file: &Option<String>,
    log_format: LogFormat,
) -> anyhow::Result<slog::Logger> {
    let log = match (log_file, log_format) {
        (Some(path), LogFormat::Human) => {
            let decorator = slog_term::PlainDecorator::new(open_log(path)?);
            let drain = slog_term::FullFormat::new(decorator).build().fuse();
            async_root(drain, name)
        }
        (Some(path), LogFormat::Json) => {
            let drain = slog_bunyan::new(open_log(path)?).build().fuse();
            async_root(drain, name)
        }
        (None, LogFormat::Human) => {
            let decorator = slog_term::PlainDecorator::new(std::io::stdout());
            let drain = slog_term::FullFormat::new(decorator).build().fuse();
            async_root(drain, name)
        }
        (None, LogFormat::Json) => {
            let drain = slog_bunyan::new(std::io::stdout()).build().fuse();
            async_root(drain, name)
        }
    };

    Ok(log)
}
