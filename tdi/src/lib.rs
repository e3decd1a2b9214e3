// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

//! Metadata model for the Table Driver Interface.
//!
//! A P4 compiler emits one or more json schema documents describing the
//! tables, keys, actions, data fields and learn records of a program.  This
//! crate parses those documents into an immutable object model and provides
//! the bit-precise marshalling helpers needed to hand key and data values to
//! a driver.

use std::fmt;

use thiserror::Error;

mod annotation;
pub use annotation::*;

mod types;
pub use types::*;

pub mod field_utils;
pub mod mapper;
pub mod schema;
pub mod targets;

mod field_width;
mod info;
mod learn_info;
mod parser;
mod table_info;
mod tdi_info;

pub use field_width::FieldWidthSpec;
pub use info::*;
pub use learn_info::LearnInfo;
pub use mapper::InfoMapper;
pub use parser::TdiInfoParser;
pub use table_info::TableInfo;
pub use tdi_info::DefaultFactory;
pub use tdi_info::TableFactory;
pub use tdi_info::TdiInfo;

/// Identifier of a table, field, action or learn object.
pub type TdiId = u32;

/// A specialized Result type for TDI operations
pub type TdiResult<T> = Result<T, TdiError>;

/// Error type conveying additional information about TDI errors
#[derive(Error, Debug)]
pub enum TdiError {
    /// An argument passed to the library is invalid or inappropriate.  This
    /// indicates misbehavior from the caller.
    #[error("Invalid argument: {}", .0)]
    InvalidArg(String),
    /// A table, field, action or learn object could not be resolved.
    #[error("Object not found: {}", .0)]
    ObjectNotFound(String),
    /// The operation isn't applicable to the object it was invoked on.
    #[error("Operation not supported: {}", .0)]
    NotSupported(String),
    /// An object with this name or id has already been registered.
    #[error("Already exists: {}", .0)]
    AlreadyExists(String),
    /// A schema document couldn't be read.
    #[error("IO error: {ctx}: {err:?}")]
    Io { ctx: String, err: std::io::Error },
    /// A schema document couldn't be parsed.
    #[error("Malformed json: {ctx}: {err}")]
    Json { ctx: String, err: serde_json::Error },
    /// The library detected some internal inconsistency
    #[error("Internal error: {}", .0)]
    Internal(String),
}

impl TdiError {
    /// The status code a C caller would have seen for this error.
    pub fn status(&self) -> Status {
        match self {
            TdiError::InvalidArg(_) => Status::InvalidArg,
            TdiError::ObjectNotFound(_) => Status::ObjectNotFound,
            TdiError::NotSupported(_) => Status::NotSupported,
            TdiError::AlreadyExists(_) => Status::AlreadyExists,
            TdiError::Io { .. } => Status::ObjectNotFound,
            TdiError::Json { .. } => Status::InvalidArg,
            TdiError::Internal(_) => Status::InternalError,
        }
    }
}

/// Status codes returned across the driver's C boundary.  The discriminants
/// are part of that ABI and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    NotReady,
    NoSysResources,
    InvalidArg,
    AlreadyExists,
    HwCommFail,
    ObjectNotFound,
    MaxSessionsExceeded,
    SessionNotFound,
    NoSpace,
    Eagain,
    InitError,
    TxnNotSupported,
    TableLocked,
    Io,
    Unexpected,
    EntryReferencesExist,
    NotSupported,
    HwUpdateFailed,
    NoLearnClients,
    IdleUpdateInProgress,
    DeviceLocked,
    InternalError,
    TableNotFound,
    InUse,
    NotImplemented,
}

const ALL_STATUS: [Status; 26] = [
    Status::Success,
    Status::NotReady,
    Status::NoSysResources,
    Status::InvalidArg,
    Status::AlreadyExists,
    Status::HwCommFail,
    Status::ObjectNotFound,
    Status::MaxSessionsExceeded,
    Status::SessionNotFound,
    Status::NoSpace,
    Status::Eagain,
    Status::InitError,
    Status::TxnNotSupported,
    Status::TableLocked,
    Status::Io,
    Status::Unexpected,
    Status::EntryReferencesExist,
    Status::NotSupported,
    Status::HwUpdateFailed,
    Status::NoLearnClients,
    Status::IdleUpdateInProgress,
    Status::DeviceLocked,
    Status::InternalError,
    Status::TableNotFound,
    Status::InUse,
    Status::NotImplemented,
];

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| ALL_STATUS.get(idx).copied())
    }

    pub fn message(self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::NotReady => "Not ready",
            Status::NoSysResources => "No system resources",
            Status::InvalidArg => "Invalid arguments",
            Status::AlreadyExists => "Already exists",
            Status::HwCommFail => "HW access fails",
            Status::ObjectNotFound => "Object not found",
            Status::MaxSessionsExceeded => "Max sessions exceeded",
            Status::SessionNotFound => "Session not found",
            Status::NoSpace => "Not enough space",
            Status::Eagain => {
                "Resource temporarily not available, try again later"
            }
            Status::InitError => "Initialization error",
            Status::TxnNotSupported => "Not supported in transaction",
            Status::TableLocked => "Resource held by another session",
            Status::Io => "IO error",
            Status::Unexpected => "Unexpected error",
            Status::EntryReferencesExist => {
                "Action data entry is being referenced by match entries"
            }
            Status::NotSupported => "Operation not supported",
            Status::HwUpdateFailed => "Updating hardware failed",
            Status::NoLearnClients => "No learning clients registered",
            Status::IdleUpdateInProgress => {
                "Idle time update state already in progress"
            }
            Status::DeviceLocked => "Device locked",
            Status::InternalError => "Internal error",
            Status::TableNotFound => "Table not found",
            Status::InUse => "In use",
            Status::NotImplemented => "Object not implemented",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Render a raw status code the way the driver's error-string table does,
/// including its catch-all for codes it doesn't recognize.
pub fn err_str(code: i32) -> &'static str {
    match Status::from_code(code) {
        Some(s) => s.message(),
        None => "Unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        for (idx, s) in ALL_STATUS.iter().enumerate() {
            assert_eq!(s.code(), idx as i32);
            assert_eq!(Status::from_code(idx as i32), Some(*s));
        }
        assert_eq!(Status::NotImplemented.code(), 25);
        assert_eq!(Status::from_code(26), None);
        assert_eq!(Status::from_code(-1), None);
    }

    #[test]
    fn test_err_str() {
        assert_eq!(err_str(0), "Success");
        assert_eq!(err_str(6), "Object not found");
        assert_eq!(err_str(1000), "Unknown error");
        assert_eq!(Status::InvalidArg.to_string(), "Invalid arguments");
    }

    #[test]
    fn test_error_status() {
        let e = TdiError::Io {
            ctx: "reading schema".to_string(),
            err: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(e.status(), Status::ObjectNotFound);
        assert_eq!(
            TdiError::InvalidArg("x".into()).status(),
            Status::InvalidArg
        );
        assert_eq!(
            TdiError::Internal("x".into()).status(),
            Status::InternalError
        );
    }
}
