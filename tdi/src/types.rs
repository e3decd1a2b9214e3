// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::collections::BTreeMap;
use std::fmt;

/// The semantic type of a key or data field.  The discriminants match the
/// values used by the driver's C interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[repr(u32)]
pub enum FieldDataType {
    IntArr = 0,
    BoolArr = 1,
    Uint64 = 2,
    ByteStream = 3,
    Float = 4,
    Container = 5,
    String = 6,
    Bool = 7,
    StringArr = 8,
    Int64 = 9,
    Unknown = 10,
}

// Table, match, operations and attribute types are open-ended: the core
// reserves the values below ARCH, an architecture the values below DEVICE,
// and a device target everything above.  Each is represented as a bare
// value with named constants for the ranges.
macro_rules! open_enum {
    ($(#[$m:meta])* $name:ident, $core:expr, $arch:expr, $device:expr) => {
        $(#[$m])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
        )]
        pub struct $name(pub u32);

        impl $name {
            pub const CORE: $name = $name($core);
            pub const ARCH: $name = $name($arch);
            pub const DEVICE: $name = $name($device);

            pub fn value(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                $name(v)
            }
        }
    };
}

open_enum!(
    /// The kind of a table, e.g. a match-action table or a counter.
    TableType,
    0x0000,
    0x0080,
    0x0800
);
open_enum!(
    /// How a key field is matched against a lookup value.
    MatchType,
    0x00,
    0x08,
    0x80
);
open_enum!(
    /// An operation a table supports beyond the basic entry APIs.
    OperationsType,
    0x00,
    0x08,
    0x80
);
open_enum!(
    /// An attribute a table exposes.
    AttributesType,
    0x00,
    0x08,
    0x80
);

impl MatchType {
    pub const EXACT: MatchType = MatchType::CORE;
    pub const TERNARY: MatchType = MatchType(1);
    pub const LPM: MatchType = MatchType(2);
    pub const RANGE: MatchType = MatchType(3);
    pub const OPTIONAL: MatchType = MatchType(4);

    pub const ATCAM: MatchType = MatchType::ARCH;
    pub const TNA_RANGE: MatchType = MatchType(0x09);
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MatchType::EXACT => write!(f, "Exact"),
            MatchType::TERNARY => write!(f, "Ternary"),
            MatchType::LPM => write!(f, "LPM"),
            MatchType::RANGE => write!(f, "Range"),
            MatchType::OPTIONAL => write!(f, "Optional"),
            MatchType::ATCAM => write!(f, "ATCAM"),
            MatchType::TNA_RANGE => write!(f, "TnaRange"),
            MatchType(x) => write!(f, "{x:#04x}"),
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl fmt::Display for OperationsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl fmt::Display for AttributesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// The entry-level APIs a table may implement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[repr(u32)]
pub enum TableApiType {
    Add = 0,
    Modify = 1,
    ModifyInc = 2,
    Delete = 3,
    Clear = 4,
    DefaultEntrySet = 5,
    DefaultEntryModify = 6,
    DefaultEntryReset = 7,
    DefaultEntryGet = 8,
    Get = 9,
    GetFirst = 10,
    GetNextN = 11,
    UsageGet = 12,
    SizeGet = 13,
    GetByHandle = 14,
    KeyGet = 15,
    HandleGet = 16,
    InvalidApi = 17,
}

/// The APIs a table supports, each with the names of the target attributes
/// that API honors.
pub type SupportedApis = BTreeMap<TableApiType, Vec<String>>;
