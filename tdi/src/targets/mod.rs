// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

//! Device targets: the table types a target names in its schema documents,
//! and the [`crate::TableFactory`] that decides which tables it implements.

pub mod dummy;
