// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A name/value tag attached to a table, field, action or learn object.
///
/// Annotations are identified by their full name, `name.value`.  Equality and
/// ordering use only that full name, so a set of annotations never holds two
/// entries that render identically.
#[derive(Debug, Clone)]
pub struct Annotation {
    name: String,
    value: String,
    full_name: String,
}

/// The annotations attached to a single object.
pub type Annotations = BTreeSet<Annotation>;

impl Annotation {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        let full_name = format!("{name}.{value}");
        Annotation {
            name,
            value,
            full_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for Annotation {}

impl PartialOrd for Annotation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Annotation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.full_name.cmp(&other.full_name)
    }
}

impl PartialEq<str> for Annotation {
    fn eq(&self, other: &str) -> bool {
        self.full_name == other
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let a = Annotation::new("isFieldSlice", "true");
        assert_eq!(a.full_name(), "isFieldSlice.true");
        assert_eq!(a.name(), "isFieldSlice");
        assert_eq!(a.value(), "true");
        assert!(a == *"isFieldSlice.true");
    }

    #[test]
    fn test_set_dedup() {
        let mut set = Annotations::new();
        assert!(set.insert(Annotation::new("$bfrt_field_class", "register")));
        assert!(!set.insert(Annotation::new("$bfrt_field_class", "register")));
        assert_eq!(set.len(), 1);

        // The full name is the identity, however it was split.
        let mut split = Annotations::new();
        split.insert(Annotation::new("a.b", "c"));
        assert!(!split.insert(Annotation::new("a", "b.c")));
        assert_eq!(split.len(), 1);
    }

    #[test]
    fn test_ordering() {
        let a = Annotation::new("a", "2");
        let b = Annotation::new("b", "1");
        assert!(a < b);
        assert_eq!(
            Annotation::new("x", "y").cmp(&Annotation::new("x", "y")),
            Ordering::Equal
        );
    }
}
