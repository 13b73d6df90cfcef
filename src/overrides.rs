//! Fixed answers for high-frequency names, consulted before the model.

use crate::Gender;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Confidence reported for every override hit.
pub const OVERRIDE_CONFIDENCE: f64 = 95.0;

static ENTRIES: &[(&str, Gender)] = &[("john", Gender::Male), ("mary", Gender::Female)];

static TABLE: LazyLock<HashMap<&'static str, Gender>> =
    LazyLock::new(|| ENTRIES.iter().copied().collect());

/// Looks up an already normalized name.
pub fn lookup(name: &str) -> Option<Gender> {
    TABLE.get(name).copied()
}

pub fn entries() -> &'static [(&'static str, Gender)] {
    ENTRIES
}
