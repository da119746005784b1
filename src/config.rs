use serde::{Deserialize, Serialize};

/// How `TimeTable::load_from_xml_with` resolves ids that are not in the dataset.
///
/// Lenient loading (the default) drops events with unknown ids and treats
/// unknown rooms as unassigned. Strict loading fails instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub strict: bool,
}

impl LoadOptions {
    pub fn lenient() -> LoadOptions {
        LoadOptions { strict: false }
    }

    pub fn strict() -> LoadOptions {
        LoadOptions { strict: true }
    }
}
