//! Overlay query path specification.
//!
//! An [`OverlayQuery`] selects a path into a structure record's feature tree:
//!
//! ```text
//! name                        {"Main_Cell_Types": ...}
//!  └─ value                       {"POD": ...}
//!       └─ sub_value                  {"resting": 4}
//! ```
//!
//! `value == "max"` is reserved: instead of a literal lookup it resolves to
//! the category key holding the greatest value in the mapping at `name`.

use serde::{Deserialize, Serialize};

/// Reserved `value` sentinel selecting the dominant category.
pub const MAX_SENTINEL: &str = "max";

/// UI-facing alias that the filter compiler rewrites to a dominant-category
/// query against [`MAIN_CELL_TYPES_KEY`].
pub const MAX_CELL_TYPE_ALIAS: &str = "Max Cell Type";

/// Storage key holding per-structure cell type fractions.
pub const MAIN_CELL_TYPES_KEY: &str = "Main_Cell_Types";

/// Path specification into a structure record.
///
/// Consumers exchange these as plain JSON objects with exactly these three
/// fields; there is no versioning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayQuery {
    /// Top-level feature name. A `None` name matches nothing.
    pub name: Option<String>,
    /// Category key inside the mapping at `name`, or the `"max"` sentinel.
    pub value: Option<String>,
    /// Sub-feature key for aggregated shapes.
    pub sub_value: Option<String>,
}

impl OverlayQuery {
    /// Query for a top-level feature used directly.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: None,
            sub_value: None,
        }
    }

    /// Attach a category value key.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach an aggregated sub-feature key.
    pub fn sub_value(mut self, sub_value: impl Into<String>) -> Self {
        self.sub_value = Some(sub_value.into());
        self
    }

    /// Whether this query uses the dominant-category sentinel.
    #[inline]
    pub fn is_max(&self) -> bool {
        self.value.as_deref() == Some(MAX_SENTINEL)
    }
}
