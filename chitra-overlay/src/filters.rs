//! Filter specification compilation from UI control state.
//!
//! The viewer renders one filter control per selectable feature; controls for
//! features absent from the current slide are hidden rather than removed, so
//! the callback payload always carries three aligned sequences: field keys,
//! visibility styles, and selected ranges. [`compile_filters`] walks them in
//! lockstep and emits one [`FilterSpec`] per *visible* control, silently
//! skipping hidden indices. Output order matches input order; nothing is
//! deduplicated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::{MAIN_CELL_TYPES_KEY, MAX_CELL_TYPE_ALIAS, MAX_SENTINEL, OverlayQuery};
use crate::resolver::ResolvedValue;

/// Delimiter for two-part field keys (`"<name> --> <value>"`).
const KEY_DELIMITER: &str = " --> ";

/// Visibility-bearing style of one UI filter control.
///
/// Only the display attribute matters here: a `None` display means the
/// control is hidden and its index is skipped during compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStyle {
    /// CSS display attribute; `None` marks a hidden control.
    #[serde(default)]
    pub display: Option<String>,
}

impl ControlStyle {
    /// Style for a visible control.
    pub fn visible() -> Self {
        Self {
            display: Some("inline-block".to_string()),
        }
    }

    /// Style for a hidden control.
    pub fn hidden() -> Self {
        Self { display: None }
    }

    /// Whether the control is visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.display.is_some()
    }
}

/// UI-selected bound attached to a compiled filter.
///
/// Numeric features carry a slider pair, categorical features carry the
/// accepted category set; both arrive as untyped JSON and are told apart by
/// shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterRange {
    /// Inclusive `[min, max]` slider bounds.
    Bounds([f64; 2]),
    /// Accepted category set.
    Categories(Vec<String>),
}

impl FilterRange {
    /// Whether a resolved value falls inside this range.
    ///
    /// Numeric bounds are inclusive on both ends and reject text values;
    /// category sets use exact membership and reject numbers.
    pub fn accepts(&self, value: &ResolvedValue) -> bool {
        match (self, value) {
            (FilterRange::Bounds([lo, hi]), ResolvedValue::Number(n)) => {
                *lo <= *n && *n <= *hi
            }
            (FilterRange::Categories(allowed), ResolvedValue::Text(s)) => {
                allowed.iter().any(|c| c == s)
            }
            _ => false,
        }
    }
}

/// A compiled filter: an overlay query plus the inclusion range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Top-level feature name.
    pub name: String,
    /// Category key or the `"max"` sentinel.
    pub value: Option<String>,
    /// Sub-feature key; the compiler never sets one.
    pub sub_value: Option<String>,
    /// UI-selected bound used downstream to include/exclude structures.
    pub range: FilterRange,
}

impl FilterSpec {
    /// The extraction query this filter selects values with.
    pub fn query(&self) -> OverlayQuery {
        OverlayQuery {
            name: Some(self.name.clone()),
            value: self.value.clone(),
            sub_value: self.sub_value.clone(),
        }
    }
}

/// Compile aligned key/style/range sequences into filter specifications.
///
/// Hidden indices (null display) are skipped without error. Field keys may
/// encode a two-part path as `"<name> --> <value>"`; a bare key leaves the
/// value unset. The `"Max Cell Type"` alias rewrites to a dominant-category
/// query before value substitution. When a display-name lookup table is
/// supplied, a value found in it is translated to the internal storage key;
/// unknown values pass through raw.
///
/// The three sequences are walked in lockstep up to the shortest length.
pub fn compile_filters(
    keys: &[String],
    styles: &[ControlStyle],
    ranges: &[FilterRange],
    name_lookup: Option<&BTreeMap<String, String>>,
) -> Vec<FilterSpec> {
    let mut specs = Vec::new();

    for ((key, style), range) in keys.iter().zip(styles).zip(ranges) {
        if !style.is_visible() {
            continue;
        }

        let (mut name, mut value) = match key.split_once(KEY_DELIMITER) {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (key.clone(), None),
        };

        if name == MAX_CELL_TYPE_ALIAS {
            name = MAIN_CELL_TYPES_KEY.to_string();
            value = Some(MAX_SENTINEL.to_string());
        }

        if let (Some(lookup), Some(raw)) = (name_lookup, value.as_ref()) {
            if let Some(internal) = lookup.get(raw) {
                value = Some(internal.clone());
            }
        }

        specs.push(FilterSpec {
            name,
            value,
            sub_value: None,
            range: range.clone(),
        });
    }

    specs
}

/// A pattern-matched UI callback value: either a bare value or a list with
/// at most one meaningful element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternValue<T> {
    /// Bare value.
    One(T),
    /// List form produced by pattern-matching component ids.
    Many(Vec<T>),
}

/// Collapse a pattern-matched callback payload to a single optional value.
///
/// List payloads yield their first element; empty lists and missing payloads
/// yield `None`.
pub fn pattern_matching_value<T>(input: Option<PatternValue<T>>) -> Option<T> {
    match input? {
        PatternValue::One(value) => Some(value),
        PatternValue::Many(values) => values.into_iter().next(),
    }
}
