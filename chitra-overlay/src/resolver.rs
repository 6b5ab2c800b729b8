//! Overlay value extraction from heterogeneous structure records.
//!
//! Given a query and a collection of records, [`resolve_overlay_values`]
//! produces the flat value sequence that heatmap and colorbar rendering
//! consume. Records whose features do not match the query path contribute
//! nothing; this is a deliberate tolerance policy for real-world annotation
//! data where partial and missing features are expected, not exceptional.
//! Do not convert the skip paths into errors.
//!
//! Two sentinel outputs are distinguishable from a skip:
//!
//! - a queried category that is *absent* from a present mapping contributes
//!   the literal `0` ("not present", visible in the output length),
//! - a flat categorical tag that *contains* the queried value contributes the
//!   literal `1`. This is presence counting: `{"Cell Type": "POD"}` queried
//!   with value `POD` counts one occurrence. Callers selecting a
//!   non-counting feature through this path will silently get counts, so
//!   pick query values that only target flat tags when counting is wanted.

use crate::query::OverlayQuery;
use crate::record::{FeatureValue, StructureRecord, ValueShape};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One extracted overlay value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    /// Numeric contribution. All numbers are carried as `f64`.
    Number(f64),
    /// Categorical contribution (string passed through unchanged).
    Text(String),
}

impl ResolvedValue {
    /// Numeric value, if this contribution is a number.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResolvedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String value, if this contribution is text.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResolvedValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Extract overlay values for one query across a record collection.
///
/// Resolution is evaluated per record and short-circuits at the first failing
/// condition; a non-matching record contributes nothing rather than erroring.
/// See the module docs for the `0` and `1` sentinel cases.
///
/// When the query uses the `"max"` sentinel, the returned winning keys are
/// sorted ascending before being returned, regardless of record order.
/// Display grouping downstream relies on this ordering, so it is preserved
/// exactly; do not treat it as a general ordering guarantee for other query
/// kinds, which stay in record order.
pub fn resolve_overlay_values(
    records: &[StructureRecord],
    query: &OverlayQuery,
) -> Vec<ResolvedValue> {
    let Some(name) = query.name.as_deref() else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for record in records {
        let Some(node) = record.get(name) else {
            continue;
        };
        resolve_record(node, query, &mut values);
    }

    if query.is_max() {
        sort_natural(&mut values);
    }

    values
}

/// Resolve one record's feature node, pushing at most one contribution.
fn resolve_record(node: &FeatureValue, query: &OverlayQuery, out: &mut Vec<ResolvedValue>) {
    let Some(value_key) = query.value.as_deref() else {
        // No value key: the node is used directly. A mapping is ambiguous
        // without a category, so it contributes nothing.
        if let Some(v) = scalar_contribution(node) {
            out.push(v);
        }
        return;
    };

    if query.is_max() {
        // Dominant category: only defined over a category mapping.
        if let Some(entries) = node.as_map() {
            if let Some(key) = dominant_category(entries) {
                out.push(ResolvedValue::Text(key.to_string()));
            }
        }
        return;
    }

    match node {
        FeatureValue::Map(entries) => match entries.get(value_key) {
            Some(entry) => resolve_entry(entry, query, out),
            // Category absent from a present mapping: explicit "not
            // present" sentinel, distinguishable from a skip by length.
            None => out.push(ResolvedValue::Number(0.0)),
        },
        // Flat categorical tag: substring presence counts as one
        // occurrence, anything else as zero.
        FeatureValue::Text(tag) => {
            let count = if tag.contains(value_key) { 1.0 } else { 0.0 };
            out.push(ResolvedValue::Number(count));
        }
        FeatureValue::Number(_) => out.push(ResolvedValue::Number(0.0)),
    }
}

/// Resolve the entry found under the query's value key.
fn resolve_entry(entry: &FeatureValue, query: &OverlayQuery, out: &mut Vec<ResolvedValue>) {
    match entry.shape() {
        ValueShape::Scalar => {
            if let Some(v) = scalar_contribution(entry) {
                out.push(v);
            }
        }
        // Aggregated (or any nested) entry: a sub_value key is required to
        // disambiguate; without one, or with an unknown key, the branch
        // contributes nothing.
        ValueShape::Categorical | ValueShape::Aggregated => {
            let Some(sub_key) = query.sub_value.as_deref() else {
                return;
            };
            let Some(sub_entry) = entry.as_map().and_then(|m| m.get(sub_key)) else {
                return;
            };
            if let Some(v) = scalar_contribution(sub_entry) {
                out.push(v);
            }
        }
    }
}

/// Scalar leaf as a contribution: strings pass through, numbers become f64,
/// mappings yield nothing.
fn scalar_contribution(node: &FeatureValue) -> Option<ResolvedValue> {
    match node {
        FeatureValue::Number(n) => Some(ResolvedValue::Number(*n)),
        FeatureValue::Text(s) => Some(ResolvedValue::Text(s.clone())),
        FeatureValue::Map(_) => None,
    }
}

/// Key of the strictly greatest numeric value in a category mapping.
///
/// The running maximum starts at zero, so keys with non-positive values never
/// win and an all-nonpositive or empty mapping yields `None`. Ties keep the
/// first-seen maximum in the mapping's iteration order. Non-numeric entries
/// are skipped.
fn dominant_category(
    entries: &std::collections::BTreeMap<String, FeatureValue>,
) -> Option<&str> {
    let mut max_val = 0.0_f64;
    let mut max_key: Option<&str> = None;
    for (key, value) in entries {
        if let Some(n) = value.as_number() {
            if n > max_val {
                max_val = n;
                max_key = Some(key);
            }
        }
    }
    max_key
}

/// Ascending natural sort: numbers before text, numbers by magnitude, text
/// lexicographically.
fn sort_natural(values: &mut [ResolvedValue]) {
    values.sort_by(|a, b| match (a, b) {
        (ResolvedValue::Number(x), ResolvedValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (ResolvedValue::Text(x), ResolvedValue::Text(y)) => x.cmp(y),
        (ResolvedValue::Number(_), ResolvedValue::Text(_)) => Ordering::Less,
        (ResolvedValue::Text(_), ResolvedValue::Number(_)) => Ordering::Greater,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{MAX_SENTINEL, OverlayQuery};

    fn records_from_json(json: &str) -> Vec<StructureRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_null_name_matches_nothing() {
        let records = records_from_json(r#"[{"Area": 10.0}]"#);
        let query = OverlayQuery::default();
        assert!(resolve_overlay_values(&records, &query).is_empty());
    }

    #[test]
    fn test_missing_name_skips_record() {
        let records = records_from_json(r#"[{"Area": 10.0}, {"Perimeter": 4.0}]"#);
        let query = OverlayQuery::name("Area");
        let values = resolve_overlay_values(&records, &query);
        // One record matched, the other contributed nothing.
        assert_eq!(values, vec![ResolvedValue::Number(10.0)]);
    }

    #[test]
    fn test_direct_scalar_number_and_text() {
        let records = records_from_json(r#"[{"Area": 10}, {"Area": "large"}]"#);
        let query = OverlayQuery::name("Area");
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(
            values,
            vec![
                ResolvedValue::Number(10.0),
                ResolvedValue::Text("large".to_string())
            ]
        );
    }

    #[test]
    fn test_direct_mapping_is_ambiguous() {
        let records = records_from_json(r#"[{"Main_Cell_Types": {"POD": 0.6}}]"#);
        let query = OverlayQuery::name("Main_Cell_Types");
        assert!(resolve_overlay_values(&records, &query).is_empty());
    }

    #[test]
    fn test_categorical_lookup() {
        let records =
            records_from_json(r#"[{"Main_Cell_Types": {"POD": 0.6, "EC": 0.4}}]"#);
        let query = OverlayQuery::name("Main_Cell_Types").value("POD");
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(values, vec![ResolvedValue::Number(0.6)]);
    }

    #[test]
    fn test_absent_category_contributes_zero() {
        let records = records_from_json(r#"[{"Main_Cell_Types": {"POD": 0.6}}]"#);
        let query = OverlayQuery::name("Main_Cell_Types").value("MES");
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(values, vec![ResolvedValue::Number(0.0)]);
    }

    #[test]
    fn test_aggregated_sub_value() {
        let records = records_from_json(
            r#"[{"Cell_States": {"POD": {"resting": 4, "injured": 2}}}]"#,
        );
        let query = OverlayQuery::name("Cell_States").value("POD").sub_value("injured");
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(values, vec![ResolvedValue::Number(2.0)]);
    }

    #[test]
    fn test_aggregated_without_sub_value_skips() {
        let records =
            records_from_json(r#"[{"Cell_States": {"POD": {"resting": 4}}}]"#);
        let query = OverlayQuery::name("Cell_States").value("POD");
        assert!(resolve_overlay_values(&records, &query).is_empty());
    }

    #[test]
    fn test_aggregated_unknown_sub_value_skips() {
        let records =
            records_from_json(r#"[{"Cell_States": {"POD": {"resting": 4}}}]"#);
        let query = OverlayQuery::name("Cell_States").value("POD").sub_value("missing");
        assert!(resolve_overlay_values(&records, &query).is_empty());
    }

    #[test]
    fn test_aggregated_text_sub_value_passes_through() {
        let records =
            records_from_json(r#"[{"Cell_States": {"POD": {"phase": "resting"}}}]"#);
        let query = OverlayQuery::name("Cell_States").value("POD").sub_value("phase");
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(values, vec![ResolvedValue::Text("resting".to_string())]);
    }

    #[test]
    fn test_flat_tag_presence_counts_one() {
        let records = records_from_json(r#"[{"Cell Type": "POD"}]"#);
        let query = OverlayQuery::name("Cell Type").value("POD");
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(values, vec![ResolvedValue::Number(1.0)]);
    }

    #[test]
    fn test_flat_tag_absence_counts_zero() {
        let records = records_from_json(r#"[{"Cell Type": "POD"}]"#);
        let query = OverlayQuery::name("Cell Type").value("EC");
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(values, vec![ResolvedValue::Number(0.0)]);
    }

    #[test]
    fn test_max_picks_dominant_key() {
        let records = records_from_json(
            r#"[{"Main_Cell_Types": {"POD": 0.2, "EC": 0.7, "MES": 0.1}}]"#,
        );
        let query = OverlayQuery::name("Main_Cell_Types").value(MAX_SENTINEL);
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(values, vec![ResolvedValue::Text("EC".to_string())]);
    }

    #[test]
    fn test_max_results_sorted_ascending() {
        // Winners arrive in record order EC, DT, POD; output must be sorted.
        let records = records_from_json(
            r#"[
                {"Main_Cell_Types": {"POD": 0.2, "EC": 0.7}},
                {"Main_Cell_Types": {"DT": 0.9, "EC": 0.1}},
                {"Main_Cell_Types": {"POD": 0.8}}
            ]"#,
        );
        let query = OverlayQuery::name("Main_Cell_Types").value(MAX_SENTINEL);
        let values = resolve_overlay_values(&records, &query);
        let keys: Vec<&str> = values.iter().filter_map(ResolvedValue::as_text).collect();
        assert_eq!(keys, vec!["DT", "EC", "POD"]);
    }

    #[test]
    fn test_max_empty_mapping_contributes_nothing() {
        let records = records_from_json(r#"[{"Main_Cell_Types": {}}]"#);
        let query = OverlayQuery::name("Main_Cell_Types").value(MAX_SENTINEL);
        assert!(resolve_overlay_values(&records, &query).is_empty());
    }

    #[test]
    fn test_max_all_nonpositive_contributes_nothing() {
        let records =
            records_from_json(r#"[{"Main_Cell_Types": {"POD": 0.0, "EC": -1.0}}]"#);
        let query = OverlayQuery::name("Main_Cell_Types").value(MAX_SENTINEL);
        assert!(resolve_overlay_values(&records, &query).is_empty());
    }

    #[test]
    fn test_max_tie_keeps_first_seen() {
        let records =
            records_from_json(r#"[{"Main_Cell_Types": {"EC": 0.5, "POD": 0.5}}]"#);
        let query = OverlayQuery::name("Main_Cell_Types").value(MAX_SENTINEL);
        let values = resolve_overlay_values(&records, &query);
        // BTreeMap iteration visits EC first; the tie keeps it.
        assert_eq!(values, vec![ResolvedValue::Text("EC".to_string())]);
    }

    #[test]
    fn test_max_on_scalar_node_contributes_nothing() {
        let records = records_from_json(r#"[{"Main_Cell_Types": "POD"}]"#);
        let query = OverlayQuery::name("Main_Cell_Types").value(MAX_SENTINEL);
        assert!(resolve_overlay_values(&records, &query).is_empty());
    }

    #[test]
    fn test_mixed_shapes_across_records() {
        // The same feature name with different shapes per record; each record
        // resolves independently.
        let records = records_from_json(
            r#"[
                {"Main_Cell_Types": {"POD": 0.6}},
                {"Main_Cell_Types": "POD"},
                {"Other": 1.0}
            ]"#,
        );
        let query = OverlayQuery::name("Main_Cell_Types").value("POD");
        let values = resolve_overlay_values(&records, &query);
        assert_eq!(
            values,
            vec![ResolvedValue::Number(0.6), ResolvedValue::Number(1.0)]
        );
    }
}
