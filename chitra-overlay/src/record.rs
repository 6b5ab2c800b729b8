//! Structure feature records and traversal-time shape classification.
//!
//! Segmentation pipelines attach feature payloads to each structure, but no
//! canonical schema exists across datasets. Three shapes occur in the wild
//! for a single feature name:
//!
//! - **Scalar**: `{"Area": 812.5}` or `{"Cell Type": "POD"}`
//! - **Categorical**: `{"Main_Cell_Types": {"POD": 0.6, "EC": 0.4}}`
//! - **Aggregated**: counts or statistics per category, one level deeper:
//!   `{"Cell_States": {"POD": {"resting": 4, "injured": 2}}}`
//!
//! Aggregated shapes appear when a parent structure rolls up annotations from
//! the structures it contains. Consumers cannot know ahead of time which
//! shape a given record uses, so [`FeatureValue::shape`] classifies each node
//! while it is being traversed and the resolver branches on the result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One node in a feature payload tree.
///
/// Deserializes directly from annotation JSON: numbers and strings are
/// leaves, objects are nested mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric leaf. Integer and floating-point annotations both land here.
    Number(f64),
    /// String leaf (categorical tag).
    Text(String),
    /// Nested mapping keyed by category or sub-feature name.
    Map(BTreeMap<String, FeatureValue>),
}

/// Shape of a feature node, decided at traversal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Single number or string.
    Scalar,
    /// Mapping of category to scalar.
    Categorical,
    /// Mapping of category to a nested sub-feature mapping.
    Aggregated,
}

impl FeatureValue {
    /// Classify this node into one of the three recognized shapes.
    ///
    /// A mapping counts as [`ValueShape::Aggregated`] when any of its entries
    /// is itself a mapping; mixed shapes are treated as aggregated so the
    /// resolver applies the stricter sub-value rules.
    pub fn shape(&self) -> ValueShape {
        match self {
            FeatureValue::Number(_) | FeatureValue::Text(_) => ValueShape::Scalar,
            FeatureValue::Map(entries) => {
                if entries
                    .values()
                    .any(|v| matches!(v, FeatureValue::Map(_)))
                {
                    ValueShape::Aggregated
                } else {
                    ValueShape::Categorical
                }
            }
        }
    }

    /// Numeric leaf value, if this node is a number.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String leaf value, if this node is text.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Nested mapping, if this node is one.
    #[inline]
    pub fn as_map(&self) -> Option<&BTreeMap<String, FeatureValue>> {
        match self {
            FeatureValue::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        FeatureValue::Number(n)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

/// Feature annotations for one segmented structure.
///
/// Records are read-only to every operation in this crate; resolvers return
/// newly allocated values and never mutate the record in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureRecord {
    features: BTreeMap<String, FeatureValue>,
}

impl StructureRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a feature by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// Whether the record carries the named feature.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Insert a feature, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.features.insert(name.into(), value.into());
    }

    /// Number of features in the record.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the record has no features at all.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over feature names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureValue)> {
        self.features.iter()
    }
}

impl FromIterator<(String, FeatureValue)> for StructureRecord {
    fn from_iter<I: IntoIterator<Item = (String, FeatureValue)>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_scalar() {
        assert_eq!(FeatureValue::Number(3.5).shape(), ValueShape::Scalar);
        assert_eq!(FeatureValue::from("POD").shape(), ValueShape::Scalar);
    }

    #[test]
    fn test_shape_categorical() {
        let value: FeatureValue =
            serde_json::from_str(r#"{"POD": 0.6, "EC": 0.4}"#).unwrap();
        assert_eq!(value.shape(), ValueShape::Categorical);
    }

    #[test]
    fn test_shape_aggregated() {
        let value: FeatureValue =
            serde_json::from_str(r#"{"POD": {"resting": 4, "injured": 2}}"#).unwrap();
        assert_eq!(value.shape(), ValueShape::Aggregated);
    }

    #[test]
    fn test_mixed_mapping_is_aggregated() {
        // One nested entry is enough to trigger the stricter rules.
        let value: FeatureValue =
            serde_json::from_str(r#"{"POD": 0.6, "EC": {"count": 2}}"#).unwrap();
        assert_eq!(value.shape(), ValueShape::Aggregated);
    }

    #[test]
    fn test_record_round_trip() {
        let json = r#"{"Area": 812.5, "Cell Type": "POD"}"#;
        let record: StructureRecord = serde_json::from_str(json).unwrap();
        assert!(record.contains("Area"));
        assert_eq!(record.get("Area").and_then(FeatureValue::as_number), Some(812.5));
        assert_eq!(record.get("Cell Type").and_then(FeatureValue::as_text), Some("POD"));

        let back = serde_json::to_string(&record).unwrap();
        let again: StructureRecord = serde_json::from_str(&back).unwrap();
        assert_eq!(record, again);
    }
}
