//! GeoJSON point markers from bounding boxes.
//!
//! Each detected or selected structure is reported as a bounding box; the
//! imaging layer wants a point marker at the box centroid, both as GeoJSON
//! (for the map overlay) and as a UI marker descriptor (for the interactive
//! layer with its per-marker clear affordance).
//!
//! Coordinate order differs between the two outputs on purpose: GeoJSON
//! follows the `[x, y]` ("longitude, latitude") convention even though the
//! boxes live in image pixel space — consumers must not assume a CRS — while
//! marker descriptors use the `[row, col]` order the UI map widget expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// `[minx, miny, maxx, maxy]` bounding box in pixel coordinates.
pub type BoundingBox = [f64; 4];

/// Marker properties map, merged into each GeoJSON feature.
pub type Properties = Map<String, Value>;

/// Caller-supplied properties for generated markers.
#[derive(Debug, Clone, Default)]
pub enum PropertySource {
    /// No extra properties; features carry only the marker tag.
    #[default]
    None,
    /// One map shared by every marker.
    Shared(Properties),
    /// Index-aligned per-box maps. Length must match the box list.
    PerBox(Vec<Properties>),
}

/// GeoJSON FeatureCollection of point markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// One feature per bounding box, in input order.
    pub features: Vec<Feature>,
}

/// One GeoJSON point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Always `"Feature"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Marker tag plus caller-supplied properties.
    pub properties: Properties,
    /// Point geometry at the box centroid.
    pub geometry: Geometry,
}

/// GeoJSON point geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Always `"Point"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Centroid in `[x, y]` order.
    pub coordinates: [f64; 2],
}

/// Identifier of one interactive UI control, keyed by marker index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlId {
    /// Control kind tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Index of the owning marker's bounding box.
    pub index: usize,
}

impl ControlId {
    fn new(kind: &str, index: usize) -> Self {
        Self {
            kind: kind.to_string(),
            index,
        }
    }
}

/// Control kind for the marker itself.
pub const MARKER_CONTROL: &str = "cell-marker";
/// Control kind for the marker's popup.
pub const MARKER_POPUP_CONTROL: &str = "cell-marker-popup";
/// Control kind for the popup's clear button.
pub const MARKER_CLEAR_CONTROL: &str = "cell-marker-butt";

/// UI descriptor for one interactive marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    /// Centroid in `[row, col]` order (axes swapped relative to GeoJSON).
    pub position: [f64; 2],
    /// The marker's own control identity.
    pub id: ControlId,
    /// Popup attached to the marker.
    pub popup_id: ControlId,
    /// Clear-marker affordance inside the popup.
    pub clear_button_id: ControlId,
}

/// Generated markers: the GeoJSON overlay plus the UI descriptor list.
///
/// Both sequences are in input box order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSet {
    /// Map-overlay representation.
    pub geojson: FeatureCollection,
    /// Interactive-layer representation.
    pub markers: Vec<MarkerDescriptor>,
}

/// Centroid of a bounding box: arithmetic mean of the x and y extrema.
#[inline]
pub fn bbox_center(bbox: &BoundingBox) -> [f64; 2] {
    [(bbox[0] + bbox[2]) / 2.0, (bbox[1] + bbox[3]) / 2.0]
}

/// Build point markers for a list of bounding boxes.
///
/// Every feature's properties start from the fixed `{"type": "marker"}` tag
/// and then merge the caller-supplied map, so a caller-provided `type` wins.
/// A per-box property list whose length does not match the box list is an
/// error: truncating would silently attach metadata to the wrong marker.
pub fn make_marker_set(boxes: &[BoundingBox], properties: &PropertySource) -> Result<MarkerSet> {
    if let PropertySource::PerBox(list) = properties {
        if list.len() != boxes.len() {
            return Err(Error::PropertyCount {
                boxes: boxes.len(),
                properties: list.len(),
            });
        }
    }

    let mut features = Vec::with_capacity(boxes.len());
    let mut markers = Vec::with_capacity(boxes.len());

    for (index, bbox) in boxes.iter().enumerate() {
        let center = bbox_center(bbox);

        let mut merged = Properties::new();
        merged.insert("type".to_string(), Value::String("marker".to_string()));
        let extra = match properties {
            PropertySource::None => None,
            PropertySource::Shared(map) => Some(map),
            PropertySource::PerBox(list) => Some(&list[index]),
        };
        if let Some(map) = extra {
            for (key, value) in map {
                merged.insert(key.clone(), value.clone());
            }
        }

        features.push(Feature {
            kind: "Feature".to_string(),
            properties: merged,
            geometry: Geometry {
                kind: "Point".to_string(),
                coordinates: center,
            },
        });

        markers.push(MarkerDescriptor {
            position: [center[1], center[0]],
            id: ControlId::new(MARKER_CONTROL, index),
            popup_id: ControlId::new(MARKER_POPUP_CONTROL, index),
            clear_button_id: ControlId::new(MARKER_CLEAR_CONTROL, index),
        });
    }

    Ok(MarkerSet {
        geojson: FeatureCollection {
            kind: "FeatureCollection".to_string(),
            features,
        },
        markers,
    })
}
