//! # Chitra-Annotate: Vector Annotation Conversion
//!
//! Converts user-drawn vector annotations into the raster and marker
//! representations the imaging layer overlays back onto slides:
//!
//! - a closed path string becomes a filled boolean [`Mask`] with the drawn
//!   region's full interior (enclosed holes filled, edge overhang clamped),
//! - a list of bounding boxes becomes a GeoJSON `FeatureCollection` of
//!   centroid point markers plus UI marker descriptors with per-index
//!   interactive controls.
//!
//! ```text
//! path string ──► parse_path ──► rasterize_polygon ──► Mask
//! bounding boxes ─────────────► make_marker_set ────► MarkerSet
//! ```
//!
//! Unlike the overlay resolver's silent-skip policy, the two failure modes
//! here raise: a malformed path cannot be recovered into safe geometry, and
//! a mismatched per-box property list would attach metadata to the wrong
//! marker if truncated.

pub mod error;
pub mod markers;
pub mod mask;
pub mod path;

pub use error::{Error, Result};
pub use markers::{
    BoundingBox, ControlId, Feature, FeatureCollection, Geometry, MARKER_CLEAR_CONTROL,
    MARKER_CONTROL, MARKER_POPUP_CONTROL, MarkerDescriptor, MarkerSet, Properties,
    PropertySource, bbox_center, make_marker_set,
};
pub use mask::{Mask, path_to_mask, rasterize_polygon};
pub use path::{PathVertex, parse_path};
