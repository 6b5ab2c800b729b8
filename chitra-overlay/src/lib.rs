//! # Chitra-Overlay: Feature Annotation Resolution
//!
//! Turns heterogeneous per-structure feature annotations into the flat value
//! sequences a slide viewer overlays back onto imagery, and compiles UI
//! filter selections into the queries that drive that extraction.
//!
//! ## Data Flow
//!
//! ```text
//! UI filter controls ──► compile_filters ──► FilterSpec ──┐
//!                                                         │ query()
//!                                                         ▼
//! StructureRecord collection ──────────► resolve_overlay_values
//!                                                         │
//!                                                         ▼
//!                                        Vec<ResolvedValue> (heatmaps,
//!                                        colorbars, feature tables)
//! ```
//!
//! ## Tolerance Policy
//!
//! Annotation data is heterogeneous and partially missing by nature, so the
//! resolver degrades silently: records without the queried feature simply
//! contribute nothing, ambiguous shapes are skipped, and file-backed startup
//! defaults fall back to empty values with a logged warning. See
//! [`resolver`] for the two sentinel outputs (`0` for "category not
//! present", `1` for flat-tag presence counting) that are deliberate
//! exceptions to the skip rule.
//!
//! ## Modules
//!
//! - [`record`]: feature value trees and shape classification
//! - [`query`]: overlay query path specification
//! - [`resolver`]: value extraction across record collections
//! - [`filters`]: filter compilation from UI control state
//! - [`startup`]: process-initialization defaults

pub mod filters;
pub mod query;
pub mod record;
pub mod resolver;
pub mod startup;

pub use filters::{
    ControlStyle, FilterRange, FilterSpec, PatternValue, compile_filters,
    pattern_matching_value,
};
pub use query::{MAIN_CELL_TYPES_KEY, MAX_CELL_TYPE_ALIAS, MAX_SENTINEL, OverlayQuery};
pub use record::{FeatureValue, StructureRecord, ValueShape};
pub use resolver::{ResolvedValue, resolve_overlay_values};
pub use startup::{
    AppConfig, StartupDefaults, StartupError, load_default_slide_list, load_tag_snippet,
};
