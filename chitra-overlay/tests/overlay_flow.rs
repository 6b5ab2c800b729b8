//! End-to-end overlay extraction flows.
//!
//! Exercises the compile → query → resolve → accept pipeline on realistic
//! annotation payloads, including the shape mixtures that show up when
//! aggregated parent structures and flat-tagged child structures share a
//! slide.

use chitra_overlay::{
    ControlStyle, FilterRange, OverlayQuery, ResolvedValue, StructureRecord,
    compile_filters, resolve_overlay_values,
};

/// A small slide's worth of structures: two annotated with cell type
/// fractions, one aggregated roll-up, one flat-tagged (the same feature
/// name recorded as a bare string), one unrelated.
fn sample_records() -> Vec<StructureRecord> {
    serde_json::from_str(
        r#"[
            {
                "Area": 812.5,
                "Main_Cell_Types": {"POD": 0.55, "EC": 0.30, "MES": 0.15}
            },
            {
                "Area": 507.0,
                "Main_Cell_Types": {"POD": 0.20, "EC": 0.75, "MES": 0.05}
            },
            {
                "Area": 1650.25,
                "Cell_States": {"POD": {"resting": 11, "injured": 3}}
            },
            {
                "Area": 98.0,
                "Main_Cell_Types": "POD"
            },
            {
                "Perimeter": 120.0
            }
        ]"#,
    )
    .unwrap()
}

#[test]
fn numeric_feature_extraction_skips_unannotated() {
    let records = sample_records();
    let values = resolve_overlay_values(&records, &OverlayQuery::name("Area"));

    // Four records carry an Area; the fifth contributes nothing.
    assert_eq!(values.len(), 4);
    assert_eq!(values[0], ResolvedValue::Number(812.5));
    assert_eq!(values[3], ResolvedValue::Number(98.0));
}

#[test]
fn compiled_filter_drives_extraction() {
    let records = sample_records();

    let keys = vec![
        "Main_Cell_Types --> POD".to_string(),
        "Area".to_string(),
        "Max Cell Type".to_string(),
    ];
    let styles = vec![
        ControlStyle::visible(),
        ControlStyle::hidden(),
        ControlStyle::visible(),
    ];
    let ranges = vec![
        FilterRange::Bounds([0.5, 1.0]),
        FilterRange::Bounds([0.0, 1000.0]),
        FilterRange::Categories(vec!["POD".to_string()]),
    ];

    let specs = compile_filters(&keys, &styles, &ranges, None);
    assert_eq!(specs.len(), 2);

    // First visible filter: POD fraction, bounded to [0.5, 1.0].
    let values = resolve_overlay_values(&records, &specs[0].query());
    // Two fraction mappings match, the flat tag counts presence, the
    // aggregated record is ambiguous without a sub_value and skips.
    assert_eq!(
        values,
        vec![
            ResolvedValue::Number(0.55),
            ResolvedValue::Number(0.20),
            ResolvedValue::Number(1.0),
        ]
    );
    let accepted: Vec<bool> = values.iter().map(|v| specs[0].range.accepts(v)).collect();
    assert_eq!(accepted, vec![true, false, true]);

    // Second visible filter: dominant cell type, category-set range.
    let values = resolve_overlay_values(&records, &specs[1].query());
    let keys: Vec<&str> = values.iter().filter_map(ResolvedValue::as_text).collect();
    // Winners are POD and EC; the max quirk returns them sorted ascending.
    assert_eq!(keys, vec!["EC", "POD"]);
    assert!(specs[1].range.accepts(&values[1]));
    assert!(!specs[1].range.accepts(&values[0]));
}

#[test]
fn aggregated_sub_value_extraction() {
    let records = sample_records();
    let query = OverlayQuery::name("Cell_States").value("POD").sub_value("injured");
    let values = resolve_overlay_values(&records, &query);
    assert_eq!(values, vec![ResolvedValue::Number(3.0)]);
}

#[test]
fn query_specs_round_trip_as_plain_json() {
    let spec_json = r#"{
        "name": "Main_Cell_Types",
        "value": "max",
        "sub_value": null,
        "range": ["POD", "EC"]
    }"#;
    let spec: chitra_overlay::FilterSpec = serde_json::from_str(spec_json).unwrap();
    assert!(spec.query().is_max());
    assert_eq!(
        spec.range,
        FilterRange::Categories(vec!["POD".to_string(), "EC".to_string()])
    );
}
