use hierpack_core::{
    FocusResolution, HierpackConfig, Row, SearchIndex, build_with_config, parse_level,
    resolve_focus,
};

fn sample_rows() -> Vec<Row> {
    vec![
        Row::new(100.0, ["A (1)-X", "B (2)-Y"]),
        Row::new(200.0, ["A (1)-X", "C (3)-Z"]),
    ]
}

#[test]
fn aggregate_weights_match_documented_example() {
    let h = build_with_config(&sample_rows(), &HierpackConfig::defaults()).expect("build");
    assert_eq!(h.root().aggregate_weight(), 300.0);
    assert_eq!(h.find("A (1)-X").unwrap().aggregate_weight(), 300.0);
    assert_eq!(h.find("A (1)-X|B (2)-Y").unwrap().aggregate_weight(), 100.0);
    assert_eq!(h.find("A (1)-X|C (3)-Z").unwrap().aggregate_weight(), 200.0);
}

#[test]
fn leading_gap_contributes_nothing() {
    let rows = vec![Row::with_gaps(Some(10.0), &[None, Some("X (1)-Y")])];
    let h = build_with_config(&rows, &HierpackConfig::defaults()).expect("build");
    assert!(h.is_empty());
    assert_eq!(h.root().aggregate_weight(), 0.0);
}

#[test]
fn malformed_suffix_keeps_raw_text() {
    let p = parse_level(Some("Foo (9)-")).expect("present");
    assert_eq!(
        (p.name.as_str(), p.code.as_str(), p.suffix.as_str(), p.raw.as_str()),
        ("Foo (9)-", "", "", "Foo (9)-")
    );
}

#[test]
fn config_controls_level_limit() {
    let cfg = HierpackConfig::from_json_str(r#"{ "hierarchy": { "maxLevels": 1 } }"#).unwrap();
    let h = build_with_config(&sample_rows(), &cfg).expect("build");
    assert_eq!(h.len(), 1);
    assert_eq!(h.find("A (1)-X").unwrap().direct_value, Some(300.0));
}

#[test]
fn invalid_config_section_is_reported() {
    let cfg = HierpackConfig::from_json_str(r#"{ "hierarchy": { "maxLevels": -3 } }"#).unwrap();
    assert!(build_with_config(&sample_rows(), &cfg).is_err());
}

#[test]
fn search_then_focus_round_trip() {
    let h = build_with_config(&sample_rows(), &HierpackConfig::defaults()).expect("build");
    let index = SearchIndex::new(h.root());

    let hits = index.search("a (1)", 10);
    assert_eq!(hits.len(), 1);
    let top = hits[0];
    assert!(matches!(resolve_focus(&h, top), FocusResolution::Focus(n) if n.name() == "A"));

    let leaf = index.search("c (3)", 10)[0];
    assert_eq!(resolve_focus(&h, leaf), FocusResolution::NoOp);
}

#[test]
fn tree_serializes_with_flattened_level_fields() {
    let h = build_with_config(&sample_rows(), &HierpackConfig::defaults()).expect("build");
    let v = serde_json::to_value(h.root()).unwrap();
    assert_eq!(v["depth"], serde_json::json!(-1));
    assert_eq!(v["children"][0]["name"], serde_json::json!("A"));
    assert_eq!(v["children"][0]["raw"], serde_json::json!("A (1)-X"));
    assert_eq!(v["children"][0]["children"][1]["directValue"], serde_json::json!(200.0));
    assert!(v["children"][0].get("directValue").is_none());
}
