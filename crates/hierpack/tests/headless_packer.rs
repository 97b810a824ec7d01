use hierpack::render::{HeadlessPacker, view_rows};
use hierpack::{FocusChange, HierpackConfig, Row};
use serde_json::json;

fn rows() -> Vec<Row> {
    vec![
        Row::new(100.0, ["A (1)-X", "B (2)-Y"]),
        Row::new(200.0, ["A (1)-X", "C (3)-Z"]),
        Row::new(40.0, ["D (4)-W", "E (5)-V"]),
        Row::new(60.0, ["D (4)-W", "F (6)-U"]).with_descriptive_name("Delta"),
    ]
}

fn packer() -> HeadlessPacker {
    HeadlessPacker::from_rows(&rows(), &HierpackConfig::defaults()).unwrap()
}

#[test]
fn default_view_covers_whole_tree() {
    let packer = packer();
    let view = packer.view(400.0, 400.0);
    assert_eq!(view.root.path_key, "");
    assert_eq!(view.root.aggregate_weight, 400.0);
    assert_eq!(view.root.iter().count(), 7);
    assert_eq!(packer.breadcrumbs().len(), 1);
}

#[test]
fn focus_through_search_relayouts_subtree() {
    let mut packer = packer();
    let hit = packer.search("delta")[0].clone();
    assert_eq!(hit.path_key, "D (4)-W");

    assert_eq!(packer.focus(&hit), FocusChange::Changed);
    assert_eq!(packer.focus(&hit), FocusChange::Unchanged);

    let view = packer.view(300.0, 200.0);
    assert_eq!(view.root.path_key, "D (4)-W");
    assert_eq!(view.root.aggregate_weight, 100.0);
    assert!((view.root.r - 100.0).abs() < 1e-6);

    let crumbs = packer
        .breadcrumbs()
        .iter()
        .map(|n| n.path_key.clone())
        .collect::<Vec<_>>();
    assert_eq!(crumbs, vec!["".to_string(), "D (4)-W".to_string()]);

    packer.reset_focus();
    assert!(packer.focused().is_root());
}

#[test]
fn childless_focus_is_rejected() {
    let mut packer = packer();
    assert_eq!(packer.focus_key("A (1)-X|B (2)-Y"), FocusChange::Unchanged);
    assert_eq!(packer.focus_key("nope"), FocusChange::Unchanged);
    assert!(packer.focused().is_root());
}

#[test]
fn focus_survives_rebuild_when_path_still_exists() {
    let mut packer = packer();
    packer.focus_key("A (1)-X");

    let mut more = rows();
    more.push(Row::new(5.0, ["A (1)-X", "G (7)-Q"]));
    packer.set_rows(&more, &HierpackConfig::defaults()).unwrap();
    assert_eq!(packer.focused().path_key, "A (1)-X");
    assert_eq!(packer.focused().aggregate_weight(), 305.0);

    packer.set_rows(&rows()[2..], &HierpackConfig::defaults()).unwrap();
    assert!(packer.focused().is_root());
}

#[test]
fn search_limit_comes_from_config() {
    let cfg = HierpackConfig::from_json_str(r#"{ "search": { "limit": 1 } }"#).unwrap();
    let packer = HeadlessPacker::from_rows(&rows(), &cfg).unwrap();
    assert_eq!(packer.search("-").len(), 1);
    assert!(packer.search("   ").is_empty());
}

#[test]
fn bad_config_surfaces_as_headless_error() {
    let cfg = HierpackConfig::from_json_str(r#"{ "pack": { "padding": "wide" } }"#).unwrap();
    let err = HeadlessPacker::from_rows(&rows(), &cfg).unwrap_err();
    assert!(err.to_string().contains("pack"), "{err}");

    let view = view_rows(&rows(), &HierpackConfig::defaults(), 100.0, 100.0).unwrap();
    assert_eq!(view.width, 100.0);
}

#[test]
fn view_serializes_with_camel_case_fields() {
    let mut packer = packer();
    packer.focus_key("D (4)-W");
    let value = serde_json::to_value(packer.view(200.0, 200.0)).unwrap();

    assert_eq!(value["width"], json!(200.0));
    assert_eq!(value["root"]["pathKey"], json!("D (4)-W"));
    assert_eq!(value["root"]["descriptiveName"], json!("Delta"));
    assert_eq!(value["root"]["aggregateWeight"], json!(100.0));
    assert!(value["root"].get("directValue").is_none());

    let children = value["root"]["children"].as_array().unwrap();
    assert_eq!(children[0]["rawLabel"], json!("F (6)-U"));
    assert_eq!(children[0]["directValue"], json!(60.0));

    let labels = value["labels"].as_array().unwrap();
    assert!(!labels.is_empty());
    for label in labels {
        for field in ["pathKey", "text", "x", "y", "r"] {
            assert!(label.get(field).is_some(), "label missing {field}: {label}");
        }
    }
}
