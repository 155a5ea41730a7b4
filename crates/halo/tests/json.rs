#![allow(clippy::unwrap_used)]

use halo::{
    Condition, Diagnostic, ElementRef, FocusStyle, MechanismContext, Rect, SnapshotError,
    StateStyle, StyleSnapshot, evaluate_batch, evaluate_json, snapshot_from_json,
};

fn seed_json(border_color: &str) -> String {
    format!(
        r#"{{
        "elementRef": "/html/body/form/input[1]",
        "mechanismContext": "Input",
        "normal": {{
            "outlineStyle": "none", "outlineWidth": "0px",
            "outlineColor": "rgb(0, 0, 0)", "outlineOffset": "0px",
            "borderWidth": "1px", "borderColor": "rgb(204, 204, 204)",
            "boxShadow": "none", "backgroundColor": "rgb(255, 255, 255)",
            "fullBackground": "rgb(255, 255, 255) none"
        }},
        "focus": {{
            "outlineStyle": "none", "outlineWidth": "0px",
            "outlineColor": "rgb(0, 0, 0)", "outlineOffset": "0px",
            "borderWidth": "3px", "borderColor": "{border_color}",
            "boxShadow": "none", "backgroundColor": "rgb(255, 255, 255)",
            "fullBackground": "rgb(255, 255, 255) none",
            "position": "static", "zIndex": "auto"
        }},
        "elementBounds": {{"top": 100.0, "right": 300.0, "bottom": 140.0, "left": 100.0}},
        "parentBounds": {{"top": 50.0, "right": 400.0, "bottom": 200.0, "left": 50.0}},
        "fontSizePx": 16.0,
        "rootFontSizePx": 16.0
    }}"#
    )
}

fn base_state() -> StateStyle {
    StateStyle {
        outline_style: "none".into(),
        outline_width: "0px".into(),
        outline_color: "rgb(0, 0, 0)".into(),
        outline_offset: "0px".into(),
        border_width: "1px".into(),
        border_color: "rgb(204, 204, 204)".into(),
        box_shadow: "none".into(),
        background_color: "rgb(255, 255, 255)".into(),
        full_background: "rgb(255, 255, 255) none".into(),
    }
}

fn snapshot(normal: StateStyle, focus: StateStyle) -> StyleSnapshot {
    StyleSnapshot {
        element_ref: ElementRef("/html/body/button[1]".into()),
        mechanism_context: MechanismContext::Button,
        normal,
        focus: FocusStyle {
            style: focus,
            position: "static".into(),
            z_index: "auto".into(),
        },
        element_bounds: Rect {
            top: 100.0,
            right: 300.0,
            bottom: 140.0,
            left: 100.0,
        },
        parent_bounds: Rect {
            top: 50.0,
            right: 400.0,
            bottom: 200.0,
            left: 50.0,
        },
        ancestors: Vec::new(),
        parent_background_color: None,
        parent_full_background: None,
        parent_stopped_at_z_index: None,
        font_size_px: 16.0,
        root_font_size_px: 16.0,
    }
}

#[test]
fn json_boundary_reports_the_seed_failure() {
    let output = evaluate_json(&seed_json("rgb(255, 102, 0)")).unwrap();
    let findings: Vec<Diagnostic> = serde_json::from_str(&output).unwrap();
    let fail = findings
        .iter()
        .find(|diag| diag.condition == Condition::ContrastFail)
        .unwrap();
    assert_eq!(fail.code, "InputContrastFail");
    let ratio = fail.measured.ratio.unwrap();
    assert!((ratio - 2.94).abs() < 1e-9, "{ratio}");
}

#[test]
fn json_boundary_passes_the_borderline_seed() {
    let output = evaluate_json(&seed_json("rgb(255, 92, 0)")).unwrap();
    let findings: Vec<Diagnostic> = serde_json::from_str(&output).unwrap();
    assert!(
        findings
            .iter()
            .all(|diag| diag.condition != Condition::ContrastFail),
        "{findings:?}"
    );
}

#[test]
fn wire_form_round_trips() {
    let decoded = snapshot_from_json(&seed_json("rgb(255, 102, 0)")).unwrap();
    assert_eq!(decoded.mechanism_context, MechanismContext::Input);
    assert_eq!(decoded.focus.style.border_width, "3px");
    assert_eq!(decoded.normal.border_color, "rgb(204, 204, 204)");
    assert!(decoded.ancestors.is_empty());

    let wire = serde_json::to_value(&decoded).unwrap();
    assert!(wire["focus"].get("borderWidth").is_some(), "flattened");
    assert!(wire["focus"].get("zIndex").is_some());
    assert!(wire.get("fontSizePx").is_some());
}

#[test]
fn malformed_json_names_the_schema() {
    let err = snapshot_from_json("{\"elementRef\": 5}").unwrap_err();
    assert!(format!("{err:#}").contains("schema"), "{err:#}");
}

#[test]
fn contract_violations_name_the_contract() {
    let mut value: serde_json::Value =
        serde_json::from_str(&seed_json("rgb(0, 0, 0)")).unwrap();
    value["fontSizePx"] = serde_json::json!(0.0);
    let err = snapshot_from_json(&value.to_string()).unwrap_err();
    assert!(format!("{err:#}").contains("font metrics"), "{err:#}");
}

#[test]
fn batch_keeps_input_order_and_independence() {
    let mut clean_focus = base_state();
    clean_focus.outline_style = "solid".into();
    clean_focus.outline_width = "2px".into();
    clean_focus.outline_offset = "2px".into();
    clean_focus.outline_color = "rgb(0, 0, 0)".into();
    clean_focus.box_shadow = "0 0 0 3px rgb(0, 95, 204)".into();
    let clean = snapshot(base_state(), clean_focus);
    let unchanged = snapshot(base_state(), base_state());

    let results = evaluate_batch(&[clean, unchanged]).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_empty(), "{:?}", results[0]);
    assert_eq!(results[1].len(), 1);
    assert_eq!(results[1][0].condition, Condition::NoVisibleFocus);
    assert_eq!(results[1][0].code, "ButtonNoVisibleFocus");
}

#[test]
fn batch_stops_at_the_first_contract_violation() {
    let mut bad = snapshot(base_state(), base_state());
    bad.font_size_px = 0.0;
    assert!(matches!(
        evaluate_batch(&[bad]),
        Err(SnapshotError::InvalidFontMetric { .. })
    ));
}
