//! Tests for the JSON report format.
//!
//! These tests verify field names and optional-field behavior of the
//! structured output.

use std::path::PathBuf;

use lazyscan::cli::scan_file;
use lazyscan::detect::{Finding, FindingKind, ScanResult};
use lazyscan::report::build_json;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn scanned_fixtures() -> Vec<ScanResult> {
    ["main_screen.yaml", "visible_only.yaml"]
        .iter()
        .map(|name| scan_file(&testdata_path().join(name)).expect("scan should succeed"))
        .collect()
}

#[test]
fn test_json_report_counts_and_sections() {
    let scans = scanned_fixtures();
    let report = build_json("testdata", &scans);

    assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(report.path, "testdata");
    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.findings_total, 2);
    assert_eq!(report.layouts.len(), 2);
    assert_eq!(report.layouts[0].layout, "main_screen");
    assert_eq!(report.layouts[0].findings.len(), 2);
    assert!(report.layouts[1].findings.is_empty());
}

#[test]
fn test_json_kind_strings_are_snake_case() {
    let scans = scanned_fixtures();
    let report = build_json("testdata", &scans);

    let kinds: Vec<&str> = report.layouts[0]
        .findings
        .iter()
        .map(|f| f.kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["deferred_placeholder", "hidden_at_load"]);
}

#[test]
fn test_json_serialization_field_names() {
    let scans = scanned_fixtures();
    let report = build_json("testdata", &scans);
    let value = serde_json::to_value(&report).unwrap();

    let finding = &value["layouts"][0]["findings"][0];
    assert_eq!(finding["kind"], "deferred_placeholder");
    assert_eq!(finding["layout"], "main_screen");
    assert_eq!(finding["view_id_name"], "loader_stub");
    assert!(finding["view_id"].is_number());
    assert!(finding["layout_id"].is_number());
    assert!(finding["hierarchy_path"]
        .as_str()
        .unwrap()
        .starts_with("Root/"));
}

#[test]
fn test_json_omits_absent_ids() {
    let scan = ScanResult {
        file: "anon.yaml".to_string(),
        layout: "anon".to_string(),
        findings: vec![Finding {
            root_id: None,
            root_name: "anon".to_string(),
            node_id: None,
            node_id_name: "N/A".to_string(),
            kind: FindingKind::HiddenAtLoad,
            hierarchy_path: "Root/FrameLayout/TextView".to_string(),
        }],
    };

    let report = build_json("anon.yaml", &[scan]);
    let value = serde_json::to_value(&report).unwrap();
    let finding = &value["layouts"][0]["findings"][0];

    assert_eq!(finding["view_id_name"], "N/A");
    assert!(finding.get("view_id").is_none());
    assert!(finding.get("layout_id").is_none());
}

#[test]
fn test_finding_serde_roundtrip() {
    let finding = Finding {
        root_id: Some(0x7f0a0000),
        root_name: "main_screen".to_string(),
        node_id: Some(0x7f0a0001),
        node_id_name: "loader_stub".to_string(),
        kind: FindingKind::DeferredPlaceholder,
        hierarchy_path: "Root/FrameLayout/ViewStub[id/loader_stub]".to_string(),
    };

    let json = serde_json::to_string(&finding).unwrap();
    let back: Finding = serde_json::from_str(&json).unwrap();
    assert_eq!(back, finding);
}
