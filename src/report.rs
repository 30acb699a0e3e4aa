//! Output formatting for lazyscan results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::detect::{Finding, FindingKind, ScanResult};

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_scanned: usize,
    pub findings_total: usize,
    pub layouts: Vec<JsonLayout>,
}

/// Per-layout-file section of the JSON report.
#[derive(Serialize, Deserialize)]
pub struct JsonLayout {
    pub file: String,
    pub layout: String,
    pub findings: Vec<JsonFinding>,
}

/// One finding in JSON form.
#[derive(Serialize, Deserialize)]
pub struct JsonFinding {
    pub kind: String,
    pub layout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<u32>,
    pub view_id_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<u32>,
    pub hierarchy_path: String,
}

/// Assemble the JSON report for a set of per-file scans.
pub fn build_json(path: &str, scans: &[ScanResult]) -> JsonReport {
    let layouts: Vec<JsonLayout> = scans
        .iter()
        .map(|scan| JsonLayout {
            file: scan.file.clone(),
            layout: scan.layout.clone(),
            findings: scan.findings.iter().map(finding_to_json).collect(),
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_scanned: scans.len(),
        findings_total: scans.iter().map(|s| s.findings.len()).sum(),
        layouts,
    }
}

/// Write results in JSON format.
pub fn write_json(path: &str, scans: &[ScanResult]) -> anyhow::Result<()> {
    let report = build_json(path, scans);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

fn finding_to_json(f: &Finding) -> JsonFinding {
    JsonFinding {
        kind: f.kind.as_str().to_string(),
        layout: f.root_name.clone(),
        layout_id: f.root_id,
        view_id_name: f.node_id_name.clone(),
        view_id: f.node_id,
        hierarchy_path: f.hierarchy_path.clone(),
    }
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, scans: &[ScanResult]) {
    // Header
    println!();
    print!("  ");
    print!("{}", "lazyscan".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    print!("  {}", "Layouts:  ".dimmed());
    println!("{}", scans.len());
    println!();

    let mut stubs = 0usize;
    let mut hidden = 0usize;
    for scan in scans {
        if scan.findings.is_empty() {
            continue;
        }
        write_layout_findings(scan);
        for f in &scan.findings {
            match f.kind {
                FindingKind::DeferredPlaceholder => stubs += 1,
                FindingKind::HiddenAtLoad => hidden += 1,
                FindingKind::UnknownDeferred => {}
            }
        }
    }

    write_summary(stubs, hidden);
    println!();
}

fn write_layout_findings(scan: &ScanResult) {
    println!(
        "  {} {} ({}):",
        scan.layout.bold(),
        scan.file.blue(),
        scan.findings.len()
    );
    println!();

    for f in &scan.findings {
        write_kind_tag(&f.kind);
        print!("   ");
        if f.node_id_name == crate::detect::UNRESOLVED_NAME {
            print!("{:<20}", f.node_id_name.dimmed());
        } else {
            print!("{:<20}", format!("id/{}", f.node_id_name));
        }
        println!("{}", f.hierarchy_path.dimmed());
    }
    println!();
}

fn write_kind_tag(kind: &FindingKind) {
    match kind {
        FindingKind::DeferredPlaceholder => print!("    {} ", "STUB  ".magenta()),
        FindingKind::HiddenAtLoad => print!("    {} ", "HIDDEN".yellow()),
        FindingKind::UnknownDeferred => print!("    {} ", "DEFER?".blue()),
    }
}

fn write_summary(stubs: usize, hidden: usize) {
    if stubs == 0 && hidden == 0 {
        println!("  {}", "✓ No deferred-load subtrees found".green());
        return;
    }

    print!("  {}", "Found".bold());
    print!(
        " {} deferred placeholder{}",
        stubs.to_string().magenta(),
        if stubs != 1 { "s" } else { "" }
    );
    print!(
        ", {} hidden-at-load subtree{}",
        hidden.to_string().yellow(),
        if hidden != 1 { "s" } else { "" }
    );
    println!();
}
