//! Declarative layout file schema.
//!
//! A layout file describes one view tree in YAML: a root element with nested
//! children, each carrying a tag, an optional id, and an initial visibility.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::inflate::STUB_TAG;
use crate::view::Visibility;

/// One layout file: a named tree of element specs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LayoutFile {
    /// Layout resource name; defaults to the file stem when omitted.
    #[serde(default)]
    pub name: String,
    pub root: ElementSpec,
}

/// One element in a layout description.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Layout reference a deferred stub points at.
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

impl LayoutFile {
    /// Parse a layout from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut layout: LayoutFile = serde_yaml::from_str(&content)?;
        if layout.name.is_empty() {
            layout.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "layout".to_string());
        }
        Ok(layout)
    }
}

/// Check structural rules before inflation.
pub fn validate(layout: &LayoutFile) -> anyhow::Result<()> {
    let mut seen_ids = HashSet::new();
    validate_element(&layout.root, &mut seen_ids)
}

fn validate_element(spec: &ElementSpec, seen_ids: &mut HashSet<String>) -> anyhow::Result<()> {
    if spec.tag.is_empty() {
        anyhow::bail!("element with empty tag");
    }
    if spec.tag == STUB_TAG && !spec.children.is_empty() {
        anyhow::bail!("stub element {:?} cannot declare children", spec.id);
    }
    if let Some(id) = &spec.id {
        if !seen_ids.insert(id.clone()) {
            anyhow::bail!("duplicate id {:?}", id);
        }
    }
    for child in &spec.children {
        validate_element(child, seen_ids)?;
    }
    Ok(())
}
