//! Terraform IaC sub-extractor.
//!
//! Primary path parses with `hcl-rs`; a regex fallback runs whenever the HCL
//! parse fails, so a malformed or unusually exotic `.tf` file degrades to
//! partial extraction instead of aborting the whole pass.

use super::archetypes::infra_archetype;
use crate::model::{IaCResource, IaCSource};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

const WANTED_KEYS: &[&str] = &[
    "engine",
    "engine_version",
    "instance_class",
    "node_type",
    "image",
    "chart",
    "repository",
    "namespace",
    "replicas",
    "allocated_storage",
    "cluster_identifier",
    "name",
];

static RESOURCE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"resource\s+"([^"]+)"\s+"([^"]+)"\s*\{"#).unwrap());

pub fn discover(repo_root: &Path) -> (Vec<IaCResource>, Vec<String>) {
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    for entry in walkdir::WalkDir::new(repo_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|ext| ext == "tf").unwrap_or(false))
    {
        let path = entry.path();
        let rel = path.strip_prefix(repo_root).unwrap_or(path).to_string_lossy();
        if rel.split('/').any(|part| part.starts_with('.') || part == "vendor" || part == "node_modules") {
            continue;
        }
        match parse_file(path, repo_root) {
            Ok(found) => resources.extend(found),
            Err(e) => errors.push(format!("terraform: {rel}: {e}")),
        }
    }

    (resources, errors)
}

fn parse_file(path: &Path, repo_root: &Path) -> std::io::Result<Vec<IaCResource>> {
    let rel = path.strip_prefix(repo_root).unwrap_or(path).to_string_lossy().to_string();
    let content = std::fs::read_to_string(path)?;

    match hcl::from_str::<hcl::Body>(&content) {
        Ok(body) => Ok(parse_hcl_body(&body, &rel)),
        Err(_) => Ok(parse_regex(&content, &rel)),
    }
}

fn parse_hcl_body(body: &hcl::Body, rel: &str) -> Vec<IaCResource> {
    let mut resources = Vec::new();
    for structure in body.iter() {
        let hcl::Structure::Block(block) = structure else { continue };
        if block.identifier() != "resource" {
            continue;
        }
        let labels: Vec<&str> = block.labels().iter().map(|l| l.as_str()).collect();
        if labels.len() < 2 {
            continue;
        }
        let resource_type = labels[0];
        let resource_name = labels[1];

        let mut attributes = HashMap::new();
        for inner in block.body().iter() {
            if let hcl::Structure::Attribute(attr) = inner {
                if WANTED_KEYS.contains(&attr.key()) {
                    if let Some(v) = expr_to_string(attr.expr()) {
                        attributes.insert(attr.key().to_string(), v);
                    }
                }
            }
        }

        let (archetype, notes) = infra_archetype(resource_type);
        resources.push(IaCResource {
            source: IaCSource::Terraform,
            resource_type: resource_type.to_string(),
            name: resource_name.to_string(),
            source_file: Some(rel.to_string()),
            archetype_hint: archetype.map(|s| s.to_string()),
            region: None,
            notes: notes.into_iter().map(|s| s.to_string()).collect(),
            attributes,
        });
    }
    resources
}

fn expr_to_string(expr: &hcl::Expression) -> Option<String> {
    match expr {
        hcl::Expression::String(s) => Some(s.clone()),
        hcl::Expression::Number(n) => Some(n.to_string()),
        hcl::Expression::Bool(b) => Some(b.to_string()),
        hcl::Expression::TemplateExpr(t) => Some(t.to_string()),
        _ => None,
    }
}

/// Regex fallback used whenever the HCL parser rejects the file — best
/// effort `key = "value"` extraction inside the resource block's braces.
fn parse_regex(text: &str, rel: &str) -> Vec<IaCResource> {
    let mut resources = Vec::new();

    for m in RESOURCE_BLOCK_RE.captures_iter(text) {
        let resource_type = m.get(1).unwrap().as_str();
        let resource_name = m.get(2).unwrap().as_str();
        let block_start = m.get(0).unwrap().end();
        let attributes = extract_block_props(text, block_start);
        let (archetype, notes) = infra_archetype(resource_type);

        resources.push(IaCResource {
            source: IaCSource::Terraform,
            resource_type: resource_type.to_string(),
            name: resource_name.to_string(),
            source_file: Some(rel.to_string()),
            archetype_hint: archetype.map(|s| s.to_string()),
            region: None,
            notes: notes.into_iter().map(|s| s.to_string()).collect(),
            attributes,
        });
    }

    resources
}

fn extract_block_props(text: &str, start: usize) -> HashMap<String, String> {
    let bytes = text.as_bytes();
    let mut depth: i32 = 1;
    let mut i = start;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    let block_text = &text[start..i];

    let mut props = HashMap::new();
    for key in WANTED_KEYS {
        let quoted = Regex::new(&format!(r#"(?m)^\s*{key}\s*=\s*"([^"]*)""#)).unwrap();
        if let Some(c) = quoted.captures(block_text) {
            props.insert(key.to_string(), c[1].to_string());
            continue;
        }
        let bare = Regex::new(&format!(r"(?m)^\s*{key}\s*=\s*(\S+)")).unwrap();
        if let Some(c) = bare.captures(block_text) {
            let val = c[1].trim_matches('"');
            if val != "{" && val != "[" {
                props.insert(key.to_string(), val.to_string());
            }
        }
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rds_instance_maps_to_database_archetype() {
        let tf = r#"
resource "aws_db_instance" "main" {
  engine         = "postgres"
  instance_class = "db.t3.micro"
}
"#;
        let resources = parse_regex(tf, "main.tf");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].archetype_hint.as_deref(), Some("database"));
        assert_eq!(resources[0].attributes.get("engine").map(|s| s.as_str()), Some("postgres"));
    }

    #[test]
    fn unmapped_resource_type_has_no_archetype_hint() {
        let tf = r#"
resource "aws_iam_role" "app" {
  name = "app-role"
}
"#;
        let resources = parse_regex(tf, "iam.tf");
        assert_eq!(resources.len(), 1);
        assert!(resources[0].archetype_hint.is_none());
    }
}
