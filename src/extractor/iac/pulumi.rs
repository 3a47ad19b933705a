//! Pulumi IaC sub-extractor.
//!
//! Purely static: per-runtime regexes grep program source for resource
//! constructor calls. This accepts false positives from commented-out code
//! or string literals that happen to match — no import-graph or AST
//! analysis is attempted.

use super::archetypes::pulumi_archetype;
use crate::model::{IaCResource, IaCSource};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;

static PY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(\w+(?:\.\w+)+)\s*\(\s*["']([^"']+)["']"#).unwrap());
static NODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"new\s+(\w+(?:\.\w+)+)\s*\(\s*["']([^"']+)["']"#).unwrap());
static GO_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(\w+)\.New(\w+)\s*\(\s*\w+\s*,\s*["']([^"']+)["']"#).unwrap());

pub fn discover(repo_root: &Path) -> (Vec<IaCResource>, Vec<String>) {
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    let project_files: Vec<_> = walkdir::WalkDir::new(repo_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name() == "Pulumi.yaml")
        .filter(|e| {
            e.path()
                .strip_prefix(repo_root)
                .map(|rel| !rel.components().any(|c| c.as_os_str().to_string_lossy().starts_with('.')))
                .unwrap_or(true)
        })
        .collect();

    for entry in project_files {
        let pulumi_yaml = entry.path();
        let project_dir = pulumi_yaml.parent().unwrap_or(repo_root);
        let rel_base = project_dir.strip_prefix(repo_root).unwrap_or(project_dir).to_string_lossy().to_string();

        let text = match std::fs::read_to_string(pulumi_yaml) {
            Ok(t) => t,
            Err(e) => {
                errors.push(format!("pulumi: {rel_base}/Pulumi.yaml: {e}"));
                continue;
            }
        };
        let proj: Value = match serde_yaml::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                errors.push(format!("pulumi: {rel_base}/Pulumi.yaml: {e}"));
                continue;
            }
        };
        let Value::Mapping(_) = &proj else { continue };

        let runtime = match proj.as_mapping().and_then(|m| m.get(Value::String("runtime".to_string()))) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Mapping(m)) => m
                .get(Value::String("name".to_string()))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };
        let proj_name = field_str(&proj, "name").unwrap_or_else(|| "unknown".to_string());

        let mut attributes = HashMap::new();
        attributes.insert("runtime".to_string(), runtime.clone());
        attributes.insert("description".to_string(), field_str(&proj, "description").unwrap_or_default());

        resources.push(IaCResource {
            source: IaCSource::Pulumi,
            resource_type: "pulumi_project".to_string(),
            name: proj_name,
            source_file: Some(format!("{rel_base}/Pulumi.yaml")),
            archetype_hint: None,
            region: None,
            notes: Vec::new(),
            attributes,
        });

        let extensions: &[&str] = match runtime.as_str() {
            "python" | "python3" => &["py"],
            "nodejs" | "typescript" => &["ts", "js"],
            "go" => &["go"],
            "yaml" => &["yaml", "yml"],
            _ => &[],
        };

        for ext in extensions {
            for prog_entry in walkdir::WalkDir::new(project_dir)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().map(|e| e == *ext).unwrap_or(false))
            {
                let prog_path = prog_entry.path();
                let skip = prog_path.to_string_lossy();
                if ["node_modules", "venv", ".venv", "__pycache__"].iter().any(|s| skip.contains(s)) {
                    continue;
                }
                match std::fs::read_to_string(prog_path) {
                    Ok(content) => {
                        let rel = prog_path.strip_prefix(repo_root).unwrap_or(prog_path).to_string_lossy().to_string();
                        resources.extend(parse_program(&content, &rel, &runtime));
                    }
                    Err(e) => errors.push(format!("pulumi: {}: {e}", prog_path.display())),
                }
            }
        }
    }

    (resources, errors)
}

fn field_str(v: &Value, key: &str) -> Option<String> {
    v.as_mapping()?.get(Value::String(key.to_string()))?.as_str().map(|s| s.to_string())
}

fn parse_program(text: &str, rel: &str, runtime: &str) -> Vec<IaCResource> {
    let mut resources = Vec::new();

    match runtime {
        "python" | "python3" => {
            for c in PY_PATTERN.captures_iter(text) {
                resources.push(build_resource(&c[1], &c[2], rel));
            }
        }
        "nodejs" | "typescript" => {
            for c in NODE_PATTERN.captures_iter(text) {
                resources.push(build_resource(&c[1], &c[2], rel));
            }
        }
        "go" => {
            for c in GO_PATTERN.captures_iter(text) {
                let res_type = format!("{}:{}", &c[1], &c[2]);
                resources.push(build_resource(&res_type, &c[3], rel));
            }
        }
        _ => {}
    }

    resources
}

fn build_resource(res_type: &str, res_name: &str, rel: &str) -> IaCResource {
    let (archetype, notes) = pulumi_archetype(res_type);
    IaCResource {
        source: IaCSource::Pulumi,
        resource_type: res_type.to_string(),
        name: res_name.to_string(),
        source_file: Some(rel.to_string()),
        archetype_hint: archetype.map(|s| s.to_string()),
        region: None,
        notes: notes.into_iter().map(|s| s.to_string()).collect(),
        attributes: HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_rds_constructor_is_detected() {
        let program = r#"db = aws.rds.Instance("main-db", engine="postgres")"#;
        let resources = parse_program(program, "__main__.py", "python");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].resource_type, "aws.rds.Instance");
        assert_eq!(resources[0].archetype_hint.as_deref(), Some("database"));
    }

    #[test]
    fn typescript_deployment_constructor_is_detected() {
        let program = r#"new kubernetes.apps.v1.Deployment("web", { spec: {} });"#;
        let resources = parse_program(program, "index.ts", "typescript");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name, "web");
    }
}
