//! Helm chart IaC sub-extractor.
//!
//! Chart.yaml and values.yaml are parsed statically. When the `helm` binary
//! is on PATH, `helm template` additionally renders full manifests which are
//! re-fed into [`crate::extractor::manifest::parse_manifest_file`]-style
//! parsing so rendered workloads get the same classification as static ones.

use super::archetypes::helm_chart_archetype;
use crate::extractor::manifest::parse_rendered_documents;
use crate::model::{IaCResource, IaCSource, K8sResource};
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct HelmScanResult {
    pub resources: Vec<IaCResource>,
    pub rendered: Vec<K8sResource>,
    pub errors: Vec<String>,
}

pub fn discover(repo_root: &Path) -> HelmScanResult {
    let mut resources = Vec::new();
    let mut rendered = Vec::new();
    let mut errors = Vec::new();

    let chart_files: Vec<PathBuf> = walkdir::WalkDir::new(repo_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name() == "Chart.yaml")
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            p.strip_prefix(repo_root)
                .map(|rel| !rel.components().any(|c| c.as_os_str().to_string_lossy().starts_with('.')))
                .unwrap_or(true)
        })
        .collect();

    for chart_yaml in chart_files {
        let rel = chart_yaml.strip_prefix(repo_root).unwrap_or(&chart_yaml).to_string_lossy().to_string();
        let chart_dir = chart_yaml.parent().unwrap_or(repo_root).to_path_buf();

        let text = match std::fs::read_to_string(&chart_yaml) {
            Ok(t) => t,
            Err(e) => {
                errors.push(format!("helm: {rel}: {e}"));
                continue;
            }
        };
        let chart_data: Value = match serde_yaml::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                errors.push(format!("helm: {rel}: {e}"));
                continue;
            }
        };
        let Value::Mapping(_) = &chart_data else { continue };

        let chart_name = field_str(&chart_data, "name").unwrap_or_else(|| "unknown".to_string());
        let chart_version = field_str(&chart_data, "version").unwrap_or_default();
        let (archetype, notes) = helm_chart_archetype(&chart_name);

        let mut attributes = HashMap::new();
        attributes.insert("version".to_string(), chart_version);
        attributes.insert("description".to_string(), field_str(&chart_data, "description").unwrap_or_default());
        attributes.insert("app_version".to_string(), field_str(&chart_data, "appVersion").unwrap_or_default());
        attributes.insert("type".to_string(), field_str(&chart_data, "type").unwrap_or_else(|| "application".to_string()));

        resources.push(IaCResource {
            source: IaCSource::Helm,
            resource_type: "helm_chart".to_string(),
            name: chart_name.clone(),
            source_file: Some(rel.clone()),
            archetype_hint: archetype.map(|s| s.to_string()),
            region: None,
            notes: notes.into_iter().map(|s| s.to_string()).collect(),
            attributes,
        });

        if let Some(Value::Sequence(deps)) = field(&chart_data, "dependencies") {
            for dep in deps {
                let Some(dep_name) = field_str(dep, "name") else { continue };
                let (dep_arch, dep_notes) = helm_chart_archetype(&dep_name);
                if dep_arch.is_some() {
                    resources.push(IaCResource {
                        source: IaCSource::Helm,
                        resource_type: "helm_dependency".to_string(),
                        name: dep_name,
                        source_file: Some(rel.clone()),
                        archetype_hint: dep_arch.map(|s| s.to_string()),
                        region: None,
                        notes: dep_notes.into_iter().map(|s| s.to_string()).collect(),
                        attributes: HashMap::new(),
                    });
                }
            }
        }

        let values_path = chart_dir.join("values.yaml");
        if values_path.exists() {
            extract_values_images(&values_path, repo_root, &chart_name, &mut resources, &mut errors);
        }

        match render_chart(&chart_dir, &chart_name) {
            Ok(docs) => rendered.extend(parse_rendered_documents(&docs, &format!("helm:{chart_name}"))),
            Err(e) => errors.push(format!("helm: template render skipped for {chart_name}: {e}")),
        }
    }

    HelmScanResult { resources, rendered, errors }
}

fn field<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.as_mapping()?.get(Value::String(key.to_string()))
}

fn field_str(v: &Value, key: &str) -> Option<String> {
    field(v, key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn extract_values_images(
    values_path: &Path,
    repo_root: &Path,
    chart_name: &str,
    resources: &mut Vec<IaCResource>,
    errors: &mut Vec<String>,
) {
    let rel = values_path.strip_prefix(repo_root).unwrap_or(values_path).to_string_lossy().to_string();
    let text = match std::fs::read_to_string(values_path) {
        Ok(t) => t,
        Err(e) => {
            errors.push(format!("helm: {rel}: {e}"));
            return;
        }
    };
    let data: Value = match serde_yaml::from_str(&text) {
        Ok(v) => v,
        Err(_) => return,
    };

    let mut images = Vec::new();
    find_images(&data, &mut images);

    for img in images {
        let mut attributes = HashMap::new();
        attributes.insert("image".to_string(), img.clone());
        attributes.insert("chart".to_string(), chart_name.to_string());
        resources.push(IaCResource {
            source: IaCSource::Helm,
            resource_type: "helm_image_ref".to_string(),
            name: format!("{chart_name}/{img}"),
            source_file: Some(rel.clone()),
            archetype_hint: None,
            region: None,
            notes: Vec::new(),
            attributes,
        });
    }
}

/// Recursively scan a values.yaml-shaped mapping for image references,
/// matching the original's two idioms: `{repository, tag}` pairs and a bare
/// `image:` string/mapping field.
fn find_images(v: &Value, out: &mut Vec<String>) {
    let Value::Mapping(map) = v else { return };

    let repository = field(v, "repository").and_then(|v| v.as_str());
    let tag = field(v, "tag").and_then(|v| v.as_str());
    if let Some(repo) = repository {
        if !repo.is_empty() {
            out.push(if let Some(tag) = tag {
                format!("{repo}:{tag}")
            } else {
                repo.to_string()
            });
        }
    } else if let Some(image) = field(v, "image") {
        match image {
            Value::String(s) if s.contains('/') => out.push(s.clone()),
            Value::Mapping(_) => find_images(image, out),
            _ => {}
        }
    }

    for (k, val) in map {
        let key = k.as_str().unwrap_or_default();
        if matches!(key, "repository" | "tag" | "image") {
            continue;
        }
        match val {
            Value::Mapping(_) => find_images(val, out),
            Value::Sequence(seq) => {
                for item in seq {
                    if matches!(item, Value::Mapping(_)) {
                        find_images(item, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Run `helm template` if the binary is available; returns the rendered
/// multi-document YAML text. Absence of the binary or a non-zero exit is a
/// soft failure, not an error surfaced to the caller's error list.
fn render_chart(chart_dir: &Path, chart_name: &str) -> Result<String, String> {
    let output = Command::new("helm")
        .args(["template", chart_name])
        .arg(chart_dir)
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => "helm binary not found".to_string(),
            _ => e.to_string(),
        })?;

    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).chars().take(200).collect());
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redis_chart_name_maps_to_cache_archetype() {
        let (arch, notes) = helm_chart_archetype("redis");
        assert_eq!(arch, Some("cache"));
        assert!(!notes.is_empty());
    }

    #[test]
    fn finds_repository_tag_pair_image() {
        let yaml = "image:\n  repository: bitnami/redis\n  tag: \"7.0\"\n";
        let data: Value = serde_yaml::from_str(yaml).unwrap();
        let mut images = Vec::new();
        find_images(&data, &mut images);
        assert_eq!(images, vec!["bitnami/redis:7.0".to_string()]);
    }
}
