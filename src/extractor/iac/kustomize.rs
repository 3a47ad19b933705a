//! Kustomize IaC sub-extractor.

use super::archetypes::helm_chart_archetype;
use crate::extractor::manifest::parse_rendered_documents;
use crate::model::{IaCResource, IaCSource, K8sResource};
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

pub struct KustomizeScanResult {
    pub resources: Vec<IaCResource>,
    pub rendered: Vec<K8sResource>,
    pub errors: Vec<String>,
}

pub fn discover(repo_root: &Path) -> KustomizeScanResult {
    let mut resources = Vec::new();
    let mut rendered = Vec::new();
    let mut errors = Vec::new();

    for entry in walkdir::WalkDir::new(repo_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name == "kustomization.yaml" || name == "kustomization.yml"
        })
    {
        let path = entry.path();
        let rel = path.strip_prefix(repo_root).unwrap_or(path).to_string_lossy().to_string();
        if rel.split('/').any(|part| part.starts_with('.')) {
            continue;
        }

        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                errors.push(format!("kustomize: {rel}: {e}"));
                continue;
            }
        };
        let data: Value = match serde_yaml::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                errors.push(format!("kustomize: {rel}: {e}"));
                continue;
            }
        };
        let Value::Mapping(_) = &data else { continue };

        let kust_dir = path.parent().unwrap_or(repo_root);

        let mut attributes = HashMap::new();
        attributes.insert("namespace".to_string(), field_str(&data, "namespace").unwrap_or_default());
        attributes.insert(
            "resources".to_string(),
            list_field(&data, "resources").join(","),
        );
        attributes.insert("bases".to_string(), list_field(&data, "bases").join(","));

        resources.push(IaCResource {
            source: IaCSource::Kustomize,
            resource_type: "kustomization".to_string(),
            name: kust_dir.strip_prefix(repo_root).unwrap_or(kust_dir).to_string_lossy().to_string(),
            source_file: Some(rel.clone()),
            archetype_hint: None,
            region: None,
            notes: Vec::new(),
            attributes,
        });

        if let Some(Value::Sequence(charts)) = field(&data, "helmCharts") {
            for chart in charts {
                let Some(chart_name) = field_str(chart, "name") else { continue };
                let (archetype, notes) = helm_chart_archetype(&chart_name);
                resources.push(IaCResource {
                    source: IaCSource::Kustomize,
                    resource_type: "kustomize_helm_chart".to_string(),
                    name: chart_name,
                    source_file: Some(rel.clone()),
                    archetype_hint: archetype.map(|s| s.to_string()),
                    region: None,
                    notes: notes.into_iter().map(|s| s.to_string()).collect(),
                    attributes: HashMap::new(),
                });
            }
        }

        match render_kustomize(kust_dir) {
            Ok(docs) => {
                let label = format!("kustomize:{}", kust_dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
                rendered.extend(parse_rendered_documents(&docs, &label));
            }
            Err(e) => errors.push(format!("kustomize: render skipped for {rel}: {e}")),
        }
    }

    KustomizeScanResult { resources, rendered, errors }
}

fn field<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.as_mapping()?.get(Value::String(key.to_string()))
}

fn field_str(v: &Value, key: &str) -> Option<String> {
    field(v, key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn list_field(v: &Value, key: &str) -> Vec<String> {
    match field(v, key) {
        Some(Value::Sequence(seq)) => seq.iter().filter_map(|s| s.as_str().map(|s| s.to_string())).collect(),
        _ => Vec::new(),
    }
}

fn render_kustomize(kust_dir: &Path) -> Result<String, String> {
    let output = Command::new("kubectl")
        .args(["kustomize"])
        .arg(kust_dir)
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => "kubectl binary not found".to_string(),
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
    use std::io::Write;

    #[test]
    fn plain_kustomization_is_recorded_without_helm_charts() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("kustomization.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "namespace: prod\nresources:\n  - deployment.yaml\n  - service.yaml\n").unwrap();
        let result = discover(tmp.path());
        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.resources[0].attributes.get("namespace").map(|s| s.as_str()), Some("prod"));
    }
}
