//! Infrastructure-as-code and cloud-live discovery results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where an [`IaCResource`] was observed. `CloudLive` covers resources found
/// by querying a provider API directly rather than parsing source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IaCSource {
    Terraform,
    Helm,
    Kustomize,
    Pulumi,
    CloudLive,
}

impl std::fmt::Display for IaCSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IaCSource::Terraform => "terraform",
            IaCSource::Helm => "helm",
            IaCSource::Kustomize => "kustomize",
            IaCSource::Pulumi => "pulumi",
            IaCSource::CloudLive => "cloud-live",
        };
        write!(f, "{s}")
    }
}

/// One infrastructure resource, declared in source or discovered live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IaCResource {
    pub source: IaCSource,
    /// Provider-qualified type, e.g. `aws_db_instance`, `helm:Deployment`,
    /// or an AWS service name for cloud-live entries (`rds`, `elasticache`, …).
    pub resource_type: String,
    pub name: String,
    pub source_file: Option<String>,
    /// Best-effort archetype guess for infra the manifest extractor would
    /// never see directly (a managed RDS instance has no K8s manifest).
    pub archetype_hint: Option<String>,
    pub region: Option<String>,
    pub notes: Vec<String>,
    pub attributes: HashMap<String, String>,
}

/// All IaC-sourced resources found under a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IaCDiscovery {
    pub resources: Vec<IaCResource>,
    /// Non-fatal parse/render problems, one line each, surfaced in the
    /// platform report rather than aborting extraction.
    pub errors: Vec<String>,
}

impl IaCDiscovery {
    pub fn merge(&mut self, other: IaCDiscovery) {
        self.resources.extend(other.resources);
        self.errors.extend(other.errors);
    }

    pub fn by_source(&self, source: IaCSource) -> impl Iterator<Item = &IaCResource> {
        self.resources.iter().filter(move |r| r.source == source)
    }
}

/// Cloud-live discovery results across however many regions were queried.
/// Kept distinct from [`IaCDiscovery`] because its resources carry
/// `source == IaCSource::CloudLive` and originate from a fixed discoverer
/// order rather than file parsing, but the two are concatenated into one
/// view for reporting purposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsDiscovery {
    pub resources: Vec<IaCResource>,
    /// Per-service, non-fatal discovery failures (credentials missing,
    /// API error, …), one line each — discovery continues past these.
    pub errors: Vec<String>,
    pub regions_queried: Vec<String>,
}

impl AwsDiscovery {
    pub fn merge(&mut self, other: AwsDiscovery) {
        self.resources.extend(other.resources);
        self.errors.extend(other.errors);
        for r in other.regions_queried {
            if !self.regions_queried.contains(&r) {
                self.regions_queried.push(r);
            }
        }
    }
}
