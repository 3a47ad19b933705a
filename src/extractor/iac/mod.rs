//! Infrastructure-as-code extraction. Four independent sub-passes, each
//! fault-isolated from the others: a failure in one never prevents the
//! remaining three from running.

mod archetypes;
mod helm;
mod kustomize;
mod pulumi;
mod terraform;

use crate::model::{IaCDiscovery, K8sResource};
use std::path::Path;

/// Scan a repository for Terraform, Helm, Kustomize, and Pulumi sources.
/// Returns the aggregated [`IaCDiscovery`] plus any K8s resources that could
/// be rendered from Helm/Kustomize templates (fed back into the platform
/// alongside statically-discovered manifests).
pub fn scan(repo_root: &Path) -> (IaCDiscovery, Vec<K8sResource>) {
    let mut discovery = IaCDiscovery::default();
    let mut rendered = Vec::new();

    let (tf_resources, tf_errors) = terraform::discover(repo_root);
    discovery.resources.extend(tf_resources);
    discovery.errors.extend(tf_errors);

    let helm_result = helm::discover(repo_root);
    discovery.resources.extend(helm_result.resources);
    discovery.errors.extend(helm_result.errors);
    rendered.extend(helm_result.rendered);

    let kust_result = kustomize::discover(repo_root);
    discovery.resources.extend(kust_result.resources);
    discovery.errors.extend(kust_result.errors);
    rendered.extend(kust_result.rendered);

    let (pulumi_resources, pulumi_errors) = pulumi::discover(repo_root);
    discovery.resources.extend(pulumi_resources);
    discovery.errors.extend(pulumi_errors);

    (discovery, rendered)
}
