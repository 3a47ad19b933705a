//! The multi-source platform extractor. Four independent sub-extractors
//! feed a single aggregation pass that builds the [`crate::model::Platform`]
//! every tool reads from.

pub mod aggregator;
pub mod cloud;
pub mod iac;
pub mod manifest;

use crate::model::Platform;
use std::path::Path;

/// Knobs the `analyze`/`scan` handlers pass down into extraction: manifest
/// include/exclude globs plus cloud credentials/regions.
pub struct ExtractOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub aws_regions: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            include: manifest::DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: manifest::DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            aws_regions: Vec::new(),
        }
    }
}

/// Run the full extraction pipeline over a repository: manifest walk, four
/// IaC sub-passes, optional cloud-live discovery, then aggregation into a
/// [`Platform`]. The only fatal condition is a missing repo root —
/// everything downstream of that is independently fault-tolerant and lands
/// in `platform.parse_errors`/`iac.errors`/`aws.errors`.
pub async fn extract(repo_root: &Path, options: &ExtractOptions) -> crate::error::Result<Platform> {
    if !repo_root.exists() {
        return Err(crate::error::ObsAgentError::RepoNotFound(repo_root.to_path_buf()));
    }

    let manifest_result = manifest::scan_directory(repo_root, &options.include, &options.exclude);
    let (iac_discovery, rendered) = iac::scan(repo_root);

    let mut resources = manifest_result.resources;
    resources.extend(rendered);

    let aws_discovery = if options.aws_regions.is_empty() {
        crate::model::AwsDiscovery::default()
    } else {
        cloud::discover(&options.aws_regions).await
    };

    let mut platform = aggregator::build(resources, iac_discovery, aws_discovery);
    platform.parse_errors.extend(manifest_result.errors);

    Ok(platform)
}
