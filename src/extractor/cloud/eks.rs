//! EKS cluster discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_eks::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    let names = match client.list_clusters().send().await {
        Ok(resp) => resp.clusters().to_vec(),
        Err(e) => {
            errors.push(format!("list_clusters: {e}"));
            return (resources, errors);
        }
    };

    for name in names {
        let cluster = match client.describe_cluster().name(&name).send().await {
            Ok(resp) => resp.cluster,
            Err(e) => {
                errors.push(format!("describe_cluster {name}: {e}"));
                continue;
            }
        };
        let Some(cluster) = cluster else { continue };

        let mut attributes = HashMap::new();
        attributes.insert("status".to_string(), format!("{:?}", cluster.status()));
        attributes.insert("version".to_string(), cluster.version().unwrap_or_default().to_string());
        attributes.insert("platform_version".to_string(), cluster.platform_version().unwrap_or_default().to_string());

        resources.push(IaCResource {
            source: IaCSource::CloudLive,
            resource_type: "aws_eks_cluster".to_string(),
            name,
            source_file: Some(format!("aws:{region}")),
            archetype_hint: Some("monitoring".to_string()),
            region: Some(region.to_string()),
            notes: vec![
                "Enable control plane logging to CloudWatch".to_string(),
                "Run cluster-level Prometheus/Grafana stack for workload metrics".to_string(),
                "Monitor node group capacity and control-plane API latency".to_string(),
            ],
            attributes,
        });
    }

    (resources, errors)
}
