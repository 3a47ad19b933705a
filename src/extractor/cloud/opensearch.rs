//! OpenSearch domain discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_opensearch::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    let names = match client.list_domain_names().send().await {
        Ok(resp) => resp
            .domain_names()
            .iter()
            .filter_map(|d| d.domain_name().map(|s| s.to_string()))
            .collect::<Vec<_>>(),
        Err(e) => {
            errors.push(format!("list_domain_names: {e}"));
            return (resources, errors);
        }
    };

    for batch in names.chunks(5) {
        let resp = match client
            .describe_domains()
            .set_domain_names(Some(batch.to_vec()))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                errors.push(format!("describe_domains: {e}"));
                continue;
            }
        };

        for domain in resp.domain_status_list() {
            let mut attributes = HashMap::new();
            attributes.insert("engine_version".to_string(), domain.engine_version().unwrap_or_default().to_string());
            attributes.insert("processing".to_string(), domain.processing().unwrap_or(false).to_string());
            if let Some(cluster) = domain.cluster_config() {
                attributes.insert(
                    "instance_count".to_string(),
                    cluster.instance_count().unwrap_or_default().to_string(),
                );
                attributes.insert(
                    "instance_type".to_string(),
                    format!("{:?}", cluster.instance_type()),
                );
            }

            resources.push(IaCResource {
                source: IaCSource::CloudLive,
                resource_type: "aws_opensearch_domain".to_string(),
                name: domain.domain_name().unwrap_or_default().to_string(),
                source_file: Some(format!("aws:{region}")),
                archetype_hint: Some("search-engine".to_string()),
                region: Some(region.to_string()),
                notes: vec![
                    "Monitor via CloudWatch or elasticsearch_exporter against the domain endpoint".to_string(),
                    "Monitor cluster status (red/yellow), JVM memory pressure, free storage space".to_string(),
                    "Import Grafana dashboard 11464".to_string(),
                ],
                attributes,
            });
        }
    }

    (resources, errors)
}
