//! MSK (Kafka) cluster discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_kafka::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    match client.list_clusters_v2().send().await {
        Ok(resp) => {
            for cluster in resp.cluster_info_list() {
                let mut attributes = HashMap::new();
                attributes.insert("cluster_type".to_string(), format!("{:?}", cluster.cluster_type()));
                attributes.insert("state".to_string(), format!("{:?}", cluster.state()));
                if let Some(provisioned) = cluster.provisioned() {
                    attributes.insert("broker_nodes".to_string(), provisioned.number_of_broker_nodes().to_string());
                    if let Some(info) = provisioned.broker_node_group_info() {
                        attributes.insert("instance_type".to_string(), info.instance_type().unwrap_or_default().to_string());
                    }
                }

                resources.push(IaCResource {
                    source: IaCSource::CloudLive,
                    resource_type: "aws_msk_cluster".to_string(),
                    name: cluster.cluster_name().unwrap_or_default().to_string(),
                    source_file: Some(format!("aws:{region}")),
                    archetype_hint: Some("message-queue".to_string()),
                    region: Some(region.to_string()),
                    notes: vec![
                        "Deploy kafka_exporter or use CloudWatch".to_string(),
                        "Monitor consumer lag, partition count, under-replicated partitions".to_string(),
                        "Import Grafana dashboard 7589".to_string(),
                    ],
                    attributes,
                });
            }
        }
        Err(e) => errors.push(format!("list_clusters_v2: {e}")),
    }

    (resources, errors)
}
