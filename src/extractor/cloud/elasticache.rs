//! ElastiCache discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

fn engine_archetype(engine: &str) -> Vec<&'static str> {
    match engine {
        "redis" => vec![
            "Deploy redis_exporter or use CloudWatch",
            "Monitor hit rate, evictions, memory usage, connections",
            "Import Grafana dashboard 11835",
        ],
        "memcached" => vec!["Deploy memcached_exporter or use CloudWatch", "Monitor hit rate, evictions, curr_items, connections"],
        "valkey" => vec![
            "Deploy redis_exporter (Valkey-compatible) or use CloudWatch",
            "Monitor hit rate, evictions, memory usage",
            "Import Grafana dashboard 11835",
        ],
        _ => vec!["Monitor via CloudWatch"],
    }
}

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_elasticache::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    match client.describe_replication_groups().send().await {
        Ok(resp) => {
            for rg in resp.replication_groups() {
                let description = rg.description().unwrap_or_default().to_lowercase();
                let engine = if description.contains("valkey") { "valkey" } else { "redis" };
                let notes = engine_archetype(engine);

                let mut attributes = HashMap::new();
                attributes.insert("engine".to_string(), engine.to_string());
                attributes.insert("status".to_string(), rg.status().unwrap_or_default().to_string());
                attributes.insert("num_node_groups".to_string(), rg.node_groups().len().to_string());
                attributes.insert("cluster_mode".to_string(), rg.cluster_enabled().unwrap_or(false).to_string());

                resources.push(IaCResource {
                    source: IaCSource::CloudLive,
                    resource_type: "aws_elasticache_replication_group".to_string(),
                    name: rg.replication_group_id().unwrap_or_default().to_string(),
                    source_file: Some(format!("aws:{region}")),
                    archetype_hint: Some("cache".to_string()),
                    region: Some(region.to_string()),
                    notes: notes.into_iter().map(|s| s.to_string()).collect(),
                    attributes,
                });
            }
        }
        Err(e) => errors.push(format!("describe_replication_groups: {e}")),
    }

    match client.describe_cache_clusters().send().await {
        Ok(resp) => {
            for cluster in resp.cache_clusters() {
                if cluster.replication_group_id().is_some() {
                    continue;
                }
                let engine = cluster.engine().unwrap_or("unknown");
                let notes = engine_archetype(engine);

                let mut attributes = HashMap::new();
                attributes.insert("engine".to_string(), engine.to_string());
                attributes.insert("engine_version".to_string(), cluster.engine_version().unwrap_or_default().to_string());
                attributes.insert("node_type".to_string(), cluster.cache_node_type().unwrap_or_default().to_string());
                attributes.insert("num_nodes".to_string(), cluster.num_cache_nodes().unwrap_or_default().to_string());
                attributes.insert("status".to_string(), cluster.cache_cluster_status().unwrap_or_default().to_string());

                resources.push(IaCResource {
                    source: IaCSource::CloudLive,
                    resource_type: "aws_elasticache_cluster".to_string(),
                    name: cluster.cache_cluster_id().unwrap_or_default().to_string(),
                    source_file: Some(format!("aws:{region}")),
                    archetype_hint: Some("cache".to_string()),
                    region: Some(region.to_string()),
                    notes: notes.into_iter().map(|s| s.to_string()).collect(),
                    attributes,
                });
            }
        }
        Err(e) => errors.push(format!("describe_cache_clusters: {e}")),
    }

    (resources, errors)
}
