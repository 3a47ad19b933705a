//! RDS instance/cluster discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

fn engine_archetype(engine: &str) -> (&'static str, Vec<&'static str>) {
    match engine {
        "postgres" | "aurora-postgresql" => (
            "database",
            vec![
                "Deploy postgres_exporter sidecar or use CloudWatch metrics",
                "Monitor replication lag, connections, IOPS, disk usage",
                "Import Grafana dashboard 9628",
            ],
        ),
        "mysql" | "mariadb" | "aurora-mysql" => (
            "database",
            vec![
                "Deploy mysqld_exporter sidecar or use CloudWatch metrics",
                "Monitor replication lag, connections, IOPS, slow queries",
                "Import Grafana dashboard 7362",
            ],
        ),
        "oracle-ee" => ("database", vec!["Use CloudWatch or oracledb_exporter", "Monitor tablespace, sessions, wait events"]),
        "sqlserver-ee" => ("database", vec!["Use CloudWatch or mssql_exporter", "Monitor deadlocks, batch requests, buffer cache hit ratio"]),
        _ => ("database", vec!["Monitor via CloudWatch", "Monitor connections, IOPS, storage"]),
    }
}

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_rds::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    match client.describe_db_instances().send().await {
        Ok(resp) => {
            for db in resp.db_instances() {
                let engine = db.engine().unwrap_or("unknown");
                let (archetype, notes) = engine_archetype(engine);
                let mut attributes = HashMap::new();
                attributes.insert("engine".to_string(), engine.to_string());
                attributes.insert("engine_version".to_string(), db.engine_version().unwrap_or_default().to_string());
                attributes.insert("instance_class".to_string(), db.db_instance_class().unwrap_or_default().to_string());
                attributes.insert("status".to_string(), db.db_instance_status().unwrap_or_default().to_string());
                attributes.insert("multi_az".to_string(), db.multi_az().unwrap_or(false).to_string());
                if let Some(endpoint) = db.endpoint() {
                    attributes.insert("endpoint".to_string(), endpoint.address().unwrap_or_default().to_string());
                    attributes.insert("port".to_string(), endpoint.port().unwrap_or_default().to_string());
                }

                resources.push(IaCResource {
                    source: IaCSource::CloudLive,
                    resource_type: "aws_rds_instance".to_string(),
                    name: db.db_instance_identifier().unwrap_or_default().to_string(),
                    source_file: Some(format!("aws:{region}")),
                    archetype_hint: Some(archetype.to_string()),
                    region: Some(region.to_string()),
                    notes: notes.into_iter().map(|s| s.to_string()).collect(),
                    attributes,
                });
            }
        }
        Err(e) => errors.push(format!("describe_db_instances: {e}")),
    }

    match client.describe_db_clusters().send().await {
        Ok(resp) => {
            for cluster in resp.db_clusters() {
                let engine = cluster.engine().unwrap_or("unknown");
                let (archetype, notes) = engine_archetype(engine);
                let mut attributes = HashMap::new();
                attributes.insert("engine".to_string(), engine.to_string());
                attributes.insert("engine_version".to_string(), cluster.engine_version().unwrap_or_default().to_string());
                attributes.insert("status".to_string(), cluster.status().unwrap_or_default().to_string());
                attributes.insert("members".to_string(), cluster.db_cluster_members().len().to_string());
                attributes.insert("endpoint".to_string(), cluster.endpoint().unwrap_or_default().to_string());

                resources.push(IaCResource {
                    source: IaCSource::CloudLive,
                    resource_type: "aws_rds_cluster".to_string(),
                    name: cluster.db_cluster_identifier().unwrap_or_default().to_string(),
                    source_file: Some(format!("aws:{region}")),
                    archetype_hint: Some(archetype.to_string()),
                    region: Some(region.to_string()),
                    notes: notes.into_iter().map(|s| s.to_string()).collect(),
                    attributes,
                });
            }
        }
        Err(e) => errors.push(format!("describe_db_clusters: {e}")),
    }

    (resources, errors)
}
