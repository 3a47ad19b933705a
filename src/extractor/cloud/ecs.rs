//! ECS cluster/service discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_ecs::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    let cluster_arns = match client.list_clusters().send().await {
        Ok(resp) => resp.cluster_arns().to_vec(),
        Err(e) => {
            errors.push(format!("list_clusters: {e}"));
            return (resources, errors);
        }
    };

    if cluster_arns.is_empty() {
        return (resources, errors);
    }

    let described = match client
        .describe_clusters()
        .set_clusters(Some(cluster_arns))
        .include(aws_sdk_ecs::types::ClusterField::Statistics)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            errors.push(format!("describe_clusters: {e}"));
            return (resources, errors);
        }
    };

    for cluster in described.clusters() {
        let cluster_name = cluster.cluster_name().unwrap_or_default().to_string();

        let mut attributes = HashMap::new();
        attributes.insert("status".to_string(), cluster.status().unwrap_or_default().to_string());
        attributes.insert("running_tasks".to_string(), cluster.running_tasks_count().to_string());
        attributes.insert("pending_tasks".to_string(), cluster.pending_tasks_count().to_string());
        attributes.insert("active_services".to_string(), cluster.active_services_count().to_string());
        attributes.insert("registered_instances".to_string(), cluster.registered_container_instances_count().to_string());

        resources.push(IaCResource {
            source: IaCSource::CloudLive,
            resource_type: "aws_ecs_cluster".to_string(),
            name: cluster_name.clone(),
            source_file: Some(format!("aws:{region}")),
            archetype_hint: Some("custom-app".to_string()),
            region: Some(region.to_string()),
            notes: vec![
                "Enable CloudWatch Container Insights".to_string(),
                "Monitor task count, CPU, memory utilisation".to_string(),
                "Alert on service deployment failures".to_string(),
            ],
            attributes,
        });

        match discover_services(&client, &cluster_name, region).await {
            Ok(services) => resources.extend(services),
            Err(e) => errors.push(format!("ECS services in cluster {cluster_name}: {e}")),
        }
    }

    (resources, errors)
}

async fn discover_services(
    client: &aws_sdk_ecs::Client,
    cluster_name: &str,
    region: &str,
) -> Result<Vec<IaCResource>, aws_sdk_ecs::Error> {
    let service_arns = client
        .list_services()
        .cluster(cluster_name)
        .send()
        .await?
        .service_arns()
        .to_vec();

    let mut resources = Vec::new();
    for batch in service_arns.chunks(10) {
        let resp = client
            .describe_services()
            .cluster(cluster_name)
            .set_services(Some(batch.to_vec()))
            .send()
            .await?;

        for svc in resp.services() {
            let task_def = svc.task_definition().unwrap_or_default();
            let mut attributes = HashMap::new();
            attributes.insert("status".to_string(), svc.status().unwrap_or_default().to_string());
            attributes.insert("desired_count".to_string(), svc.desired_count().to_string());
            attributes.insert("running_count".to_string(), svc.running_count().to_string());
            attributes.insert("launch_type".to_string(), format!("{:?}", svc.launch_type()));
            attributes.insert("task_definition".to_string(), task_def.rsplit('/').next().unwrap_or(task_def).to_string());

            resources.push(IaCResource {
                source: IaCSource::CloudLive,
                resource_type: "aws_ecs_service".to_string(),
                name: format!("{cluster_name}/{}", svc.service_name().unwrap_or_default()),
                source_file: Some(format!("aws:{region}")),
                archetype_hint: Some("custom-app".to_string()),
                region: Some(region.to_string()),
                notes: vec![
                    "Monitor desired vs running task count".to_string(),
                    "Alert on deployment rollbacks and OOM kills".to_string(),
                ],
                attributes,
            });
        }
    }
    Ok(resources)
}
