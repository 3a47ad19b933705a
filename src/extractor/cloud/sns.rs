//! SNS topic discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_sns::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    match client.list_topics().send().await {
        Ok(resp) => {
            for topic in resp.topics() {
                let arn = topic.topic_arn().unwrap_or_default();
                let name = arn.rsplit(':').next().unwrap_or(arn).to_string();

                let mut attributes = HashMap::new();
                attributes.insert("arn".to_string(), arn.to_string());

                resources.push(IaCResource {
                    source: IaCSource::CloudLive,
                    resource_type: "aws_sns_topic".to_string(),
                    name,
                    source_file: Some(format!("aws:{region}")),
                    archetype_hint: Some("message-queue".to_string()),
                    region: Some(region.to_string()),
                    notes: vec![
                        "Monitor via CloudWatch".to_string(),
                        "Alert on NumberOfNotificationsFailed".to_string(),
                        "Monitor NumberOfMessagesPublished".to_string(),
                    ],
                    attributes,
                });
            }
        }
        Err(e) => errors.push(format!("list_topics: {e}")),
    }

    (resources, errors)
}
