//! SQS queue discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_sqs::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    match client.list_queues().send().await {
        Ok(resp) => {
            for url in resp.queue_urls() {
                let name = url.rsplit('/').next().unwrap_or(url).to_string();
                let is_dlq = name.ends_with("-dlq") || name.ends_with("-dead-letter");

                let mut attributes = HashMap::new();
                attributes.insert("url".to_string(), url.to_string());
                attributes.insert("is_dead_letter_queue".to_string(), is_dlq.to_string());

                let mut notes = vec![
                    "Monitor via CloudWatch".to_string(),
                    "Alert on ApproximateNumberOfMessagesVisible (queue depth)".to_string(),
                    "Alert on ApproximateAgeOfOldestMessage".to_string(),
                ];
                if is_dlq {
                    notes.push("Alert on DLQ receiving messages".to_string());
                }

                resources.push(IaCResource {
                    source: IaCSource::CloudLive,
                    resource_type: "aws_sqs_queue".to_string(),
                    name,
                    source_file: Some(format!("aws:{region}")),
                    archetype_hint: Some("message-queue".to_string()),
                    region: Some(region.to_string()),
                    notes,
                    attributes,
                });
            }
        }
        Err(e) => errors.push(format!("list_queues: {e}")),
    }

    (resources, errors)
}
