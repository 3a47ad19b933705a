//! Lambda function discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_lambda::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    match client.list_functions().send().await {
        Ok(resp) => {
            for f in resp.functions() {
                let mut attributes = HashMap::new();
                attributes.insert("runtime".to_string(), format!("{:?}", f.runtime()));
                attributes.insert("memory_mb".to_string(), f.memory_size().unwrap_or_default().to_string());
                attributes.insert("timeout_seconds".to_string(), f.timeout().unwrap_or_default().to_string());
                attributes.insert("handler".to_string(), f.handler().unwrap_or_default().to_string());
                attributes.insert("last_modified".to_string(), f.last_modified().unwrap_or_default().to_string());

                resources.push(IaCResource {
                    source: IaCSource::CloudLive,
                    resource_type: "aws_lambda_function".to_string(),
                    name: f.function_name().unwrap_or_default().to_string(),
                    source_file: Some(format!("aws:{region}")),
                    archetype_hint: Some("custom-app".to_string()),
                    region: Some(region.to_string()),
                    notes: vec![
                        "Monitor via CloudWatch".to_string(),
                        "Alert on Errors, Throttles, Duration".to_string(),
                        "Monitor ConcurrentExecutions and IteratorAge (for stream-based)".to_string(),
                    ],
                    attributes,
                });
            }
        }
        Err(e) => errors.push(format!("list_functions: {e}")),
    }

    (resources, errors)
}
