//! S3 bucket discovery.
//!
//! `list_buckets` is a global call; buckets are filtered down to the region
//! currently being scanned, so each bucket's location is looked up
//! individually before it is kept.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_s3::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    let buckets = match client.list_buckets().send().await {
        Ok(resp) => resp.buckets().to_vec(),
        Err(e) => {
            errors.push(format!("list_buckets: {e}"));
            return (resources, errors);
        }
    };

    for bucket in buckets {
        let Some(name) = bucket.name() else { continue };

        let bucket_region = match client.get_bucket_location().bucket(name).send().await {
            Ok(resp) => resp
                .location_constraint()
                .map(|c| {
                    let s = c.as_str();
                    if s.is_empty() { "us-east-1".to_string() } else { s.to_string() }
                })
                .unwrap_or_else(|| "us-east-1".to_string()),
            Err(e) => {
                errors.push(format!("get_bucket_location {name}: {e}"));
                continue;
            }
        };

        if bucket_region != region {
            continue;
        }

        let mut attributes = HashMap::new();
        attributes.insert("region".to_string(), bucket_region);
        if let Some(created) = bucket.creation_date() {
            attributes.insert("created".to_string(), created.to_string());
        }

        resources.push(IaCResource {
            source: IaCSource::CloudLive,
            resource_type: "aws_s3_bucket".to_string(),
            name: name.to_string(),
            source_file: Some(format!("aws:{region}")),
            archetype_hint: None,
            region: Some(region.to_string()),
            notes: vec![
                "Monitor via CloudWatch storage metrics (BucketSizeBytes, NumberOfObjects)".to_string(),
                "Enable S3 request metrics for request-rate alerting if high-traffic".to_string(),
            ],
            attributes,
        });
    }

    (resources, errors)
}
