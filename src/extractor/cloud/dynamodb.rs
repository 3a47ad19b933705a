//! DynamoDB table discovery.

use crate::model::{IaCResource, IaCSource};
use aws_config::SdkConfig;
use std::collections::HashMap;

pub async fn discover(config: &SdkConfig, region: &str) -> (Vec<IaCResource>, Vec<String>) {
    let client = aws_sdk_dynamodb::Client::new(config);
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    let names = match client.list_tables().send().await {
        Ok(resp) => resp.table_names().to_vec(),
        Err(e) => {
            errors.push(format!("list_tables: {e}"));
            return (resources, errors);
        }
    };

    for name in names {
        let table = match client.describe_table().table_name(&name).send().await {
            Ok(resp) => resp.table,
            Err(e) => {
                errors.push(format!("describe_table {name}: {e}"));
                continue;
            }
        };
        let Some(table) = table else { continue };

        let billing_mode = table
            .billing_mode_summary()
            .and_then(|b| b.billing_mode())
            .map(|b| b.as_str().to_string())
            .unwrap_or_else(|| "PROVISIONED".to_string());

        let mut attributes = HashMap::new();
        attributes.insert("status".to_string(), format!("{:?}", table.table_status()));
        attributes.insert("billing_mode".to_string(), billing_mode);
        attributes.insert("item_count".to_string(), table.item_count().unwrap_or_default().to_string());
        if let Some(throughput) = table.provisioned_throughput() {
            attributes.insert("read_capacity".to_string(), throughput.read_capacity_units().unwrap_or_default().to_string());
            attributes.insert("write_capacity".to_string(), throughput.write_capacity_units().unwrap_or_default().to_string());
        }

        resources.push(IaCResource {
            source: IaCSource::CloudLive,
            resource_type: "aws_dynamodb_table".to_string(),
            name,
            source_file: Some(format!("aws:{region}")),
            archetype_hint: Some("database".to_string()),
            region: Some(region.to_string()),
            notes: vec![
                "Monitor via CloudWatch".to_string(),
                "Alert on ThrottledRequests and ConsumedReadCapacityUnits/ConsumedWriteCapacityUnits".to_string(),
                "Monitor SystemErrors and UserErrors".to_string(),
            ],
            attributes,
        });
    }

    (resources, errors)
}
