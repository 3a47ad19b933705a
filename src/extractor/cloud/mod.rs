//! Live AWS resource discovery.
//!
//! Eleven service discoverers run in a fixed order per region; each is
//! independently fault-tolerant — a missing permission or an unreachable
//! endpoint degrades to a logged error for that service only, never aborting
//! the remaining discoverers.

mod dynamodb;
mod ecs;
mod eks;
mod elasticache;
mod lambda;
mod msk;
mod opensearch;
mod rds;
mod s3;
mod sns;
mod sqs;

use crate::model::AwsDiscovery;
use aws_config::SdkConfig;

/// Discover AWS resources across one or more regions. Building the
/// per-region `SdkConfig` itself failing (e.g. malformed explicit region) is
/// recorded as an error for that region only.
pub async fn discover(regions: &[String]) -> AwsDiscovery {
    let mut out = AwsDiscovery::default();

    for region in regions {
        let config = aws_config::from_env()
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;

        out.regions_queried.push(region.clone());
        run_region(&config, region, &mut out).await;
    }

    out
}

/// Fixed discovery order: RDS, ElastiCache, MSK, SQS, SNS, Lambda, ECS,
/// EKS, OpenSearch, DynamoDB, S3.
async fn run_region(config: &SdkConfig, region: &str, out: &mut AwsDiscovery) {
    macro_rules! run {
        ($label:literal, $module:ident) => {
            let (resources, errors) = $module::discover(config, region).await;
            if !resources.is_empty() {
                log::info!("AWS discovery: {} found {} resources in {region}", $label, resources.len());
            }
            out.resources.extend(resources);
            out.errors.extend(
                errors
                    .into_iter()
                    .map(|e| format!("AWS {} scan error in {region}: {e}", $label)),
            );
        };
    }

    run!("RDS", rds);
    run!("ElastiCache", elasticache);
    run!("MSK", msk);
    run!("SQS", sqs);
    run!("SNS", sns);
    run!("Lambda", lambda);
    run!("ECS", ecs);
    run!("EKS", eks);
    run!("OpenSearch", opensearch);
    run!("DynamoDB", dynamodb);
    run!("S3", s3);
}
