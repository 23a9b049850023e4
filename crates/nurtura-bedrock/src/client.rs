//! AWS SDK configuration for the Bedrock generator.
//!
//! Built once at process bootstrap; the resulting config is handed to
//! [`crate::BedrockGenerator::new`].

/// Build an `SdkConfig` for a region using the default credential chain.
pub async fn build_aws_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}
