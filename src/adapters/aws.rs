use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::sync::Arc;

/// AWS SDK config loaded once, shared by the S3 and CloudFormation clients.
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
}

impl AwsContext {
    /// 讀取預設憑證鏈；沒有指定 region 時沿用環境設定
    pub async fn load(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = loader.load().await;

        if let Some(region) = config.region() {
            tracing::debug!("Using AWS region {}", region);
        }

        Self {
            config: Arc::new(config),
        }
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn s3_client(&self) -> aws_sdk_s3::Client {
        aws_sdk_s3::Client::new(self.sdk_config())
    }

    pub fn cloudformation_client(&self) -> aws_sdk_cloudformation::Client {
        aws_sdk_cloudformation::Client::new(self.sdk_config())
    }
}
