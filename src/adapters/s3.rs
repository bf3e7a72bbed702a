use crate::domain::ports::ObjectStore;
use crate::utils::error::{DeployError, Result};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        let result = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await;

        match result {
            Ok(output) => {
                tracing::debug!("PutObject s3://{}/{} etag={:?}", bucket, key, output.e_tag());
                Ok(())
            }
            Err(err) => {
                let detail = DisplayErrorContext(&err).to_string();
                let message = match err.into_service_error() {
                    PutObjectError::InvalidRequest(e) => {
                        format!("invalid request: {}", e.message().unwrap_or("no details"))
                    }
                    PutObjectError::EncryptionTypeMismatch(e) => format!(
                        "encryption type mismatch: {}",
                        e.message().unwrap_or("no details")
                    ),
                    // 沒有對應型別的錯誤只能看 code，例如 NoSuchBucket / AccessDenied
                    other => match other.code() {
                        Some(code) => {
                            format!("{}: {}", code, other.message().unwrap_or("no details"))
                        }
                        None => detail,
                    },
                };

                Err(DeployError::StoreTransmission {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message,
                })
            }
        }
    }
}
