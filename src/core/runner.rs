use crate::domain::model::{
    Capability, ChangeRequest, ChangeSetReceipt, ChangeSetRequest, StackParameter,
    UploadedArtifact, UserData,
};
use crate::domain::ports::{ChangeSetService, ObjectStore, TemplateRenderer};
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use std::path::Path;
use tracing::Instrument;

pub const KEY_NAME_PARAMETER: &str = "KeyName";

impl Validate for ChangeRequest {
    fn validate(&self) -> Result<()> {
        // 只檢查是否為空，其餘交給服務端判斷
        validate_non_empty_string("stack_name", &self.stack_name)?;
        validate_non_empty_string("key_name", &self.key_name)?;
        validate_non_empty_string("change_set_name", &self.change_set_name)?;
        validate_non_empty_string("token", &self.token)?;
        validate_non_empty_string("description", &self.description)?;
        validate_non_empty_string("bucket_name", &self.bucket_name)?;
        validate_path("filename", &self.filename)?;
        Ok(())
    }
}

/// Uploads the build artifact, then asks CloudFormation for a change set.
///
/// The two steps run strictly in order. `submit_change` needs the
/// [`UploadedArtifact`] returned by `upload_artifact`, so a change set can
/// never be requested for an artifact that was not stored. Nothing is rolled
/// back: when the change set is rejected the object stays in the bucket.
pub struct Runner<S: ObjectStore, C: ChangeSetService, T: TemplateRenderer> {
    request: ChangeRequest,
    store: S,
    change_sets: C,
    template: T,
    span: tracing::Span,
}

impl<S: ObjectStore, C: ChangeSetService, T: TemplateRenderer> Runner<S, C, T> {
    pub fn new(request: ChangeRequest, store: S, change_sets: C, template: T) -> Result<Self> {
        request.validate()?;

        let span = tracing::info_span!(
            "runner",
            stack = %request.stack_name,
            change_set = %request.change_set_name
        );

        span.in_scope(|| {
            tracing::info!("stack_name: {}", request.stack_name);
            tracing::info!("key_name: {}", request.key_name);
            tracing::info!("change_set_name: {}", request.change_set_name);
            tracing::info!("token: {}", request.token);
            tracing::info!("description: {}", request.description);
            tracing::info!("operation: {}", request.operation);
            tracing::info!("bucket_name: {}", request.bucket_name);
            tracing::info!("filename: {}", request.filename);
            tracing::info!("template: {}", template.name());
        });

        Ok(Self {
            request,
            store,
            change_sets,
            template,
            span,
        })
    }

    pub fn request(&self) -> &ChangeRequest {
        &self.request
    }

    pub async fn upload_artifact(&self) -> Result<UploadedArtifact> {
        self.upload_inner().instrument(self.span.clone()).await
    }

    pub async fn submit_change(&self, artifact: &UploadedArtifact) -> Result<ChangeSetReceipt> {
        self.submit_inner(artifact)
            .instrument(self.span.clone())
            .await
    }

    pub async fn run(&self) -> Result<ChangeSetReceipt> {
        let artifact = self.upload_artifact().await?;
        self.submit_change(&artifact).await
    }

    async fn upload_inner(&self) -> Result<UploadedArtifact> {
        let path = Path::new(&self.request.filename);
        let key = object_key(path)?;
        tracing::info!("key: {}", key);

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DeployError::ArtifactNotFound {
                    path: self.request.filename.clone(),
                });
            }
            Err(e) => return Err(DeployError::IoError(e)),
        };

        let size = data.len();
        tracing::debug!(
            "Uploading {} bytes to s3://{}/{}",
            size,
            self.request.bucket_name,
            key
        );

        self.store
            .put_object(&self.request.bucket_name, &key, data)
            .await?;

        tracing::info!(
            "✅ Uploaded {} to s3://{}/{}",
            self.request.filename,
            self.request.bucket_name,
            key
        );

        Ok(UploadedArtifact {
            bucket: self.request.bucket_name.clone(),
            key,
            size,
        })
    }

    async fn submit_inner(&self, artifact: &UploadedArtifact) -> Result<ChangeSetReceipt> {
        let mut user_data = UserData::new();
        user_data.insert("ArtifactBucket".to_string(), artifact.bucket().into());
        user_data.insert("ArtifactKey".to_string(), artifact.key().into());

        let template_body = self.template.render_json(Some(&user_data))?;
        tracing::debug!("Rendered {} ({} bytes)", self.template.name(), template_body.len());

        let request = self.change_set_request(template_body);
        tracing::info!(
            "Creating change set {} ({}) for stack {}",
            request.change_set_name,
            request.change_set_type,
            request.stack_name
        );

        let receipt = self.change_sets.create_change_set(request).await?;
        tracing::info!("✅ Change set submitted: {}", receipt);

        Ok(receipt)
    }

    fn change_set_request(&self, template_body: String) -> ChangeSetRequest {
        ChangeSetRequest {
            stack_name: self.request.stack_name.clone(),
            template_body,
            use_previous_template: false,
            parameters: vec![StackParameter {
                key: KEY_NAME_PARAMETER.to_string(),
                value: self.request.key_name.clone(),
                use_previous_value: false,
            }],
            capabilities: vec![Capability::NamedIam],
            change_set_name: self.request.change_set_name.clone(),
            client_token: self.request.token.clone(),
            description: self.request.description.clone(),
            change_set_type: self.request.operation,
        }
    }
}

/// 物件鍵 = 檔案的 base name
pub fn object_key(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| DeployError::InvalidConfigValueError {
            field: "filename".to_string(),
            value: path.display().to_string(),
            reason: "Path has no file name".to_string(),
        })
}
