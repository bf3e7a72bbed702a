use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Artifact not found: {path}")]
    ArtifactNotFound { path: String },

    #[error("Failed to upload s3://{bucket}/{key}: {message}")]
    StoreTransmission {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Change set '{change_set_name}' for stack '{stack_name}' rejected: {message}")]
    ChangeSetRejected {
        stack_name: String,
        change_set_name: String,
        code: Option<String>,
        message: String,
    },

    #[error("Template error in {template}: {message}")]
    TemplateError { template: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Artifact,
    Store,
    Orchestration,
    Template,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeployError {
    pub fn config(message: impl Into<String>) -> Self {
        DeployError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DeployError::ConfigError { .. }
            | DeployError::MissingConfigError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            DeployError::ArtifactNotFound { .. } => ErrorCategory::Artifact,
            DeployError::StoreTransmission { .. } => ErrorCategory::Store,
            DeployError::ChangeSetRejected { .. } => ErrorCategory::Orchestration,
            DeployError::TemplateError { .. } | DeployError::SerializationError(_) => {
                ErrorCategory::Template
            }
            DeployError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Artifact => ErrorSeverity::High,
            ErrorCategory::Store | ErrorCategory::Orchestration => ErrorSeverity::High,
            ErrorCategory::Template => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the command line flags or the stack config file",
            ErrorCategory::Artifact => "Check that the artifact path exists and was built",
            ErrorCategory::Store => "Check the bucket name, AWS credentials and network access",
            ErrorCategory::Orchestration => {
                "Use a new change set name or fix the template, then run again; the uploaded artifact is left in the bucket"
            }
            ErrorCategory::Template => "Check the template user data",
            ErrorCategory::System => "Check file permissions and disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeployError::ConfigError { message } => format!("Invalid configuration: {}", message),
            DeployError::MissingConfigError { field } => {
                format!("Required option '{}' is missing", field)
            }
            DeployError::InvalidConfigValueError { field, reason, .. } => {
                format!("Option '{}' is invalid: {}", field, reason)
            }
            DeployError::ConfigValidationError { field, message } => {
                format!("Config '{}' could not be loaded: {}", field, message)
            }
            DeployError::ArtifactNotFound { path } => {
                format!("Artifact file '{}' does not exist", path)
            }
            DeployError::StoreTransmission { bucket, key, .. } => {
                format!("Could not upload '{}' to bucket '{}'", key, bucket)
            }
            DeployError::ChangeSetRejected {
                change_set_name,
                message,
                ..
            } => format!("CloudFormation rejected change set '{}': {}", change_set_name, message),
            other => other.to_string(),
        }
    }

    /// 所有錯誤都是致命的，只決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
