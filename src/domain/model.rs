use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::DeployError;

pub const DEFAULT_PROTOCOL: &str = "tcp";
pub const DEFAULT_SECURITY_GROUP_NAME: &str = "SecurityGroupDefaultName";

/// Template user data (Sceptre 的 sceptre_user_data)
pub type UserData = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    #[serde(rename = "IpProtocol")]
    pub protocol: String,
    #[serde(rename = "CidrIp")]
    pub cidr: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "FromPort", skip_serializing_if = "Option::is_none")]
    pub from_port: Option<i32>,
    #[serde(rename = "ToPort", skip_serializing_if = "Option::is_none")]
    pub to_port: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupResource {
    pub name: String,
    pub description: String,
    pub vpc_id: String,
    pub rules: Vec<IngressRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "cli", value(rename_all = "UPPER"))]
pub enum Operation {
    #[default]
    Create,
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Operation::Create),
            "UPDATE" => Ok(Operation::Update),
            _ => Err(DeployError::InvalidConfigValueError {
                field: "operation".to_string(),
                value: s.to_string(),
                reason: "Values: CREATE|UPDATE".to_string(),
            }),
        }
    }
}

/// 一次部署所需的全部輸入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub stack_name: String,
    pub key_name: String,
    pub change_set_name: String,
    pub token: String,
    pub description: String,
    #[serde(default)]
    pub operation: Operation,
    pub bucket_name: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackParameter {
    pub key: String,
    pub value: String,
    pub use_previous_value: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    NamedIam,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
        }
    }
}

/// Request handed to the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetRequest {
    pub stack_name: String,
    pub template_body: String,
    pub use_previous_template: bool,
    pub parameters: Vec<StackParameter>,
    pub capabilities: Vec<Capability>,
    pub change_set_name: String,
    pub client_token: String,
    pub description: String,
    pub change_set_type: Operation,
}

/// Service response, passed back to the operator untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetReceipt {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "StackId")]
    pub stack_id: Option<String>,
}

impl fmt::Display for ChangeSetReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'Id': '{}', 'StackId': '{}'}}",
            self.id.as_deref().unwrap_or_default(),
            self.stack_id.as_deref().unwrap_or_default()
        )
    }
}

/// Proof that the artifact upload completed; only the runner creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArtifact {
    pub(crate) bucket: String,
    pub(crate) key: String,
    pub(crate) size: usize,
}

impl UploadedArtifact {
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn size(&self) -> usize {
        self.size
    }
}
