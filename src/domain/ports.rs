use crate::domain::model::{ChangeSetReceipt, ChangeSetRequest, UserData, DEFAULT_PROTOCOL};
use crate::domain::template::Template;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// A named network range that may be granted inbound access.
pub trait IpAddressManagement: Debug + Send + Sync {
    fn cidr(&self) -> &str;
    fn description(&self) -> &str;

    fn protocol(&self) -> &str {
        DEFAULT_PROTOCOL
    }

    /// `None` together with `to_port() == None` means all ports.
    fn from_port(&self) -> Option<i32> {
        None
    }

    fn to_port(&self) -> Option<i32> {
        None
    }
}

pub trait ObjectStore: Send + Sync {
    /// Creates or overwrites `key` in `bucket`.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait ChangeSetService: Send + Sync {
    async fn create_change_set(&self, request: ChangeSetRequest) -> Result<ChangeSetReceipt>;
}

/// A template module: optional user data in, CloudFormation document out.
pub trait TemplateRenderer: Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, user_data: Option<&UserData>) -> Result<Template>;

    fn render_json(&self, user_data: Option<&UserData>) -> Result<String> {
        self.render(user_data)?.to_json()
    }
}
