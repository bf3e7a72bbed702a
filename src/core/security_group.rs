use crate::domain::model::{IngressRule, SecurityGroupResource, DEFAULT_SECURITY_GROUP_NAME};
use crate::domain::ports::IpAddressManagement;
use crate::utils::error::{DeployError, Result};
use ipnet::IpNet;
use std::sync::Arc;

/// Collects network ranges and turns them into one `AWS::EC2::SecurityGroup`.
///
/// ```
/// use stacksmith::core::security_group::SecurityGroupResourceBuilder;
/// use stacksmith::ipam::HomeOffice;
///
/// let group = SecurityGroupResourceBuilder::new("vpc-1", "test")?
///     .with_name("DatabaseAccess")
///     .allow_access_from(HomeOffice::new().with_port(5432))
///     .build()?;
///
/// assert_eq!(group.rules.len(), 1);
/// # Ok::<(), stacksmith::DeployError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SecurityGroupResourceBuilder {
    vpc_id: String,
    description: String,
    name: String,
    rules: Vec<Arc<dyn IpAddressManagement>>,
}

impl SecurityGroupResourceBuilder {
    pub fn new(vpc_id: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        let vpc_id = vpc_id.into();
        let description = description.into();

        if vpc_id.trim().is_empty() {
            return Err(DeployError::config("VPC ID: required value"));
        }

        if description.trim().is_empty() {
            return Err(DeployError::config(
                "Security Group Description: required value",
            ));
        }

        Ok(Self {
            vpc_id,
            description,
            name: DEFAULT_SECURITY_GROUP_NAME.to_string(),
            rules: Vec::new(),
        })
    }

    pub fn allow_access_from<R>(mut self, rule: R) -> Self
    where
        R: IpAddressManagement + 'static,
    {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[cfg(test)]
    fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn build(self) -> Result<SecurityGroupResource> {
        let mut rules = Vec::with_capacity(self.rules.len());

        for (position, source) in self.rules.iter().enumerate() {
            let protocol = source.protocol();
            if protocol.trim().is_empty() {
                return Err(DeployError::config(format!(
                    "Ingress rule #{} ({}): protocol cannot be empty",
                    position + 1,
                    source.description()
                )));
            }

            let cidr = source.cidr();
            validate_cidr(cidr).map_err(|reason| {
                DeployError::config(format!(
                    "Ingress rule #{} ({}): invalid CIDR '{}': {}",
                    position + 1,
                    source.description(),
                    cidr,
                    reason
                ))
            })?;

            rules.push(IngressRule {
                protocol: protocol.to_string(),
                cidr: cidr.to_string(),
                description: source.description().to_string(),
                from_port: source.from_port(),
                to_port: source.to_port(),
            });
        }

        tracing::debug!(
            "Built security group {} with {} ingress rules",
            self.name,
            rules.len()
        );

        Ok(SecurityGroupResource {
            name: self.name,
            description: self.description,
            vpc_id: self.vpc_id,
            rules,
        })
    }
}

// CidrIp 只接受 IPv4
fn validate_cidr(cidr: &str) -> std::result::Result<(), String> {
    match cidr.parse::<IpNet>().map_err(|e| e.to_string())? {
        IpNet::V4(_) => Ok(()),
        IpNet::V6(_) => Err("IPv6 ranges are not supported".to_string()),
    }
}
