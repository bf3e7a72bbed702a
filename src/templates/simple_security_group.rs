use crate::core::security_group::SecurityGroupResourceBuilder;
use crate::domain::model::UserData;
use crate::domain::ports::TemplateRenderer;
use crate::domain::template::{join, stack_name, Output, Resource, Template};
use crate::ipam::HomeOffice;
use crate::templates::{optional_port, required_str};
use crate::utils::error::Result;
use serde_json::json;

/// Security group that lets the home office reach a PostgreSQL port.
///
/// User data: `VpcId`, `SecurityGroupDescription`, `SecurityGroupName`
/// (required) and `PostgreSQLPort` (optional, all ports when absent).
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSecurityGroupTemplate;

impl SimpleSecurityGroupTemplate {
    pub const NAME: &'static str = "simple-security-group";
}

impl TemplateRenderer for SimpleSecurityGroupTemplate {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, user_data: Option<&UserData>) -> Result<Template> {
        let vpc_id = required_str(Self::NAME, user_data, "VpcId")?;
        let description = required_str(Self::NAME, user_data, "SecurityGroupDescription")?;
        let group_name = required_str(Self::NAME, user_data, "SecurityGroupName")?;
        let postgresql_port = optional_port(Self::NAME, user_data, "PostgreSQLPort")?;

        let home_office = HomeOffice {
            from_port: postgresql_port,
            to_port: postgresql_port,
        };

        let security_group = SecurityGroupResourceBuilder::new(vpc_id, description)?
            .with_name(group_name.as_str())
            .allow_access_from(home_office)
            .build()?;

        let mut template = Template::new("Simple Security Group");
        let group_ref = template.add_resource(&security_group.name, Resource::from(&security_group))?;

        template.add_output(
            &group_name,
            Output::new(group_ref).with_export(join("-", vec![stack_name(), json!("security-group")])),
        )?;

        Ok(template)
    }
}
