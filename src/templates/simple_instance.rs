use crate::core::security_group::SecurityGroupResourceBuilder;
use crate::domain::model::UserData;
use crate::domain::ports::TemplateRenderer;
use crate::domain::template::{reference, tags, Output, Parameter, Resource, Template};
use crate::ipam::NamedNetwork;
use crate::templates::{optional_str, required_str};
use crate::utils::error::Result;
use serde_json::json;

/// One EC2 instance in its own VPC with SSH open to a single range.
///
/// User data: `SshCidr` (required), `ImageId` and `InstanceType` (optional).
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleInstanceTemplate;

impl SimpleInstanceTemplate {
    pub const NAME: &'static str = "simple-instance";
    const DEFAULT_IMAGE_ID: &'static str = "ami-ae0937c8";
    const DEFAULT_INSTANCE_TYPE: &'static str = "m3.large";
}

impl TemplateRenderer for SimpleInstanceTemplate {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, user_data: Option<&UserData>) -> Result<Template> {
        let ssh_cidr = required_str(Self::NAME, user_data, "SshCidr")?;
        let image_id = optional_str(Self::NAME, user_data, "ImageId")?
            .unwrap_or_else(|| Self::DEFAULT_IMAGE_ID.to_string());
        let instance_type = optional_str(Self::NAME, user_data, "InstanceType")?
            .unwrap_or_else(|| Self::DEFAULT_INSTANCE_TYPE.to_string());

        let mut template = Template::new("Simple template example with one instance");

        let key_name = template.add_parameter(
            "KeyName",
            Parameter::new("AWS::EC2::KeyPair::KeyName")
                .with_constraint_description("must be the name of an existing EC2 KeyPair.")
                .with_description("Name of an existing EC2 KeyPair to enable SSH access to the instance"),
        )?;

        let vpc = template.add_resource(
            "InstanceVpc",
            Resource::new(
                "AWS::EC2::VPC",
                json!({
                    "CidrBlock": "192.168.96.0/22",
                    "InstanceTenancy": "default",
                    "EnableDnsSupport": true,
                    "EnableDnsHostnames": true,
                    "Tags": tags(&[("Name", "Instance VPC")]),
                }),
            ),
        )?;

        let subnet = template.add_resource(
            "PublicSubnet",
            Resource::new(
                "AWS::EC2::Subnet",
                json!({
                    "CidrBlock": "192.168.97.0/26",
                    "VpcId": vpc,
                    "Tags": tags(&[("Name", "Public")]),
                }),
            ),
        )?;

        // VpcId 是 Ref，先用 builder 組好規則，再換成 Ref
        let ssh_group = SecurityGroupResourceBuilder::new("InstanceVpc", "SSH access to the instance")?
            .with_name("InstanceSecurityGroup")
            .allow_access_from(NamedNetwork::new(ssh_cidr, "SSH").with_port(22))
            .build()?;
        let mut group_resource = Resource::from(&ssh_group);
        group_resource.properties["VpcId"] = vpc;
        let security_group = template.add_resource(&ssh_group.name, group_resource)?;

        template.add_resource(
            "SimpleServerInstance",
            Resource::new(
                "AWS::EC2::Instance",
                json!({
                    "DisableApiTermination": false,
                    "InstanceInitiatedShutdownBehavior": "stop",
                    "ImageId": image_id,
                    "InstanceType": instance_type,
                    "KeyName": key_name,
                    "Monitoring": false,
                    "Tags": tags(&[("Name", "SimpleServer")]),
                    "NetworkInterfaces": [{
                        "AssociatePublicIpAddress": true,
                        "DeleteOnTermination": true,
                        "Description": "Primary network interface",
                        "DeviceIndex": "0",
                        "SubnetId": subnet,
                        "GroupSet": [security_group],
                        "PrivateIpAddresses": [{
                            "Primary": true,
                            "PrivateIpAddress": "192.168.97.30"
                        }]
                    }],
                }),
            )
            .depends_on("InstanceSecurityGroup"),
        )?;

        template.add_output("InstanceId", Output::new(reference("SimpleServerInstance")))?;

        Ok(template)
    }
}
