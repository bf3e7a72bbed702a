//! Minimal CloudFormation document model.
//!
//! Only what the bundled templates need: parameters, resources with free-form
//! properties, outputs with exports, and a few intrinsic functions. Maps are
//! `BTreeMap`s so the rendered JSON has sorted, stable keys.

use crate::domain::model::SecurityGroupResource;
use crate::utils::error::{DeployError, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, Parameter>,
    #[serde(rename = "Resources")]
    resources: BTreeMap<String, Resource>,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: description.into(),
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// 加入參數，回傳指向它的 `Ref`
    pub fn add_parameter(&mut self, name: &str, parameter: Parameter) -> Result<Value> {
        insert_unique(&mut self.parameters, "parameter", name, parameter)?;
        Ok(reference(name))
    }

    /// 加入資源，回傳指向它的 `Ref`
    pub fn add_resource(&mut self, name: &str, resource: Resource) -> Result<Value> {
        insert_unique(&mut self.resources, "resource", name, resource)?;
        Ok(reference(name))
    }

    pub fn add_output(&mut self, name: &str, output: Output) -> Result<()> {
        insert_unique(&mut self.outputs, "output", name, output)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.get(name)
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: &str,
    name: &str,
    value: T,
) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DeployError::TemplateError {
            template: name.to_string(),
            message: format!("{} name must be non-empty and alphanumeric", kind),
        });
    }

    if map.contains_key(name) {
        return Err(DeployError::TemplateError {
            template: name.to_string(),
            message: format!("duplicate {} name", kind),
        });
    }

    map.insert(name.to_string(), value);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub r#type: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "ConstraintDescription", skip_serializing_if = "Option::is_none")]
    pub constraint_description: Option<String>,
    #[serde(rename = "Default", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "MinLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<String>,
    #[serde(rename = "MaxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<String>,
    #[serde(rename = "AllowedPattern", skip_serializing_if = "Option::is_none")]
    pub allowed_pattern: Option<String>,
    #[serde(rename = "NoEcho", skip_serializing_if = "Option::is_none")]
    pub no_echo: Option<bool>,
}

impl Parameter {
    pub fn new(r#type: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            description: None,
            constraint_description: None,
            default: None,
            min_length: None,
            max_length: None,
            allowed_pattern: None,
            no_echo: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_constraint_description(mut self, constraint: impl Into<String>) -> Self {
        self.constraint_description = Some(constraint.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min.to_string());
        self.max_length = Some(max.to_string());
        self
    }

    pub fn with_allowed_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pattern = Some(pattern.into());
        self
    }

    pub fn no_echo(mut self) -> Self {
        self.no_echo = Some(true);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub r#type: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
    #[serde(rename = "DependsOn", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn new(r#type: impl Into<String>, properties: Value) -> Self {
        Self {
            r#type: r#type.into(),
            properties,
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl From<&SecurityGroupResource> for Resource {
    fn from(group: &SecurityGroupResource) -> Self {
        Resource::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": group.description,
                "SecurityGroupIngress": group.rules,
                "VpcId": group.vpc_id,
            }),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    #[serde(rename = "Value")]
    pub value: Value,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Export", skip_serializing_if = "Option::is_none")]
    pub export: Option<Value>,
}

impl Output {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            description: None,
            export: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_export(mut self, name: Value) -> Self {
        self.export = Some(json!({ "Name": name }));
        self
    }
}

pub fn reference(name: &str) -> Value {
    json!({ "Ref": name })
}

pub fn get_att(resource: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [resource, attribute] })
}

pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

pub fn stack_name() -> Value {
    reference("AWS::StackName")
}

pub fn tags(pairs: &[(&str, &str)]) -> Value {
    Value::Array(
        pairs
            .iter()
            .map(|(key, value)| json!({ "Key": key, "Value": value }))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::IngressRule;

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut template = Template::new("Only resources");
        template
            .add_resource("Queue", Resource::new("AWS::SQS::Queue", json!({})))
            .unwrap();

        let json: Value = serde_json::from_str(&template.to_json().unwrap()).unwrap();
        assert_eq!(json["AWSTemplateFormatVersion"], "2010-09-09");
        assert!(json.get("Parameters").is_none());
        assert!(json.get("Outputs").is_none());
        assert_eq!(json["Resources"]["Queue"]["Type"], "AWS::SQS::Queue");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut template = Template::new("dup");
        template
            .add_parameter("KeyName", Parameter::new("String"))
            .unwrap();
        assert!(template
            .add_parameter("KeyName", Parameter::new("String"))
            .is_err());
        assert!(template
            .add_resource("Bad-Name", Resource::new("AWS::SQS::Queue", json!({})))
            .is_err());
    }

    #[test]
    fn test_security_group_resource_conversion() {
        let group = SecurityGroupResource {
            name: "Db".to_string(),
            description: "db access".to_string(),
            vpc_id: "vpc-1".to_string(),
            rules: vec![IngressRule {
                protocol: "tcp".to_string(),
                cidr: "192.168.1.0/24".to_string(),
                description: "home".to_string(),
                from_port: Some(5432),
                to_port: Some(5432),
            }],
        };

        let resource = Resource::from(&group);
        assert_eq!(resource.r#type, "AWS::EC2::SecurityGroup");
        assert_eq!(
            resource.properties,
            json!({
                "GroupDescription": "db access",
                "VpcId": "vpc-1",
                "SecurityGroupIngress": [{
                    "IpProtocol": "tcp",
                    "CidrIp": "192.168.1.0/24",
                    "Description": "home",
                    "FromPort": 5432,
                    "ToPort": 5432
                }]
            })
        );
    }

    #[test]
    fn test_intrinsics() {
        assert_eq!(reference("Vpc"), json!({"Ref": "Vpc"}));
        assert_eq!(get_att("Role", "Arn"), json!({"Fn::GetAtt": ["Role", "Arn"]}));
        assert_eq!(
            join("-", vec![stack_name(), json!("security-group")]),
            json!({"Fn::Join": ["-", [{"Ref": "AWS::StackName"}, "security-group"]]})
        );
    }
}
