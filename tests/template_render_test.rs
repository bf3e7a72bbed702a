use stacksmith::config::toml_config::StackConfig;
use stacksmith::templates;
use stacksmith::utils::validation::Validate;
use std::io::Write;
use tempfile::NamedTempFile;

fn render_from_toml(content: &str) -> serde_json::Value {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();

    let config = StackConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();

    let renderer = templates::find(&config.template).unwrap();
    let json = renderer
        .render_json(Some(&config.user_data().unwrap()))
        .unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_simple_security_group_from_stack_config() {
    let document = render_from_toml(
        r#"
template = "simple-security-group"

[user_data]
VpcId = "vpc-1"
SecurityGroupDescription = "test"
SecurityGroupName = "PostgresAccess"
PostgreSQLPort = "5432"
"#,
    );

    assert_eq!(document["Description"], "Simple Security Group");
    assert_eq!(document["AWSTemplateFormatVersion"], "2010-09-09");

    let rules = &document["Resources"]["PostgresAccess"]["Properties"]["SecurityGroupIngress"];
    assert_eq!(rules.as_array().unwrap().len(), 1);
    assert_eq!(rules[0]["FromPort"], 5432);
    assert_eq!(rules[0]["CidrIp"], "192.168.1.0/24");

    assert_eq!(
        document["Outputs"]["PostgresAccess"]["Export"]["Name"],
        serde_json::json!({"Fn::Join": ["-", [{"Ref": "AWS::StackName"}, "security-group"]]})
    );
}

#[test]
fn test_simple_instance_from_stack_config() {
    let document = render_from_toml(
        r#"
template = "simple-instance"

[user_data]
SshCidr = "203.0.113.10/32"
InstanceType = "t3.micro"
"#,
    );

    let instance = &document["Resources"]["SimpleServerInstance"];
    assert_eq!(instance["Properties"]["InstanceType"], "t3.micro");
    assert_eq!(instance["DependsOn"], serde_json::json!(["InstanceSecurityGroup"]));
    assert_eq!(document["Parameters"]["KeyName"]["Type"], "AWS::EC2::KeyPair::KeyName");
}

#[test]
fn test_every_template_is_registered() {
    let names = templates::available();
    assert_eq!(names.len(), 3);
    for name in names {
        assert!(templates::find(name).is_some(), "{} not registered", name);
    }
}
