use crate::domain::model::UserData;
use crate::domain::ports::TemplateRenderer;
use crate::domain::template::{get_att, reference, tags, Output, Parameter, Resource, Template};
use crate::templates::{optional_str, required_str};
use crate::utils::error::Result;
use serde_json::json;

/// Lambda function deployed from an artifact that the runner uploads to S3.
///
/// Required user data: `ArtifactBucket`, `ArtifactKey`. Optional:
/// `FunctionName`, `Handler`, `Runtime`.
#[derive(Debug, Clone)]
pub struct LambdaFunctionTemplate {
    pub function_name: String,
    pub handler: String,
    pub runtime: String,
    pub memory_size: u32,
    pub timeout_seconds: u32,
}

impl LambdaFunctionTemplate {
    pub const NAME: &'static str = "lambda-function";
}

impl Default for LambdaFunctionTemplate {
    fn default() -> Self {
        Self {
            function_name: "stacksmith-example-function".to_string(),
            handler: "bootstrap".to_string(),
            runtime: "provided.al2023".to_string(),
            memory_size: 320,
            timeout_seconds: 15,
        }
    }
}

impl TemplateRenderer for LambdaFunctionTemplate {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, user_data: Option<&UserData>) -> Result<Template> {
        let bucket = required_str(Self::NAME, user_data, "ArtifactBucket")?;
        let key = required_str(Self::NAME, user_data, "ArtifactKey")?;
        let function_name = optional_str(Self::NAME, user_data, "FunctionName")?
            .unwrap_or_else(|| self.function_name.clone());
        let handler = optional_str(Self::NAME, user_data, "Handler")?
            .unwrap_or_else(|| self.handler.clone());
        let runtime = optional_str(Self::NAME, user_data, "Runtime")?
            .unwrap_or_else(|| self.runtime.clone());

        let mut template = Template::new("Lambda function deployed from an S3 artifact");

        template.add_parameter(
            "KeyName",
            Parameter::new("AWS::EC2::KeyPair::KeyName")
                .with_constraint_description("must be the name of an existing EC2 KeyPair.")
                .with_description("Name of an existing EC2 KeyPair to enable SSH access to the instance"),
        )?;

        let vpc = template.add_resource(
            "LambdaVpc",
            Resource::new(
                "AWS::EC2::VPC",
                json!({
                    "CidrBlock": "192.168.96.0/22",
                    "InstanceTenancy": "default",
                    "EnableDnsSupport": true,
                    "EnableDnsHostnames": true,
                    "Tags": tags(&[("Name", "Lambda VPC")]),
                }),
            ),
        )?;

        let subnet = template.add_resource(
            "LambdaSubnet",
            Resource::new(
                "AWS::EC2::Subnet",
                json!({
                    "CidrBlock": "192.168.97.0/26",
                    "VpcId": vpc,
                    "Tags": tags(&[("Name", "Lambda Subnet")]),
                }),
            ),
        )?;

        let security_group = template.add_resource(
            "LambdaSecurityGroup",
            Resource::new(
                "AWS::EC2::SecurityGroup",
                json!({
                    "GroupDescription": "Lambda function network interfaces",
                    "VpcId": vpc,
                }),
            ),
        )?;

        // 長輪詢 20 秒，訊息最大 256KiB，保留 14 天
        template.add_resource(
            "DeadLetterQueue",
            Resource::new(
                "AWS::SQS::Queue",
                json!({
                    "DelaySeconds": 0,
                    "ReceiveMessageWaitTimeSeconds": 20,
                    "MaximumMessageSize": 262144,
                    "VisibilityTimeout": 30,
                    "MessageRetentionPeriod": 1209600,
                }),
            ),
        )?;

        template.add_resource(
            "LambdaRole",
            Resource::new(
                "AWS::IAM::Role",
                json!({
                    "Path": "/stacksmith/",
                    "AssumeRolePolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Principal": {"Service": "lambda.amazonaws.com"},
                            "Action": "sts:AssumeRole"
                        }]
                    },
                    "ManagedPolicyArns": [
                        "arn:aws:iam::aws:policy/service-role/AWSLambdaVPCAccessExecutionRole",
                        "arn:aws:iam::aws:policy/AWSXrayWriteOnlyAccess"
                    ],
                    "Policies": [{
                        "PolicyName": "dead-letter-queue",
                        "PolicyDocument": {
                            "Version": "2012-10-17",
                            "Statement": [{
                                "Effect": "Allow",
                                "Action": ["sqs:SendMessage"],
                                "Resource": get_att("DeadLetterQueue", "Arn")
                            }]
                        }
                    }]
                }),
            ),
        )?;

        let function = template.add_resource(
            "LambdaFunction",
            Resource::new(
                "AWS::Lambda::Function",
                json!({
                    "FunctionName": function_name,
                    "Description": function_name,
                    "Code": {"S3Bucket": bucket, "S3Key": key},
                    "Handler": handler,
                    "Runtime": runtime,
                    "MemorySize": self.memory_size,
                    "Timeout": self.timeout_seconds,
                    "Role": get_att("LambdaRole", "Arn"),
                    "DeadLetterConfig": {"TargetArn": get_att("DeadLetterQueue", "Arn")},
                    "VpcConfig": {
                        "SecurityGroupIds": [security_group],
                        "SubnetIds": [subnet],
                    },
                }),
            ),
        )?;

        template.add_resource(
            "LambdaVersion",
            Resource::new(
                "AWS::Lambda::Version",
                json!({
                    "Description": format!("Built from s3://{}/{}", bucket, key),
                    "FunctionName": function,
                }),
            ),
        )?;

        template.add_resource(
            "LambdaAlias",
            Resource::new(
                "AWS::Lambda::Alias",
                json!({
                    "Name": "live",
                    "FunctionName": function,
                    "FunctionVersion": get_att("LambdaVersion", "Version"),
                }),
            ),
        )?;

        template.add_output(
            "FunctionArn",
            Output::new(get_att("LambdaFunction", "Arn")).with_description("Lambda function ARN"),
        )?;
        template.add_output("FunctionName", Output::new(reference("LambdaFunction")))?;

        Ok(template)
    }
}
