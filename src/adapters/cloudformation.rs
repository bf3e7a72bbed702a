use crate::domain::model::{Capability, ChangeSetReceipt, ChangeSetRequest, Operation};
use crate::domain::ports::ChangeSetService;
use crate::utils::error::{DeployError, Result};
use async_trait::async_trait;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudformation::types::{self as cfn, ChangeSetType};
use aws_sdk_cloudformation::Client as CloudFormationClient;

#[derive(Debug, Clone)]
pub struct CloudFormationChangeSets {
    client: CloudFormationClient,
}

impl CloudFormationChangeSets {
    pub fn new(client: CloudFormationClient) -> Self {
        Self { client }
    }
}

fn change_set_type(operation: Operation) -> ChangeSetType {
    match operation {
        Operation::Create => ChangeSetType::Create,
        Operation::Update => ChangeSetType::Update,
    }
}

fn capability(capability: Capability) -> cfn::Capability {
    match capability {
        Capability::NamedIam => cfn::Capability::CapabilityNamedIam,
    }
}

#[async_trait]
impl ChangeSetService for CloudFormationChangeSets {
    async fn create_change_set(&self, request: ChangeSetRequest) -> Result<ChangeSetReceipt> {
        let mut call = self
            .client
            .create_change_set()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .use_previous_template(request.use_previous_template)
            .change_set_name(&request.change_set_name)
            .client_token(&request.client_token)
            .description(&request.description)
            .change_set_type(change_set_type(request.change_set_type));

        for parameter in &request.parameters {
            call = call.parameters(
                cfn::Parameter::builder()
                    .parameter_key(&parameter.key)
                    .parameter_value(&parameter.value)
                    .use_previous_value(parameter.use_previous_value)
                    .build(),
            );
        }

        for cap in &request.capabilities {
            call = call.capabilities(capability(*cap));
        }

        match call.send().await {
            Ok(output) => Ok(ChangeSetReceipt {
                id: output.id().map(str::to_string),
                stack_id: output.stack_id().map(str::to_string),
            }),
            Err(err) => {
                let detail = DisplayErrorContext(&err).to_string();
                let service_error = err.into_service_error();
                let code = service_error.code().map(str::to_string);
                let message = service_error
                    .message()
                    .map(str::to_string)
                    .unwrap_or(detail);

                Err(DeployError::ChangeSetRejected {
                    stack_name: request.stack_name,
                    change_set_name: request.change_set_name,
                    code,
                    message,
                })
            }
        }
    }
}
