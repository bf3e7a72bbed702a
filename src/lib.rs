pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod ipam;
pub mod templates;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::RunnerArgs;
pub use config::StackConfig;

#[cfg(feature = "aws")]
pub use adapters::{aws::AwsContext, cloudformation::CloudFormationChangeSets, s3::S3ObjectStore};

pub use crate::core::{runner::Runner, security_group::SecurityGroupResourceBuilder};
pub use domain::model::{ChangeRequest, ChangeSetReceipt, Operation, UserData};
pub use utils::error::{DeployError, Result};
