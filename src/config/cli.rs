use crate::domain::model::{ChangeRequest, Operation};
use clap::Parser;
use std::path::PathBuf;

pub const USAGE: &str = "\
SYNOPSIS
    stacksmith -s stack_name -f file_name -b bucket_name -k key_name
               -c change_set_name -t token -d description [-o operation]

    Where:
        stack_name - Stack name
        file_name - Path to the artifact to upload
        bucket_name - Existing S3 bucket name
        key_name - AWS::EC2::KeyPair::KeyName
        change_set_name - The change set name
        token - Idempotency token for the change set request
        description - The change set description
        operation - Create or update change set. Values: CREATE|UPDATE.
                    CREATE by default.
";

#[derive(Debug, Clone, Parser)]
#[command(name = "stacksmith")]
#[command(about = "Upload a build artifact to S3 and create a CloudFormation change set")]
#[command(after_help = USAGE)]
pub struct RunnerArgs {
    #[arg(short = 's', long)]
    pub stack_name: String,

    /// AWS::EC2::KeyPair::KeyName passed as the KeyName parameter
    #[arg(short = 'k', long)]
    pub key_name: String,

    #[arg(short = 'c', long)]
    pub change_set_name: String,

    /// Idempotency token (ClientToken)
    #[arg(short = 't', long)]
    pub token: String,

    #[arg(short = 'd', long)]
    pub description: String,

    #[arg(short = 'o', long, value_enum, ignore_case = true, default_value = "CREATE")]
    pub operation: Operation,

    /// Existing S3 bucket for the artifact
    #[arg(short = 'b', long)]
    pub bucket_name: String,

    /// Path to the artifact file
    #[arg(short = 'f', long)]
    pub filename: String,

    /// AWS region (defaults to the environment / profile)
    #[arg(long)]
    pub region: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl RunnerArgs {
    pub fn change_request(&self) -> ChangeRequest {
        ChangeRequest {
            stack_name: self.stack_name.clone(),
            key_name: self.key_name.clone(),
            change_set_name: self.change_set_name.clone(),
            token: self.token.clone(),
            description: self.description.clone(),
            operation: self.operation,
            bucket_name: self.bucket_name.clone(),
            filename: self.filename.clone(),
        }
    }
}
