pub mod runner;
pub mod security_group;

pub use crate::domain::model::{ChangeRequest, ChangeSetReceipt, Operation, UploadedArtifact};
pub use crate::domain::ports::{ChangeSetService, IpAddressManagement, ObjectStore, TemplateRenderer};
pub use crate::utils::error::Result;
