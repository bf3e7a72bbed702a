// Adapters layer: AWS SDK implementations of the domain ports.

#[cfg(feature = "aws")]
pub mod aws;
#[cfg(feature = "aws")]
pub mod cloudformation;
#[cfg(feature = "aws")]
pub mod s3;
