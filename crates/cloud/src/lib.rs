//! Cloud-side collaborators: the S3 staging bucket and the HTTP worker
//! trigger.

pub mod s3;
pub mod trigger;

pub use s3::S3BlobStore;
pub use trigger::{HttpWorkerTrigger, DEFAULT_TRIGGER_TIMEOUT};
