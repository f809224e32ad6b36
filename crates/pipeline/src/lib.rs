//! Submission and polling pipeline for generation jobs.
//!
//! [`JobDispatcher`] stages inputs, persists the job record and triggers the
//! worker; [`StatusReader`] serves the polling path. Both are wired from
//! injected [`poster_core`] trait objects and hold no other state.

pub mod dispatcher;
pub mod staging;
pub mod status;

pub use dispatcher::{JobDispatcher, SubmitError, SubmitJob, SubmitStep};
pub use staging::{BlobStager, StagingError};
pub use status::{ReportedStatus, StatusReader, StatusView};
