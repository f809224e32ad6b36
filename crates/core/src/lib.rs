//! Domain types and collaborator seams for the poster generation job service.
//!
//! Everything here is free of I/O: the object store, job table and worker
//! trigger are expressed as traits so the pipeline can be wired against
//! AWS/Postgres in production and against [`memory`] fakes in tests.

pub mod blob;
pub mod error;
pub mod job;
pub mod memory;
pub mod store;
pub mod trigger;
pub mod types;
pub mod validation;
