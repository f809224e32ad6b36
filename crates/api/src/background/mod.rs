//! Long-running background tasks spawned by the server binary.

pub mod job_expiry;
