//! Row structs mapping database tables onto domain models.

pub mod job;
