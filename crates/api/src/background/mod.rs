//! Background jobs.

pub mod recovery;
