//! Expose secnum's internal API for use in integration tests. The numbering
//! itself lives in `secnum-core`, which is the crate to depend on.
pub mod build;
pub mod cli;
pub mod site;
