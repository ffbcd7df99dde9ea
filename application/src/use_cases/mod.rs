//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod bench;
pub mod deliberate;
pub mod run_batch;
pub mod run_hearing;
#[cfg(test)]
pub(crate) mod test_support;
