//! Test helpers module
//!
//! Shared builders and proptest strategies for the integration tests.

pub mod test_data;

pub use test_data::*;
