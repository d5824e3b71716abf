//! Common utilities for integration tests.
//!
//! Shared LocalStack client setup and fixture helpers.

pub mod localstack;

pub use localstack::LocalStackTestContext;
