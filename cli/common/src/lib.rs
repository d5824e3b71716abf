//! Shared utilities for bucketwatch CLI binaries.
//!
//! Log level selection, logging initialization and summary formatting.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_duration, format_number};
pub use logging::init_logging;
