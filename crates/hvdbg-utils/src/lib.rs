//! # hvdbg Utilities
//!
//! Shared utilities for the hvdbg workspace.
//!
//! This crate owns the logging setup built on `tracing`, so the binary and
//! the interpreter core agree on formats and environment variables.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    init_logging, init_logging_for_repl, init_logging_with_level, LogFormat, LogLevel, LoggingError, LoggingGuard,
};
pub use tracing::{debug, error, info, trace, warn};
