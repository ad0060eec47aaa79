//! Logging utilities.
//!
//! Centralizes logger initialization behind the standard `log` facade,
//! backed by `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
