//! # Observability Infrastructure
//!
//! Structured logging for the provisioner. Every setup and teardown step emits
//! `tracing` events with structured fields so skipped or failed fixtures can
//! be diagnosed from test output.

pub mod logging;

pub use logging::{init_logging, log_config_info};
