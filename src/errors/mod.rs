//! # Error Handling
//!
//! Error types for the doclingtaxa test-environment provisioner, built on
//! `thiserror`. The taxonomy separates an absent dependency (tests skip) from
//! a broken environment (tests fail).

pub mod types;

pub use types::{DoclingtaxaError, ErrorContext, Result};
