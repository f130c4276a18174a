//! Common test utilities for all integration tests.
//!
//! Provides shared MongoDB session setup, fixture roots, and the scenarios
//! run against both an environment-configured server and a container.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

pub mod scenarios;
pub mod test_db;
