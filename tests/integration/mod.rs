//! Integration tests for completion-gateway
//!
//! These tests drive the public API end to end with in-memory storage and a
//! mock upstream.

pub mod admission_tests;
pub mod completion_client_tests;
pub mod config_tests;
