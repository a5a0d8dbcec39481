//! End-to-end tests for completion-gateway
//!
//! These tests call the real provider and require an API key.
//! Run with: cargo test -- --ignored
//!
//! Required environment variables:
//! - OPENAI_API_KEY
//! - OPENAI_API_BASE (optional)

pub mod chat_completion;
