//! Configuration validation
//!
//! - `config_validators`: server, provider, rate limit and retry validators
//! - `storage_validators`: Redis settings
//! - `tests`: Test suite for all validators

mod config_validators;
mod storage_validators;
#[cfg(test)]
mod tests;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
