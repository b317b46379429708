// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! TOML-based configuration for cyclo applications.
//!
//! The file (`cyclo.toml` by convention) declares the application states,
//! their real-time threads and the scheduler strategy; a few environment
//! variables override individual values at startup. Loading always
//! validates: a misconfigured application never reaches the scheduler.

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid TOML syntax: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation failed: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
