// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for cyclo applications.
//!
//! Library crates only emit `tracing` events; binaries and integration
//! tests call [`init_logging`] once at startup. The real-time loops never
//! log on the hot path except for failures.

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod init;

pub use init::init_logging;

/// Re-export so callers do not need their own `tracing` dependency pin.
pub use tracing;
