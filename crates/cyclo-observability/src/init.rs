// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Subscriber setup.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize console logging.
///
/// `filter` is a `tracing` directive string (e.g. `"info,cyclo_scheduler=debug"`);
/// when `None`, `RUST_LOG` applies with an `info` fallback. Calling this
/// twice is an error, as is an unparsable directive.
pub fn init_logging(filter: Option<&str>) -> Result<()> {
    let env_filter = match filter {
        Some(directives) => {
            EnvFilter::try_new(directives).context("invalid log filter directive")?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .context("logging already initialized")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initializes_once_and_only_once() {
        assert!(init_logging(Some("info,cyclo_scheduler=debug")).is_ok());
        assert!(init_logging(Some("debug")).is_err());
    }
}
