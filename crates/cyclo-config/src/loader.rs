// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support.
//!
//! Loading is two-tier: the TOML file provides the base values and a few
//! environment variables override them at runtime.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::validation::validate_config;
use crate::{ConfigError, ConfigResult, CycloConfig};

const CONFIG_FILE_NAME: &str = "cyclo.toml";
const CONFIG_PATH_VAR: &str = "CYCLO_CONFIG_PATH";

/// Find the configuration file.
///
/// Search order:
/// 1. `CYCLO_CONFIG_PATH` environment variable
/// 2. Current working directory: `./cyclo.toml`
/// 3. Upward search (up to 5 levels) for a workspace-root `cyclo.toml`
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_VAR) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "config file specified by {} not found: {}",
            CONFIG_PATH_VAR,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of:\n{}\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_VAR
    )))
}

/// Load, override and validate the configuration.
///
/// With `config_path` of `None` the file is discovered via
/// [`find_config_file`].
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<CycloConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CycloConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Apply the supported environment overrides in place.
pub fn apply_environment_overrides(config: &mut CycloConfig) {
    if let Ok(filter) = env::var("CYCLO_LOG_FILTER") {
        config.application.log_filter = filter;
    }
    if let Ok(first_state) = env::var("CYCLO_FIRST_STATE") {
        config.application.first_state = first_state;
    }
    if let Ok(max_cycles) = env::var("CYCLO_MAX_CYCLES") {
        if let Ok(value) = max_cycles.parse() {
            config.scheduler.max_cycles = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{StrategyConfig, SyncModeConfig};

    const SAMPLE: &str = r#"
[application]
name = "plant-control"
first_state = "Run"

[scheduler]
strategy = "pooled"
sync_mode = "cycle_barrier"

[[states]]
name = "Run"

[[states.threads]]
name = "Fast"
cpu_mask = 1
functions = ["Acquire", "Control"]

[[states.threads]]
name = "Slow"
cpu_mask = 2
functions = ["Log"]
"#;

    #[test]
    fn loads_and_validates_a_sample_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.application.name, "plant-control");
        assert_eq!(config.scheduler.strategy, StrategyConfig::Pooled);
        assert_eq!(config.scheduler.sync_mode, SyncModeConfig::CycleBarrier);
        assert_eq!(config.states.len(), 1);
        assert_eq!(config.states[0].threads[0].functions, ["Acquire", "Control"]);
        assert_eq!(config.states[0].threads[1].cpu_mask, 2);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[scheduler\nstrategy=").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn invalid_content_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[application]\nname = \"x\"\n").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
