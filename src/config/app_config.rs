use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::hosts::HostRegistry;
use crate::error::CheckError;

const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
const DEFAULT_CONCURRENCY: usize = 1;

/// Settings the prober is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Total time allowed for a single request, connect included.
    pub timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

pub struct AppConfig {
    pub registry: HostRegistry,
    pub probe: ProbeSettings,
    /// Probes of one protocol pass allowed in flight at once. 1 keeps the run sequential.
    pub concurrency: usize,
    /// Exit non-zero when any host was unreachable. Off by default.
    pub fail_on_unreachable: bool,
}

/// Load the application configuration from the environment.
/// A `.env` file in the working directory is read first when present.
/// `CONFIG_FILE` optionally points at a YAML host file overriding the built-in lists.
pub fn load_config() -> Result<AppConfig, CheckError> {
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }

    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    /// Resolve every setting through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let registry = match lookup("CONFIG_FILE").filter(|p| !p.trim().is_empty()) {
            Some(location) => {
                let path = PathBuf::from(location);
                let yaml = std::fs::read_to_string(&path).map_err(|source| {
                    CheckError::ConfigRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                log::info!("Using host lists from {}", path.display());
                HostRegistry::from_yaml(&yaml)?
            }
            None => HostRegistry::default(),
        };

        let timeout_seconds = parse_positive(
            "PROBE_TIMEOUT_SECONDS",
            lookup("PROBE_TIMEOUT_SECONDS"),
            DEFAULT_TIMEOUT_SECONDS,
        )?;
        let concurrency = parse_positive(
            "PROBE_CONCURRENCY",
            lookup("PROBE_CONCURRENCY"),
            DEFAULT_CONCURRENCY as u64,
        )? as usize;
        let fail_on_unreachable = parse_flag("FAIL_ON_UNREACHABLE", lookup("FAIL_ON_UNREACHABLE"))?;

        log::info!(
            "Probe timeout {}s, concurrency {}, fail on unreachable: {}",
            timeout_seconds,
            concurrency,
            fail_on_unreachable
        );

        Ok(Self {
            registry,
            probe: ProbeSettings {
                timeout: Duration::from_secs(timeout_seconds),
            },
            concurrency,
            fail_on_unreachable,
        })
    }
}

fn parse_positive(name: &'static str, value: Option<String>, default: u64) -> Result<u64, CheckError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CheckError::InvalidSetting { name, value }),
    }
}

fn parse_flag(name: &'static str, value: Option<String>) -> Result<bool, CheckError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        _ => Err(CheckError::InvalidSetting { name, value }),
    }
}
