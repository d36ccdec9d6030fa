use std::fs;
use std::path::Path;
use tracing::warn;

use crate::cli::ConfigArgs;
use crate::error::{Error, Result};
use crate::models::{SimConfig, DEFAULT_ELEVATORS};

pub fn load_config(path: &Path) -> Result<SimConfig> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

/// Merges the optional config file with command-line overrides and checks
/// the result.
pub fn build_config(args: &ConfigArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };

    if let Some(elevators) = args.elevators {
        config.elevators_quantity = elevators;
    }
    if let Some(min_floor) = args.min_floor {
        config.min_floor = min_floor;
    }
    if let Some(max_floor) = args.max_floor {
        config.max_floor = max_floor;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.loop_interval_milliseconds = interval_ms;
    }
    if let Some(interval_ms) = args.request_interval_ms {
        config.random_request_service.interval_milliseconds = interval_ms;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_random {
        config.random_request_service.enabled = false;
    }

    resolve(config)
}

fn resolve(mut config: SimConfig) -> Result<SimConfig> {
    if config.elevators_quantity == 0 {
        warn!(
            "elevatorsQuantity missing or zero, using default of {}",
            DEFAULT_ELEVATORS
        );
        config.elevators_quantity = DEFAULT_ELEVATORS;
    }
    config.floor_range()?;
    if config.loop_interval_milliseconds == 0 {
        return Err(Error::InvalidInterval("loopIntervalMilliseconds"));
    }
    if config.random_request_service.enabled
        && config.random_request_service.interval_milliseconds == 0
    {
        return Err(Error::InvalidInterval(
            "randomRequestService.intervalMilliseconds",
        ));
    }
    Ok(config)
}
