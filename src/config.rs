use log::{debug, info};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_ADVERTISED_NAME: &str = "Thermometer";
const DEFAULT_SCAN_TOOL_PATH: &str = "./concurrent";
const DEFAULT_NOTIFY_INTERVAL_MS: u64 = 5000;
const DEFAULT_SENSOR_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";
const DEFAULT_CAPTURE_DIR: &str = "./raw";
const DEFAULT_SUMMARY_DIR: &str = ".";
const DEFAULT_PROPERTY_NAME: &str = "Demo Property Test";
const DEFAULT_POI_NAME: &str = "3219 Inside";
const DEFAULT_GROUP: &str = "3";

/// Settings for the attribute server process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub advertised_name: String,
    pub scan_tool: PathBuf,
    pub notify_interval: Duration,
    pub sensor_path: PathBuf,
}

/// Settings for a capture merge run.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub capture_dir: PathBuf,
    pub summary_dir: PathBuf,
    pub property_name: String,
    pub poi_name: String,
    pub group: String,
}

impl ServerConfig {
    pub fn new() -> Result<Self> {
        // Load environment variables
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let interval_ms: u64 = parse_or(&lookup, "NOTIFY_INTERVAL_MS", DEFAULT_NOTIFY_INTERVAL_MS)?;
        if interval_ms == 0 {
            return Err(Error::Config("NOTIFY_INTERVAL_MS must be greater than zero".into()));
        }

        let config = ServerConfig {
            advertised_name: string_or(&lookup, "ADVERTISED_NAME", DEFAULT_ADVERTISED_NAME),
            scan_tool: string_or(&lookup, "SCAN_TOOL_PATH", DEFAULT_SCAN_TOOL_PATH).into(),
            notify_interval: Duration::from_millis(interval_ms),
            sensor_path: string_or(&lookup, "SENSOR_PATH", DEFAULT_SENSOR_PATH).into(),
        };

        info!(
            "Server config: name='{}', scan tool={}, notify every {} ms",
            config.advertised_name,
            config.scan_tool.display(),
            interval_ms
        );
        debug!("Temperature source: {}", config.sensor_path.display());

        Ok(config)
    }
}

impl AggregatorConfig {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        AggregatorConfig {
            capture_dir: string_or(&lookup, "CAPTURE_DIR", DEFAULT_CAPTURE_DIR).into(),
            summary_dir: string_or(&lookup, "SUMMARY_DIR", DEFAULT_SUMMARY_DIR).into(),
            property_name: string_or(&lookup, "SUMMARY_PROPERTY_NAME", DEFAULT_PROPERTY_NAME),
            poi_name: string_or(&lookup, "SUMMARY_POI_NAME", DEFAULT_POI_NAME),
            group: string_or(&lookup, "SUMMARY_GROUP", DEFAULT_GROUP),
        }
    }
}

fn string_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| Error::Config(format!("{} has invalid value '{}'", key, raw))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn server_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.advertised_name, "Thermometer");
        assert_eq!(config.scan_tool, PathBuf::from("./concurrent"));
        assert_eq!(config.notify_interval, Duration::from_millis(5000));
    }

    #[test]
    fn server_overrides_are_trimmed() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("ADVERTISED_NAME", "  Rig 7 "),
            ("NOTIFY_INTERVAL_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.advertised_name, "Rig 7");
        assert_eq!(config.notify_interval, Duration::from_millis(250));
    }

    #[test]
    fn bad_interval_is_rejected() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[("NOTIFY_INTERVAL_MS", "soon")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[("NOTIFY_INTERVAL_MS", "0")])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn aggregator_defaults() {
        let config = AggregatorConfig::from_lookup(lookup_from(&[("CAPTURE_DIR", "/tmp/caps")]));
        assert_eq!(config.capture_dir, PathBuf::from("/tmp/caps"));
        assert_eq!(config.summary_dir, PathBuf::from("."));
        assert_eq!(config.property_name, "Demo Property Test");
        assert_eq!(config.poi_name, "3219 Inside");
        assert_eq!(config.group, "3");
    }
}
