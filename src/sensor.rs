/// On-demand temperature readings
use std::path::PathBuf;

use crate::error::{Error, Result};

/// A synchronous source of the device temperature in degrees Celsius.
pub trait TemperatureSensor: Send + Sync {
    fn read_celsius(&self) -> Result<f64>;
}

/// CPU temperature from a Linux thermal zone (`.../thermal_zoneN/temp`),
/// which reports millidegrees Celsius as decimal text.
#[derive(Debug, Clone)]
pub struct ThermalZoneSensor {
    path: PathBuf,
}

impl ThermalZoneSensor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemperatureSensor for ThermalZoneSensor {
    fn read_celsius(&self) -> Result<f64> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        parse_millidegrees(&raw)
    }
}

fn parse_millidegrees(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map(|milli| milli as f64 / 1000.0)
        .map_err(|_| Error::Sensor(format!("unreadable thermal value '{}'", trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_sysfs_millidegrees() {
        assert_eq!(parse_millidegrees("48312\n").unwrap(), 48.312);
        assert_eq!(parse_millidegrees("48250").unwrap(), 48.25);
        assert_eq!(parse_millidegrees("-1500").unwrap(), -1.5);
        assert!(parse_millidegrees("hot").is_err());
    }

    #[test]
    fn reads_thermal_zone_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "51000").unwrap();
        let sensor = ThermalZoneSensor::new(file.path());
        assert_eq!(sensor.read_celsius().unwrap(), 51.0);
    }

    #[test]
    fn missing_zone_is_an_error() {
        let sensor = ThermalZoneSensor::new("/nonexistent/thermal_zone9/temp");
        assert!(matches!(sensor.read_celsius(), Err(Error::Io { .. })));
    }
}
