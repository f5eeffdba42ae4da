use serde::{Deserialize, Serialize, Serializer};

/// Display unit for the temperature attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Single-letter wire token ("C" / "F").
    pub fn letter(self) -> char {
        match self {
            TemperatureUnit::Celsius => 'C',
            TemperatureUnit::Fahrenheit => 'F',
        }
    }

    /// Parse a unit token, case-insensitively. Anything else is `None`.
    pub fn from_token(token: char) -> Option<Self> {
        match token.to_ascii_uppercase() {
            'C' => Some(TemperatureUnit::Celsius),
            'F' => Some(TemperatureUnit::Fahrenheit),
            _ => None,
        }
    }

    /// Convert a Celsius reading into this unit.
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 1.8 + 32.0,
        }
    }
}

/// One observed device inside a single capture file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaptureRecord {
    #[serde(rename = "tech")]
    pub technology: String,
    pub ssid: String,
    #[serde(rename = "mac")]
    pub device_id: String,
    pub count: i64,
    pub rssi_raw: f64,
    pub rssi_min: f64,
    pub rssi_max: f64,
    pub rssi_avg: f64,
}

/// A capture file as written by the external scanning tool.
///
/// `scan_data` is optional only so that a missing key can be reported
/// as its own error instead of a generic parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureDocument {
    #[serde(rename = "scanData")]
    pub scan_data: Option<Vec<CaptureRecord>>,
}

/// Merged statistics for one device across every capture file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    #[serde(rename = "tech")]
    pub technology: String,
    pub ssid: String,
    #[serde(rename = "mac")]
    pub device_id: String,
    pub count: i64,
    #[serde(rename = "rssi_raw", serialize_with = "serialize_rssi_samples")]
    pub rssi_samples: Vec<f64>,
    #[serde(serialize_with = "serialize_rssi")]
    pub rssi_min: f64,
    #[serde(serialize_with = "serialize_rssi")]
    pub rssi_max: f64,
    #[serde(serialize_with = "serialize_rssi")]
    pub rssi_avg: f64,
}

/// Output of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummaryDocument {
    pub timestamp: i64,
    #[serde(rename = "propertyName")]
    pub property_name: String,
    #[serde(rename = "poiName")]
    pub poi_name: String,
    pub group: String,
    #[serde(rename = "scanData")]
    pub scan_data: Vec<DeviceSummary>,
}

/// RSSI readings are whole dBm in practice; keep them integral on disk.
struct Dbm(f64);

impl Serialize for Dbm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
            serializer.serialize_i64(value as i64)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

fn serialize_rssi<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Dbm(*value).serialize(serializer)
}

fn serialize_rssi_samples<S: Serializer>(
    samples: &[f64],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(samples.iter().map(|s| Dbm(*s)))
}
