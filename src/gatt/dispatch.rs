/// Read/write handling for the thermometer service characteristics
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::attributes::Attribute;
use super::codec::{
    decode_text, encode_flag, encode_temperature, encode_text, encode_unit, first_token,
};
use super::scan::ScanLauncher;
use super::state::ServiceState;
use crate::error::{Error, Result};
use crate::models::TemperatureUnit;
use crate::sensor::TemperatureSensor;

/// Routes characteristic reads and writes onto the shared [`ServiceState`].
///
/// All traffic goes through one async mutex. A scan holds it for the whole
/// tool run, so reads, writes and notification ticks queue up behind it.
pub struct Dispatcher {
    state: Mutex<ServiceState>,
    sensor: Arc<dyn TemperatureSensor>,
    scanner: Arc<dyn ScanLauncher>,
}

impl Dispatcher {
    pub fn new(sensor: Arc<dyn TemperatureSensor>, scanner: Arc<dyn ScanLauncher>) -> Self {
        Self {
            state: Mutex::new(ServiceState::default()),
            sensor,
            scanner,
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ServiceState {
        self.state.lock().await.clone()
    }

    /// Produce the wire value for a read of `attribute`.
    ///
    /// Only the temperature read can fail, when the sensor does.
    pub async fn read(&self, attribute: Attribute) -> Result<Vec<u8>> {
        let state = self.state.lock().await;
        let value = match attribute {
            Attribute::Temperature => {
                let celsius = self.sensor.read_celsius()?;
                encode_temperature(celsius, state.unit)
            }
            Attribute::Unit => encode_unit(state.unit),
            Attribute::ScanTrigger => encode_flag(state.scanning),
            Attribute::PointOfInterest => encode_text(&state.point_of_interest),
            Attribute::PropertyName => encode_text(&state.property_name),
            Attribute::Group => encode_text(&state.group),
        };
        debug!("Read {:?} -> {:?}", attribute, decode_text(&value));
        Ok(value)
    }

    /// Current temperature reading, as pushed in notifications.
    pub async fn temperature(&self) -> Result<Vec<u8>> {
        self.read(Attribute::Temperature).await
    }

    /// Apply a client write. Unrecognised tokens are accepted and ignored.
    pub async fn write(&self, attribute: Attribute, value: &[u8]) -> Result<()> {
        let mut state = self.state.lock().await;
        debug!("Write {:?} <- {:?}", attribute, decode_text(value));

        match attribute {
            Attribute::Temperature => {
                return Err(Error::WriteNotPermitted(format!("{:?}", attribute)));
            }
            Attribute::Unit => match first_token(value).and_then(TemperatureUnit::from_token) {
                Some(unit) => {
                    info!("Temperature unit set to {}", unit.letter());
                    state.unit = unit;
                }
                None => warn!("Ignoring unit write {:?}", decode_text(value)),
            },
            Attribute::ScanTrigger => match first_token(value) {
                Some('1') => {
                    state.scanning = true;
                    let params = state.scan_parameters();
                    // The guard stays held: nothing else is served until the tool exits.
                    self.scanner.launch(&params).await;
                }
                Some('0') => {
                    info!("Scan flag cleared");
                    state.scanning = false;
                }
                _ => warn!("Ignoring scan trigger write {:?}", decode_text(value)),
            },
            Attribute::PointOfInterest => state.point_of_interest = decode_text(value),
            Attribute::PropertyName => state.property_name = decode_text(value),
            Attribute::Group => state.group = decode_text(value),
        }

        Ok(())
    }
}
