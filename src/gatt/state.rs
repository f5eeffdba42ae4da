use crate::models::TemperatureUnit;

/// Mutable configuration exposed over GATT.
///
/// Owned by the [`Dispatcher`](super::dispatch::Dispatcher); only its write
/// handlers change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceState {
    pub unit: TemperatureUnit,
    pub scanning: bool,
    pub point_of_interest: String,
    pub property_name: String,
    pub group: String,
}

impl ServiceState {
    /// Parameters handed to the scanning tool, in its positional order.
    pub fn scan_parameters(&self) -> ScanParameters {
        ScanParameters {
            property_name: self.property_name.clone(),
            point_of_interest: self.point_of_interest.clone(),
            group: self.group.clone(),
        }
    }
}

/// Snapshot of the text fields a scan run is tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParameters {
    pub property_name: String,
    pub point_of_interest: String,
    pub group: String,
}
