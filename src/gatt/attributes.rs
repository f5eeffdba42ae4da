/// GATT identifiers and the static shape of the thermometer service
use uuid::Uuid;

/// Primary service UUID.
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0x0000_0001_710e_4a5b_8d75_3e5b444bc3cf);

/// Characteristic User Description descriptor (0x2901).
pub const USER_DESCRIPTION_UUID: Uuid = Uuid::from_u128(0x0000_2901_0000_1000_8000_00805f9b34fb);

/// The six characteristics of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Temperature,
    Unit,
    ScanTrigger,
    PointOfInterest,
    PropertyName,
    Group,
}

/// Which operations a characteristic accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub read: bool,
    pub write: bool,
    pub notify: bool,
}

const READ_NOTIFY: Access = Access {
    read: true,
    write: false,
    notify: true,
};

const READ_WRITE: Access = Access {
    read: true,
    write: true,
    notify: false,
};

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Temperature,
        Attribute::Unit,
        Attribute::ScanTrigger,
        Attribute::PointOfInterest,
        Attribute::PropertyName,
        Attribute::Group,
    ];

    pub fn uuid(self) -> Uuid {
        let index: u128 = match self {
            Attribute::Temperature => 2,
            Attribute::Unit => 3,
            Attribute::ScanTrigger => 4,
            Attribute::PointOfInterest => 5,
            Attribute::PropertyName => 6,
            Attribute::Group => 7,
        };
        Uuid::from_u128((index << 96) | (SERVICE_UUID.as_u128() & ((1u128 << 96) - 1)))
    }

    /// Human-readable label served by the user description descriptor.
    pub fn description(self) -> &'static str {
        match self {
            Attribute::Temperature => "CPU Temperature",
            Attribute::Unit => "Temperature Units (F or C)",
            Attribute::ScanTrigger => "Start the scan",
            Attribute::PointOfInterest => "POI Number",
            Attribute::PropertyName => "Property Name",
            Attribute::Group => "Group Number",
        }
    }

    pub fn access(self) -> Access {
        match self {
            Attribute::Temperature => READ_NOTIFY,
            _ => READ_WRITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characteristic_uuids_share_the_service_base() {
        assert_eq!(
            Attribute::Temperature.uuid().to_string(),
            "00000002-710e-4a5b-8d75-3e5b444bc3cf"
        );
        assert_eq!(
            Attribute::Group.uuid().to_string(),
            "00000007-710e-4a5b-8d75-3e5b444bc3cf"
        );
        assert_eq!(SERVICE_UUID.to_string(), "00000001-710e-4a5b-8d75-3e5b444bc3cf");
    }

    #[test]
    fn characteristic_uuids_are_distinct() {
        let mut uuids: Vec<Uuid> = Attribute::ALL.iter().map(|a| a.uuid()).collect();
        uuids.push(SERVICE_UUID);
        uuids.sort();
        uuids.dedup();
        assert_eq!(uuids.len(), 7);
    }

    #[test]
    fn only_temperature_notifies() {
        for attribute in Attribute::ALL {
            let access = attribute.access();
            assert!(access.read);
            assert_eq!(access.notify, attribute == Attribute::Temperature);
            assert_eq!(access.write, attribute != Attribute::Temperature);
        }
    }

    #[test]
    fn user_description_is_standard_0x2901() {
        assert_eq!(
            USER_DESCRIPTION_UUID.to_string(),
            "00002901-0000-1000-8000-00805f9b34fb"
        );
    }
}
