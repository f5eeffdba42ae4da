use log::{error, info};

use scanrig_ble::capture;
use scanrig_ble::config::AggregatorConfig;
use scanrig_ble::utils::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = match AggregatorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match capture::run(&config) {
        Ok(path) => {
            info!("Capture merge complete: {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Capture merge failed: {}", e);
            Err(e.into())
        }
    }
}
