use log::{error, info};
use std::sync::Arc;

use scanrig_ble::bluetooth::start_server;
use scanrig_ble::config::ServerConfig;
use scanrig_ble::gatt::{Dispatcher, ExternalScanTool};
use scanrig_ble::sensor::ThermalZoneSensor;
use scanrig_ble::utils::init_logging;

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting thermometer attribute server");

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(ThermalZoneSensor::new(&config.sensor_path)),
        Arc::new(ExternalScanTool::new(&config.scan_tool)),
    ));

    // Registration lives as long as the handles do
    let _handles = start_server(&config, dispatcher).await?;
    info!("Waiting for clients");

    std::future::pending::<()>().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration
    let config = match ServerConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        let _ = tx.send(());
    });

    // Run the server or wait for shutdown signal
    tokio::select! {
        result = serve(config) => {
            match result {
                Ok(_) => info!("Server stopped"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
