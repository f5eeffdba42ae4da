/// Launching the external scanning tool
use async_trait::async_trait;
use log::{error, info, warn};
use std::path::PathBuf;
use tokio::process::Command;

use super::state::ScanParameters;

/// Mode argument that tells the scanning tool to run a capture pass.
const RUN_MODE: &str = "1";

/// Something that can run one scan pass to completion.
///
/// The outcome is deliberately not reported: a failed run leaves no trace
/// in the attribute state.
#[async_trait]
pub trait ScanLauncher: Send + Sync {
    async fn launch(&self, params: &ScanParameters);
}

/// Runs the scanning executable with positional arguments
/// `1 <property name> <point of interest> <group>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct ExternalScanTool {
    program: PathBuf,
}

impl ExternalScanTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, params: &ScanParameters) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(RUN_MODE)
            .arg(&params.property_name)
            .arg(&params.point_of_interest)
            .arg(&params.group);
        command
    }
}

#[async_trait]
impl ScanLauncher for ExternalScanTool {
    async fn launch(&self, params: &ScanParameters) {
        info!(
            "Scanning now: property='{}', poi='{}', group='{}'",
            params.property_name, params.point_of_interest, params.group
        );

        match self.command(params).status().await {
            Ok(status) if status.success() => info!("Scan tool finished"),
            Ok(status) => warn!("Scan tool exited with {}", status),
            Err(e) => error!("Failed to run {}: {}", self.program.display(), e),
        }
    }
}
