pub mod attributes;
pub mod codec;
pub mod dispatch;
pub mod notify;
pub mod scan;
pub mod state;

pub use attributes::{Attribute, SERVICE_UUID};
pub use dispatch::Dispatcher;
pub use notify::{NotificationSink, NotifyScheduler};
pub use scan::{ExternalScanTool, ScanLauncher};
pub use state::ServiceState;
