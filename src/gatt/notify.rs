/// Periodic temperature notifications
use async_trait::async_trait;
use log::{debug, error, info};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::dispatch::Dispatcher;
use crate::error::Result;

/// Where notifications for the subscribed client go.
#[async_trait]
pub trait NotificationSink: Send + 'static {
    /// Push one value. An error means the client is gone.
    async fn send(&mut self, value: Vec<u8>) -> Result<()>;

    /// Resolves once the client has stopped listening.
    async fn wait_closed(&mut self);
}

enum Subscription {
    Idle,
    Subscribed(JoinHandle<()>),
}

/// Drives temperature notifications for the single subscribed client.
///
/// Subscribing sends the current reading at once and then one reading per
/// `interval`, changed or not. Unsubscribing aborts the ticking task, so no
/// notification can follow it.
pub struct NotifyScheduler {
    dispatcher: Arc<Dispatcher>,
    interval: Duration,
    subscription: Mutex<Subscription>,
}

impl NotifyScheduler {
    pub fn new(dispatcher: Arc<Dispatcher>, interval: Duration) -> Self {
        Self {
            dispatcher,
            interval,
            subscription: Mutex::new(Subscription::Idle),
        }
    }

    pub fn is_subscribed(&self) -> bool {
        match &*self.lock() {
            Subscription::Idle => false,
            Subscription::Subscribed(task) => !task.is_finished(),
        }
    }

    /// Start notifying `sink`. Returns `false` if a subscription is already
    /// running, in which case `sink` is dropped.
    pub fn subscribe<S: NotificationSink>(&self, sink: S) -> bool {
        let mut subscription = self.lock();
        if let Subscription::Subscribed(task) = &*subscription {
            if !task.is_finished() {
                debug!("Already notifying, ignoring subscribe");
                return false;
            }
        }

        info!("Client subscribed to temperature notifications");
        let task = tokio::spawn(run_notifications(self.dispatcher.clone(), self.interval, sink));
        *subscription = Subscription::Subscribed(task);
        true
    }

    pub fn unsubscribe(&self) {
        let mut subscription = self.lock();
        let previous = std::mem::replace(&mut *subscription, Subscription::Idle);
        if let Subscription::Subscribed(task) = previous {
            task.abort();
            info!("Client unsubscribed from temperature notifications");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Subscription> {
        self.subscription.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for NotifyScheduler {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

async fn run_notifications<S: NotificationSink>(
    dispatcher: Arc<Dispatcher>,
    interval: Duration,
    mut sink: S,
) {
    loop {
        let value = match dispatcher.temperature().await {
            Ok(value) => value,
            Err(e) => {
                error!("Stopping notifications, temperature read failed: {}", e);
                return;
            }
        };

        if let Err(e) = sink.send(value).await {
            debug!("Notification not delivered, client gone: {}", e);
            return;
        }

        tokio::select! {
            _ = sleep(interval) => {}
            _ = sink.wait_closed() => {
                debug!("Notification session closed by client");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gatt::scan::ScanLauncher;
    use crate::gatt::state::ScanParameters;
    use crate::sensor::TemperatureSensor;
    use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

    const PERIOD: Duration = Duration::from_millis(5000);

    /// Sensor whose reading the test can change between ticks.
    struct DialSensor(Mutex<Option<f64>>);

    impl TemperatureSensor for DialSensor {
        fn read_celsius(&self) -> Result<f64> {
            self.0
                .lock()
                .unwrap()
                .ok_or_else(|| Error::Sensor("no reading".into()))
        }
    }

    struct NoScan;

    #[async_trait]
    impl ScanLauncher for NoScan {
        async fn launch(&self, _params: &ScanParameters) {}
    }

    struct ChannelSink(UnboundedSender<Vec<u8>>);

    #[async_trait]
    impl NotificationSink for ChannelSink {
        async fn send(&mut self, value: Vec<u8>) -> Result<()> {
            self.0.send(value).map_err(|_| Error::NotificationClosed)
        }

        async fn wait_closed(&mut self) {
            self.0.closed().await
        }
    }

    fn setup(celsius: f64) -> (NotifyScheduler, Arc<DialSensor>) {
        let sensor = Arc::new(DialSensor(Mutex::new(Some(celsius))));
        let dispatcher = Arc::new(Dispatcher::new(sensor.clone(), Arc::new(NoScan)));
        (NotifyScheduler::new(dispatcher, PERIOD), sensor)
    }

    fn sink() -> (ChannelSink, UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelSink(tx), rx)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn subscribe_notifies_immediately_then_every_period() {
        let (scheduler, sensor) = setup(20.0);
        let (tx, mut rx) = sink();

        assert!(scheduler.subscribe(tx));
        assert!(scheduler.is_subscribed());
        assert_eq!(rx.recv().await.unwrap(), b"68.0 F".to_vec());

        tokio::time::advance(PERIOD - Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(rx.recv().await.unwrap(), b"68.0 F".to_vec());

        *sensor.0.lock().unwrap() = Some(25.0);
        tokio::time::advance(PERIOD).await;
        assert_eq!(rx.recv().await.unwrap(), b"77.0 F".to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribe_stops_notifications() {
        let (scheduler, _) = setup(20.0);
        let (tx, mut rx) = sink();

        scheduler.subscribe(tx);
        assert!(rx.recv().await.is_some());

        scheduler.unsubscribe();
        assert!(!scheduler.is_subscribed());

        tokio::time::advance(PERIOD * 3).await;
        settle().await;
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn second_subscribe_is_ignored() {
        let (scheduler, _) = setup(20.0);
        let (first, mut first_rx) = sink();
        let (second, mut second_rx) = sink();

        assert!(scheduler.subscribe(first));
        assert!(!scheduler.subscribe(second));

        assert!(first_rx.recv().await.is_some());
        assert_eq!(second_rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn resubscribe_after_unsubscribe() {
        let (scheduler, _) = setup(0.0);
        let (first, _first_rx) = sink();
        scheduler.subscribe(first);
        scheduler.unsubscribe();

        let (second, mut second_rx) = sink();
        assert!(scheduler.subscribe(second));
        assert_eq!(second_rx.recv().await.unwrap(), b"32.0 F".to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn sensor_failure_ends_subscription() {
        let (scheduler, sensor) = setup(20.0);
        let (tx, mut rx) = sink();
        scheduler.subscribe(tx);
        assert!(rx.recv().await.is_some());

        *sensor.0.lock().unwrap() = None;
        tokio::time::advance(PERIOD).await;
        assert_eq!(rx.recv().await, None);
        assert!(!scheduler.is_subscribed());
    }

    #[tokio::test(start_paused = true)]
    async fn client_going_away_ends_subscription() {
        let (scheduler, _) = setup(20.0);
        let (tx, mut rx) = sink();
        scheduler.subscribe(tx);
        assert!(rx.recv().await.is_some());

        drop(rx);
        settle().await;
        assert!(!scheduler.is_subscribed());
    }
}
