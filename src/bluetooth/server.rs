/// BlueZ GATT application and advertisement for the thermometer service
use async_trait::async_trait;
use bluer::adv::{Advertisement, AdvertisementHandle, Feature, Type};
use bluer::gatt::local::{
    Application, ApplicationHandle, Characteristic, CharacteristicNotifier, CharacteristicNotify,
    CharacteristicNotifyMethod, CharacteristicRead, CharacteristicWrite, CharacteristicWriteMethod,
    Descriptor, DescriptorRead, ReqError, Service,
};
use futures_util::FutureExt;
use log::{error, info};
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::gatt::attributes::{Attribute, SERVICE_UUID, USER_DESCRIPTION_UUID};
use crate::gatt::codec::encode_text;
use crate::gatt::{Dispatcher, NotificationSink, NotifyScheduler};

#[async_trait]
impl NotificationSink for CharacteristicNotifier {
    async fn send(&mut self, value: Vec<u8>) -> Result<()> {
        if self.is_stopped() {
            return Err(Error::NotificationClosed);
        }
        self.notify(value).await.map_err(Error::from)
    }

    async fn wait_closed(&mut self) {
        self.stopped().await
    }
}

/// Keeps the GATT application and advertisement registered while alive.
pub struct ServerHandles {
    _session: bluer::Session,
    _application: ApplicationHandle,
    _advertisement: AdvertisementHandle,
    scheduler: Arc<NotifyScheduler>,
}

impl Drop for ServerHandles {
    fn drop(&mut self) {
        self.scheduler.unsubscribe();
        info!("Unregistering thermometer service");
    }
}

/// Power the default adapter, publish the service and start advertising.
pub async fn start_server(
    config: &ServerConfig,
    dispatcher: Arc<Dispatcher>,
) -> Result<ServerHandles> {
    // Initialize Bluetooth session
    let session = match bluer::Session::new().await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to create Bluetooth session: {}", e);
            return Err(e.into());
        }
    };

    // Get the default Bluetooth adapter
    let adapter = match session.default_adapter().await {
        Ok(adapter) => adapter,
        Err(e) => {
            error!("Failed to get default Bluetooth adapter: {}", e);
            return Err(e.into());
        }
    };

    // Ensure Bluetooth adapter is powered on
    if let Err(e) = adapter.set_powered(true).await {
        error!("Failed to power on adapter: {}", e);
        return Err(e.into());
    }
    info!(
        "Using adapter {} ({})",
        adapter.name(),
        adapter.address().await?
    );

    let scheduler = Arc::new(NotifyScheduler::new(dispatcher.clone(), config.notify_interval));

    let application = Application {
        services: vec![thermometer_service(&dispatcher, &scheduler)],
        ..Default::default()
    };
    let application = match adapter.serve_gatt_application(application).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to register GATT application: {}", e);
            return Err(e.into());
        }
    };
    info!("Thermometer service {} registered", SERVICE_UUID);

    let advertisement = Advertisement {
        advertisement_type: Type::Peripheral,
        service_uuids: [SERVICE_UUID].into_iter().collect(),
        local_name: Some(config.advertised_name.clone()),
        system_includes: [Feature::TxPower].into_iter().collect(),
        discoverable: Some(true),
        ..Default::default()
    };
    let advertisement = match adapter.advertise(advertisement).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start advertising: {}", e);
            return Err(e.into());
        }
    };
    info!("Advertising as '{}'", config.advertised_name);

    Ok(ServerHandles {
        _session: session,
        _application: application,
        _advertisement: advertisement,
        scheduler,
    })
}

fn thermometer_service(dispatcher: &Arc<Dispatcher>, scheduler: &Arc<NotifyScheduler>) -> Service {
    Service {
        uuid: SERVICE_UUID,
        primary: true,
        characteristics: Attribute::ALL
            .into_iter()
            .map(|attribute| characteristic(attribute, dispatcher, scheduler))
            .collect(),
        ..Default::default()
    }
}

fn characteristic(
    attribute: Attribute,
    dispatcher: &Arc<Dispatcher>,
    scheduler: &Arc<NotifyScheduler>,
) -> Characteristic {
    let access = attribute.access();

    let read = access.read.then(|| {
        let dispatcher = dispatcher.clone();
        CharacteristicRead {
            read: true,
            fun: Box::new(move |_req| {
                let dispatcher = dispatcher.clone();
                async move {
                    dispatcher.read(attribute).await.map_err(|e| {
                        error!("Read of {:?} failed: {}", attribute, e);
                        ReqError::Failed
                    })
                }
                .boxed()
            }),
            ..Default::default()
        }
    });

    let write = access.write.then(|| {
        let dispatcher = dispatcher.clone();
        CharacteristicWrite {
            write: true,
            write_without_response: true,
            method: CharacteristicWriteMethod::Fun(Box::new(move |value, _req| {
                let dispatcher = dispatcher.clone();
                async move {
                    dispatcher.write(attribute, &value).await.map_err(|e| {
                        error!("Write to {:?} failed: {}", attribute, e);
                        ReqError::Failed
                    })
                }
                .boxed()
            })),
            ..Default::default()
        }
    });

    let notify = access.notify.then(|| {
        let scheduler = scheduler.clone();
        CharacteristicNotify {
            notify: true,
            method: CharacteristicNotifyMethod::Fun(Box::new(move |notifier| {
                let scheduler = scheduler.clone();
                async move {
                    scheduler.subscribe(notifier);
                }
                .boxed()
            })),
            ..Default::default()
        }
    });

    Characteristic {
        uuid: attribute.uuid(),
        read,
        write,
        notify,
        descriptors: vec![user_description(attribute)],
        ..Default::default()
    }
}

fn user_description(attribute: Attribute) -> Descriptor {
    Descriptor {
        uuid: USER_DESCRIPTION_UUID,
        read: Some(DescriptorRead {
            read: true,
            fun: Box::new(move |_req| {
                async move { Ok(encode_text(attribute.description())) }.boxed()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
