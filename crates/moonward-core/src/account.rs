// ── Account aggregator ──
//
// Discovers the devices paired to an authenticated account and owns
// their lifecycle. Discovery failures are fatal; per-device sync
// failures are not -- a console that fails its initial sync stays in the
// collection and can be retried on the next update.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, warn};

use moonward_api::{ApiClient, AuthHandle, Error as ApiError};

use crate::device::Device;
use crate::error::CoreError;

/// One authenticated account and its device collection.
pub struct Account {
    api: ApiClient,
    account_id: String,
    devices: IndexMap<String, Device>,
}

impl Account {
    /// Async factory: build a client, discover devices, and run each
    /// device's initial sync.
    ///
    /// `timezone` and `language` are presented to the service with every
    /// request (they shape summary date boundaries and localized app
    /// titles). A device whose initial sync fails is retained -- the
    /// failure is logged, not fatal to discovery.
    pub async fn create(
        auth: AuthHandle,
        timezone: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let api = ApiClient::new(auth, timezone, language)?;
        Self::with_client(api).await
    }

    /// Same as [`create`](Self::create) but against a pre-built client
    /// (alternate base URL, custom transport).
    pub async fn with_client(api: ApiClient) -> Result<Self, CoreError> {
        let mut account = Self {
            account_id: api.account_id(),
            api,
            devices: IndexMap::new(),
        };
        account.discover_devices().await?;

        for (device_id, device) in &mut account.devices {
            if let Err(err) = device.update().await {
                warn!(device = %device_id, error = %err, "initial device sync failed");
            }
        }

        Ok(account)
    }

    /// The account identifier the session is scoped to.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Devices in discovery order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn devices_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.devices.values_mut()
    }

    pub fn get_device(&self, device_id: &str) -> Result<&Device, CoreError> {
        self.devices
            .get(device_id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                device_id: device_id.to_owned(),
            })
    }

    pub fn get_device_mut(&mut self, device_id: &str) -> Result<&mut Device, CoreError> {
        self.devices
            .get_mut(device_id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                device_id: device_id.to_owned(),
            })
    }

    /// Re-discover devices (picking up newly paired consoles), then
    /// refresh every known device. Known devices keep their instances --
    /// and therefore their registered observers -- across re-discovery.
    pub async fn update(&mut self) -> Result<(), CoreError> {
        self.discover_devices().await?;

        for (device_id, device) in &mut self.devices {
            if let Err(err) = device.update().await {
                warn!(device = %device_id, error = %err, "device sync failed");
            }
        }
        Ok(())
    }

    /// Fetch the account device list and fold it into the collection.
    ///
    /// A 404 from the device-list endpoint is the service's way of
    /// saying the account has nothing paired; it surfaces as the
    /// distinguished [`CoreError::NoDevicesFound`] so integrations can
    /// prompt for pairing. Every other failure propagates as-is.
    async fn discover_devices(&mut self) -> Result<(), CoreError> {
        let response = match self.api.get_account_devices().await {
            Ok(response) => response,
            Err(ApiError::Http { status: 404, .. }) => return Err(CoreError::NoDevicesFound),
            Err(err) => return Err(err.into()),
        };

        for record in response.owned_devices {
            match self.devices.entry(record.device_id.clone()) {
                Entry::Occupied(mut entry) => entry.get_mut().refresh_record(record),
                Entry::Vacant(entry) => {
                    debug!(device = %record.device_id, label = %record.label, "discovered device");
                    entry.insert(Device::from_record(self.api.clone(), record));
                }
            }
        }

        debug!(count = self.devices.len(), "device discovery complete");
        Ok(())
    }
}
