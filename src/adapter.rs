//! Device registry for IBS-TH1 Mini sensors.
//!
//! Every advertisement the scanner sees goes through
//! [`InkbirdAdapter::handle_advertisement`]. Matching ones create the
//! gateway device on first sighting and push a fresh reading each time.

use std::time::Duration;

use anyhow::{Context as _, Result};
use indexmap::{IndexMap, map::Entry};
use macaddr::MacAddr6;

use crate::{
    gateway::{AdapterHandle, Device, DeviceHandle, PropertyDescription},
    inkbird::{
        Advertisement, BATTERY_MAX_PERCENT, BATTERY_MIN_PERCENT, HUMIDITY_MAX_PERCENT,
        HUMIDITY_MIN_PERCENT, SensorReading, TEMPERATURE_MAX_CELSIUS, TEMPERATURE_MIN_CELSIUS,
        decode_manufacturer_data, match_advertisement,
    },
    manifest::Manifest,
};

pub const DEVICE_ID_PREFIX: &str = "inkbird-ibs-th1";

pub const TEMPERATURE: &str = "temperature";
pub const HUMIDITY: &str = "humidity";
pub const BATTERY: &str = "battery";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Added,
    Updated,
}

#[derive(Debug)]
pub struct InkbirdDevice {
    pub address: MacAddr6,

    pub device: Device,
}

impl InkbirdDevice {
    fn new(address: MacAddr6, manifest: &Manifest) -> Self {
        let mut device = Device::new(
            format!("{DEVICE_ID_PREFIX}-{address}"),
            manifest.display_name.clone(),
            manifest.description.clone(),
            vec!["TemperatureSensor"],
        );
        device.add_property(temperature_property());
        device.add_property(humidity_property());
        device.add_property(battery_property());

        Self { address, device }
    }

    pub fn id(&self) -> &str {
        &self.device.id
    }

    pub fn value(&self, property: &str) -> Option<f64> {
        self.device.property(property).and_then(|p| p.value)
    }

    fn set_reading<H: DeviceHandle>(
        &mut self,
        reading: &SensorReading,
        host: &mut H,
    ) -> Result<()> {
        let values = [
            (TEMPERATURE, reading.temperature_celsius),
            (HUMIDITY, reading.humidity_percent),
            (BATTERY, f64::from(reading.battery_percent)),
        ];

        for (name, value) in values {
            let property = self.device.set_property_value(name, value)?.clone();
            host.notify_property_changed(&self.device.id, &property)
                .with_context(|| format!("failed to notify {name} change: {}", self.device.id))?;
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct InkbirdAdapter<H> {
    manifest: Manifest,
    poll_interval: Duration,
    devices: IndexMap<MacAddr6, InkbirdDevice>,
    host: H,
}

impl<H: AdapterHandle + DeviceHandle> InkbirdAdapter<H> {
    pub fn new(manifest: Manifest, host: H) -> Self {
        let poll_interval = manifest.poll_interval();

        Self {
            manifest,
            poll_interval,
            devices: IndexMap::new(),
            host,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Declared in the manifest. Readings arrive by scanning, so nothing
    /// is scheduled on it.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn device(&self, address: &MacAddr6) -> Option<&InkbirdDevice> {
        self.devices.get(address)
    }

    /// Known devices, in discovery order.
    pub fn devices(&self) -> impl Iterator<Item = &InkbirdDevice> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    #[cfg(test)]
    fn host(&self) -> &H {
        &self.host
    }

    pub fn handle_advertisement(
        &mut self,
        address: MacAddr6,
        advertisement: &Advertisement,
    ) -> Result<Outcome> {
        let Some(manufacturer_data) = match_advertisement(advertisement) else {
            return Ok(Outcome::Ignored);
        };

        let reading = decode_manufacturer_data(&manufacturer_data);

        let out_of_range = reading.out_of_range_fields();
        if !out_of_range.is_empty() {
            tracing::warn!(
                %address,
                ?reading,
                fields = ?out_of_range,
                "reading outside declared range"
            );
        }

        let (device, outcome) = match self.devices.entry(address) {
            Entry::Occupied(entry) => (entry.into_mut(), Outcome::Updated),
            Entry::Vacant(entry) => {
                tracing::info!(%address, "detected new Inkbird IBS-TH1 Mini");

                let device = InkbirdDevice::new(address, &self.manifest);
                self.host
                    .handle_device_added(&device.device)
                    .with_context(|| format!("failed to register device: {}", device.id()))?;
                (entry.insert(device), Outcome::Added)
            }
        };

        tracing::debug!(%address, ?reading, "received reading");
        device.set_reading(&reading, &mut self.host)?;

        Ok(outcome)
    }
}

fn temperature_property() -> PropertyDescription {
    PropertyDescription {
        at_type: Some("TemperatureProperty"),
        value_type: "number",
        minimum: TEMPERATURE_MIN_CELSIUS,
        maximum: TEMPERATURE_MAX_CELSIUS,
        multiple_of: 0.01,
        unit: "degree celsius",
        title: TEMPERATURE,
        description: "The ambient temperature",
        read_only: true,
    }
}

fn humidity_property() -> PropertyDescription {
    PropertyDescription {
        at_type: None,
        value_type: "number",
        minimum: HUMIDITY_MIN_PERCENT,
        maximum: HUMIDITY_MAX_PERCENT,
        multiple_of: 0.01,
        unit: "percent",
        title: HUMIDITY,
        description: "The relative humidity",
        read_only: true,
    }
}

fn battery_property() -> PropertyDescription {
    PropertyDescription {
        at_type: None,
        value_type: "number",
        minimum: f64::from(BATTERY_MIN_PERCENT),
        maximum: f64::from(BATTERY_MAX_PERCENT),
        multiple_of: 1.0,
        unit: "percent",
        title: BATTERY,
        description: "The battery voltage",
        read_only: true,
    }
}
