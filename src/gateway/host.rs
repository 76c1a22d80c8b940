use std::io::Write;

use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::gateway::{Device, Property};

/// Registration hook the host exposes to an adapter.
pub trait AdapterHandle {
    fn handle_device_added(&mut self, device: &Device) -> Result<()>;
}

/// Notification hook the host exposes to a device.
pub trait DeviceHandle {
    fn notify_property_changed(&mut self, device_id: &str, property: &Property) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(tag = "messageType", content = "data", rename_all = "camelCase")]
enum Message<'a> {
    #[serde(rename_all = "camelCase")]
    DeviceAdded { adapter_id: &'a str, device: &'a Device },

    #[serde(rename_all = "camelCase")]
    PropertyChanged {
        adapter_id: &'a str,
        device_id: &'a str,
        property: PropertyValue<'a>,
    },
}

#[derive(Debug, Serialize)]
struct PropertyValue<'a> {
    name: &'a str,
    value: Option<f64>,
}

/// Host that writes every gateway message as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesHost<W> {
    adapter_id: String,
    writer: W,
}

impl<W: Write> JsonLinesHost<W> {
    pub fn new(adapter_id: impl Into<String>, writer: W) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn write_message<W: Write>(writer: &mut W, message: &Message<'_>) -> Result<()> {
    serde_json::to_writer(&mut *writer, message).context("failed to serialize gateway message")?;
    writer
        .write_all(b"\n")
        .context("failed to write gateway message")?;
    writer.flush().context("failed to flush gateway message")?;

    Ok(())
}

impl<W: Write> AdapterHandle for JsonLinesHost<W> {
    fn handle_device_added(&mut self, device: &Device) -> Result<()> {
        write_message(
            &mut self.writer,
            &Message::DeviceAdded {
                adapter_id: &self.adapter_id,
                device,
            },
        )
    }
}

impl<W: Write> DeviceHandle for JsonLinesHost<W> {
    fn notify_property_changed(&mut self, device_id: &str, property: &Property) -> Result<()> {
        write_message(
            &mut self.writer,
            &Message::PropertyChanged {
                adapter_id: &self.adapter_id,
                device_id,
                property: PropertyValue {
                    name: property.name,
                    value: property.value,
                },
            },
        )
    }
}
