use std::collections::HashMap;

use anyhow::{Context as _, Result};
use btleplug::{
    api::{Central, CentralEvent, CentralState, Peripheral as _},
    platform::{Adapter, PeripheralId},
};
use inkbird_gateway::inkbird::{Advertisement, reassemble_manufacturer_data};
use macaddr::MacAddr6;

/// The part of a btleplug event the scan loop cares about.
#[derive(Debug)]
pub enum ScanEvent<I> {
    ManufacturerData {
        id: I,
        manufacturer_data: HashMap<u16, Vec<u8>>,
    },
    State(CentralState),
    Other,
}

impl From<CentralEvent> for ScanEvent<PeripheralId> {
    fn from(event: CentralEvent) -> Self {
        match event {
            CentralEvent::ManufacturerDataAdvertisement {
                id,
                manufacturer_data,
            } => ScanEvent::ManufacturerData {
                id,
                manufacturer_data,
            },
            CentralEvent::StateUpdate(state) => ScanEvent::State(state),
            // Discovery and RSSI updates carry no new payload; the same
            // broadcast also arrives as a manufacturer-data event.
            _ => ScanEvent::Other,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action<I> {
    Dispatch { id: I, manufacturer_data: Vec<u8> },
    StartScan,
    Skip,
}

pub fn next_action<I>(event: ScanEvent<I>) -> Action<I> {
    match event {
        ScanEvent::ManufacturerData {
            id,
            manufacturer_data,
        } => Action::Dispatch {
            id,
            manufacturer_data: reassemble_manufacturer_data(&manufacturer_data),
        },
        ScanEvent::State(state) => state_action(state),
        ScanEvent::Other => Action::Skip,
    }
}

/// Scanning only makes sense on a powered radio. Powering back on after an
/// outage needs a fresh scan.
pub fn state_action<I>(state: CentralState) -> Action<I> {
    match state {
        CentralState::PoweredOn => Action::StartScan,
        _ => Action::Skip,
    }
}

/// Pairs manufacturer data taken from an event with the peripheral's address
/// and advertised name.
pub async fn read_advertisement(
    central: &Adapter,
    id: &PeripheralId,
    manufacturer_data: Vec<u8>,
) -> Result<(MacAddr6, Advertisement)> {
    let peripheral = central
        .peripheral(id)
        .await
        .with_context(|| format!("failed to get BLE peripheral: {id}"))?;

    let mac_address: MacAddr6 = peripheral.address().into_inner().into();

    let local_name = peripheral
        .properties()
        .await
        .with_context(|| format!("failed to get BLE peripheral properties: {id} ({mac_address})"))?
        .and_then(|properties| properties.local_name);

    let advertisement = Advertisement {
        local_name,
        manufacturer_data,
    };

    Ok((mac_address, advertisement))
}
