mod args;
mod ble;
mod logging;

use std::{io, process::ExitCode};

use anyhow::{Context as _, Result, anyhow, bail};
use args::Args;
use btleplug::{
    api::{Central, CentralEvent, Manager as _, ScanFilter},
    platform::{Adapter, Manager, PeripheralId},
};
use clap::Parser as _;
use inkbird_gateway::{adapter::InkbirdAdapter, gateway::JsonLinesHost, manifest::Manifest};
use tokio_stream::StreamExt as _;

use crate::{
    ble::{Action, ScanEvent, next_action, read_advertisement, state_action},
    logging::init_logger,
};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logger(&args.log_level)?;

    let manifest = match &args.manifest {
        Some(path) => Manifest::load(path).context("failed to load manifest")?,
        None => Manifest::default(),
    };

    let host = JsonLinesHost::new(manifest.name.clone(), io::stdout());
    let mut inkbird = InkbirdAdapter::new(manifest, host);
    if let Some(poll_interval) = args.poll_interval() {
        inkbird = inkbird.with_poll_interval(poll_interval);
    }

    tracing::info!(
        adapter = inkbird.name(),
        poll_interval_secs = inkbird.poll_interval().as_secs(),
        "starting adapter"
    );

    let manager = Manager::new()
        .await
        .context("failed to initialize Bluetooth manager")?;

    let adapters = manager
        .adapters()
        .await
        .context("failed to get Bluetooth adapters")?;

    let central = adapters
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no Bluetooth adapters found"))?;

    let mut events = central
        .events()
        .await
        .context("failed to subscribe to BLE events")?;

    let state = central
        .adapter_state()
        .await
        .context("failed to get Bluetooth adapter state")?;
    tracing::info!(?state, "Bluetooth adapter state");

    if matches!(state_action::<PeripheralId>(state), Action::StartScan) {
        start_scan(&central).await?;
    } else {
        tracing::info!("waiting for Bluetooth adapter to power on");
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let event = tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for shutdown signal")?;
                tracing::info!("shutting down");
                break;
            }
            event = events.next() => event,
        };

        let Some(event) = event else {
            bail!("BLE event stream ended");
        };

        if let CentralEvent::StateUpdate(state) = &event {
            tracing::info!(?state, "Bluetooth adapter state changed");
        }

        let (id, manufacturer_data) = match next_action(ScanEvent::from(event)) {
            Action::Dispatch {
                id,
                manufacturer_data,
            } => (id, manufacturer_data),
            Action::StartScan => {
                if let Err(err) = start_scan(&central).await {
                    tracing::warn!("{err:#}");
                }
                continue;
            }
            Action::Skip => continue,
        };

        let (mac_address, advertisement) =
            match read_advertisement(&central, &id, manufacturer_data).await {
                Ok(a) => a,
                Err(err) => {
                    tracing::warn!("{err:#}");
                    continue;
                }
            };

        if let Err(err) = inkbird.handle_advertisement(mac_address, &advertisement) {
            tracing::warn!(%mac_address, "failed to handle advertisement: {err:#}");
        }
    }

    if let Err(err) = central.stop_scan().await {
        tracing::warn!("failed to stop BLE scan: {err:#}");
    }

    tracing::info!(devices = inkbird.len(), "stopped");

    Ok(())
}

async fn start_scan(central: &Adapter) -> Result<()> {
    central
        .start_scan(ScanFilter::default())
        .await
        .context("failed to start BLE scan")?;

    tracing::info!("start scanning for devices");

    Ok(())
}
