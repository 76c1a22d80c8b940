use std::{path::PathBuf, time::Duration};

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Addon manifest; the built-in one is used when omitted.
    #[arg(long, env = "INKBIRD_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Poll interval in seconds, overriding the manifest.
    #[arg(long, env = "INKBIRD_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "INKBIRD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval.map(Duration::from_secs)
    }
}
