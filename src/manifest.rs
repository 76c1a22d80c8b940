use std::{fs, path::Path, time::Duration};

use anyhow::{Context as _, Result};
use serde::Deserialize;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Addon manifest, as shipped next to the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub name: String,

    pub display_name: String,

    pub description: String,

    #[serde(default)]
    pub moziot: Moziot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Moziot {
    #[serde(default)]
    pub config: AddonConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonConfig {
    /// Seconds. The adapter is scan driven and never polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            name: "inkbird-ibs-th1-adapter".to_owned(),
            display_name: "Inkbird IBS-TH1 Mini".to_owned(),
            description: "Inkbird IBS-TH1 Mini temperature and humidity sensor".to_owned(),
            moziot: Moziot::default(),
        }
    }
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse manifest")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::from_json(&json).with_context(|| format!("invalid manifest: {}", path.display()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.moziot.config.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_poll_interval() {
        let manifest = Manifest::from_json(
            r#"{
                "name": "inkbird",
                "display_name": "Inkbird",
                "description": "Sensor",
                "moziot": { "config": { "pollInterval": 5 } }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.name, "inkbird");
        assert_eq!(manifest.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn defaults_poll_interval_when_missing() {
        let manifest = Manifest::from_json(
            r#"{ "name": "inkbird", "display_name": "Inkbird", "description": "Sensor" }"#,
        )
        .unwrap();

        assert_eq!(
            manifest.poll_interval(),
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
        );
    }

    #[test]
    fn rejects_manifest_without_name() {
        let err = Manifest::from_json(r#"{ "display_name": "Inkbird", "description": "" }"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse manifest"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Manifest::load(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read manifest"));
    }
}
