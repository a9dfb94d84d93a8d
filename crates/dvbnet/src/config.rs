use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use dvbnet_ctl::{AdapterRef, DEFAULT_DEVICE_ROOT, DEFAULT_REMOVAL_GRACE, MAX_INTERFACES};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "./dvbnet.toml";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub root: PathBuf,
    pub adapter: u8,
    pub net: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_DEVICE_ROOT),
            adapter: 0,
            net: 0,
        }
    }
}

impl DeviceConfig {
    /// Fills in whatever the command line left out.
    pub fn adapter_ref(&self, adapter: Option<u8>, net: Option<u8>) -> AdapterRef {
        AdapterRef::new(adapter.unwrap_or(self.adapter), net.unwrap_or(self.net))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct InterfacesConfig {
    pub max: u16,
    pub removal_grace_ms: u64,
}

impl Default for InterfacesConfig {
    fn default() -> Self {
        Self {
            max: MAX_INTERFACES,
            removal_grace_ms: DEFAULT_REMOVAL_GRACE.as_millis() as u64,
        }
    }
}

impl InterfacesConfig {
    pub fn removal_grace(&self) -> Duration {
        Duration::from_millis(self.removal_grace_ms)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub interfaces: InterfacesConfig,
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file = std::fs::read_to_string(path)?;
        let config = toml::from_str(&file)?;

        Ok(config)
    }

    /// Loads an explicitly given file, or the default file if there is one.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => Path::new(DEFAULT_CONFIG_PATH),
            None => return Ok(Self::default()),
        };

        debug!(path = %path.display(), "Loading the config");

        Self::load_from_file(path)
            .with_context(|| format!("Couldn't load the config from {}", path.display()))
    }
}
