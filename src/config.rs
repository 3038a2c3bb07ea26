use crate::prelude::*;

use anyhow::Result;
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub inverters: Vec<Inverter>,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,
}

// Inverter {{{
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Inverter {
    #[serde(default = "Config::default_enabled")]
    pub enabled: bool,

    pub host: String,
    #[serde(default = "Config::default_port")]
    pub port: u16,
    pub family: Family,
    #[serde(default = "Config::default_comm_addr")]
    pub comm_addr: u8,

    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "timeout_ms", default = "Config::default_timeout")]
    pub timeout: Duration,
    #[serde(default = "Config::default_retries")]
    pub retries: u32,

    #[serde(default)]
    pub include_unknown: bool,
}
impl Inverter {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn comm_addr(&self) -> u8 {
        self.comm_addr
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn include_unknown(&self) -> bool {
        self.include_unknown
    }
} // }}}

#[derive(Clone)]
pub struct ConfigWrapper {
    config: Arc<Mutex<Config>>,
}

impl ConfigWrapper {
    pub fn from_config(config: Config) -> Self {
        Self {
            config: Arc::new(Mutex::new(config)),
        }
    }

    fn config(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn inverters(&self) -> Vec<Inverter> {
        self.config().inverters.clone()
    }

    pub fn enabled_inverters(&self) -> Vec<Inverter> {
        self.inverters().into_iter().filter(|i| i.enabled()).collect()
    }

    pub fn loglevel(&self) -> String {
        self.config().loglevel.clone()
    }

    pub fn log_summary(&self) {
        self.config().log_summary()
    }
}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| anyhow!("error reading {}: {}", file, err))?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|err| anyhow!("error parsing {}: {}", file, err))?;

        config.validate()?;
        Ok(config)
    }

    /// Logs what was loaded; called once logging is up.
    pub fn log_summary(&self) {
        info!(
            "  Inverters: {} configured, {} enabled",
            self.inverters.len(),
            self.inverters.iter().filter(|i| i.enabled).count()
        );
        for (i, inv) in self.inverters.iter().enumerate() {
            info!("    Inverter[{}]:", i);
            info!("      Enabled: {}", inv.enabled);
            info!("      Address: {}:{}", inv.host, inv.port);
            info!("      Family: {}", inv.family);
            info!("      Comm Addr: {:#04x}", inv.comm_addr);
            info!("      Timeout: {}ms x {} retries", inv.timeout.as_millis(), inv.retries);
            info!("      Include Unknown: {}", inv.include_unknown);
        }
        info!("  Log Level: {}", self.loglevel);
    }

    fn validate(&self) -> Result<()> {
        for (i, inv) in self.inverters.iter().enumerate() {
            if !inv.enabled {
                continue;
            }
            if inv.host.is_empty() {
                bail!("inverter[{}].host cannot be empty", i);
            }
            if inv.port == 0 {
                bail!("inverter[{}].port must be between 1 and 65535", i);
            }
            if inv.timeout.is_zero() {
                bail!("inverter[{}].timeout_ms must be greater than 0", i);
            }
        }

        Ok(())
    }

    fn default_enabled() -> bool {
        true
    }

    fn default_port() -> u16 {
        8899
    }

    fn default_comm_addr() -> u8 {
        crate::goodwe::packet::DEFAULT_COMM_ADDR
    }

    fn default_timeout() -> Duration {
        Duration::from_millis(1000)
    }

    fn default_retries() -> u32 {
        3
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }
}
