//! JSON configuration file loading.
//!
//! Mirrors the reference implementation's `Config`/`PortHoppingConfig`
//! shape field-for-field. A missing or malformed file is a fatal
//! `Error::Config` at startup - there is no `Default` impl, matching the
//! original's behavior of refusing to start without an explicit file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration loaded from `configs/config.json` (or a path
/// given via `--config`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the server binds its handshake listener on.
    #[serde(default)]
    pub listen_address: Option<String>,

    /// Address the client sends its handshake to.
    #[serde(default)]
    pub client_target_address: Option<String>,

    pub handshake_port: u16,

    /// Reserved; read but never consulted. See `DESIGN.md` Open Question 3.
    #[serde(default)]
    pub auth_key: String,

    pub port_hopping: PortHoppingConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PortHoppingConfig {
    pub enabled: bool,
    pub start: u16,
    pub end: u16,
}

impl Config {
    /// Load and parse a config file from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::config(format!("reading {}: {e}", path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::config(format!("parsing {}: {e}", path.display())))
    }

    /// The server's listen address, or an error if the config didn't set one.
    pub fn require_listen_address(&self) -> Result<&str> {
        self.listen_address
            .as_deref()
            .ok_or_else(|| Error::config("listen_address is required for the server"))
    }

    /// The client's target address, or an error if the config didn't set one.
    pub fn require_client_target_address(&self) -> Result<&str> {
        self.client_target_address
            .as_deref()
            .ok_or_else(|| Error::config("client_target_address is required for the client"))
    }
}

/// Default path searched when `--config` isn't given.
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.json";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_well_formed_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "listen_address": "0.0.0.0:9000",
                "handshake_port": 9000,
                "auth_key": "unused",
                "port_hopping": {{ "enabled": true, "start": 40000, "end": 41000 }}
            }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.handshake_port, 9000);
        assert!(config.port_hopping.enabled);
    }

    #[test]
    fn rejects_missing_file() {
        assert!(Config::load("/nonexistent/config.json").is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
