//! Runtime configuration loaded from `config.toml`.
//!
//! Every key is optional. When no config file is present the built-in
//! defaults match a local Foundry setup: an Anvil node on port 8545 and the
//! `contracts/` project checked out next to the service.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// JSON-RPC endpoint of the node holding the contract.
    pub rpc_url: String,
    /// Foundry broadcast record of the deployment script.
    pub manifest: PathBuf,
    /// Compiled contract artifact holding the ABI.
    pub artifact: PathBuf,
    /// Manifest name of the contract to bind.
    pub contract: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 3000)),
            rpc_url: "http://localhost:8545".to_owned(),
            manifest: PathBuf::from("contracts/broadcast/DepositsAndSwaps.s.sol/1/run-latest.json"),
            artifact: PathBuf::from("contracts/out/Dexterity.sol/Dexterity.json"),
            contract: "Dexterity".to_owned(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Returns [`Config::default`] if the file does not exist,
    /// allowing the binary to work without any config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse configuration from TOML text, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
