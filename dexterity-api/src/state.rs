//! Shared, read-only application state.

use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use anyhow::{Context, Result};
use dexterity::{Dexterity, Manifest, abi};

use crate::config::Config;

/// Everything a handler needs: the bound contract and the manifest used to
/// name tokens. Built once at startup, cloned cheaply into each request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Contract handle.
    pub dexterity: Arc<Dexterity<DynProvider>>,
    /// Deployment record.
    pub manifest: Arc<Manifest>,
}

impl AppState {
    /// Wrap an already-bound contract and its manifest.
    #[must_use]
    pub fn new(dexterity: Dexterity<DynProvider>, manifest: Manifest) -> Self {
        Self {
            dexterity: Arc::new(dexterity),
            manifest: Arc::new(manifest),
        }
    }

    /// Bind the contract described by `config`.
    ///
    /// Reads the manifest and artifact, resolves the contract address and
    /// event schemas, and connects an HTTP provider. No request is sent to
    /// the node here.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is unusable, the manifest has no
    /// entry for the contract, or the ABI lacks a required event.
    pub fn bind(config: &Config) -> Result<Self> {
        let Deployment {
            manifest,
            address,
            abi,
        } = Deployment::load(config)?;

        let url = config
            .rpc_url
            .parse()
            .with_context(|| format!("invalid RPC URL: {}", config.rpc_url))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        let dexterity = Dexterity::new(provider, address, &abi)
            .with_context(|| format!("binding {}", config.artifact.display()))?;

        tracing::info!(
            contract = %config.contract,
            %address,
            rpc = %config.rpc_url,
            "contract bound"
        );
        Ok(Self::new(dexterity, manifest))
    }
}

/// The on-disk description of a deployment: where the contract lives and
/// what its ABI looks like.
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Deployment record.
    pub manifest: Manifest,
    /// Address of the configured contract.
    pub address: Address,
    /// Contract ABI from the compiled artifact.
    pub abi: JsonAbi,
}

impl Deployment {
    /// Load the manifest and ABI named by `config` and look up the
    /// contract address.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is unusable or the manifest has no
    /// entry for the configured contract.
    pub fn load(config: &Config) -> Result<Self> {
        let manifest = Manifest::load(&config.manifest)
            .with_context(|| format!("loading manifest {}", config.manifest.display()))?;
        let address = manifest
            .deployment_of(&config.contract)
            .with_context(|| format!("resolving contract in {}", config.manifest.display()))?;
        let abi = abi::load_artifact(&config.artifact)
            .with_context(|| format!("loading artifact {}", config.artifact.display()))?;
        Ok(Self {
            manifest,
            address,
            abi,
        })
    }
}
