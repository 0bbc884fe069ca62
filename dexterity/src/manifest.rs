//! Deployment manifest produced by `forge script --broadcast`.
//!
//! The manifest (`broadcast/<script>/<chain>/run-latest.json`) records every
//! transaction the deployment script sent. It is the source of truth for
//! where the Dexterity contract and the test tokens live on-chain, and for
//! the human-readable names of those tokens.

use std::path::Path;

use alloy::primitives::Address;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A parsed deployment manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Broadcast transactions in submission order.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// One broadcast transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// How the transaction was sent.
    pub transaction_type: TransactionType,

    /// Name of the contract created or called, if known.
    #[serde(default)]
    pub contract_name: Option<String>,

    /// Address of the contract created or called, if known.
    #[serde(default)]
    pub contract_address: Option<Address>,
}

/// Broadcast transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Contract creation.
    Create,
    /// Deterministic contract creation.
    Create2,
    /// Call into an existing contract.
    Call,
    /// Anything newer than this crate knows about.
    #[serde(other)]
    Other,
}

impl Manifest {
    /// Load a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a manifest from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not have the manifest shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::Json {
            what: "deployment manifest",
            source,
        })
    }

    /// Address of the first transaction recorded for `contract_name`,
    /// regardless of transaction type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractNotFound`] if no transaction names the
    /// contract with a known address.
    pub fn deployment_of(&self, contract_name: &str) -> Result<Address> {
        self.transactions
            .iter()
            .filter(|tx| tx.contract_name.as_deref() == Some(contract_name))
            .find_map(|tx| tx.contract_address)
            .ok_or_else(|| Error::ContractNotFound(contract_name.to_owned()))
    }

    /// Name of the contract the manifest created at `address`.
    ///
    /// Only `CREATE` transactions count; calls into the contract do not.
    #[must_use]
    pub fn contract_name_at(&self, address: Address) -> Option<&str> {
        self.transactions
            .iter()
            .filter(|tx| tx.transaction_type == TransactionType::Create)
            .find(|tx| tx.contract_address == Some(address))
            .and_then(|tx| tx.contract_name.as_deref())
    }
}
