//! Typed, read-only access to the Dexterity DEX contract's event logs.
//!
//! The contract address comes from the Foundry deployment [`manifest`] and
//! the event layout from the compiled contract artifact ([`abi`]). A
//! [`Dexterity`] handle combines both with any alloy
//! [`Provider`](alloy::providers::Provider) and answers the questions the
//! HTTP API serves: which tokens have pools, how many swaps happened, who
//! traded and who provided liquidity.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use alloy::providers::ProviderBuilder;
//! use dexterity::{Dexterity, Manifest, abi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = Manifest::load(Path::new("run-latest.json"))?;
//! let abi = abi::load_artifact(Path::new("Dexterity.json"))?;
//! let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse()?);
//!
//! let dex = Dexterity::new(provider, manifest.deployment_of("Dexterity")?, &abi)?;
//! println!("{} swaps", dex.swap_count().await?);
//! # Ok(())
//! # }
//! ```

pub mod abi;
mod client;
pub mod error;
pub mod events;
pub mod manifest;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use abi::EventKind;
pub use client::Dexterity;
pub use error::{Error, Result};
pub use manifest::Manifest;
