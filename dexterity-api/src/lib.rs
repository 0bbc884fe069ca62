//! Read-only HTTP API over the Dexterity DEX contract.
//!
//! Serves the tokens that have pools, the swap count, and the distinct
//! traders and liquidity providers, all derived on each request from the
//! contract's event logs.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
