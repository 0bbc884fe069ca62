//! Test fixtures: the compiled Dexterity ABI, a sample deployment manifest,
//! a builder for raw event logs and a client backed by a mocked provider.
//!
//! Compiled for this crate's unit tests and, behind the `testing` feature,
//! for downstream crates' tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc, missing_docs)]

use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, B256, Bytes, LogData, U256, address};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::Log;
use alloy::transports::mock::Asserter;

use crate::abi::{EventSchema, parse_artifact};
use crate::client::Dexterity;
use crate::manifest::Manifest;

/// Where the fixture manifest deploys Dexterity.
pub const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
/// `TokenA` in the fixture manifest.
pub const TOKEN_A: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
/// `TokenB` in the fixture manifest.
pub const TOKEN_B: Address = address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");

pub const ARTIFACT_JSON: &str = include_str!("../tests/fixtures/Dexterity.json");
pub const MANIFEST_JSON: &str = include_str!("../tests/fixtures/run-latest.json");

#[must_use]
pub fn fixture_abi() -> JsonAbi {
    parse_artifact(ARTIFACT_JSON).unwrap()
}

#[must_use]
pub fn fixture_manifest() -> Manifest {
    Manifest::from_json(MANIFEST_JSON).unwrap()
}

/// A provider whose responses are scripted through `asserter`.
#[must_use]
pub fn mocked_provider(asserter: Asserter) -> DynProvider {
    ProviderBuilder::new()
        .connect_mocked_client(asserter)
        .erased()
}

/// A client bound to [`CONTRACT`] with the fixture ABI, answering from
/// `asserter`.
#[must_use]
pub fn mocked_dexterity(asserter: Asserter) -> Dexterity<DynProvider> {
    Dexterity::new(mocked_provider(asserter), CONTRACT, &fixture_abi()).unwrap()
}

/// Assembles a raw log for an event schema, topic by topic and word by word.
#[derive(Debug, Clone)]
pub struct LogBuilder {
    address: Address,
    topics: Vec<B256>,
    data: Vec<u8>,
    block_number: u64,
    log_index: u64,
}

impl LogBuilder {
    /// Start a log with the schema's selector as topic 0.
    #[must_use]
    pub fn new(schema: &EventSchema) -> Self {
        Self {
            address: CONTRACT,
            topics: vec![schema.selector()],
            data: Vec::new(),
            block_number: 1,
            log_index: 0,
        }
    }

    #[must_use]
    pub fn pool_created(schema: &EventSchema, token0: Address, token1: Address, pool: u64) -> Self {
        Self::new(schema)
            .topic(token0)
            .topic(token1)
            .word(U256::from(pool))
    }

    #[must_use]
    pub fn swapped(schema: &EventSchema, trader: Address, token_in: Address, token_out: Address) -> Self {
        Self::new(schema)
            .topic(trader)
            .topic(token_in)
            .topic(token_out)
            .word(U256::from(1_000))
            .word(U256::from(990))
    }

    #[must_use]
    pub fn deposited(schema: &EventSchema, depositor: Address, pool: u64) -> Self {
        Self::new(schema)
            .topic(depositor)
            .word(U256::from(pool))
            .word(U256::from(500))
            .word(U256::from(500))
    }

    /// Append an indexed address.
    #[must_use]
    pub fn topic(mut self, address: Address) -> Self {
        self.topics.push(address.into_word());
        self
    }

    /// Append an indexed integer.
    #[must_use]
    pub fn topic_word(mut self, value: U256) -> Self {
        self.topics.push(B256::from(value));
        self
    }

    /// Append a 32-byte integer to the data section.
    #[must_use]
    pub fn word(mut self, value: U256) -> Self {
        self.data.extend_from_slice(&value.to_be_bytes::<32>());
        self
    }

    /// Append a left-padded address to the data section.
    #[must_use]
    pub fn address_word(mut self, address: Address) -> Self {
        self.data.extend_from_slice(address.into_word().as_slice());
        self
    }

    #[must_use]
    pub const fn block(mut self, block_number: u64) -> Self {
        self.block_number = block_number;
        self
    }

    #[must_use]
    pub const fn index(mut self, log_index: u64) -> Self {
        self.log_index = log_index;
        self
    }

    #[must_use]
    pub fn build(self) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: self.address,
                data: LogData::new_unchecked(self.topics, Bytes::from(self.data)),
            },
            block_number: Some(self.block_number),
            transaction_hash: Some(B256::with_last_byte(1)),
            transaction_index: Some(0),
            log_index: Some(self.log_index),
            ..Default::default()
        }
    }
}
