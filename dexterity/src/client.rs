use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use alloy::providers::Provider;

use crate::abi::{EventKind, EventSchema, Schemas};
use crate::error::Result;
use crate::events::{self, EventQuery, EventRecord};

/// Read-only handle on a deployed Dexterity contract.
///
/// Built once from a provider, the contract address and the contract ABI.
/// All queries scan the full chain history and hit the node on every call;
/// nothing is cached and failed requests are not retried.
#[derive(Debug, Clone)]
pub struct Dexterity<P> {
    provider: P,
    address: Address,
    schemas: Schemas,
}

impl<P: Provider> Dexterity<P> {
    /// Bind `provider` to the contract at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if `abi` lacks one of the events in
    /// [`EventKind::ALL`] or declares it with an unexpected shape.
    pub fn new(provider: P, address: Address, abi: &JsonAbi) -> Result<Self> {
        let schemas = Schemas::resolve(abi)?;
        Ok(Self {
            provider,
            address,
            schemas,
        })
    }

    /// Contract address this handle queries.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Resolved schema for `kind`.
    #[must_use]
    pub const fn schema(&self, kind: EventKind) -> &EventSchema {
        self.schemas.get(kind)
    }

    /// The underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Run `query` against the node and decode every returned log.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Rpc`] if the node request fails and
    /// [`crate::Error::MalformedEvent`] if a log does not decode.
    pub async fn query(&self, query: &EventQuery) -> Result<Vec<EventRecord>> {
        let schema = self.schema(query.kind());
        let filter = query.to_filter(schema, self.address)?;
        let logs = self.provider.get_logs(&filter).await?;
        tracing::debug!(
            event = query.kind().name(),
            contract = %self.address,
            logs = logs.len(),
            "fetched logs"
        );
        events::decode_all(schema, &logs)
    }

    /// Every log of `kind` the contract has emitted.
    ///
    /// # Errors
    ///
    /// See [`Self::query`].
    pub async fn events(&self, kind: EventKind) -> Result<Vec<EventRecord>> {
        self.query(&EventQuery::new(kind)).await
    }

    /// Distinct token addresses across all created pools.
    ///
    /// # Errors
    ///
    /// See [`Self::query`].
    pub async fn token_addresses(&self) -> Result<Vec<Address>> {
        let records = self.events(EventKind::PoolCreated).await?;
        events::unique_addresses(&records)
    }

    /// Number of swaps ever executed.
    ///
    /// # Errors
    ///
    /// See [`Self::query`].
    pub async fn swap_count(&self) -> Result<usize> {
        Ok(self.events(EventKind::Swapped).await?.len())
    }

    /// Distinct accounts that have swapped.
    ///
    /// # Errors
    ///
    /// See [`Self::query`].
    pub async fn traders(&self) -> Result<Vec<Address>> {
        let records = self.events(EventKind::Swapped).await?;
        events::unique_addresses(&records)
    }

    /// Distinct accounts that have deposited.
    ///
    /// # Errors
    ///
    /// See [`Self::query`].
    pub async fn holders(&self) -> Result<Vec<Address>> {
        let records = self.events(EventKind::Deposited).await?;
        events::unique_addresses(&records)
    }
}
