//! Contract ABI loading and event schema resolution.
//!
//! The ABI is read at startup from the compiled Foundry artifact
//! (`out/Dexterity.sol/Dexterity.json`), so the service follows whatever
//! event layout the deployed contract was built with. Each event the
//! service reads is resolved once into an [`EventSchema`] that knows which
//! of its declared inputs carry the addresses of interest.

use std::path::Path;

use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::B256;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Load a contract ABI from a compiled artifact file.
///
/// Accepts either a Foundry/Hardhat artifact object with an `abi` key or a
/// bare ABI array.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no valid ABI.
pub fn load_artifact(path: &Path) -> Result<JsonAbi> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_artifact(&text)
}

/// Parse a contract ABI from artifact JSON.
///
/// # Errors
///
/// Returns an error if the JSON holds no valid ABI.
pub fn parse_artifact(json: &str) -> Result<JsonAbi> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Artifact {
        Compiled { abi: JsonAbi },
        Bare(JsonAbi),
    }

    match serde_json::from_str(json) {
        Ok(Artifact::Compiled { abi } | Artifact::Bare(abi)) => Ok(abi),
        Err(source) => Err(Error::Json {
            what: "contract artifact",
            source,
        }),
    }
}

/// The Dexterity events this crate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A liquidity pool was created for a token pair.
    PoolCreated,
    /// A trader swapped one token for another.
    Swapped,
    /// A liquidity provider deposited into a pool.
    Deposited,
}

impl EventKind {
    /// All kinds, in resolution order.
    pub const ALL: &[Self] = &[Self::PoolCreated, Self::Swapped, Self::Deposited];

    /// Event name as declared in the contract.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PoolCreated => "PoolCreated",
            Self::Swapped => "Swapped",
            Self::Deposited => "Deposited",
        }
    }

    /// Declaration positions of the address arguments extracted from each
    /// log: both pool tokens, the swapping trader, the depositor.
    #[must_use]
    pub const fn address_fields(self) -> &'static [usize] {
        match self {
            Self::PoolCreated => &[0, 1],
            Self::Swapped | Self::Deposited => &[0],
        }
    }
}

/// An event resolved from the ABI, validated for address extraction.
#[derive(Debug, Clone)]
pub struct EventSchema {
    kind: EventKind,
    event: Event,
}

impl EventSchema {
    /// Resolve `kind` against `abi`.
    ///
    /// The first declaration with the event's name is used. Every position
    /// in [`EventKind::address_fields`] must be declared as `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventNotFound`] if the event is absent, or
    /// [`Error::InvalidEventSchema`] if an address field is missing or has
    /// another type.
    pub fn resolve(abi: &JsonAbi, kind: EventKind) -> Result<Self> {
        let event = abi
            .event(kind.name())
            .and_then(|overloads| overloads.first())
            .ok_or(Error::EventNotFound(kind.name()))?;

        if event.anonymous {
            return Err(Error::InvalidEventSchema {
                event: kind.name(),
                position: 0,
                reason: "anonymous events have no selector".to_owned(),
            });
        }

        for &position in kind.address_fields() {
            let input = event
                .inputs
                .get(position)
                .ok_or_else(|| Error::InvalidEventSchema {
                    event: kind.name(),
                    position,
                    reason: format!("event declares only {} inputs", event.inputs.len()),
                })?;
            if input.ty != "address" {
                return Err(Error::InvalidEventSchema {
                    event: kind.name(),
                    position,
                    reason: format!("expected `address`, found `{}`", input.ty),
                });
            }
        }

        Ok(Self {
            kind,
            event: event.clone(),
        })
    }

    /// Which event this schema describes.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The resolved ABI event.
    #[must_use]
    pub const fn event(&self) -> &Event {
        &self.event
    }

    /// Topic 0 of every log emitted for this event.
    #[must_use]
    pub fn selector(&self) -> B256 {
        self.event.selector()
    }

    /// Canonical signature, e.g. `Swapped(address,address,uint256)`.
    #[must_use]
    pub fn signature(&self) -> String {
        self.event.signature()
    }

    /// Topic slot (1..=3) holding the input declared at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotIndexed`] if the input does not exist or is not
    /// indexed.
    pub fn topic_slot(&self, position: usize) -> Result<usize> {
        let not_indexed = || Error::NotIndexed {
            event: self.kind.name(),
            position,
        };
        let input = self.event.inputs.get(position).ok_or_else(not_indexed)?;
        if !input.indexed {
            return Err(not_indexed());
        }
        let preceding = self
            .event
            .inputs
            .iter()
            .take(position)
            .filter(|p| p.indexed)
            .count();
        Ok(preceding + 1)
    }
}

/// All event schemas the client needs, resolved together.
#[derive(Debug, Clone)]
pub struct Schemas {
    pool_created: EventSchema,
    swapped: EventSchema,
    deposited: EventSchema,
}

impl Schemas {
    /// Resolve every [`EventKind`] against `abi`.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error, see [`EventSchema::resolve`].
    pub fn resolve(abi: &JsonAbi) -> Result<Self> {
        Ok(Self {
            pool_created: EventSchema::resolve(abi, EventKind::PoolCreated)?,
            swapped: EventSchema::resolve(abi, EventKind::Swapped)?,
            deposited: EventSchema::resolve(abi, EventKind::Deposited)?,
        })
    }

    /// Schema for `kind`.
    #[must_use]
    pub const fn get(&self, kind: EventKind) -> &EventSchema {
        match kind {
            EventKind::PoolCreated => &self.pool_created,
            EventKind::Swapped => &self.swapped,
            EventKind::Deposited => &self.deposited,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::keccak256;

    use super::*;

    const ARTIFACT: &str = include_str!("../tests/fixtures/Dexterity.json");

    fn abi_with(events: &str) -> JsonAbi {
        parse_artifact(&format!("[{events}]")).unwrap()
    }

    #[test]
    fn parses_compiled_and_bare_artifacts() {
        let compiled = parse_artifact(ARTIFACT).unwrap();
        assert!(compiled.event("Swapped").is_some());

        let bare = abi_with(
            r#"{"type":"event","name":"Swapped","anonymous":false,"inputs":[
                {"name":"trader","type":"address","indexed":true}]}"#,
        );
        assert!(bare.event("Swapped").is_some());
    }

    #[test]
    fn rejects_garbage_artifact() {
        assert!(matches!(
            parse_artifact(r#"{"bytecode":"0x00"}"#),
            Err(Error::Json { .. })
        ));
    }

    #[test]
    fn resolves_fixture_schemas() {
        let abi = parse_artifact(ARTIFACT).unwrap();
        let schemas = Schemas::resolve(&abi).unwrap();
        for &kind in EventKind::ALL {
            assert_eq!(schemas.get(kind).kind(), kind);
        }
        let swapped = schemas.get(EventKind::Swapped);
        assert_eq!(
            swapped.selector(),
            keccak256(swapped.signature().as_bytes())
        );
    }

    #[test]
    fn missing_event_is_reported() {
        let abi = abi_with(
            r#"{"type":"event","name":"Swapped","anonymous":false,"inputs":[
                {"name":"trader","type":"address","indexed":true}]}"#,
        );
        let err = EventSchema::resolve(&abi, EventKind::Deposited).unwrap_err();
        assert!(matches!(err, Error::EventNotFound("Deposited")));
    }

    #[test]
    fn non_address_field_is_rejected() {
        let abi = abi_with(
            r#"{"type":"event","name":"PoolCreated","anonymous":false,"inputs":[
                {"name":"token0","type":"address","indexed":true},
                {"name":"poolId","type":"uint256","indexed":false}]}"#,
        );
        let err = EventSchema::resolve(&abi, EventKind::PoolCreated).unwrap_err();
        assert!(matches!(err, Error::InvalidEventSchema { position: 1, .. }));
    }

    #[test]
    fn too_few_inputs_is_rejected() {
        let abi = abi_with(
            r#"{"type":"event","name":"PoolCreated","anonymous":false,"inputs":[
                {"name":"token0","type":"address","indexed":true}]}"#,
        );
        let err = EventSchema::resolve(&abi, EventKind::PoolCreated).unwrap_err();
        assert!(matches!(err, Error::InvalidEventSchema { position: 1, .. }));
    }

    #[test]
    fn topic_slots_skip_non_indexed_inputs() {
        let abi = abi_with(
            r#"{"type":"event","name":"Deposited","anonymous":false,"inputs":[
                {"name":"depositor","type":"address","indexed":true},
                {"name":"amount","type":"uint256","indexed":false},
                {"name":"token","type":"address","indexed":true}]}"#,
        );
        let schema = EventSchema::resolve(&abi, EventKind::Deposited).unwrap();
        assert_eq!(schema.topic_slot(0).unwrap(), 1);
        assert_eq!(schema.topic_slot(2).unwrap(), 2);
        assert!(matches!(
            schema.topic_slot(1),
            Err(Error::NotIndexed { position: 1, .. })
        ));
        assert!(matches!(
            schema.topic_slot(7),
            Err(Error::NotIndexed { position: 7, .. })
        ));
    }
}
