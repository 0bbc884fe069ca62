//! Log queries, typed decoding and address extraction.

use std::collections::HashSet;

use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256};
use alloy::rpc::types::{Filter, Log};

use crate::abi::{EventKind, EventSchema};
use crate::error::{Error, Result};

/// A filtered `eth_getLogs` request for one Dexterity event.
///
/// Without argument filters the query matches every log the event ever
/// emitted: the range starts at the earliest block and is left open.
#[derive(Debug, Clone)]
pub struct EventQuery {
    kind: EventKind,
    args: Vec<(usize, Address)>,
}

impl EventQuery {
    /// Match all logs of `kind`.
    #[must_use]
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            args: Vec::new(),
        }
    }

    /// Only match logs whose indexed input at `position` equals `value`.
    #[must_use]
    pub fn arg(mut self, position: usize, value: Address) -> Self {
        self.args.push((position, value));
        self
    }

    /// Event this query targets.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Build the RPC filter for `contract`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotIndexed`] if an argument filter targets an input
    /// that cannot be matched by topic.
    pub fn to_filter(&self, schema: &EventSchema, contract: Address) -> Result<Filter> {
        let mut filter = Filter::new()
            .address(contract)
            .event_signature(schema.selector())
            .from_block(BlockNumberOrTag::Earliest);

        for &(position, value) in &self.args {
            let topic = value.into_word();
            filter = match schema.topic_slot(position)? {
                1 => filter.topic1(topic),
                2 => filter.topic2(topic),
                _ => filter.topic3(topic),
            };
        }
        Ok(filter)
    }
}

/// One decoded event log.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    kind: EventKind,
    args: Vec<DynSolValue>,
    block_number: Option<u64>,
    transaction_hash: Option<B256>,
    log_index: Option<u64>,
}

impl EventRecord {
    /// Decode `log` against `schema`.
    ///
    /// Arguments are returned in declaration order, indexed and data inputs
    /// interleaved as the ABI declares them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEvent`] if the log does not match the
    /// schema's topics or data layout.
    pub fn decode(schema: &EventSchema, log: &Log) -> Result<Self> {
        let event = schema.event();
        let malformed = |reason: String| Error::MalformedEvent {
            event: schema.kind().name(),
            reason,
        };

        let decoded = event
            .decode_log(log.data())
            .map_err(|e| malformed(e.to_string()))?;

        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        let args = event
            .inputs
            .iter()
            .map(|input| {
                let next = if input.indexed {
                    indexed.next()
                } else {
                    body.next()
                };
                next.ok_or_else(|| malformed(format!("missing value for `{}`", input.name)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            kind: schema.kind(),
            args,
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
        })
    }

    /// Which event this record was decoded as.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Decoded arguments in declaration order.
    #[must_use]
    pub fn args(&self) -> &[DynSolValue] {
        &self.args
    }

    /// Block that included the log, if the node reported it.
    #[must_use]
    pub const fn block_number(&self) -> Option<u64> {
        self.block_number
    }

    /// Transaction that emitted the log, if the node reported it.
    #[must_use]
    pub const fn transaction_hash(&self) -> Option<B256> {
        self.transaction_hash
    }

    /// Position of the log within its block, if the node reported it.
    #[must_use]
    pub const fn log_index(&self) -> Option<u64> {
        self.log_index
    }

    /// The address argument declared at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEvent`] if there is no such argument or it
    /// is not an address.
    pub fn address_at(&self, position: usize) -> Result<Address> {
        match self.args.get(position) {
            Some(DynSolValue::Address(address)) => Ok(*address),
            other => Err(Error::MalformedEvent {
                event: self.kind.name(),
                reason: format!("argument {position} is not an address: {other:?}"),
            }),
        }
    }

    /// The addresses this event kind designates for extraction.
    ///
    /// # Errors
    ///
    /// See [`Self::address_at`].
    pub fn addresses(&self) -> Result<Vec<Address>> {
        self.kind
            .address_fields()
            .iter()
            .map(|&position| self.address_at(position))
            .collect()
    }
}

/// Decode every log in `logs` against `schema`.
///
/// # Errors
///
/// Fails on the first log that does not decode.
pub fn decode_all(schema: &EventSchema, logs: &[Log]) -> Result<Vec<EventRecord>> {
    logs.iter().map(|log| EventRecord::decode(schema, log)).collect()
}

/// Extract the designated addresses of every record and deduplicate them.
///
/// Addresses compare by value, so spellings that differ only in letter case
/// collapse into one entry. The result keeps first-seen order.
///
/// # Errors
///
/// Returns [`Error::MalformedEvent`] if a record lacks a designated address.
pub fn unique_addresses(records: &[EventRecord]) -> Result<Vec<Address>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in records {
        for address in record.addresses()? {
            if seen.insert(address) {
                out.push(address);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{U256, address};

    use super::*;
    use crate::abi::{Schemas, parse_artifact};
    use crate::testing::{LogBuilder, fixture_abi};

    fn schema(kind: EventKind) -> EventSchema {
        Schemas::resolve(&fixture_abi()).unwrap().get(kind).clone()
    }

    const TRADER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const TOKEN_A: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    const TOKEN_B: Address = address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");

    #[test]
    fn decodes_swap_in_declaration_order() {
        let schema = schema(EventKind::Swapped);
        let log = LogBuilder::new(&schema)
            .topic(TRADER)
            .topic(TOKEN_A)
            .topic(TOKEN_B)
            .word(U256::from(100))
            .word(U256::from(95))
            .block(7)
            .build();

        let record = EventRecord::decode(&schema, &log).unwrap();
        assert_eq!(record.kind(), EventKind::Swapped);
        assert_eq!(record.args().len(), 5);
        assert_eq!(record.address_at(0).unwrap(), TRADER);
        assert_eq!(record.args()[3], DynSolValue::Uint(U256::from(100), 256));
        assert_eq!(record.block_number(), Some(7));
        assert_eq!(record.addresses().unwrap(), vec![TRADER]);
    }

    #[test]
    fn interleaves_indexed_and_data_inputs() {
        let abi = parse_artifact(
            r#"[{"type":"event","name":"Deposited","anonymous":false,"inputs":[
                {"name":"depositor","type":"address","indexed":false},
                {"name":"poolId","type":"uint256","indexed":true},
                {"name":"token","type":"address","indexed":false}]}]"#,
        )
        .unwrap();
        let schema = EventSchema::resolve(&abi, EventKind::Deposited).unwrap();
        let log = LogBuilder::new(&schema)
            .topic_word(U256::from(3))
            .address_word(TRADER)
            .address_word(TOKEN_A)
            .build();

        let record = EventRecord::decode(&schema, &log).unwrap();
        assert_eq!(record.address_at(0).unwrap(), TRADER);
        assert_eq!(record.args()[1], DynSolValue::Uint(U256::from(3), 256));
        assert_eq!(record.address_at(2).unwrap(), TOKEN_A);
    }

    #[test]
    fn wrong_topic_count_is_malformed() {
        let schema = schema(EventKind::PoolCreated);
        // token1 topic missing
        let log = LogBuilder::new(&schema)
            .topic(TOKEN_A)
            .word(U256::from(1))
            .build();
        let err = EventRecord::decode(&schema, &log).unwrap_err();
        assert!(matches!(err, Error::MalformedEvent { event: "PoolCreated", .. }));
    }

    #[test]
    fn foreign_selector_is_malformed() {
        let swapped = schema(EventKind::Swapped);
        let deposited = schema(EventKind::Deposited);
        let log = LogBuilder::new(&deposited)
            .topic(TRADER)
            .word(U256::from(1))
            .word(U256::from(2))
            .word(U256::from(3))
            .build();
        assert!(matches!(
            EventRecord::decode(&swapped, &log),
            Err(Error::MalformedEvent { .. })
        ));
    }

    #[test]
    fn address_at_rejects_non_address() {
        let schema = schema(EventKind::PoolCreated);
        let log = LogBuilder::pool_created(&schema, TOKEN_A, TOKEN_B, 1).build();
        let record = EventRecord::decode(&schema, &log).unwrap();
        assert!(matches!(
            record.address_at(2),
            Err(Error::MalformedEvent { .. })
        ));
        assert!(matches!(
            record.address_at(9),
            Err(Error::MalformedEvent { .. })
        ));
    }

    #[test]
    fn unique_addresses_collapses_case_variants() {
        let schema = schema(EventKind::PoolCreated);
        let lower: Address = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512".parse().unwrap();
        let upper: Address = "0xE7F1725E7734CE288F8367E1BB143E90BB3F0512".parse().unwrap();
        let logs = vec![
            LogBuilder::pool_created(&schema, lower, TOKEN_B, 1).build(),
            LogBuilder::pool_created(&schema, TOKEN_B, upper, 2).build(),
            LogBuilder::pool_created(&schema, TOKEN_A, TRADER, 3).build(),
        ];
        let records = decode_all(&schema, &logs).unwrap();
        let unique = unique_addresses(&records).unwrap();

        assert_eq!(unique, vec![TOKEN_A, TOKEN_B, TRADER]);
        let rendered: HashSet<String> = unique.iter().map(|a| format!("{a:#x}")).collect();
        assert_eq!(rendered.len(), unique.len());
        assert!(rendered.iter().all(|a| a == &a.to_lowercase()));
    }

    #[test]
    fn unique_addresses_of_nothing_is_empty() {
        assert!(unique_addresses(&[]).unwrap().is_empty());
    }

    #[test]
    fn filter_targets_contract_and_selector() {
        let schema = schema(EventKind::Swapped);
        let contract = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let filter = EventQuery::new(EventKind::Swapped)
            .to_filter(&schema, contract)
            .unwrap();

        assert!(filter.address.matches(&contract));
        assert!(!filter.address.matches(&TRADER));
        assert!(filter.topics[0].matches(&schema.selector()));
        assert!(!filter.topics[0].matches(&B256::ZERO));
        assert!(filter.topics[1].is_empty());
        assert_eq!(
            filter.block_option.get_from_block(),
            Some(&BlockNumberOrTag::Earliest)
        );
    }

    #[test]
    fn filter_maps_args_to_topic_slots() {
        let schema = schema(EventKind::Swapped);
        let filter = EventQuery::new(EventKind::Swapped)
            .arg(0, TRADER)
            .arg(2, TOKEN_B)
            .to_filter(&schema, Address::ZERO)
            .unwrap();

        assert!(filter.topics[1].matches(&TRADER.into_word()));
        assert!(!filter.topics[1].matches(&TOKEN_A.into_word()));
        assert!(filter.topics[2].is_empty());
        assert!(filter.topics[3].matches(&TOKEN_B.into_word()));
    }

    #[test]
    fn filter_on_data_input_is_rejected() {
        let schema = schema(EventKind::Swapped);
        let err = EventQuery::new(EventKind::Swapped)
            .arg(3, TRADER)
            .to_filter(&schema, Address::ZERO)
            .unwrap_err();
        assert!(matches!(err, Error::NotIndexed { position: 3, .. }));
    }
}
