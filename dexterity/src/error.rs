//! Error type for the Dexterity client.

use std::path::PathBuf;

/// Errors raised while binding to the contract or reading its events.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A manifest or artifact file could not be read.
    #[error("reading {}: {source}", path.display())]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A manifest or artifact file is not valid JSON of the expected shape.
    #[error("parsing {what}: {source}")]
    Json {
        /// Which document failed to parse.
        what: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The deployment manifest has no entry for the named contract.
    #[error("no deployment of `{0}` in manifest")]
    ContractNotFound(String),

    /// The ABI does not declare the named event.
    #[error("event `{0}` not found in ABI")]
    EventNotFound(&'static str),

    /// The ABI declares the event, but not with the expected shape.
    #[error("event `{event}` input {position}: {reason}")]
    InvalidEventSchema {
        /// Event name.
        event: &'static str,
        /// Declaration position of the offending input.
        position: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A filter was requested on an input that is not indexed.
    #[error("event `{event}` input {position} is not indexed")]
    NotIndexed {
        /// Event name.
        event: &'static str,
        /// Declaration position of the input.
        position: usize,
    },

    /// A log returned by the node does not decode against its event schema.
    #[error("malformed `{event}` log: {reason}")]
    MalformedEvent {
        /// Event name.
        event: &'static str,
        /// Decoding failure detail.
        reason: String,
    },

    /// The node query failed.
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl<E: std::fmt::Display> From<alloy::transports::RpcError<E>> for Error {
    fn from(value: alloy::transports::RpcError<E>) -> Self {
        Self::Rpc(value.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
