//! Static schemas of the rollup batch events.
//!
//! The registry is built once at startup and handed by reference to the log fetcher
//! (to build the topic filter) and to the decoder (to match `topic0` to a schema).
use alloy::primitives::B256;
use alloy_sol_types::SolEvent;
use derive_more::Display;

use crate::IScrollChain::{CommitBatch, FinalizeBatch};

/// The batch events the scanner understands.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchEventKind {
    /// `CommitBatch(uint256 indexed batchIndex, bytes32 indexed batchHash)`
    #[display("CommitBatch")]
    Commit,
    /// `FinalizeBatch(uint256 indexed batchIndex, bytes32 indexed batchHash, bytes32 stateRoot,
    /// bytes32 withdrawRoot)`
    #[display("FinalizeBatch")]
    Finalize,
}

impl BatchEventKind {
    /// Returns the Solidity name of the event.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Commit => "CommitBatch",
            Self::Finalize => "FinalizeBatch",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Commit => 0,
            Self::Finalize => 1,
        }
    }
}

/// A single event argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventParam {
    /// Argument name as declared in the contract
    pub name: &'static str,
    /// Canonical Solidity type
    pub ty: &'static str,
    /// Whether the argument is stored in a topic slot
    pub indexed: bool,
}

impl EventParam {
    const fn indexed(name: &'static str, ty: &'static str) -> Self {
        Self { name, ty, indexed: true }
    }

    const fn data(name: &'static str, ty: &'static str) -> Self {
        Self { name, ty, indexed: false }
    }
}

const COMMIT_BATCH_PARAMS: &[EventParam] =
    &[EventParam::indexed("batchIndex", "uint256"), EventParam::indexed("batchHash", "bytes32")];

const FINALIZE_BATCH_PARAMS: &[EventParam] = &[
    EventParam::indexed("batchIndex", "uint256"),
    EventParam::indexed("batchHash", "bytes32"),
    EventParam::data("stateRoot", "bytes32"),
    EventParam::data("withdrawRoot", "bytes32"),
];

/// Name, argument layout and topic hash of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSignature {
    /// Which batch event this is
    pub kind: BatchEventKind,
    /// Ordered argument list
    pub params: &'static [EventParam],
    /// `keccak256` of the canonical signature, i.e. `topic0` of a matching log
    pub topic_hash: B256,
}

impl EventSignature {
    fn of<E: SolEvent>(kind: BatchEventKind, params: &'static [EventParam]) -> Self {
        Self { kind, params, topic_hash: E::SIGNATURE_HASH }
    }

    /// Returns the event name.
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Number of arguments stored in topics `1..`.
    pub fn indexed_count(&self) -> usize {
        self.params.iter().filter(|p| p.indexed).count()
    }

    /// Returns the canonical signature, e.g. `CommitBatch(uint256,bytes32)`.
    pub fn canonical(&self) -> String {
        let types: Vec<_> = self.params.iter().map(|p| p.ty).collect();
        format!("{}({})", self.name(), types.join(","))
    }
}

/// Immutable set of the event signatures the scanner matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRegistry {
    signatures: [EventSignature; 2],
}

impl EventRegistry {
    /// Registry of the rollup chain contract's `CommitBatch` and `FinalizeBatch` events.
    pub fn scroll_chain() -> Self {
        Self {
            signatures: [
                EventSignature::of::<CommitBatch>(BatchEventKind::Commit, COMMIT_BATCH_PARAMS),
                EventSignature::of::<FinalizeBatch>(
                    BatchEventKind::Finalize,
                    FINALIZE_BATCH_PARAMS,
                ),
            ],
        }
    }

    /// Returns the signature of the given event kind.
    pub const fn get(&self, kind: BatchEventKind) -> &EventSignature {
        &self.signatures[kind.index()]
    }

    /// Returns the signature whose topic hash is `topic0`, if any.
    pub fn lookup(&self, topic0: &B256) -> Option<&EventSignature> {
        self.signatures.iter().find(|sig| &sig.topic_hash == topic0)
    }

    /// Topic hashes to match at position 0 of a log filter.
    pub fn topic_hashes(&self) -> Vec<B256> {
        self.signatures.iter().map(|sig| sig.topic_hash).collect()
    }

    /// Iterate over all registered signatures.
    pub fn iter(&self) -> impl Iterator<Item = &EventSignature> {
        self.signatures.iter()
    }
}
