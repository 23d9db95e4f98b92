//! `ChainIO` is a library for interacting with the rollup chain contract on L1.
pub mod decode;
pub mod schema;

use IScrollChain::{CommitBatch, FinalizeBatch, IScrollChainInstance};

use alloy::{
    contract::Result as ContractResult,
    primitives::{Address, B256, U256},
    providers::{RootProvider, fillers::FillProvider, utils::JoinedRecommendedFillers},
    sol,
};
use derive_more::derive::Deref;

/// Alias to the default provider with all recommended fillers (read-only).
pub type DefaultProvider = FillProvider<JoinedRecommendedFillers, RootProvider>;

/// A wrapper over a `IScrollChain` contract that exposes various utility methods.
#[derive(Debug, Clone, Deref)]
pub struct ScrollChain(IScrollChainInstance<DefaultProvider>);

impl ScrollChain {
    /// Create a new `ScrollChain` instance at the given contract address.
    pub const fn new_readonly(address: Address, provider: DefaultProvider) -> Self {
        Self(IScrollChainInstance::new(address, provider))
    }

    /// Returns the index of the latest finalized batch.
    pub async fn last_finalized_batch_index(&self) -> ContractResult<U256> {
        self.0.lastFinalizedBatchIndex().call().await
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IScrollChain {
        /// @notice Emitted when a new batch is committed.
        event CommitBatch(uint256 indexed batchIndex, bytes32 indexed batchHash);

        /// @notice Emitted when a batch is finalized.
        event FinalizeBatch(
            uint256 indexed batchIndex,
            bytes32 indexed batchHash,
            bytes32 stateRoot,
            bytes32 withdrawRoot
        );

        /// @notice The latest finalized batch index.
        function lastFinalizedBatchIndex() external view returns (uint256);
    }
}

/// A decoded rollup batch event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// A batch was committed to L1.
    Commit(CommitBatch),
    /// A batch was finalized on L1.
    Finalize(FinalizeBatch),
}

impl BatchEvent {
    /// Returns the kind of this event.
    pub const fn kind(&self) -> schema::BatchEventKind {
        match self {
            Self::Commit(_) => schema::BatchEventKind::Commit,
            Self::Finalize(_) => schema::BatchEventKind::Finalize,
        }
    }

    /// Returns the index of the batch this event refers to.
    pub const fn batch_index(&self) -> U256 {
        match self {
            Self::Commit(event) => event.batchIndex,
            Self::Finalize(event) => event.batchIndex,
        }
    }

    /// Returns the hash of the batch this event refers to.
    pub const fn batch_hash(&self) -> B256 {
        match self {
            Self::Commit(event) => event.batchHash,
            Self::Finalize(event) => event.batchHash,
        }
    }
}

impl FinalizeBatch {
    /// Returns the L2 state root after the batch.
    pub const fn state_root(&self) -> B256 {
        self.stateRoot
    }

    /// Returns the L2 withdraw trie root after the batch.
    pub const fn withdraw_root(&self) -> B256 {
        self.withdrawRoot
    }
}
