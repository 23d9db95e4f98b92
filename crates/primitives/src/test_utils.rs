//! Receipt stub shared by the fee tests.
use alloy_network_primitives::ReceiptResponse;
use alloy_primitives::{Address, B256, BlockHash, TxHash};

/// A receipt carrying only gas and blob gas accounting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestReceipt {
    /// Gas used by the transaction
    pub gas: u64,
    /// Effective gas price
    pub price: u128,
    /// Blob gas used, for blob-carrying transactions
    pub blob_gas: Option<u64>,
    /// Blob gas price, for blob-carrying transactions
    pub blob_price: Option<u128>,
}

impl ReceiptResponse for TestReceipt {
    fn contract_address(&self) -> Option<Address> {
        None
    }
    fn status(&self) -> bool {
        true
    }
    fn block_hash(&self) -> Option<BlockHash> {
        None
    }
    fn block_number(&self) -> Option<u64> {
        None
    }
    fn transaction_hash(&self) -> TxHash {
        TxHash::ZERO
    }
    fn transaction_index(&self) -> Option<u64> {
        None
    }
    fn gas_used(&self) -> u64 {
        self.gas
    }
    fn effective_gas_price(&self) -> u128 {
        self.price
    }
    fn blob_gas_used(&self) -> Option<u64> {
        self.blob_gas
    }
    fn blob_gas_price(&self) -> Option<u128> {
        self.blob_price
    }
    fn from(&self) -> Address {
        Address::ZERO
    }
    fn to(&self) -> Option<Address> {
        None
    }
    fn cumulative_gas_used(&self) -> u64 {
        self.gas
    }
    fn state_root(&self) -> Option<B256> {
        None
    }
}
