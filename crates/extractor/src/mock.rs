//! In-memory [`ChainClient`] for tests.
#![allow(missing_docs)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use alloy::{
    primitives::{Address, B256, Bytes, Log as PrimitiveLog, LogData, TxHash, U256},
    rpc::types::{Filter, Log},
    sol_types::SolEvent,
    transports::{TransportErrorKind, TransportResult},
};
use async_trait::async_trait;
use chainio::IScrollChain::{CommitBatch, FinalizeBatch};
use primitives::scan::BlockRange;

use crate::{ChainClient, HeaderInfo, ReceiptInfo, TransactionInfo};

/// A request issued against the [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    HeadBlockNumber,
    FilterLogs(BlockRange),
    Transaction(TxHash),
    Receipt(TxHash),
    Header(u64),
}

/// Chain state served by the mock. Unknown lookups return `None`.
#[derive(Debug, Default)]
pub struct MockClient {
    head: Option<u64>,
    logs: Vec<Log>,
    failing_chunks: HashSet<u64>,
    failing_receipts: HashSet<TxHash>,
    transactions: HashMap<TxHash, TransactionInfo>,
    receipts: HashMap<TxHash, ReceiptInfo>,
    headers: HashMap<u64, HeaderInfo>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn with_head(mut self, head: u64) -> Self {
        self.head = Some(head);
        self
    }

    pub fn with_log(mut self, log: Log) -> Self {
        self.logs.push(log);
        self
    }

    /// Make `eth_getLogs` fail for the chunk starting at `from`.
    pub fn with_failing_chunk(mut self, from: u64) -> Self {
        self.failing_chunks.insert(from);
        self
    }

    /// Make the receipt lookup of `hash` fail with a transport error.
    pub fn with_failing_receipt(mut self, hash: TxHash) -> Self {
        self.failing_receipts.insert(hash);
        self
    }

    pub fn with_pending_tx(mut self, hash: TxHash, cost: u64) -> Self {
        self.transactions
            .insert(hash, TransactionInfo { hash, cost: U256::from(cost), pending: true });
        self
    }

    /// Register a transaction mined in `block`, with its receipt.
    pub fn with_mined_tx(mut self, hash: TxHash, block: u64, cost: u64, fee_paid: u128) -> Self {
        self.transactions
            .insert(hash, TransactionInfo { hash, cost: U256::from(cost), pending: false });
        self.receipts.insert(hash, ReceiptInfo { block_number: Some(block), fee_paid });
        self
    }

    pub fn with_receipt(mut self, hash: TxHash, receipt: ReceiptInfo) -> Self {
        self.receipts.insert(hash, receipt);
        self
    }

    pub fn with_header(mut self, header: HeaderInfo) -> Self {
        self.headers.insert(header.number, header);
        self
    }

    /// All requests issued so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// A `CommitBatch` log emitted in `block` by transaction `tx_hash`.
    pub fn commit_log(block: u64, batch_index: u64, tx_hash: TxHash) -> Log {
        let topics =
            vec![CommitBatch::SIGNATURE_HASH, index_topic(batch_index), batch_hash(batch_index)];
        Self::raw_log(block, tx_hash, topics, Vec::new())
    }

    /// A `FinalizeBatch` log emitted in `block` by transaction `tx_hash`.
    pub fn finalize_log(block: u64, batch_index: u64, tx_hash: TxHash) -> Log {
        let topics =
            vec![FinalizeBatch::SIGNATURE_HASH, index_topic(batch_index), batch_hash(batch_index)];
        let data =
            [B256::repeat_byte(0xaa).as_slice(), B256::repeat_byte(0xbb).as_slice()].concat();
        Self::raw_log(block, tx_hash, topics, data)
    }

    pub fn raw_log(block: u64, tx_hash: TxHash, topics: Vec<B256>, data: Vec<u8>) -> Log {
        let inner = PrimitiveLog {
            address: Address::ZERO,
            data: LogData::new_unchecked(topics, Bytes::from(data)),
        };
        Log {
            inner,
            block_number: Some(block),
            transaction_hash: Some(tx_hash),
            ..Default::default()
        }
    }
}

/// Topic encoding of a `uint256 indexed batchIndex`.
pub fn index_topic(batch_index: u64) -> B256 {
    B256::from(U256::from(batch_index).to_be_bytes::<32>())
}

/// Deterministic batch hash used by the mock logs.
pub fn batch_hash(batch_index: u64) -> B256 {
    B256::left_padding_from(&batch_index.to_be_bytes())
}

fn mock_error(msg: &str) -> alloy::transports::TransportError {
    TransportErrorKind::custom_str(msg)
}

#[async_trait]
impl ChainClient for MockClient {
    async fn head_block_number(&self) -> TransportResult<u64> {
        self.record(Call::HeadBlockNumber);
        self.head.ok_or_else(|| mock_error("head unavailable"))
    }

    async fn filter_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
        let from = filter.get_from_block().unwrap_or_default();
        let to = filter.get_to_block().unwrap_or(u64::MAX);
        self.record(Call::FilterLogs(BlockRange::new(from, to)));

        if self.failing_chunks.contains(&from) {
            return Err(mock_error("eth_getLogs failed"));
        }
        Ok(self
            .logs
            .iter()
            .filter(|log| log.block_number.is_some_and(|n| (from..=to).contains(&n)))
            .cloned()
            .collect())
    }

    async fn transaction_by_hash(&self, hash: TxHash) -> TransportResult<Option<TransactionInfo>> {
        self.record(Call::Transaction(hash));
        Ok(self.transactions.get(&hash).copied())
    }

    async fn transaction_receipt(&self, hash: TxHash) -> TransportResult<Option<ReceiptInfo>> {
        self.record(Call::Receipt(hash));
        if self.failing_receipts.contains(&hash) {
            return Err(mock_error("eth_getTransactionReceipt failed"));
        }
        Ok(self.receipts.get(&hash).copied())
    }

    async fn header_by_number(&self, number: u64) -> TransportResult<Option<HeaderInfo>> {
        self.record(Call::Header(number));
        Ok(self.headers.get(&number).copied())
    }
}
