use alloy::{
    primitives::{TxHash, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::{BlockNumberOrTag, Filter, Log},
    transports::TransportResult,
};
use async_trait::async_trait;
use chainio::DefaultProvider;
use derive_more::Debug;
use primitives::fees::{fee_paid_from_receipt, transaction_cost};
use url::Url;

/// The parts of a transaction the scanner reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionInfo {
    /// Transaction hash
    pub hash: TxHash,
    /// Maximum cost of the transaction, in wei
    pub cost: U256,
    /// Whether the transaction is still in the mempool
    pub pending: bool,
}

/// The parts of a transaction receipt the scanner reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptInfo {
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// Fee actually paid, execution plus blobs, in wei
    pub fee_paid: u128,
}

/// The parts of a block header the scanner reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Block number
    pub number: u64,
    /// EIP-1559 base fee, absent before London
    pub base_fee_per_gas: Option<u64>,
    /// EIP-4844 excess blob gas, absent before Cancun
    pub excess_blob_gas: Option<u64>,
}

/// Read-only view of an L1 execution client.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the number of the latest block.
    async fn head_block_number(&self) -> TransportResult<u64>;

    /// Returns all logs matching `filter`, in the node's order.
    async fn filter_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>>;

    /// Looks up a transaction by hash.
    async fn transaction_by_hash(&self, hash: TxHash) -> TransportResult<Option<TransactionInfo>>;

    /// Looks up the receipt of a mined transaction.
    async fn transaction_receipt(&self, hash: TxHash) -> TransportResult<Option<ReceiptInfo>>;

    /// Looks up the header of the block at `number`.
    async fn header_by_number(&self, number: u64) -> TransportResult<Option<HeaderInfo>>;
}

/// [`ChainClient`] backed by a JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct RpcClient {
    #[debug(skip)]
    provider: DefaultProvider,
}

impl RpcClient {
    /// Connect to the node at `url`. Both HTTP and WebSocket endpoints are accepted.
    pub async fn connect(url: &Url) -> TransportResult<Self> {
        let provider = ProviderBuilder::new().connect(url.as_str()).await?;
        Ok(Self { provider })
    }

    /// Returns the underlying provider.
    pub const fn provider(&self) -> &DefaultProvider {
        &self.provider
    }
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn head_block_number(&self) -> TransportResult<u64> {
        self.provider.get_block_number().await
    }

    async fn filter_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
        self.provider.get_logs(filter).await
    }

    async fn transaction_by_hash(&self, hash: TxHash) -> TransportResult<Option<TransactionInfo>> {
        let tx = self.provider.get_transaction_by_hash(hash).await?;
        Ok(tx.map(|tx| TransactionInfo {
            hash,
            cost: transaction_cost(&tx),
            pending: tx.block_number.is_none(),
        }))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> TransportResult<Option<ReceiptInfo>> {
        let receipt = self.provider.get_transaction_receipt(hash).await?;
        Ok(receipt.map(|receipt| ReceiptInfo {
            block_number: receipt.block_number,
            fee_paid: fee_paid_from_receipt(&receipt),
        }))
    }

    async fn header_by_number(&self, number: u64) -> TransportResult<Option<HeaderInfo>> {
        let block = self.provider.get_block_by_number(BlockNumberOrTag::Number(number)).await?;
        Ok(block.map(|block| HeaderInfo {
            number: block.header.number,
            base_fee_per_gas: block.header.base_fee_per_gas,
            excess_blob_gas: block.header.excess_blob_gas,
        }))
    }
}
