use alloy::{
    primitives::{TxHash, U256},
    transports::TransportError,
};
use primitives::blob_fee::BlobFeeSchedule;
use tracing::debug;

use crate::ChainClient;

/// On-chain context of the transaction that emitted a batch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrichment {
    /// Block the transaction was mined in, taken from the receipt
    pub block_number: u64,
    /// Maximum cost of the transaction, in wei
    pub tx_cost: U256,
    /// Fee actually paid, in wei
    pub fee_paid: u128,
    /// Base fee of the containing block
    pub base_fee: Option<u64>,
    /// Blob base fee of the containing block, `None` before Cancun
    pub blob_base_fee: Option<u128>,
}

/// Errors raised while enriching a transaction.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Transaction lookup failed.
    #[error("failed to fetch transaction {hash}: {source}")]
    Transaction {
        /// Transaction hash
        hash: TxHash,
        /// Provider error
        source: TransportError,
    },
    /// The node does not know the transaction.
    #[error("transaction {0} not found")]
    TransactionNotFound(TxHash),
    /// The transaction has not been mined yet.
    #[error("transaction {0} is pending")]
    PendingTransaction(TxHash),
    /// Receipt lookup failed, or the receipt has no block number.
    #[error("receipt of transaction {hash} unavailable")]
    ReceiptUnavailable {
        /// Transaction hash
        hash: TxHash,
        /// Provider error, if the lookup itself failed
        #[source]
        source: Option<TransportError>,
    },
    /// Header lookup of the containing block failed.
    #[error("header of block {block_number} unavailable")]
    HeaderUnavailable {
        /// Block the receipt points at
        block_number: u64,
        /// Provider error, if the lookup itself failed
        #[source]
        source: Option<TransportError>,
    },
}

impl EnrichError {
    /// Whether the error only affects the current event. All other errors abort the chunk.
    pub const fn is_event_scoped(&self) -> bool {
        matches!(self, Self::HeaderUnavailable { .. })
    }
}

/// Looks up transaction, receipt and header for batch events, one call at a time.
#[derive(Debug)]
pub struct Enricher<'a, C: ?Sized> {
    client: &'a C,
    blob_fee_schedule: BlobFeeSchedule,
}

impl<'a, C: ChainClient + ?Sized> Enricher<'a, C> {
    /// Create an enricher over `client`.
    pub const fn new(client: &'a C, blob_fee_schedule: BlobFeeSchedule) -> Self {
        Self { client, blob_fee_schedule }
    }

    /// Fetch the transaction `tx_hash`, its receipt and the header of the block it was mined
    /// in, and compute the fees of that block.
    pub async fn enrich(&self, tx_hash: TxHash) -> Result<Enrichment, EnrichError> {
        let tx = self
            .client
            .transaction_by_hash(tx_hash)
            .await
            .map_err(|source| EnrichError::Transaction { hash: tx_hash, source })?
            .ok_or(EnrichError::TransactionNotFound(tx_hash))?;
        if tx.pending {
            return Err(EnrichError::PendingTransaction(tx_hash));
        }

        let receipt = match self.client.transaction_receipt(tx_hash).await {
            Ok(Some(receipt)) => receipt,
            Ok(None) => return Err(EnrichError::ReceiptUnavailable { hash: tx_hash, source: None }),
            Err(e) => {
                return Err(EnrichError::ReceiptUnavailable { hash: tx_hash, source: Some(e) });
            }
        };
        let block_number = receipt
            .block_number
            .ok_or(EnrichError::ReceiptUnavailable { hash: tx_hash, source: None })?;

        let header = match self.client.header_by_number(block_number).await {
            Ok(Some(header)) => header,
            Ok(None) => return Err(EnrichError::HeaderUnavailable { block_number, source: None }),
            Err(e) => return Err(EnrichError::HeaderUnavailable { block_number, source: Some(e) }),
        };

        let blob_base_fee =
            header.excess_blob_gas.map(|excess| self.blob_fee_schedule.blob_base_fee(excess));
        debug!(%tx_hash, block_number, ?blob_base_fee, "Enriched transaction");

        Ok(Enrichment {
            block_number,
            tx_cost: tx.cost,
            fee_paid: receipt.fee_paid,
            base_fee: header.base_fee_per_gas,
            blob_base_fee,
        })
    }
}
