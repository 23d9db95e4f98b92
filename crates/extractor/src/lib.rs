//! Batchscope Extractor
//!
//! Everything that talks to the L1 node: the [`ChainClient`] seam and its JSON-RPC
//! implementation, the per-chunk log fetcher and the transaction enricher.
mod client;
pub use client::{ChainClient, HeaderInfo, ReceiptInfo, RpcClient, TransactionInfo};

mod enrich;
pub use enrich::{EnrichError, Enricher, Enrichment};

mod fetch;
pub use fetch::{FetchError, batch_events_filter, fetch_batch_logs};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
