//! Batchscope Driver - scans the recent block window for batch events

use std::time::{Duration, Instant};

use alloy::primitives::{Address, TxHash, U256};
use chainio::{
    ScrollChain,
    decode::{DecodeError, decode_batch_event},
    schema::{BatchEventKind, EventRegistry},
};
use config::Opts;
use extractor::{ChainClient, EnrichError, Enricher, FetchError, RpcClient, fetch_batch_logs};
use eyre::{Context, Result};
use primitives::{
    blob_fee::BlobFeeSchedule,
    scan::{BlockRange, ScanWindow},
};
use tracing::{error, info, warn};

use crate::report::{EnrichedRecord, report};

/// Parameters of a scan, resolved from the CLI options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Contract emitting the batch events
    pub rollup_address: Address,
    /// Number of blocks to scan, ending at the head
    pub window: u64,
    /// Number of blocks per `eth_getLogs` query
    pub chunk_size: u64,
    /// Parameters used for the blob base fee
    pub blob_fee_schedule: BlobFeeSchedule,
}

impl From<&Opts> for ScanConfig {
    fn from(opts: &Opts) -> Self {
        Self {
            rollup_address: opts.rollup_address,
            window: opts.scan.window,
            chunk_size: opts.scan.chunk_size,
            blob_fee_schedule: opts.scan.blob_fee_schedule,
        }
    }
}

/// Counters of a finished scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// Chunks attempted, including failed ones
    pub chunks_scanned: u64,
    /// Chunks aborted by a fetch, decode or enrich error
    pub chunks_failed: u64,
    /// Events logged with their enrichment
    pub events_reported: u64,
    /// Events skipped because the block header was unavailable
    pub events_skipped: u64,
    /// Logs whose `topic0` is not a batch event
    pub logs_ignored: u64,
    /// Wall-clock duration of the scan
    pub elapsed: Duration,
}

/// Errors that abort the remainder of a chunk.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// `eth_getLogs` failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A log matched a batch event but could not be decoded.
    #[error("failed to decode log of transaction {tx_hash:?}: {source}")]
    Decode {
        /// Transaction that emitted the log
        tx_hash: Option<TxHash>,
        /// Decoder error
        source: DecodeError,
    },
    /// The provider returned a log without its transaction hash.
    #[error("{event} log at block {block_number:?} has no transaction hash")]
    MissingTransactionHash {
        /// Decoded event kind
        event: BatchEventKind,
        /// Block number carried by the log
        block_number: Option<u64>,
    },
    /// The emitting transaction could not be enriched.
    #[error("failed to enrich {event} of batch {batch_index}: {source}")]
    Enrich {
        /// Decoded event kind
        event: BatchEventKind,
        /// Batch the event refers to
        batch_index: U256,
        /// Enricher error
        source: EnrichError,
    },
}

/// Scans the configured block window once, reporting every batch event found.
#[derive(Debug)]
pub struct Driver<C = RpcClient> {
    client: C,
    registry: EventRegistry,
    config: ScanConfig,
}

impl Driver<RpcClient> {
    /// Connect to the configured RPC endpoint.
    pub async fn new(opts: Opts) -> Result<Self> {
        info!("Initializing driver");

        let client = RpcClient::connect(&opts.rpc.url)
            .await
            .wrap_err_with(|| format!("Failed to connect to RPC endpoint {}", opts.rpc.url))?;
        let config = ScanConfig::from(&opts);

        let rollup = ScrollChain::new_readonly(config.rollup_address, client.provider().clone());
        match rollup.last_finalized_batch_index().await {
            Ok(index) => info!(
                rollup = %config.rollup_address,
                last_finalized_batch_index = %index,
                "Connected to rollup contract"
            ),
            Err(e) => warn!(
                rollup = %config.rollup_address,
                err = %e,
                "Failed to read last finalized batch index"
            ),
        }

        Ok(Self::with_client(client, config))
    }
}

impl<C: ChainClient> Driver<C> {
    /// Create a driver over an existing client.
    pub fn with_client(client: C, config: ScanConfig) -> Self {
        Self { client, registry: EventRegistry::scroll_chain(), config }
    }

    /// Run the scan to completion.
    pub async fn start(self) -> Result<()> {
        self.scan().await.map(|_| ())
    }

    /// Scan the window ending at the current head, newest chunk first.
    ///
    /// Only a failure to read the head is returned as an error. Chunk failures are logged
    /// and counted, and the scan moves on to the next chunk.
    pub async fn scan(&self) -> Result<ScanSummary> {
        let started = Instant::now();
        let head = self.client.head_block_number().await.wrap_err("Failed to fetch chain head")?;
        let window = ScanWindow::new(head, self.config.window, self.config.chunk_size);
        info!(
            head,
            lowest = ?window.lowest_block(),
            blocks = window.covered_blocks(),
            window = self.config.window,
            chunk_size = self.config.chunk_size,
            rollup = %self.config.rollup_address,
            "Starting scan"
        );

        let mut summary = ScanSummary::default();
        for range in window.chunks() {
            summary.chunks_scanned += 1;
            let before = summary;
            match self.scan_chunk(range, &mut summary).await {
                Ok(()) => info!(
                    from = range.from,
                    to = range.to,
                    blocks = range.block_count(),
                    reported = summary.events_reported - before.events_reported,
                    skipped = summary.events_skipped - before.events_skipped,
                    "Scanned chunk"
                ),
                Err(e) => {
                    summary.chunks_failed += 1;
                    error!(from = range.from, to = range.to, err = %e, "Failed to scan chunk");
                }
            }
        }

        summary.elapsed = started.elapsed();
        info!(
            chunks_scanned = summary.chunks_scanned,
            chunks_failed = summary.chunks_failed,
            events_reported = summary.events_reported,
            events_skipped = summary.events_skipped,
            logs_ignored = summary.logs_ignored,
            elapsed = ?summary.elapsed,
            "Scan complete"
        );
        Ok(summary)
    }

    async fn scan_chunk(
        &self,
        range: BlockRange,
        summary: &mut ScanSummary,
    ) -> Result<(), ChunkError> {
        let logs =
            fetch_batch_logs(&self.client, &self.registry, self.config.rollup_address, range)
                .await?;
        let enricher = Enricher::new(&self.client, self.config.blob_fee_schedule);

        for log in &logs {
            let decoded = decode_batch_event(&self.registry, log)
                .map_err(|source| ChunkError::Decode { tx_hash: log.transaction_hash, source })?;
            let Some(event) = decoded else {
                summary.logs_ignored += 1;
                continue;
            };
            let tx_hash = log.transaction_hash.ok_or(ChunkError::MissingTransactionHash {
                event: event.kind(),
                block_number: log.block_number,
            })?;

            match enricher.enrich(tx_hash).await {
                Ok(enrichment) => {
                    report(&EnrichedRecord {
                        event: &event,
                        tx_hash,
                        log_block_number: log.block_number,
                        enrichment,
                    });
                    summary.events_reported += 1;
                }
                Err(e) if e.is_event_scoped() => {
                    warn!(
                        event = %event.kind(),
                        batch_index = %event.batch_index(),
                        batch_hash = %event.batch_hash(),
                        %tx_hash,
                        err = %e,
                        "Skipping event"
                    );
                    summary.events_skipped += 1;
                }
                Err(source) => {
                    return Err(ChunkError::Enrich {
                        event: event.kind(),
                        batch_index: event.batch_index(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::{B256, address},
        sol_types::SolEvent,
    };
    use chainio::IScrollChain::CommitBatch;
    use extractor::{
        HeaderInfo,
        mock::{Call, MockClient},
    };

    const ROLLUP: Address = address!("0xa13BAF47339d63B743e7Da8741db5456DAc1E556");

    fn config(window: u64, chunk_size: u64) -> ScanConfig {
        ScanConfig {
            rollup_address: ROLLUP,
            window,
            chunk_size,
            blob_fee_schedule: BlobFeeSchedule::Cancun,
        }
    }

    fn header(number: u64) -> HeaderInfo {
        HeaderInfo { number, base_fee_per_gas: Some(1), excess_blob_gas: Some(0) }
    }

    fn tx(byte: u8) -> TxHash {
        B256::repeat_byte(byte)
    }

    fn log_ranges(client: &MockClient) -> Vec<BlockRange> {
        client
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::FilterLogs(range) => Some(range),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn failing_chunk_does_not_halt_scan() {
        let client = MockClient::default()
            .with_head(1_000_000)
            .with_failing_chunk(999_981)
            .with_log(MockClient::commit_log(999_995, 1, tx(1)))
            .with_mined_tx(tx(1), 999_995, 10, 5)
            .with_header(header(999_995))
            .with_log(MockClient::commit_log(999_985, 2, tx(2)));

        let driver = Driver::with_client(client, config(1000, 10));
        let summary = driver.scan().await.unwrap();

        assert_eq!(summary.chunks_scanned, 100);
        assert_eq!(summary.chunks_failed, 1);
        assert_eq!(summary.events_reported, 1);

        let ranges = log_ranges(&driver.client);
        assert_eq!(ranges.len(), 100);
        assert_eq!(ranges[0], BlockRange::new(999_991, 1_000_000));
        assert_eq!(ranges[1], BlockRange::new(999_981, 999_990));
        assert_eq!(ranges[99], BlockRange::new(999_001, 999_010));
        // the log in the failed chunk is never enriched
        assert!(!driver.client.calls().contains(&Call::Transaction(tx(2))));
    }

    #[tokio::test]
    async fn missing_header_skips_only_the_event() {
        let client = MockClient::default()
            .with_head(100)
            .with_log(MockClient::commit_log(98, 1, tx(1)))
            .with_mined_tx(tx(1), 98, 10, 5)
            .with_log(MockClient::finalize_log(97, 1, tx(2)))
            .with_mined_tx(tx(2), 97, 10, 5)
            .with_header(header(97));

        let driver = Driver::with_client(client, config(10, 10));
        let summary = driver.scan().await.unwrap();

        assert_eq!(summary.chunks_failed, 0);
        assert_eq!(summary.events_skipped, 1);
        assert_eq!(summary.events_reported, 1);
    }

    #[tokio::test]
    async fn pending_transaction_aborts_chunk() {
        let client = MockClient::default()
            .with_head(100)
            .with_log(MockClient::commit_log(95, 1, tx(1)))
            .with_pending_tx(tx(1), 10)
            .with_log(MockClient::commit_log(94, 2, tx(2)))
            .with_mined_tx(tx(2), 94, 10, 5)
            .with_header(header(94));

        let driver = Driver::with_client(client, config(20, 10));
        let summary = driver.scan().await.unwrap();

        assert_eq!(summary.chunks_scanned, 2);
        assert_eq!(summary.chunks_failed, 1);
        assert_eq!(summary.events_reported, 0);
        let calls = driver.client.calls();
        assert!(!calls.iter().any(|call| matches!(call, Call::Receipt(_))));
        assert!(!calls.contains(&Call::Transaction(tx(2))));
    }

    #[tokio::test]
    async fn unknown_logs_are_ignored() {
        let unknown = vec![B256::repeat_byte(0xee), B256::ZERO];
        let client = MockClient::default()
            .with_head(100)
            .with_log(MockClient::raw_log(99, tx(9), unknown, Vec::new()))
            .with_log(MockClient::raw_log(99, tx(8), Vec::new(), Vec::new()));

        let driver = Driver::with_client(client, config(10, 10));
        let summary = driver.scan().await.unwrap();

        assert_eq!(summary.logs_ignored, 2);
        assert_eq!(summary.events_reported, 0);
        assert_eq!(summary.chunks_failed, 0);
        assert!(!driver.client.calls().iter().any(|call| matches!(call, Call::Transaction(_))));
    }

    #[tokio::test]
    async fn malformed_log_aborts_chunk() {
        let short = vec![CommitBatch::SIGNATURE_HASH, B256::ZERO];
        let client = MockClient::default()
            .with_head(100)
            .with_log(MockClient::raw_log(99, tx(1), short, Vec::new()))
            .with_log(MockClient::commit_log(98, 2, tx(2)))
            .with_mined_tx(tx(2), 98, 10, 5)
            .with_header(header(98));

        let driver = Driver::with_client(client, config(10, 10));
        let summary = driver.scan().await.unwrap();

        assert_eq!(summary.chunks_failed, 1);
        assert_eq!(summary.events_reported, 0);
        assert!(!driver.client.calls().contains(&Call::Transaction(tx(2))));
    }

    #[tokio::test]
    async fn head_failure_is_fatal() {
        let driver = Driver::with_client(MockClient::default(), config(1000, 10));
        assert!(driver.scan().await.is_err());
        assert_eq!(driver.client.calls(), vec![Call::HeadBlockNumber]);
    }

    #[tokio::test]
    async fn window_is_clamped_at_genesis() {
        let client = MockClient::default().with_head(25);

        let driver = Driver::with_client(client, config(1000, 10));
        let summary = driver.scan().await.unwrap();

        assert_eq!(summary.chunks_scanned, 3);
        assert_eq!(
            log_ranges(&driver.client),
            vec![BlockRange::new(16, 25), BlockRange::new(6, 15), BlockRange::new(0, 5)]
        );
    }

    #[test]
    fn config_from_opts() {
        use clap::Parser;
        let opts = Opts::try_parse_from([
            "batchscope",
            "--rpc-url",
            "http://localhost:8545",
            "--window",
            "50",
            "--blob-fee-schedule",
            "prague",
        ])
        .unwrap();

        let config = ScanConfig::from(&opts);
        assert_eq!(config.window, 50);
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.blob_fee_schedule, BlobFeeSchedule::Prague);
        assert_eq!(config.rollup_address, ROLLUP);
    }
}
