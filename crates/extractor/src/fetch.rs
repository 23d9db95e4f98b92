use alloy::{
    primitives::Address,
    rpc::types::{Filter, Log},
    transports::TransportError,
};
use chainio::schema::EventRegistry;
use primitives::scan::BlockRange;
use tracing::debug;

use crate::ChainClient;

/// A `eth_getLogs` query for one chunk failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to fetch logs for blocks {range}: {source}")]
pub struct FetchError {
    /// The chunk that could not be fetched
    pub range: BlockRange,
    /// Provider error
    pub source: TransportError,
}

/// Builds the log filter for one chunk: logs emitted by `address` in `range` (inclusive on
/// both ends) whose `topic0` is any registered batch event. Topics `1..` are unfiltered.
pub fn batch_events_filter(
    registry: &EventRegistry,
    address: Address,
    range: BlockRange,
) -> Filter {
    Filter::new()
        .address(address)
        .event_signature(registry.topic_hashes())
        .from_block(range.from)
        .to_block(range.to)
}

/// Fetch the batch event logs of one chunk with a single provider query.
///
/// Logs are returned in the provider's order (ascending block number, then log index).
pub async fn fetch_batch_logs<C: ChainClient + ?Sized>(
    client: &C,
    registry: &EventRegistry,
    address: Address,
    range: BlockRange,
) -> Result<Vec<Log>, FetchError> {
    let filter = batch_events_filter(registry, address, range);
    let logs =
        client.filter_logs(&filter).await.map_err(|source| FetchError { range, source })?;
    debug!(%range, count = logs.len(), "Fetched batch event logs");
    Ok(logs)
}
