//! Decoding of raw logs into typed batch events.
use alloy::{primitives::B256, rpc::types::Log};
use alloy_sol_types::{SolEvent, SolType};

use crate::{
    BatchEvent,
    schema::{BatchEventKind, EventRegistry, EventSignature},
};

/// Errors raised while decoding a log against an [`EventSignature`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// `topic0` is missing or does not match the expected event.
    #[error("event signature mismatch: expected {expected}, found {found:?}")]
    SignatureMismatch {
        /// Topic hash of the expected event
        expected: B256,
        /// `topic0` of the log, if any
        found: Option<B256>,
    },
    /// The log does not carry one topic per indexed argument.
    #[error("{event}: expected {expected} indexed topics, found {found}")]
    TopicCount {
        /// Event name
        event: &'static str,
        /// Declared indexed arguments
        expected: usize,
        /// Topics after `topic0`
        found: usize,
    },
    /// The data payload does not have the static size of the non-indexed arguments.
    #[error("{event}: expected {expected} data bytes, found {found}")]
    DataLength {
        /// Event name
        event: &'static str,
        /// ABI-encoded size of the non-indexed arguments
        expected: usize,
        /// Length of the log data
        found: usize,
    },
    /// The ABI codec rejected the topics or data.
    #[error("{event}: {source}")]
    Abi {
        /// Event name
        event: &'static str,
        /// Codec error
        source: alloy_sol_types::Error,
    },
}

/// Decode `log` as the event `E` described by `signature`.
///
/// Indexed arguments are read from `topics[1..]`, the remaining ones from the data
/// payload. Nothing is assumed about the log beyond what is checked here. A `signature`
/// that does not describe `E` never matches.
pub fn decode_log<E: SolEvent>(signature: &EventSignature, log: &Log) -> Result<E, DecodeError> {
    let event = signature.name();
    let topics = log.inner.data.topics();

    let found = topics.first().copied();
    if signature.topic_hash != E::SIGNATURE_HASH || found != Some(signature.topic_hash) {
        return Err(DecodeError::SignatureMismatch { expected: signature.topic_hash, found });
    }

    let expected = signature.indexed_count();
    if topics.len() - 1 != expected {
        return Err(DecodeError::TopicCount { event, expected, found: topics.len() - 1 });
    }

    let data = &log.inner.data.data;
    if let Some(expected) = <E::DataTuple<'static> as SolType>::ENCODED_SIZE {
        if data.len() != expected {
            return Err(DecodeError::DataLength { event, expected, found: data.len() });
        }
    }

    log.log_decode::<E>()
        .map(|decoded| decoded.inner.data)
        .map_err(|source| DecodeError::Abi { event, source })
}

/// Match `log` against the registry and decode it.
///
/// Returns `Ok(None)` for logs whose `topic0` is not a registered batch event; those
/// are ignored by the scanner.
pub fn decode_batch_event(
    registry: &EventRegistry,
    log: &Log,
) -> Result<Option<BatchEvent>, DecodeError> {
    let Some(signature) = log.inner.data.topics().first().and_then(|t| registry.lookup(t)) else {
        return Ok(None);
    };

    let event = match signature.kind {
        BatchEventKind::Commit => BatchEvent::Commit(decode_log(signature, log)?),
        BatchEventKind::Finalize => BatchEvent::Finalize(decode_log(signature, log)?),
    };
    Ok(Some(event))
}
