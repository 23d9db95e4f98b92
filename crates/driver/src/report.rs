//! Per-event output of the scanner.
use alloy::primitives::TxHash;
use chainio::BatchEvent;
use extractor::Enrichment;
use tracing::{field::display, info};

/// A decoded batch event together with the on-chain context of its transaction.
#[derive(Debug, Clone, Copy)]
pub struct EnrichedRecord<'a> {
    /// The decoded event
    pub event: &'a BatchEvent,
    /// Transaction that emitted the event
    pub tx_hash: TxHash,
    /// Block number carried by the log
    pub log_block_number: Option<u64>,
    /// Transaction, receipt and header data
    pub enrichment: Enrichment,
}

/// Emit one structured log record for `record`.
///
/// Fees the block header does not carry (`base_fee` before London, `blob_base_fee` before
/// Cancun) are left out of the record.
pub fn report(record: &EnrichedRecord<'_>) {
    let EnrichedRecord { event, tx_hash, log_block_number, enrichment } = record;
    let base_fee = enrichment.base_fee;
    let blob_base_fee = enrichment.blob_base_fee.map(display);
    match event {
        BatchEvent::Commit(commit) => info!(
            batch_index = %commit.batchIndex,
            batch_hash = %commit.batchHash,
            %tx_hash,
            block_number = log_block_number,
            tx_cost = %enrichment.tx_cost,
            fee_paid = %enrichment.fee_paid,
            base_fee,
            blob_base_fee,
            "CommitBatch"
        ),
        BatchEvent::Finalize(finalize) => info!(
            batch_index = %finalize.batchIndex,
            batch_hash = %finalize.batchHash,
            state_root = %finalize.state_root(),
            withdraw_root = %finalize.withdraw_root(),
            %tx_hash,
            block_number = log_block_number,
            tx_cost = %enrichment.tx_cost,
            fee_paid = %enrichment.fee_paid,
            base_fee,
            blob_base_fee,
            "FinalizeBatch"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{B256, U256};
    use chainio::IScrollChain::CommitBatch;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(record: &EnrichedRecord<'_>) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || report(record));
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn commit() -> BatchEvent {
        BatchEvent::Commit(CommitBatch { batchIndex: U256::from(42), batchHash: B256::ZERO })
    }

    fn enrichment(base_fee: Option<u64>, blob_base_fee: Option<u128>) -> Enrichment {
        Enrichment {
            block_number: 7,
            tx_cost: U256::from(1_000),
            fee_paid: 900,
            base_fee,
            blob_base_fee,
        }
    }

    #[test]
    fn fees_are_logged_unwrapped() {
        let event = commit();
        let record = EnrichedRecord {
            event: &event,
            tx_hash: B256::repeat_byte(1),
            log_block_number: Some(7),
            enrichment: enrichment(Some(12), Some(3)),
        };

        let out = capture(&record);
        assert!(out.contains("CommitBatch"), "{out}");
        assert!(out.contains("batch_index=42"), "{out}");
        assert!(out.contains("block_number=7"), "{out}");
        assert!(out.contains(" base_fee=12"), "{out}");
        assert!(out.contains("blob_base_fee=3"), "{out}");
        assert!(!out.contains("Some("), "{out}");
    }

    #[test]
    fn missing_fees_are_omitted() {
        let event = commit();
        let record = EnrichedRecord {
            event: &event,
            tx_hash: B256::repeat_byte(1),
            log_block_number: Some(7),
            enrichment: enrichment(None, None),
        };

        let out = capture(&record);
        assert!(out.contains("fee_paid=900"), "{out}");
        assert!(!out.contains("base_fee"), "{out}");
        assert!(!out.contains("None"), "{out}");
    }
}
