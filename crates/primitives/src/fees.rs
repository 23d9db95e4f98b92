use alloy_consensus::transaction::Transaction;
use alloy_eips::eip4844::DATA_GAS_PER_BLOB;
use alloy_network_primitives::ReceiptResponse;
use alloy_primitives::U256;

use crate::blob_fee::calculate_blob_fee_from_receipt;

/// Returns the maximum amount of wei the transaction may spend:
/// `gas_limit * max_fee_per_gas + value`, plus `blob_gas * max_fee_per_blob_gas` for
/// blob-carrying transactions.
///
/// For legacy and EIP-2930 transactions `max_fee_per_gas` is the gas price.
pub fn transaction_cost<T: Transaction>(tx: &T) -> U256 {
    let mut cost = U256::from(tx.gas_limit()).saturating_mul(U256::from(tx.max_fee_per_gas()));
    if let (Some(hashes), Some(blob_fee_cap)) =
        (tx.blob_versioned_hashes(), tx.max_fee_per_blob_gas())
    {
        let blob_gas = (hashes.len() as u64).saturating_mul(DATA_GAS_PER_BLOB);
        cost = cost.saturating_add(U256::from(blob_gas).saturating_mul(U256::from(blob_fee_cap)));
    }
    cost.saturating_add(tx.value())
}

/// Returns the fee actually paid by a mined transaction: execution gas at the effective
/// gas price plus the blob fee, if any.
pub fn fee_paid_from_receipt<R: ReceiptResponse>(receipt: &R) -> u128 {
    (receipt.gas_used() as u128)
        .saturating_mul(receipt.effective_gas_price())
        .saturating_add(calculate_blob_fee_from_receipt(receipt))
}
