use std::{fmt, str::FromStr};

use alloy_eips::{eip4844, eip7691};
use alloy_network_primitives::ReceiptResponse;

/// Blob fee-market parameter set used to turn excess blob gas into a blob base fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlobFeeSchedule {
    /// EIP-4844 parameters, active since the Cancun hardfork.
    #[default]
    Cancun,
    /// EIP-7691 parameters, active since the Prague hardfork.
    Prague,
}

impl BlobFeeSchedule {
    /// Denominator of the exponential fee-adjustment formula.
    pub fn update_fraction(self) -> u128 {
        match self {
            Self::Cancun => u128::from(eip4844::BLOB_GASPRICE_UPDATE_FRACTION),
            Self::Prague => u128::from(eip7691::BLOB_GASPRICE_UPDATE_FRACTION_PECTRA),
        }
    }

    /// Blob base fee for a header carrying `excess_blob_gas`.
    ///
    /// Computes `MIN_BLOB_BASE_FEE * e^(excess_blob_gas / update_fraction)` with the
    /// integer Taylor-series approximation defined by EIP-4844.
    pub fn blob_base_fee(self, excess_blob_gas: u64) -> u128 {
        eip4844::fake_exponential(
            MIN_BLOB_BASE_FEE,
            u128::from(excess_blob_gas),
            self.update_fraction(),
        )
    }
}

/// Minimum blob base fee, in wei.
pub const MIN_BLOB_BASE_FEE: u128 = eip4844::BLOB_TX_MIN_BLOB_GASPRICE;

impl fmt::Display for BlobFeeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancun => f.write_str("cancun"),
            Self::Prague => f.write_str("prague"),
        }
    }
}

/// Error returned when parsing an unknown blob fee schedule name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blob fee schedule `{0}`, expected `cancun` or `prague`")]
pub struct UnknownBlobFeeSchedule(String);

impl FromStr for BlobFeeSchedule {
    type Err = UnknownBlobFeeSchedule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cancun" => Ok(Self::Cancun),
            "prague" | "pectra" => Ok(Self::Prague),
            _ => Err(UnknownBlobFeeSchedule(s.to_owned())),
        }
    }
}

/// Returns the total fee paid for blobs in the given receipt.
/// If the receipt is _not_ a blob-carrying transaction, `0` is returned.
pub fn calculate_blob_fee_from_receipt<R: ReceiptResponse>(receipt: &R) -> u128 {
    match (receipt.blob_gas_used(), receipt.blob_gas_price()) {
        (Some(gas_used), Some(price)) => (gas_used as u128).saturating_mul(price),
        _ => 0,
    }
}
