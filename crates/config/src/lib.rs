//! Batchscope configuration
use alloy_primitives::{Address, address};
use clap::Parser;
use primitives::blob_fee::BlobFeeSchedule;
use url::Url;

/// Default address of the Scroll rollup chain contract on Ethereum mainnet.
pub const DEFAULT_ROLLUP_ADDRESS: Address = address!("0xa13BAF47339d63B743e7Da8741db5456DAc1E556");

/// RPC endpoint configuration options
#[derive(Debug, Clone, Parser)]
pub struct RpcOpts {
    /// L1 RPC URL (http(s) or ws(s))
    #[clap(long = "rpc-url", env = "RPC_PROVIDER_URL")]
    pub url: Url,
}

/// Scan window configuration options
#[derive(Debug, Clone, Parser)]
pub struct ScanOpts {
    /// Number of blocks to scan backwards from the chain head
    #[clap(
        long,
        env = "SCAN_WINDOW_BLOCKS",
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub window: u64,
    /// Number of blocks requested per `eth_getLogs` query
    #[clap(
        long,
        env = "SCAN_CHUNK_SIZE",
        default_value = "10",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub chunk_size: u64,
    /// Blob fee-market parameters used to derive the blob base fee
    #[clap(long, env = "BLOB_FEE_SCHEDULE", default_value = "cancun")]
    pub blob_fee_schedule: BlobFeeSchedule,
}

/// CLI options for batchscope
#[derive(Debug, Clone, Parser)]
#[clap(name = "batchscope", about = "Scan recent L1 blocks for rollup batch events")]
pub struct Opts {
    /// RPC endpoint configuration
    #[clap(flatten)]
    pub rpc: RpcOpts,

    /// Rollup chain contract emitting `CommitBatch` and `FinalizeBatch`
    #[clap(long, env = "ROLLUP_CONTRACT_ADDRESS", default_value_t = DEFAULT_ROLLUP_ADDRESS)]
    pub rollup_address: Address,

    /// Scan window configuration
    #[clap(flatten)]
    pub scan: ScanOpts,
}
