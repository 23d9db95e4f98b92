//! Batchscope Driver crate root
pub mod driver;
pub use driver::{ChunkError, Driver, ScanConfig, ScanSummary};

pub mod report;
