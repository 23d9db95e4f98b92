//! Core primitives for the batchscope project.
/// Blob fee-market helpers
pub mod blob_fee;
/// Transaction cost helpers
pub mod fees;
/// Block range chunking for backwards scans
pub mod scan;

#[cfg(test)]
pub mod test_utils;
