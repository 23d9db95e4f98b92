use derive_more::Display;

/// An inclusive range of block numbers, `[from, to]`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display("[{from}, {to}]")]
pub struct BlockRange {
    /// First block of the range (inclusive)
    pub from: u64,
    /// Last block of the range (inclusive)
    pub to: u64,
}

impl BlockRange {
    /// Create a new inclusive range. `from` must not be greater than `to`.
    pub const fn new(from: u64, to: u64) -> Self {
        debug_assert!(from <= to);
        Self { from, to }
    }

    /// Number of blocks covered by the range. Never zero.
    pub const fn block_count(&self) -> u64 {
        self.to - self.from + 1
    }
}

/// A backwards scan over the `window` most recent blocks ending at `head`, split into
/// chunks of at most `chunk_size` blocks.
///
/// Chunks are yielded newest first, without gaps or overlaps. If `window` is not a multiple
/// of `chunk_size` the oldest chunk is shortened, so exactly `window` blocks are covered.
/// The window is clamped at genesis: a head lower than the window covers `[0, head]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    head: u64,
    window: u64,
    chunk_size: u64,
}

impl ScanWindow {
    /// Create a new scan window. A zero `chunk_size` is treated as one block per chunk.
    pub fn new(head: u64, window: u64, chunk_size: u64) -> Self {
        Self { head, window, chunk_size: chunk_size.max(1) }
    }

    /// The oldest block covered by the scan, or `None` for an empty window.
    pub const fn lowest_block(&self) -> Option<u64> {
        if self.window == 0 {
            return None;
        }
        Some(self.head.saturating_sub(self.window - 1))
    }

    /// Total number of blocks covered by the scan.
    pub const fn covered_blocks(&self) -> u64 {
        match self.lowest_block() {
            Some(lowest) => self.head - lowest + 1,
            None => 0,
        }
    }

    /// Iterate over the chunks of this window, newest first.
    pub const fn chunks(&self) -> ScanChunks {
        let chunk_size = self.chunk_size;
        match self.lowest_block() {
            Some(floor) => ScanChunks { cursor: Some(self.head), floor, chunk_size },
            None => ScanChunks { cursor: None, floor: 0, chunk_size },
        }
    }
}

/// Iterator over the chunks of a [`ScanWindow`].
#[derive(Debug, Clone)]
pub struct ScanChunks {
    /// Upper bound of the next chunk, `None` once the window is exhausted.
    cursor: Option<u64>,
    floor: u64,
    chunk_size: u64,
}

impl Iterator for ScanChunks {
    type Item = BlockRange;

    fn next(&mut self) -> Option<Self::Item> {
        let to = self.cursor?;
        let from = to.saturating_sub(self.chunk_size - 1).max(self.floor);
        self.cursor = if from == self.floor { None } else { Some(from - 1) };
        Some(BlockRange::new(from, to))
    }
}
