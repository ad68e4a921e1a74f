/// Fixed size of the block header in bytes.
///   original_size:u32 (little-endian)
pub const HEADER_SIZE: usize = 4;

/// Default ceiling on the declared `original_size` accepted at decode: 1 MiB.
///
/// Bounds the allocation a decoder makes on behalf of an untrusted header.
/// Blocks stored by existing producers were written against this value.
pub const DEFAULT_MAX_BLOCK_SIZE: u32 = 1024 * 1024;

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 4-byte block header.
///
/// ```text
/// offset 0..3   : original_size, u32 LE
/// offset 4..N-1 : compressed payload (opaque, consumed by the codec)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Exact byte length of the uncompressed payload.
    pub original_size: u32,
}

impl BlockHeader {
    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        self.original_size.to_le_bytes()
    }

    /// Deserialize from `HEADER_SIZE` bytes.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Self {
        Self {
            original_size: u32::from_le_bytes(*buf),
        }
    }

    /// Read the header of `block` without touching the payload.
    ///
    /// Returns `None` when the block has no payload after the header, the same
    /// cut-off [`crate::BlockCodec::decompress_block`] applies.
    pub fn peek(block: &[u8]) -> Option<Self> {
        if block.len() <= HEADER_SIZE {
            return None;
        }
        let (head, _) = block.split_first_chunk::<HEADER_SIZE>()?;
        Some(Self::from_bytes(head))
    }

    /// Split a block into its header bytes and payload.
    pub(crate) fn split(block: &[u8]) -> Option<(Self, &[u8])> {
        let header = Self::peek(block)?;
        Some((header, &block[HEADER_SIZE..]))
    }
}
