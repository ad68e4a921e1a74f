use thiserror::Error;

use crate::format::HEADER_SIZE;

/// Every way a block can fail to compress or decompress.
///
/// None of these are fatal: the codec never panics on malformed input and
/// never substitutes an empty buffer for a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// Compressing nothing produces nothing; an empty block is never emitted.
    #[error("input is empty; nothing to compress")]
    EmptyInput,

    /// The codec cannot bound the compressed size of this input, or the input
    /// length does not fit the u32 header.
    #[error("{codec}: no compressed-size bound for {input_len} input bytes")]
    BoundUnavailable { codec: &'static str, input_len: usize },

    /// The codec reported an error or wrote zero bytes.
    #[error("{codec} compression failed: {reason}")]
    CompressionFailed { codec: &'static str, reason: String },

    /// The block has no payload after its header.
    #[error("block of {len} bytes is too short (header alone is {header} bytes)", header = HEADER_SIZE)]
    TruncatedBlock { len: usize },

    /// The header declares an original size of zero. Encoders never emit such
    /// a block, since empty input is rejected at compression.
    #[error("header declares an empty original payload")]
    EmptyBlock,

    /// The header declares more bytes than the decoder is allowed to allocate.
    #[error("declared size {declared} exceeds block ceiling {max}")]
    SizeCeilingExceeded { declared: u32, max: u32 },

    /// The codec rejected the payload (corrupt, truncated, or oversized output).
    #[error("{codec} decompression failed: {reason}")]
    DecompressionFailed { codec: &'static str, reason: String },

    /// The codec succeeded but wrote a different number of bytes than the
    /// header declares.
    #[error("decompressed {actual} bytes but header declares {expected}")]
    LengthMismatch { expected: u32, actual: usize },
}

pub type Result<T> = std::result::Result<T, BlockError>;
