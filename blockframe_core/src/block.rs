use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::codec::Codec;
use crate::error::{BlockError, Result};
use crate::format::{BlockHeader, DEFAULT_MAX_BLOCK_SIZE, HEADER_SIZE};

/// Decode-side limits for a [`BlockCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockConfig {
    /// Largest `original_size` a header may declare before the block is
    /// rejected. Checked before the output buffer is allocated. Not applied
    /// when compressing.
    pub max_block_size: u32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
        }
    }
}

impl BlockConfig {
    pub fn new(max_block_size: u32) -> Self {
        Self { max_block_size }
    }
}

/// Length-prefixed block framing on top of a [`Codec`].
///
/// # Block layout
/// ```text
/// [original_size: u32 LE][payload: codec output ...]
/// ```
///
/// # Contract
/// [`compress_block`] sizes the output from the codec's bound, lets the codec
/// fill the payload region, trims unused capacity, then writes the header.
/// [`decompress_block`] validates the header against [`BlockConfig`] before
/// allocating exactly `original_size` bytes, and requires the codec to fill
/// that buffer completely.
///
/// Both calls are stateless. A `BlockCodec` can be cloned cheaply and shared
/// across threads.
///
/// [`compress_block`]: BlockCodec::compress_block
/// [`decompress_block`]: BlockCodec::decompress_block
#[derive(Clone)]
pub struct BlockCodec {
    codec: Arc<dyn Codec>,
    config: BlockConfig,
}

impl fmt::Debug for BlockCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockCodec")
            .field("codec", &self.codec.name())
            .field("config", &self.config)
            .finish()
    }
}

impl BlockCodec {
    /// Wrap `codec` with the default 1 MiB decode ceiling.
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self {
            codec,
            config: BlockConfig::default(),
        }
    }

    /// Replace the decode-side limits.
    pub fn with_config(mut self, config: BlockConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> BlockConfig {
        self.config
    }

    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }

    /// Compress `input` into a self-describing block.
    pub fn compress_block(&self, input: &[u8]) -> Result<Vec<u8>> {
        let result = self.encode(input);
        match &result {
            Ok(block) => trace!(
                codec = self.codec.name(),
                input_len = input.len(),
                block_len = block.len(),
                "block compressed"
            ),
            Err(err) => debug!(
                codec = self.codec.name(),
                input_len = input.len(),
                error = %err,
                "compress_block rejected input"
            ),
        }
        result
    }

    /// Decompress a block produced by [`BlockCodec::compress_block`].
    pub fn decompress_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        let result = self.decode(block);
        match &result {
            Ok(raw) => trace!(
                codec = self.codec.name(),
                block_len = block.len(),
                raw_len = raw.len(),
                "block decompressed"
            ),
            Err(err) => debug!(
                codec = self.codec.name(),
                block_len = block.len(),
                error = %err,
                "decompress_block rejected block"
            ),
        }
        result
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let codec = self.codec.name();
        if input.is_empty() {
            return Err(BlockError::EmptyInput);
        }

        let unbounded = || BlockError::BoundUnavailable {
            codec,
            input_len: input.len(),
        };
        let original_size = u32::try_from(input.len()).map_err(|_| unbounded())?;
        let bound = self.codec.compress_bound(input.len());
        if bound == 0 {
            return Err(unbounded());
        }
        let capacity = HEADER_SIZE.checked_add(bound).ok_or_else(unbounded)?;

        let mut out = vec![0u8; capacity];
        let (head, payload) = out.split_at_mut(HEADER_SIZE);

        let written = self
            .codec
            .compress_into(input, payload)
            .map_err(|e| BlockError::CompressionFailed {
                codec,
                reason: e.to_string(),
            })?;
        if written == 0 {
            return Err(BlockError::CompressionFailed {
                codec,
                reason: "codec wrote no bytes".to_string(),
            });
        }
        if written > bound {
            return Err(BlockError::CompressionFailed {
                codec,
                reason: format!("codec reported {written} bytes for a {bound}-byte buffer"),
            });
        }

        head.copy_from_slice(&BlockHeader { original_size }.to_bytes());
        out.truncate(HEADER_SIZE + written);
        Ok(out)
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        let codec = self.codec.name();
        let (header, payload) =
            BlockHeader::split(block).ok_or(BlockError::TruncatedBlock { len: block.len() })?;

        // Must run before the allocation below: the header is untrusted.
        if header.original_size > self.config.max_block_size {
            return Err(BlockError::SizeCeilingExceeded {
                declared: header.original_size,
                max: self.config.max_block_size,
            });
        }
        if header.original_size == 0 {
            return Err(BlockError::EmptyBlock);
        }

        let mut out = vec![0u8; header.original_size as usize];
        let written = self
            .codec
            .decompress_into(payload, &mut out)
            .map_err(|e| BlockError::DecompressionFailed {
                codec,
                reason: e.to_string(),
            })?;

        if written != out.len() {
            return Err(BlockError::LengthMismatch {
                expected: header.original_size,
                actual: written,
            });
        }
        Ok(out)
    }
}
