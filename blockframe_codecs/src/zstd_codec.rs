use blockframe_core::codec::Codec;

/// Zstandard block codec.
///
/// Uses the one-shot `zstd::bulk` buffer API at the configured level
/// (default: 3). Each call builds its own context, so the codec is reentrant.
///
/// Best for: general text, JSON, logs, mixed structured data.
pub struct ZstdCodec {
    /// Compression level (1 = fast / larger, 22 = slow / smallest).
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Codec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress_bound(&self, input_len: usize) -> usize {
        zstd::zstd_safe::compress_bound(input_len)
    }

    fn compress_into(&self, input: &[u8], output: &mut [u8]) -> anyhow::Result<usize> {
        let written = zstd::bulk::compress_to_buffer(input, output, self.level)?;
        Ok(written)
    }

    fn decompress_into(&self, input: &[u8], output: &mut [u8]) -> anyhow::Result<usize> {
        // zstd refuses frames whose content does not fit `output`.
        let written = zstd::bulk::decompress_to_buffer(input, output)?;
        Ok(written)
    }
}
