use blockframe_core::codec::Codec;

/// No-op codec: stores the payload verbatim, with no compression.
///
/// Useful for:
/// - Verifying the framing round-trip independently of any codec.
/// - Data that is already compressed (e.g., JPEG, MP4) where further
///   compression would expand the block.
pub struct PassThroughCodec;

impl Codec for PassThroughCodec {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn compress_bound(&self, input_len: usize) -> usize {
        input_len
    }

    fn compress_into(&self, input: &[u8], output: &mut [u8]) -> anyhow::Result<usize> {
        if input.len() > output.len() {
            anyhow::bail!("{} input bytes do not fit {}", input.len(), output.len());
        }
        output[..input.len()].copy_from_slice(input);
        Ok(input.len())
    }

    fn decompress_into(&self, input: &[u8], output: &mut [u8]) -> anyhow::Result<usize> {
        if input.len() > output.len() {
            anyhow::bail!(
                "stored payload of {} bytes overruns {}-byte output",
                input.len(),
                output.len()
            );
        }
        output[..input.len()].copy_from_slice(input);
        Ok(input.len())
    }
}
