use blockframe_core::codec::Codec;
use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size};

/// Largest input the LZ4 block format can encode (0x7E000000 bytes).
pub const LZ4_MAX_INPUT_SIZE: usize = 0x7E00_0000;

/// LZ4 block codec, the default primitive.
///
/// Fastest decompression of all bundled codecs. `decompress_into` is the
/// bounds-checked safe decoder: a stream that would expand past the declared
/// length fails instead of writing beyond the buffer.
///
/// Best for: hot data, low-latency workloads.
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress_bound(&self, input_len: usize) -> usize {
        if input_len > LZ4_MAX_INPUT_SIZE {
            return 0;
        }
        get_maximum_output_size(input_len)
    }

    fn compress_into(&self, input: &[u8], output: &mut [u8]) -> anyhow::Result<usize> {
        compress_into(input, output).map_err(|e| anyhow::anyhow!("lz4 compress error: {}", e))
    }

    fn decompress_into(&self, input: &[u8], output: &mut [u8]) -> anyhow::Result<usize> {
        decompress_into(input, output).map_err(|e| anyhow::anyhow!("lz4 decompress error: {}", e))
    }
}
