/// Underlying compression primitive wrapped by [`crate::BlockCodec`].
///
/// Each `Codec` implementation:
/// - Operates on caller-provided buffers only: it never grows or reallocates
///   the output slice, so the framing layer controls every allocation.
/// - Must be reentrant. `BlockCodec` is shared across threads and calls into
///   the same `Codec` concurrently without any locking.
/// - Knows nothing about the block header; it sees the payload region only.
pub trait Codec: Send + Sync {
    /// Human-readable codec name for CLI display and log fields.
    fn name(&self) -> &'static str;

    /// Worst-case compressed size for `input_len` bytes of input.
    ///
    /// Returns `0` when no bound can be given (e.g. the input exceeds what the
    /// codec can encode). A zero bound makes compression fail up front.
    fn compress_bound(&self, input_len: usize) -> usize;

    /// Compress `input` into `output`, returning the number of bytes written.
    ///
    /// `output` is exactly `compress_bound(input.len())` bytes long. Writing
    /// zero bytes is treated as a failure by the caller.
    fn compress_into(&self, input: &[u8], output: &mut [u8]) -> anyhow::Result<usize>;

    /// Decompress `input` into `output`, returning the number of bytes written.
    ///
    /// `output` is sized to the declared original length. Implementations must
    /// refuse to write past its end and return an error instead.
    fn decompress_into(&self, input: &[u8], output: &mut [u8]) -> anyhow::Result<usize>;
}
