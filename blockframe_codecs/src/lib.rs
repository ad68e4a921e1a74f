mod lz4_codec;
mod passthrough;
mod zstd_codec;

pub use lz4_codec::{Lz4Codec, LZ4_MAX_INPUT_SIZE};
pub use passthrough::PassThroughCodec;
pub use zstd_codec::ZstdCodec;

use std::sync::{Arc, OnceLock};

use blockframe_core::{BlockCodec, Codec};

/// Resolve a codec from its CLI name.
///
/// Blocks carry no codec id, so the caller must pick the same codec for both
/// directions.
pub fn codec_by_name(name: &str, zstd_level: i32) -> anyhow::Result<Arc<dyn Codec>> {
    match name {
        "passthrough" | "pass" | "none" => Ok(Arc::new(PassThroughCodec)),
        "zstd" | "z" => Ok(Arc::new(ZstdCodec::new(zstd_level))),
        "lz4" | "l" => Ok(Arc::new(Lz4Codec)),
        other => anyhow::bail!(
            "unknown codec '{}'. Valid options: passthrough, zstd, lz4",
            other
        ),
    }
}

/// Shared LZ4 block codec with the default 1 MiB decode ceiling.
pub fn lz4_block_codec() -> &'static BlockCodec {
    static CODEC: OnceLock<BlockCodec> = OnceLock::new();
    CODEC.get_or_init(|| BlockCodec::new(Arc::new(Lz4Codec)))
}

/// Compress `input` into an LZ4 block.
pub fn compress_block(input: &[u8]) -> blockframe_core::Result<Vec<u8>> {
    lz4_block_codec().compress_block(input)
}

/// Decompress an LZ4 block, enforcing the default 1 MiB ceiling.
pub fn decompress_block(block: &[u8]) -> blockframe_core::Result<Vec<u8>> {
    lz4_block_codec().decompress_block(block)
}
