/// Integration tests: block framing over the bundled codecs.
///
/// Covers the block contract end to end:
///  1. Round-trips for every codec on compressible and incompressible data
///  2. Header layout (u32 LE original length, then payload)
///  3. Rejection of empty, truncated, oversized, and corrupted input
///  4. Concurrent use of one shared `BlockCodec`
use std::sync::Arc;
use std::thread;

use blockframe_codecs::{compress_block, decompress_block, Lz4Codec, PassThroughCodec, ZstdCodec};
use blockframe_core::{BlockCodec, BlockConfig, BlockError, BlockHeader, Codec, DEFAULT_MAX_BLOCK_SIZE, HEADER_SIZE};
use proptest::prelude::*;

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

/// Generate `len` highly compressible bytes (repeating pattern).
fn compressible_bytes(len: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    (0..len).map(|i| pattern[i % pattern.len()]).collect()
}

// ── helpers ───────────────────────────────────────────────────────────────

fn all_codecs() -> Vec<BlockCodec> {
    let codecs: Vec<Arc<dyn Codec>> = vec![
        Arc::new(Lz4Codec),
        Arc::new(ZstdCodec::default()),
        Arc::new(PassThroughCodec),
    ];
    codecs.into_iter().map(BlockCodec::new).collect()
}

fn declared_size(block: &[u8]) -> u32 {
    u32::from_le_bytes(block[..HEADER_SIZE].try_into().unwrap())
}

// ── tests ──────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_every_codec() {
    let inputs = [
        vec![0x42],
        compressible_bytes(64 * 1024 + 17),
        pseudo_random_bytes(10_000, 0xDEAD_BEEF),
    ];
    for codec in all_codecs() {
        for data in &inputs {
            let block = codec.compress_block(data).unwrap();
            let raw = codec.decompress_block(&block).unwrap();
            assert_eq!(&raw, data, "{} round-trip should be byte-exact", codec.codec_name());
        }
    }
}

#[test]
fn test_default_functions_use_lz4() {
    let data = compressible_bytes(5000);
    let block = compress_block(&data).unwrap();
    assert_eq!(block, BlockCodec::new(Arc::new(Lz4Codec)).compress_block(&data).unwrap());
    assert_eq!(decompress_block(&block).unwrap(), data);
}

#[test]
fn test_empty_input_produces_no_block() {
    for codec in all_codecs() {
        assert_eq!(codec.compress_block(&[]), Err(BlockError::EmptyInput));
    }
}

#[test]
fn test_header_records_original_length() {
    for len in [1usize, 255, 256, 65_536, 300_001] {
        let block = compress_block(&pseudo_random_bytes(len, len as u64)).unwrap();
        assert_eq!(declared_size(&block) as usize, len);
        assert_eq!(
            BlockHeader::peek(&block),
            Some(BlockHeader { original_size: len as u32 })
        );
    }
}

#[test]
fn test_block_is_trimmed_to_payload() {
    let data = compressible_bytes(100_000);
    let block = compress_block(&data).unwrap();
    assert!(block.len() < Lz4Codec.compress_bound(data.len()) + HEADER_SIZE);

    let mut payload = vec![0u8; Lz4Codec.compress_bound(data.len())];
    let n = Lz4Codec.compress_into(&data, &mut payload).unwrap();
    assert_eq!(&block[HEADER_SIZE..], &payload[..n]);
}

#[test]
fn test_oversized_header_rejected_before_allocation() {
    // A header claiming 4 GiB with a two-byte payload must fail fast.
    let block = [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x01];
    assert_eq!(
        decompress_block(&block),
        Err(BlockError::SizeCeilingExceeded {
            declared: u32::MAX,
            max: DEFAULT_MAX_BLOCK_SIZE
        })
    );
}

#[test]
fn test_truncated_blocks_rejected() {
    let block = compress_block(&compressible_bytes(1000)).unwrap();
    for k in 0..=HEADER_SIZE {
        assert_eq!(
            decompress_block(&block[..k]),
            Err(BlockError::TruncatedBlock { len: k })
        );
    }
}

#[test]
fn test_truncated_payload_rejected() {
    let data = pseudo_random_bytes(4096, 7);
    let block = compress_block(&data).unwrap();
    let cut = &block[..block.len() - 10];
    assert!(matches!(
        decompress_block(cut),
        Err(BlockError::DecompressionFailed { codec: "lz4", .. })
            | Err(BlockError::LengthMismatch { expected: 4096, .. })
    ));
}

#[test]
fn test_corrupted_payload_never_yields_wrong_length() {
    let data = compressible_bytes(8192);
    for codec in all_codecs() {
        let block = codec.compress_block(&data).unwrap();
        for pos in HEADER_SIZE..block.len() {
            for bit in [0x01u8, 0x10, 0x80] {
                let mut corrupt = block.clone();
                corrupt[pos] ^= bit;
                if let Ok(raw) = codec.decompress_block(&corrupt) {
                    assert_eq!(raw.len(), data.len(), "{} at byte {pos}", codec.codec_name());
                }
            }
        }
    }
}

#[test]
fn test_failures_are_repeatable() {
    let invalid: [&[u8]; 4] = [
        &[],
        &[1, 2, 3, 4],
        &[0xFF, 0xFF, 0xFF, 0xFF, 0xAA],
        &[0x10, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF],
    ];
    for block in invalid {
        let first = decompress_block(block);
        assert!(first.is_err());
        assert_eq!(first, decompress_block(block));
    }
    assert_eq!(compress_block(&[]), compress_block(&[]));
}

/// 1 MiB of a repeating pattern sits exactly at the ceiling and must shrink.
#[test]
fn test_full_size_pattern_block() {
    let data = compressible_bytes(DEFAULT_MAX_BLOCK_SIZE as usize);
    let block = compress_block(&data).unwrap();
    assert!(
        block.len() < data.len() + HEADER_SIZE,
        "compressible data should shrink: block={} raw={}",
        block.len(),
        data.len()
    );
    assert_eq!(decompress_block(&block).unwrap(), data);
}

/// One byte over the ceiling: the encoder accepts it, the decoder does not.
#[test]
fn test_ceiling_enforced_at_decode_only() {
    let len = DEFAULT_MAX_BLOCK_SIZE as usize + 1;
    let data = pseudo_random_bytes(len, 42);
    let block = compress_block(&data).unwrap();
    assert_eq!(declared_size(&block) as usize, len);

    let expected = Err(BlockError::SizeCeilingExceeded {
        declared: len as u32,
        max: DEFAULT_MAX_BLOCK_SIZE,
    });
    assert_eq!(decompress_block(&block), expected);

    // Same rejection when a valid small block has its header forced upward.
    let mut forced = compress_block(&data[..1000]).unwrap();
    forced[..HEADER_SIZE].copy_from_slice(&(len as u32).to_le_bytes());
    assert_eq!(decompress_block(&forced), expected);

    // A codec configured with a higher ceiling reads the original block back.
    let relaxed = BlockCodec::new(Arc::new(Lz4Codec)).with_config(BlockConfig::new(len as u32));
    assert_eq!(relaxed.decompress_block(&block).unwrap(), data);
}

#[test]
fn test_concurrent_calls_share_one_codec() {
    const THREADS: u64 = 8;
    const ITERATIONS: u64 = 200;

    for codec in all_codecs() {
        thread::scope(|s| {
            for t in 0..THREADS {
                let codec = &codec;
                s.spawn(move || {
                    for i in 0..ITERATIONS {
                        let seed = t * ITERATIONS + i;
                        let len = 1 + (seed as usize * 37) % 20_000;
                        let data = if i % 2 == 0 {
                            compressible_bytes(len)
                        } else {
                            pseudo_random_bytes(len, seed)
                        };
                        let block = codec.compress_block(&data).unwrap();
                        assert_eq!(codec.decompress_block(&block).unwrap(), data);
                    }
                });
            }
        });
    }
}

proptest! {
    #[test]
    fn prop_roundtrip(data in proptest::collection::vec(any::<u8>(), 1..8192)) {
        for codec in all_codecs() {
            let block = codec.compress_block(&data).unwrap();
            prop_assert_eq!(declared_size(&block) as usize, data.len());
            prop_assert_eq!(codec.decompress_block(&block).unwrap(), data.clone());
        }
    }

    #[test]
    fn prop_arbitrary_blocks_never_panic(block in proptest::collection::vec(any::<u8>(), 0..512)) {
        for codec in all_codecs() {
            if let Ok(raw) = codec.decompress_block(&block) {
                prop_assert_eq!(raw.len(), declared_size(&block) as usize);
            }
        }
    }

    #[test]
    fn prop_bit_flip_keeps_exact_length(
        data in proptest::collection::vec(any::<u8>(), 1..2048),
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let block = compress_block(&data).unwrap();
        let mut corrupt = block.clone();
        let idx = HEADER_SIZE + pos.index(block.len() - HEADER_SIZE);
        corrupt[idx] ^= 1 << bit;
        if let Ok(raw) = decompress_block(&corrupt) {
            prop_assert_eq!(raw.len(), data.len());
        }
    }
}
