use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use blockframe_codecs::codec_by_name;
use blockframe_core::{BlockCodec, BlockConfig, BlockHeader, DEFAULT_MAX_BLOCK_SIZE, HEADER_SIZE};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "blockframe",
    about = "Compress, decompress, and inspect length-prefixed compressed blocks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand that runs a codec.
#[derive(clap::Args)]
struct CodecArgs {
    /// Codec to use: passthrough | zstd | lz4
    #[arg(short, long, default_value = "lz4")]
    codec: String,
    /// Zstd compression level (1–22, only used with --codec zstd)
    #[arg(long, default_value_t = 3)]
    zstd_level: i32,
    /// Largest original size a block header may declare when decompressing
    #[arg(long, default_value_t = DEFAULT_MAX_BLOCK_SIZE)]
    max_block_size: u32,
}

impl CodecArgs {
    fn block_codec(&self) -> anyhow::Result<BlockCodec> {
        let codec = codec_by_name(&self.codec, self.zstd_level)?;
        Ok(BlockCodec::new(codec).with_config(BlockConfig::new(self.max_block_size)))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a single block
    Compress {
        /// Source file ("-" reads stdin)
        input: PathBuf,
        /// Destination block file
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Decompress a single block back to raw bytes
    Decompress {
        /// Source block file
        input: PathBuf,
        /// Destination file ("-" writes to stdout)
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Print the block header and size statistics without decompressing
    Inspect {
        /// Block file to inspect
        file: PathBuf,
        /// Ceiling to check the declared size against
        #[arg(long, default_value_t = DEFAULT_MAX_BLOCK_SIZE)]
        max_block_size: u32,
    },
    /// Time repeated compress/decompress round-trips of a file
    Bench {
        /// Raw input file
        file: PathBuf,
        /// Number of round-trips
        #[arg(short, long, default_value_t = 100)]
        iterations: u32,
        #[command(flatten)]
        codec: CodecArgs,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path).with_context(|| format!("reading input file {:?}", path))
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_compress(input: PathBuf, output: PathBuf, args: CodecArgs) -> anyhow::Result<()> {
    let codec = args.block_codec()?;
    let raw = read_input(&input)?;

    let t0 = Instant::now();
    let block = codec
        .compress_block(&raw)
        .with_context(|| format!("compressing {:?}", input))?;
    let elapsed = t0.elapsed();

    std::fs::write(&output, &block)
        .with_context(|| format!("writing output file {:?}", output))?;
    info!(codec = codec.codec_name(), raw_len = raw.len(), block_len = block.len(), "wrote block");

    eprintln!("  codec       : {}", codec.codec_name());
    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!("  block size  : {}", human_bytes(block.len() as u64));
    eprintln!("  ratio       : {:.2}x", raw.len() as f64 / block.len() as f64);
    eprintln!("  elapsed     : {:.3}ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf, args: CodecArgs) -> anyhow::Result<()> {
    let codec = args.block_codec()?;
    let block = std::fs::read(&input).with_context(|| format!("reading block file {:?}", input))?;

    let t0 = Instant::now();
    let raw = codec
        .decompress_block(&block)
        .with_context(|| format!("decompressing {:?}", input))?;
    let elapsed = t0.elapsed();

    if output.to_str() == Some("-") {
        let mut out = io::stdout().lock();
        out.write_all(&raw)?;
        out.flush()?;
    } else {
        std::fs::write(&output, &raw)
            .with_context(|| format!("writing output file {:?}", output))?;
    }

    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!("  elapsed     : {:.3}ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn run_inspect(file: PathBuf, max_block_size: u32) -> anyhow::Result<()> {
    let block = std::fs::read(&file).with_context(|| format!("reading block file {:?}", file))?;
    let header = BlockHeader::peek(&block).ok_or_else(|| {
        anyhow::anyhow!(
            "{:?} is {} bytes; a block needs more than {} header bytes",
            file,
            block.len(),
            HEADER_SIZE
        )
    })?;
    let payload_len = block.len() - HEADER_SIZE;

    println!("=== Block: {:?} ===", file);
    println!();
    println!("  original size  : {}", human_bytes(header.original_size as u64));
    println!("  payload size   : {}", human_bytes(payload_len as u64));
    println!("  block on disk  : {}", human_bytes(block.len() as u64));
    println!(
        "  ratio          : {:.2}x",
        header.original_size as f64 / block.len() as f64
    );
    let status = if header.original_size > max_block_size {
        "exceeds ceiling"
    } else {
        "within ceiling"
    };
    println!("  ceiling        : {} ({})", human_bytes(max_block_size as u64), status);
    Ok(())
}

fn run_bench(file: PathBuf, iterations: u32, args: CodecArgs) -> anyhow::Result<()> {
    if iterations == 0 {
        anyhow::bail!("--iterations must be at least 1");
    }
    let codec = args.block_codec()?;
    let raw = read_input(&file)?;

    eprintln!(
        "benchmarking {} round-trips of {} with {}...",
        iterations,
        human_bytes(raw.len() as u64),
        codec.codec_name()
    );

    let mut compress_us: Vec<u64> = Vec::with_capacity(iterations as usize);
    let mut decompress_us: Vec<u64> = Vec::with_capacity(iterations as usize);
    let mut block_len = 0;

    for _ in 0..iterations {
        let t = Instant::now();
        let block = codec.compress_block(&raw)?;
        compress_us.push(t.elapsed().as_micros() as u64);

        let t = Instant::now();
        let back = codec.decompress_block(&block)?;
        decompress_us.push(t.elapsed().as_micros() as u64);

        if back != raw {
            anyhow::bail!("round-trip mismatch with codec {}", codec.codec_name());
        }
        block_len = block.len();
    }

    compress_us.sort_unstable();
    decompress_us.sort_unstable();
    let p50 = |v: &[u64]| v[v.len() / 2];
    let p99 = |v: &[u64]| v[((v.len() as f64 * 0.99) as usize).min(v.len() - 1)];

    println!();
    println!("=== Block Round-Trip Benchmark ===");
    println!("  codec       : {}", codec.codec_name());
    println!("  raw size    : {}", human_bytes(raw.len() as u64));
    println!("  block size  : {}", human_bytes(block_len as u64));
    println!("  compress    : p50 {} µs, p99 {} µs", p50(&compress_us), p99(&compress_us));
    println!("  decompress  : p50 {} µs, p99 {} µs", p50(&decompress_us), p99(&decompress_us));

    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Compress {
            input,
            output,
            codec,
        } => run_compress(input, output, codec),
        Commands::Decompress {
            input,
            output,
            codec,
        } => run_decompress(input, output, codec),
        Commands::Inspect {
            file,
            max_block_size,
        } => run_inspect(file, max_block_size),
        Commands::Bench {
            file,
            iterations,
            codec,
        } => run_bench(file, iterations, codec),
    }
}
