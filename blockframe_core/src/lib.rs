pub mod block;
pub mod codec;
pub mod error;
pub mod format;

pub use block::{BlockCodec, BlockConfig};
pub use codec::Codec;
pub use error::{BlockError, Result};
pub use format::{BlockHeader, DEFAULT_MAX_BLOCK_SIZE, HEADER_SIZE};
