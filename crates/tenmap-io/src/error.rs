//! Error types for tensor map serialization

use tenmap_core::{DType, TensorMapError};
use thiserror::Error;

/// Errors raised while saving or loading tensor maps
#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive is too short ({len} bytes) to contain a header")]
    Truncated { len: usize },

    #[error("invalid magic bytes {found:?}, this is not a tensor map archive")]
    BadMagic { found: [u8; 4] },

    #[error("unsupported archive version {found}, this build reads version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("unknown dtype tag {0} in archive header")]
    UnknownDType(u8),

    #[error("archive contains {found} data, but {expected} was requested")]
    DTypeMismatch { expected: DType, found: DType },

    #[error("payload of {size} bytes exceeds the configured limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("failed to encode tensor map: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode tensor map: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("{trailing} unexpected trailing bytes after the encoded tensor map")]
    TrailingBytes { trailing: usize },

    #[error("invalid metadata in archive: {0}")]
    Metadata(#[from] TensorMapError),
}

/// Result type for serialization operations
pub type Result<T> = std::result::Result<T, IoError>;
