//! Archive encoding and decoding
//!
//! Archive layout:
//!
//! | bytes | content |
//! |---|---|
//! | 4 | magic `TMAP` |
//! | 4 | format version, little-endian `u32` |
//! | 1 | dtype tag (`1` = float32, `2` = float64) |
//! | rest | bincode encoding of the tensor record |

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tenmap_core::{DType, DenseArray, Element, TensorMap};

use crate::config::IoConfig;
use crate::error::{IoError, Result};
use crate::record::TensorRecord;

/// Magic bytes at the start of every archive
pub const MAGIC: &[u8; 4] = b"TMAP";

/// Current archive format version
pub const VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 1;

/// Element types that can be stored in an archive
pub trait ArchiveElement: Element + Serialize + DeserializeOwned {}

impl<T: Element + Serialize + DeserializeOwned> ArchiveElement for T {}

fn dtype_tag(dtype: DType) -> u8 {
    match dtype {
        DType::F32 => 1,
        DType::F64 => 2,
    }
}

fn dtype_from_tag(tag: u8) -> Result<DType> {
    match tag {
        1 => Ok(DType::F32),
        2 => Ok(DType::F64),
        other => Err(IoError::UnknownDType(other)),
    }
}

fn check_payload(size: u64, config: &IoConfig) -> Result<()> {
    if size > config.max_payload_bytes {
        return Err(IoError::PayloadTooLarge {
            size,
            limit: config.max_payload_bytes,
        });
    }
    Ok(())
}

/// Validate the header and return the payload
fn split_header<T: Element>(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.len() < HEADER_LEN {
        return Err(IoError::Truncated { len: bytes.len() });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&bytes[0..4]);
    if &magic != MAGIC {
        return Err(IoError::BadMagic { found: magic });
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[4..8]);
    let version = u32::from_le_bytes(version);
    if version != VERSION {
        return Err(IoError::UnsupportedVersion {
            found: version,
            supported: VERSION,
        });
    }

    let found = dtype_from_tag(bytes[8])?;
    if found != T::DTYPE {
        return Err(IoError::DTypeMismatch {
            expected: T::DTYPE,
            found,
        });
    }

    Ok(&bytes[HEADER_LEN..])
}

/// Encode a tensor map to an in-memory archive with the default configuration
pub fn save_buffer<T: ArchiveElement>(tensor: &TensorMap<DenseArray<T>>) -> Result<Vec<u8>> {
    save_buffer_with_config(tensor, &IoConfig::default())
}

/// Encode a tensor map to an in-memory archive
///
/// # Errors
///
/// Returns [`IoError::PayloadTooLarge`] if the encoded payload exceeds
/// `config.max_payload_bytes`.
pub fn save_buffer_with_config<T: ArchiveElement>(
    tensor: &TensorMap<DenseArray<T>>,
    config: &IoConfig,
) -> Result<Vec<u8>> {
    let record = TensorRecord::from_tensor(tensor);
    let payload = bincode::serde::encode_to_vec(&record, bincode::config::standard())?;
    check_payload(payload.len() as u64, config)?;

    let mut buffer = Vec::with_capacity(HEADER_LEN + payload.len());
    buffer.extend_from_slice(MAGIC);
    buffer.extend_from_slice(&VERSION.to_le_bytes());
    buffer.push(dtype_tag(T::DTYPE));
    buffer.extend_from_slice(&payload);

    tracing::debug!(
        dtype = %T::DTYPE,
        n_blocks = tensor.len(),
        bytes = buffer.len(),
        "encoded tensor map"
    );
    Ok(buffer)
}

/// Decode a tensor map from an in-memory archive with the default
/// configuration
pub fn load_buffer<T: ArchiveElement>(bytes: &[u8]) -> Result<TensorMap<DenseArray<T>>> {
    load_buffer_with_config(bytes, &IoConfig::default())
}

/// Decode a tensor map from an in-memory archive
///
/// The element type `T` must match the dtype stored in the archive. All
/// metadata is validated again while rebuilding the tensor map.
pub fn load_buffer_with_config<T: ArchiveElement>(
    bytes: &[u8],
    config: &IoConfig,
) -> Result<TensorMap<DenseArray<T>>> {
    let payload = split_header::<T>(bytes)?;
    check_payload(payload.len() as u64, config)?;

    let (record, read): (TensorRecord<T>, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    if read != payload.len() {
        return Err(IoError::TrailingBytes {
            trailing: payload.len() - read,
        });
    }

    let tensor = record.into_tensor()?;
    tracing::debug!(
        dtype = %T::DTYPE,
        n_blocks = tensor.len(),
        bytes = bytes.len(),
        "decoded tensor map"
    );
    Ok(tensor)
}

/// Save a tensor map to `path` with the default configuration
pub fn save<P: AsRef<Path>, T: ArchiveElement>(
    path: P,
    tensor: &TensorMap<DenseArray<T>>,
) -> Result<()> {
    save_with_config(path, tensor, &IoConfig::default())
}

/// Save a tensor map to `path`, overwriting any existing file
pub fn save_with_config<P: AsRef<Path>, T: ArchiveElement>(
    path: P,
    tensor: &TensorMap<DenseArray<T>>,
    config: &IoConfig,
) -> Result<()> {
    let buffer = save_buffer_with_config(tensor, config)?;

    let mut file = BufWriter::new(File::create(path.as_ref())?);
    file.write_all(&buffer)?;
    file.flush()?;

    tracing::debug!(path = %path.as_ref().display(), "saved tensor map");
    Ok(())
}

/// Load a tensor map from `path` with the default configuration
pub fn load<P: AsRef<Path>, T: ArchiveElement>(path: P) -> Result<TensorMap<DenseArray<T>>> {
    load_with_config(path, &IoConfig::default())
}

/// Load a tensor map from `path`
///
/// The file size is checked against `config.max_payload_bytes` before
/// reading it.
pub fn load_with_config<P: AsRef<Path>, T: ArchiveElement>(
    path: P,
    config: &IoConfig,
) -> Result<TensorMap<DenseArray<T>>> {
    let path = path.as_ref();
    let size = fs::metadata(path)?.len();
    check_payload(size.saturating_sub(HEADER_LEN as u64), config)?;

    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "loading tensor map");
    load_buffer_with_config(&bytes, config)
}
