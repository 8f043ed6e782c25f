//! Codec configuration

/// Default limit on the encoded payload size: 1 GiB
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 1 << 30;

/// Configuration for saving and loading tensor maps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoConfig {
    /// Largest payload (everything after the header) accepted when saving or
    /// loading
    pub max_payload_bytes: u64,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl IoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum payload size in bytes
    pub fn max_payload_bytes(mut self, bytes: u64) -> Self {
        self.max_payload_bytes = bytes;
        self
    }
}
