//! Configuration for a token service.

use std::time::Duration;

use flate2::Compression;

/// Default token lifetime: 180 days.
pub const DEFAULT_EXPIRE: Duration = Duration::from_secs(180 * 24 * 60 * 60);

/// Tunables for a [`TokenService`](crate::TokenService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigConfig {
    /// Lifetime used by [`TokenService::generate`](crate::TokenService::generate).
    ///
    /// Only whole seconds are encoded.
    /// Default: 180 days (15552000 seconds)
    pub default_expire: Duration,

    /// zlib compression level for the token document.
    ///
    /// Default: zlib's default level (6)
    pub compression: Compression,
}

impl Default for SigConfig {
    fn default() -> Self {
        Self {
            default_expire: DEFAULT_EXPIRE,
            compression: Compression::default(),
        }
    }
}

impl SigConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default lifetime.
    #[must_use]
    pub const fn with_default_expire(mut self, expire: Duration) -> Self {
        self.default_expire = expire;
        self
    }

    /// Sets the compression level (0-9).
    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression = Compression::new(level.min(9));
        self
    }
}
