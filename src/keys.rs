//! Shared secret and application credentials.

use rand::RngCore;

/// The shared secret used to key the HMAC.
///
/// The key is opaque bytes. Keys issued by the backend console are hex
/// strings and are used as their ASCII bytes, not hex-decoded.
///
/// # Example
///
/// ```
/// use tls_sig::SecretKey;
///
/// let key = SecretKey::from("5bd2850fff3ecb11d7c805251c51ee463a25727bddc2385f3fa8bfee1bb93b5e");
/// assert_eq!(key.as_bytes().len(), 64);
///
/// // Debug output never shows key material
/// assert!(!format!("{key:?}").contains("5bd2"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    inner: Vec<u8>,
}

impl SecretKey {
    /// Creates a key from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: bytes.into(),
        }
    }

    /// Generates a random key: 32 random bytes rendered as 64 lowercase hex
    /// characters, matching the format handed out by the console.
    #[must_use]
    pub fn generate() -> Self {
        let mut raw = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut raw);

        Self::new(hex::encode(raw))
    }

    /// Returns the key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the key is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([REDACTED; {} bytes])", self.inner.len())
    }
}

/// Application id and secret key a [`TokenService`](crate::TokenService) signs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    sdkappid: u64,
    key: SecretKey,
}

impl Credentials {
    /// Creates credentials for an application.
    #[must_use]
    pub fn new(sdkappid: u64, key: impl Into<SecretKey>) -> Self {
        Self {
            sdkappid,
            key: key.into(),
        }
    }

    /// Returns the application id.
    #[must_use]
    pub const fn sdkappid(&self) -> u64 {
        self.sdkappid
    }

    /// Returns the secret key.
    #[must_use]
    pub const fn key(&self) -> &SecretKey {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_unique_hex() {
        let key1 = SecretKey::generate();
        let key2 = SecretKey::generate();

        assert_ne!(key1, key2);
        assert_eq!(key1.len(), 64);
        assert!(key1.as_bytes().iter().all(u8::is_ascii_hexdigit));
    }

    #[test]
    fn string_key_uses_ascii_bytes() {
        let key = SecretKey::from("abc");
        assert_eq!(key.as_bytes(), b"abc");
    }

    #[test]
    fn debug_redacts_key() {
        let creds = Credentials::new(1_400_000_000, "topsecret");
        let debug_output = format!("{creds:?}");

        assert!(debug_output.contains("1400000000"));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("topsecret"));
    }
}
