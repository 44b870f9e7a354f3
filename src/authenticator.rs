//! HMAC-SHA256 over the canonical field text.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SigError;
use crate::keys::SecretKey;

type HmacSha256 = Hmac<Sha256>;

/// The fields covered by the signature.
///
/// `Display` renders the canonical text that is authenticated:
///
/// ```text
/// TLS.identifier:{identifier}\n
/// TLS.sdkappid:{sdkappid}\n
/// TLS.time:{time}\n
/// TLS.expire:{expire}\n
/// TLS.userbuf:{userbuf}\n      (only when a userbuf is present)
/// ```
///
/// Signer and verifier must render exactly the same lines in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedContent<'a> {
    /// Account identifier
    pub identifier: &'a str,
    /// Application id
    pub sdkappid: u64,
    /// Issue time, unix seconds
    pub time: u64,
    /// Lifetime in seconds
    pub expire: u64,
    /// Base64 (standard alphabet) userbuf, if any
    pub userbuf: Option<&'a str>,
}

impl fmt::Display for SignedContent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TLS.identifier:{}", self.identifier)?;
        writeln!(f, "TLS.sdkappid:{}", self.sdkappid)?;
        writeln!(f, "TLS.time:{}", self.time)?;
        writeln!(f, "TLS.expire:{}", self.expire)?;
        if let Some(userbuf) = self.userbuf {
            writeln!(f, "TLS.userbuf:{userbuf}")?;
        }
        Ok(())
    }
}

/// Computes and checks `TLS.sig` values with a shared secret.
///
/// # Example
///
/// ```
/// use tls_sig::{MessageAuthenticator, SecretKey, SignedContent};
///
/// let key = SecretKey::from("secret");
/// let auth = MessageAuthenticator::new(&key);
///
/// let content = SignedContent {
///     identifier: "alice",
///     sdkappid: 1_400_000_000,
///     time: 1_700_000_000,
///     expire: 86_400,
///     userbuf: None,
/// };
///
/// let sig = auth.sign(&content).unwrap();
/// assert!(auth.verify(&content, &sig));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MessageAuthenticator<'a> {
    key: &'a SecretKey,
}

impl<'a> MessageAuthenticator<'a> {
    /// Creates an authenticator keyed by `key`.
    #[must_use]
    pub const fn new(key: &'a SecretKey) -> Self {
        Self { key }
    }

    /// Signs the canonical text and returns the digest as standard Base64.
    ///
    /// # Errors
    ///
    /// Returns `SigError::Signing` if the MAC cannot be keyed.
    pub fn sign(&self, content: &SignedContent<'_>) -> Result<String, SigError> {
        let mac = self.mac(content)?;
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Returns true if `sig` is the signature of `content`.
    ///
    /// The digest comparison runs in constant time. A `sig` that is not
    /// canonical standard Base64 never verifies.
    #[must_use]
    pub fn verify(&self, content: &SignedContent<'_>, sig: &str) -> bool {
        let Ok(presented) = STANDARD.decode(sig) else {
            return false;
        };

        self.mac(content)
            .is_ok_and(|mac| mac.verify_slice(&presented).is_ok())
    }

    fn mac(&self, content: &SignedContent<'_>) -> Result<HmacSha256, SigError> {
        let mut mac = HmacSha256::new_from_slice(self.key.as_bytes())
            .map_err(|e| SigError::signing(e.to_string()))?;
        mac.update(content.to_string().as_bytes());
        Ok(mac)
    }
}
