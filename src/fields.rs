//! The signed document carried inside a token.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::authenticator::{MessageAuthenticator, SignedContent};
use crate::error::SigError;

/// Document format version written to `TLS.ver`.
pub const TOKEN_VERSION: &str = "2.0";

/// Fields of a token document.
///
/// Serialized as a JSON object with `TLS.`-prefixed keys, in declaration
/// order. Decoding ignores unknown keys. `TLS.sig` may be absent, in which
/// case `sig` is empty and verification reports the missing signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFields {
    /// Document version
    #[serde(rename = "TLS.ver")]
    pub version: String,
    /// Account identifier
    #[serde(rename = "TLS.identifier")]
    pub identifier: String,
    /// Application id
    #[serde(rename = "TLS.sdkappid")]
    pub sdkappid: u64,
    /// Lifetime in seconds
    #[serde(rename = "TLS.expire")]
    pub expire: u64,
    /// Issue time, unix seconds
    #[serde(rename = "TLS.time")]
    pub time: u64,
    /// Base64 (standard alphabet) privilege record
    #[serde(
        rename = "TLS.userbuf",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub userbuf: Option<String>,
    /// Base64 (standard alphabet) HMAC-SHA256 signature
    #[serde(rename = "TLS.sig", default)]
    pub sig: String,
}

impl TokenFields {
    /// Builds and signs a document.
    ///
    /// `userbuf` is the raw privilege record; it is Base64-encoded into
    /// `TLS.userbuf` and covered by the signature.
    ///
    /// # Errors
    ///
    /// Returns `SigError::Signing` if the signature cannot be computed.
    pub fn signed(
        auth: &MessageAuthenticator<'_>,
        identifier: impl Into<String>,
        sdkappid: u64,
        expire: u64,
        time: u64,
        userbuf: Option<&[u8]>,
    ) -> Result<Self, SigError> {
        let mut fields = Self {
            version: TOKEN_VERSION.to_string(),
            identifier: identifier.into(),
            sdkappid,
            expire,
            time,
            userbuf: userbuf.map(|buf| STANDARD.encode(buf)),
            sig: String::new(),
        };
        fields.sig = auth.sign(&fields.signed_content())?;

        Ok(fields)
    }

    /// Returns the content the signature covers.
    #[must_use]
    pub fn signed_content(&self) -> SignedContent<'_> {
        SignedContent {
            identifier: &self.identifier,
            sdkappid: self.sdkappid,
            time: self.time,
            expire: self.expire,
            userbuf: self.userbuf.as_deref(),
        }
    }

    /// Returns the unix time after which the token is expired, saturating at
    /// `u64::MAX`.
    #[must_use]
    pub const fn expires_at(&self) -> u64 {
        self.time.saturating_add(self.expire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SecretKey;

    fn sample(userbuf: Option<&[u8]>) -> TokenFields {
        let key = SecretKey::from("k");
        let auth = MessageAuthenticator::new(&key);
        TokenFields::signed(&auth, "alice", 1_400_000_000, 3600, 1_700_000_000, userbuf).unwrap()
    }

    #[test]
    fn json_uses_tls_keys_in_order() {
        let json = serde_json::to_string(&sample(None)).unwrap();

        let ver = json.find("\"TLS.ver\":\"2.0\"").unwrap();
        let id = json.find("\"TLS.identifier\":\"alice\"").unwrap();
        let app = json.find("\"TLS.sdkappid\":1400000000").unwrap();
        let expire = json.find("\"TLS.expire\":3600").unwrap();
        let time = json.find("\"TLS.time\":1700000000").unwrap();
        let sig = json.find("\"TLS.sig\":").unwrap();

        assert!(ver < id && id < app && app < expire && expire < time && time < sig);
        assert!(!json.contains("TLS.userbuf"));
    }

    #[test]
    fn userbuf_is_base64_encoded() {
        let fields = sample(Some(&[0, 1, 2]));
        assert_eq!(fields.userbuf.as_deref(), Some("AAEC"));
    }

    #[test]
    fn signature_covers_userbuf() {
        assert_ne!(sample(None).sig, sample(Some(&[0])).sig);
    }

    #[test]
    fn missing_sig_decodes_as_empty() {
        let json = r#"{"TLS.ver":"2.0","TLS.identifier":"a","TLS.sdkappid":1,"TLS.expire":1,"TLS.time":1}"#;
        let fields: TokenFields = serde_json::from_str(json).unwrap();

        assert!(fields.sig.is_empty());
        assert!(fields.userbuf.is_none());
    }

    #[test]
    fn missing_required_key_fails() {
        let json = r#"{"TLS.ver":"2.0","TLS.sdkappid":1,"TLS.expire":1,"TLS.time":1,"TLS.sig":"x"}"#;
        assert!(serde_json::from_str::<TokenFields>(json).is_err());
    }

    #[test]
    fn expires_at_saturates() {
        let mut fields = sample(None);
        assert_eq!(fields.expires_at(), 1_700_003_600);

        fields.expire = u64::MAX;
        assert_eq!(fields.expires_at(), u64::MAX);
    }
}
