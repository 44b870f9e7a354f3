//! Error types for signature generation and verification.

use std::fmt;

/// Errors that can occur while generating or verifying a signature.
///
/// The first five variants come from the codec layers and carry a short
/// description of what went wrong. The remaining variants are semantic
/// rejections produced by [`TokenService::verify`](crate::TokenService::verify);
/// their `Display` output is the stable reason string reported to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigError {
    /// A value could not be encoded into its wire representation.
    Encoding {
        /// Description of the encoding error
        reason: String,
    },
    /// The token or one of its fields is not valid Base64 or binary data.
    Decoding {
        /// Description of the decoding error
        reason: String,
    },
    /// The signed document could not be serialized or parsed.
    Serialization {
        /// Description of the serialization error
        reason: String,
    },
    /// The signed document could not be compressed or decompressed.
    Compression {
        /// Description of the compression error
        reason: String,
    },
    /// The HMAC could not be computed.
    Signing {
        /// Description of the signing error
        reason: String,
    },
    /// Identifier in the token does not match the expected identifier.
    IdentifierMismatch {
        /// Identifier carried by the token
        token_identifier: String,
        /// Identifier the caller expected
        expected_identifier: String,
    },
    /// Application id in the token does not match the service.
    SdkAppIdMismatch {
        /// Application id carried by the token
        token_sdkappid: u64,
        /// Application id of the verifying service
        expected_sdkappid: u64,
    },
    /// The token carries no signature.
    MissingSignature,
    /// The token is past its validity window.
    Expired {
        /// Unix time (seconds) at which the token expired
        expired_at: u64,
    },
    /// The signature does not match the token contents.
    SignatureMismatch,
}

impl SigError {
    /// Creates an `Encoding` error.
    #[must_use]
    pub fn encoding(reason: impl Into<String>) -> Self {
        Self::Encoding {
            reason: reason.into(),
        }
    }

    /// Creates a `Decoding` error.
    #[must_use]
    pub fn decoding(reason: impl Into<String>) -> Self {
        Self::Decoding {
            reason: reason.into(),
        }
    }

    /// Creates a `Serialization` error.
    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Creates a `Compression` error.
    #[must_use]
    pub fn compression(reason: impl Into<String>) -> Self {
        Self::Compression {
            reason: reason.into(),
        }
    }

    /// Creates a `Signing` error.
    #[must_use]
    pub fn signing(reason: impl Into<String>) -> Self {
        Self::Signing {
            reason: reason.into(),
        }
    }

    /// Returns true if the token was well-formed but rejected by one of the
    /// verification checks.
    #[must_use]
    pub const fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::IdentifierMismatch { .. }
                | Self::SdkAppIdMismatch { .. }
                | Self::MissingSignature
                | Self::Expired { .. }
                | Self::SignatureMismatch
        )
    }

    /// Returns true if the token was rejected because it expired.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    /// Returns the human-readable failure reason.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding { reason } => write!(f, "encoding error: {reason}"),
            Self::Decoding { reason } => write!(f, "decode error: {reason}"),
            Self::Serialization { reason } => write!(f, "json error: {reason}"),
            Self::Compression { reason } => write!(f, "zlib error: {reason}"),
            Self::Signing { reason } => write!(f, "hmac error: {reason}"),
            Self::IdentifierMismatch { .. } => write!(f, "identifier doesn't match"),
            Self::SdkAppIdMismatch { .. } => write!(f, "sdkappid doesn't match"),
            Self::MissingSignature => write!(f, "sig field is missing"),
            Self::Expired { .. } => write!(f, "sig expired"),
            Self::SignatureMismatch => write!(f, "verify failed"),
        }
    }
}

impl std::error::Error for SigError {}
