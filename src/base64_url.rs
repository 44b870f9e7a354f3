//! URL-safe Base64 used for the outer token encoding.
//!
//! This is standard padded Base64 with three characters substituted so the
//! result can travel in a URL query string without escaping:
//!
//! | Standard | URL-safe |
//! |----------|----------|
//! | `+` | `*` |
//! | `/` | `-` |
//! | `=` | `_` |
//!
//! Note that this is *not* the RFC 4648 `base64url` alphabet.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::SigError;

/// Encodes bytes into the URL-safe alphabet.
///
/// # Example
///
/// ```
/// use tls_sig::base64_url;
///
/// assert_eq!(base64_url::encode(&[0xfb, 0xff]), "*-8_");
/// ```
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    STANDARD
        .encode(bytes)
        .chars()
        .map(|c| match c {
            '+' => '*',
            '/' => '-',
            '=' => '_',
            other => other,
        })
        .collect()
}

/// Decodes a URL-safe string back into bytes.
///
/// # Errors
///
/// Returns `SigError::Decoding` if the input is not valid Base64 after the
/// reverse substitution, or if it decodes to nothing.
///
/// # Example
///
/// ```
/// use tls_sig::base64_url;
///
/// assert_eq!(base64_url::decode("*-8_").unwrap(), vec![0xfb, 0xff]);
/// assert!(base64_url::decode("not base64!").is_err());
/// ```
pub fn decode(input: &str) -> Result<Vec<u8>, SigError> {
    let standard: String = input
        .chars()
        .map(|c| match c {
            '*' => '+',
            '-' => '/',
            '_' => '=',
            other => other,
        })
        .collect();

    let bytes = STANDARD
        .decode(standard)
        .map_err(|e| SigError::decoding(format!("base64: {e}")))?;

    if bytes.is_empty() {
        return Err(SigError::decoding("base64: input decodes to no data"));
    }

    Ok(bytes)
}
