//! Token wire format: JSON document, zlib, URL-safe Base64.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use tracing::trace;

use crate::base64_url;
use crate::error::SigError;
use crate::fields::TokenFields;

/// Upper bound on the decompressed document size.
///
/// Real documents are a few hundred bytes; the cap keeps a hostile token
/// from inflating into a large allocation.
pub const MAX_DOCUMENT_LEN: usize = 64 * 1024;

/// Encodes signed fields into a token string.
///
/// # Errors
///
/// Returns `SigError::Serialization` if the document cannot be serialized
/// and `SigError::Compression` if compression fails.
pub fn encode_token(fields: &TokenFields, level: Compression) -> Result<String, SigError> {
    let json = serde_json::to_vec(fields).map_err(|e| SigError::serialization(e.to_string()))?;

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(json.len()), level);
    encoder
        .write_all(&json)
        .map_err(|e| SigError::compression(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| SigError::compression(e.to_string()))?;

    trace!(
        document_len = json.len(),
        compressed_len = compressed.len(),
        "encoded token"
    );

    Ok(base64_url::encode(&compressed))
}

/// Decodes a token string into its raw fields.
///
/// No identity, expiry or signature checks happen here; see
/// [`TokenService::verify`](crate::TokenService::verify).
///
/// # Errors
///
/// Returns `SigError::Decoding` for malformed URL-safe Base64,
/// `SigError::Compression` if the payload is not a zlib stream, and
/// `SigError::Serialization` if the document is not a valid token document.
pub fn decode_token(token: &str) -> Result<TokenFields, SigError> {
    let compressed = base64_url::decode(token)?;
    let json = inflate(&compressed)?;

    trace!(document_len = json.len(), "decompressed token");

    serde_json::from_slice(&json).map_err(|e| SigError::serialization(e.to_string()))
}

/// Inflates a complete zlib stream.
///
/// The stream must end with its Adler-32 trailer and nothing after it.
fn inflate(compressed: &[u8]) -> Result<Vec<u8>, SigError> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(compressed.len().saturating_mul(4).min(MAX_DOCUMENT_LEN));

    loop {
        let offset = input_consumed(&inflater, compressed.len());
        let produced = out.len();

        // Streaming mode; `Finish` would make miniz give up once `out` fills
        let status = inflater
            .decompress_vec(&compressed[offset..], &mut out, FlushDecompress::None)
            .map_err(|e| SigError::compression(e.to_string()))?;

        if matches!(status, Status::StreamEnd) {
            break;
        }

        if out.len() == out.capacity() {
            if out.len() >= MAX_DOCUMENT_LEN {
                return Err(document_too_large());
            }
            out.reserve(out.len().max(256).min(MAX_DOCUMENT_LEN - out.len()));
            continue;
        }

        let now_consumed = input_consumed(&inflater, compressed.len());
        let stalled = out.len() == produced && now_consumed == offset;
        if stalled || now_consumed == compressed.len() {
            return Err(SigError::compression("truncated zlib stream"));
        }
    }

    if out.len() > MAX_DOCUMENT_LEN {
        return Err(document_too_large());
    }

    if input_consumed(&inflater, compressed.len()) != compressed.len() {
        return Err(SigError::compression("trailing data after zlib stream"));
    }

    Ok(out)
}

fn input_consumed(inflater: &Decompress, len: usize) -> usize {
    usize::try_from(inflater.total_in()).map_or(len, |n| n.min(len))
}

fn document_too_large() -> SigError {
    SigError::compression(format!("document exceeds {MAX_DOCUMENT_LEN} bytes"))
}
