//! Pure verification checks.
//!
//! Each function is one step of the verification chain run by
//! [`TokenService::verify_at`](crate::TokenService::verify_at). They take
//! plain values, do no I/O and never panic, so they can be tested in
//! isolation and checked by the Kani harnesses in `proofs.rs`.
//!
//! | Function | Property |
//! |----------|----------|
//! | [`validate_identifier`] | Token identifier equals the expected one (exact, case-sensitive) |
//! | [`validate_sdkappid`] | Token application id equals the service's |
//! | [`check_signature_present`] | Token carries a non-empty signature |
//! | [`check_expiration`] | Current time is at or before `time + expire` |

use crate::error::SigError;

/// Validates that the token identifier matches the expected identifier.
///
/// # Errors
///
/// Returns `SigError::IdentifierMismatch` if the two differ in any byte.
///
/// # Examples
///
/// ```
/// use tls_sig::validate_identifier;
///
/// assert!(validate_identifier("alice", "alice").is_ok());
/// assert!(validate_identifier("alice", "Alice").is_err());
/// ```
pub fn validate_identifier(expected: &str, token_identifier: &str) -> Result<(), SigError> {
    if expected == token_identifier {
        Ok(())
    } else {
        Err(SigError::IdentifierMismatch {
            token_identifier: token_identifier.to_string(),
            expected_identifier: expected.to_string(),
        })
    }
}

/// Validates that the token was issued for the expected application.
///
/// # Errors
///
/// Returns `SigError::SdkAppIdMismatch` if the ids differ.
pub fn validate_sdkappid(expected: u64, token_sdkappid: u64) -> Result<(), SigError> {
    if expected == token_sdkappid {
        Ok(())
    } else {
        Err(SigError::SdkAppIdMismatch {
            token_sdkappid,
            expected_sdkappid: expected,
        })
    }
}

/// Checks that the token carries a signature.
///
/// # Errors
///
/// Returns `SigError::MissingSignature` if `sig` is empty.
pub fn check_signature_present(sig: &str) -> Result<(), SigError> {
    if sig.is_empty() {
        Err(SigError::MissingSignature)
    } else {
        Ok(())
    }
}

/// Checks whether a token issued at `time` with lifetime `expire` is still
/// valid at `now`.
///
/// The last valid second is `time + expire` itself.
///
/// # Errors
///
/// Returns `SigError::Expired` if `now > time + expire`.
///
/// # Examples
///
/// ```
/// use tls_sig::check_expiration;
///
/// assert!(check_expiration(1_000, 60, 1_060).is_ok()); // boundary is valid
/// assert!(check_expiration(1_000, 60, 1_061).is_err());
/// ```
pub fn check_expiration(time: u64, expire: u64, now: u64) -> Result<(), SigError> {
    let expires_at = time.saturating_add(expire);
    if now > expires_at {
        Err(SigError::Expired {
            expired_at: expires_at,
        })
    } else {
        Ok(())
    }
}
