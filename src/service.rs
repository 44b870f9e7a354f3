//! Token service: generation and verification facade.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use tracing::{debug, trace};

use crate::authenticator::MessageAuthenticator;
use crate::codec::{decode_token, encode_token};
use crate::config::SigConfig;
use crate::error::SigError;
use crate::fields::TokenFields;
use crate::keys::Credentials;
use crate::userbuf::{PrivilegeRecord, Room};
use crate::verification::{
    check_expiration, check_signature_present, validate_identifier, validate_sdkappid,
};

/// Room-level permissions to embed in a token.
///
/// # Example
///
/// ```
/// use tls_sig::{RoomPrivilege, privilege};
///
/// let numeric = RoomPrivilege::numeric(1234, privilege::ALL);
/// let named = RoomPrivilege::named(
///     "standup",
///     privilege::ENTER_ROOM | privilege::RECV_AUDIO | privilege::RECV_VIDEO,
/// );
///
/// assert_eq!(named.privilege_map(), 42);
/// assert_eq!(numeric.room().numeric_id(), 1234);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPrivilege {
    room: Room,
    privilege_map: u32,
}

impl RoomPrivilege {
    /// Grants `privilege_map` in the room with a numeric id.
    #[must_use]
    pub const fn numeric(room_id: u32, privilege_map: u32) -> Self {
        Self {
            room: Room::Numeric(room_id),
            privilege_map,
        }
    }

    /// Grants `privilege_map` in the room with a string id.
    #[must_use]
    pub fn named(room: impl Into<String>, privilege_map: u32) -> Self {
        Self {
            room: Room::Named(room.into()),
            privilege_map,
        }
    }

    /// Returns the room.
    #[must_use]
    pub const fn room(&self) -> &Room {
        &self.room
    }

    /// Returns the permission bitmask.
    #[must_use]
    pub const fn privilege_map(&self) -> u32 {
        self.privilege_map
    }
}

/// Values recovered from a successfully verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSig {
    /// Issue time, unix seconds
    pub issued_at: u64,
    /// Lifetime in seconds
    pub expire: u64,
    /// Raw privilege record, if the token carried one
    pub userbuf: Option<Vec<u8>>,
}

impl VerifiedSig {
    /// Returns the last unix second at which the token is valid.
    #[must_use]
    pub const fn expires_at(&self) -> u64 {
        self.issued_at.saturating_add(self.expire)
    }

    /// Decodes the privilege record, if present.
    ///
    /// # Errors
    ///
    /// Returns `SigError::Decoding` if the userbuf is not a valid record.
    pub fn privilege(&self) -> Result<Option<PrivilegeRecord>, SigError> {
        self.userbuf
            .as_deref()
            .map(PrivilegeRecord::decode)
            .transpose()
    }
}

/// Generates and verifies tokens for one application.
///
/// The service owns immutable credentials and is cheap to share between
/// threads.
///
/// # Example
///
/// ```
/// use tls_sig::{Credentials, SigError, TokenService};
///
/// let service = TokenService::new(Credentials::new(1_400_000_000, "secret"));
///
/// let token = service.generate("alice").unwrap();
/// let verified = service.verify(&token, "alice").unwrap();
/// assert_eq!(verified.expire, 15_552_000);
///
/// let err = service.verify(&token, "bob").unwrap_err();
/// assert!(matches!(err, SigError::IdentifierMismatch { .. }));
/// assert_eq!(err.reason(), "identifier doesn't match");
/// ```
#[derive(Debug, Clone)]
pub struct TokenService {
    credentials: Credentials,
    config: SigConfig,
}

impl TokenService {
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, SigConfig::default())
    }

    /// Creates a service with a custom configuration.
    #[must_use]
    pub const fn with_config(credentials: Credentials, config: SigConfig) -> Self {
        Self {
            credentials,
            config,
        }
    }

    /// Returns the application id tokens are issued for.
    #[must_use]
    pub const fn sdkappid(&self) -> u64 {
        self.credentials.sdkappid()
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SigConfig {
        &self.config
    }

    /// Generates an identity token with the configured default lifetime.
    ///
    /// # Errors
    ///
    /// Returns `SigError` if any encoding step fails.
    pub fn generate(&self, identifier: &str) -> Result<String, SigError> {
        self.generate_with_expire(identifier, self.config.default_expire)
    }

    /// Generates an identity token with a custom lifetime.
    ///
    /// # Errors
    ///
    /// Returns `SigError` if any encoding step fails.
    pub fn generate_with_expire(
        &self,
        identifier: &str,
        expire: Duration,
    ) -> Result<String, SigError> {
        self.generate_at(identifier, expire, None, unix_now())
    }

    /// Generates a token carrying room-level permissions.
    ///
    /// # Errors
    ///
    /// Returns `SigError::Encoding` if the identifier, room string, sdkappid
    /// or absolute expiry do not fit the privilege record, or any other
    /// `SigError` from the encoding steps.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use tls_sig::{Credentials, RoomPrivilege, Room, TokenService};
    ///
    /// let service = TokenService::new(Credentials::new(1_400_000_000, "secret"));
    /// let token = service
    ///     .generate_with_privilege("u1", Duration::from_secs(300), &RoomPrivilege::numeric(123, 255))
    ///     .unwrap();
    ///
    /// let record = service.verify(&token, "u1").unwrap().privilege().unwrap().unwrap();
    /// assert_eq!(record.room, Room::Numeric(123));
    /// assert_eq!(record.privilege_map, 255);
    /// ```
    pub fn generate_with_privilege(
        &self,
        identifier: &str,
        expire: Duration,
        privilege: &RoomPrivilege,
    ) -> Result<String, SigError> {
        self.generate_at(identifier, expire, Some(privilege), unix_now())
    }

    /// Generates a token as if issued at `issued_at` (unix seconds).
    ///
    /// `TLS.time` and the privilege record's absolute expiry are both derived
    /// from `issued_at`. Sub-second parts of `expire` are dropped.
    ///
    /// # Errors
    ///
    /// Returns `SigError` if any encoding step fails.
    pub fn generate_at(
        &self,
        identifier: &str,
        expire: Duration,
        privilege: Option<&RoomPrivilege>,
        issued_at: u64,
    ) -> Result<String, SigError> {
        let expire = expire.as_secs();

        let userbuf = privilege
            .map(|p| {
                PrivilegeRecord::new(
                    identifier,
                    self.sdkappid(),
                    p.room.clone(),
                    expire,
                    issued_at,
                    p.privilege_map,
                )?
                .encode()
            })
            .transpose()?;

        let auth = MessageAuthenticator::new(self.credentials.key());
        let fields = TokenFields::signed(
            &auth,
            identifier,
            self.sdkappid(),
            expire,
            issued_at,
            userbuf.as_deref(),
        )?;

        let token = encode_token(&fields, self.config.compression)?;
        trace!(
            identifier,
            sdkappid = self.sdkappid(),
            expire,
            issued_at,
            privileged = privilege.is_some(),
            "generated token"
        );

        Ok(token)
    }

    /// Verifies a token against the current time.
    ///
    /// # Errors
    ///
    /// Returns the first failing step as a `SigError`; see
    /// [`verify_at`](Self::verify_at).
    pub fn verify(&self, token: &str, identifier: &str) -> Result<VerifiedSig, SigError> {
        self.verify_at(token, identifier, unix_now())
    }

    /// Verifies a token as of `now` (unix seconds).
    ///
    /// Checks run in order and stop at the first failure:
    /// 1. decode the token (`Decoding`, `Compression`, `Serialization`)
    /// 2. identifier matches `identifier` (`IdentifierMismatch`)
    /// 3. sdkappid matches this service (`SdkAppIdMismatch`)
    /// 4. a signature is present (`MissingSignature`)
    /// 5. `now <= time + expire` (`Expired`)
    /// 6. the signature matches (`SignatureMismatch`)
    /// 7. the userbuf, if any, is valid Base64 (`Decoding`)
    ///
    /// # Errors
    ///
    /// Returns the `SigError` of the first failing check.
    pub fn verify_at(
        &self,
        token: &str,
        identifier: &str,
        now: u64,
    ) -> Result<VerifiedSig, SigError> {
        self.check(token, identifier, now).inspect_err(|err| {
            debug!(identifier, sdkappid = self.sdkappid(), reason = %err, "token rejected");
        })
    }

    fn check(&self, token: &str, identifier: &str, now: u64) -> Result<VerifiedSig, SigError> {
        let fields = decode_token(token)?;

        validate_identifier(identifier, &fields.identifier)?;
        validate_sdkappid(self.sdkappid(), fields.sdkappid)?;
        check_signature_present(&fields.sig)?;
        check_expiration(fields.time, fields.expire, now)?;

        let auth = MessageAuthenticator::new(self.credentials.key());
        if !auth.verify(&fields.signed_content(), &fields.sig) {
            return Err(SigError::SignatureMismatch);
        }

        let userbuf = fields
            .userbuf
            .as_deref()
            .map(|b64| {
                STANDARD
                    .decode(b64)
                    .map_err(|e| SigError::decoding(format!("userbuf base64: {e}")))
            })
            .transpose()?;

        Ok(VerifiedSig {
            issued_at: fields.time,
            expire: fields.expire,
            userbuf,
        })
    }
}

/// Current unix time in whole seconds; clocks before the epoch read as 0.
fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
