//! UserSig token generation and verification.
//!
//! This crate issues and verifies the short-lived signatures a real-time
//! communication backend uses to authenticate users. A signature binds an
//! account identifier, an application id (`sdkappid`) and a validity window
//! with HMAC-SHA256 under a secret shared between the application server and
//! the backend. A signature may also carry a privilege record ("userbuf")
//! restricting the user to a room and a set of permissions.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tls_sig::{Credentials, RoomPrivilege, TokenService, privilege};
//!
//! let service = TokenService::new(Credentials::new(
//!     1_400_000_000,
//!     "5bd2850fff3ecb11d7c805251c51ee463a25727bddc2385f3fa8bfee1bb93b5e",
//! ));
//!
//! // Plain identity token, valid for the default 180 days
//! let sig = service.generate("xiaojun").unwrap();
//! let verified = service.verify(&sig, "xiaojun").unwrap();
//! assert_eq!(verified.expire, 15_552_000);
//!
//! // Token restricted to room 1234 with every permission
//! let key = service
//!     .generate_with_privilege(
//!         "xiaojun",
//!         Duration::from_secs(300),
//!         &RoomPrivilege::numeric(1234, privilege::ALL),
//!     )
//!     .unwrap();
//! let record = service.verify(&key, "xiaojun").unwrap().privilege().unwrap().unwrap();
//! assert_eq!(record.privilege_map, 255);
//! ```
//!
//! # Token Structure
//!
//! A token is the URL-safe Base64 (`+/=` mapped to `*-_`) of a zlib stream
//! wrapping a JSON document:
//!
//! | Key | Type | Meaning |
//! |-----|------|---------|
//! | `TLS.ver` | string | always `"2.0"` |
//! | `TLS.identifier` | string | account identifier |
//! | `TLS.sdkappid` | integer | application id |
//! | `TLS.expire` | integer | lifetime in seconds |
//! | `TLS.time` | integer | issue time, unix seconds |
//! | `TLS.userbuf` | string | optional Base64 privilege record |
//! | `TLS.sig` | string | Base64 HMAC-SHA256 |
//!
//! The HMAC covers the text
//! `TLS.identifier:{id}\nTLS.sdkappid:{app}\nTLS.time:{t}\nTLS.expire:{e}\n`,
//! followed by `TLS.userbuf:{b64}\n` when a privilege record is present.
//!
//! # Verification Order
//!
//! | Step | Failure reason |
//! |------|----------------|
//! | decode | codec error message |
//! | identifier | `identifier doesn't match` |
//! | sdkappid | `sdkappid doesn't match` |
//! | signature present | `sig field is missing` |
//! | expiry | `sig expired` |
//! | HMAC | `verify failed` |

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod authenticator;
pub mod base64_url;
mod codec;
mod config;
mod error;
mod fields;
mod keys;
pub mod prelude;
#[cfg(kani)]
mod proofs;
mod service;
mod userbuf;
mod verification;

pub use authenticator::{MessageAuthenticator, SignedContent};
pub use codec::{MAX_DOCUMENT_LEN, decode_token, encode_token};
pub use config::{DEFAULT_EXPIRE, SigConfig};
pub use error::SigError;
pub use fields::{TOKEN_VERSION, TokenFields};
pub use flate2::Compression;
pub use keys::{Credentials, SecretKey};
pub use service::{RoomPrivilege, TokenService, VerifiedSig};
pub use userbuf::{PrivilegeRecord, Room, VERSION_NAMED_ROOM, VERSION_NUMERIC_ROOM, privilege};
pub use verification::{
    check_expiration, check_signature_present, validate_identifier, validate_sdkappid,
};
