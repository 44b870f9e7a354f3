//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use tls_sig::prelude::*;
//!
//! let service = TokenService::new(Credentials::new(1_400_000_000, "secret"));
//! let sig = service.generate("alice").unwrap();
//! assert!(service.verify(&sig, "alice").is_ok());
//! ```
//!
//! The codec-level items (`encode_token`, `TokenFields`, `MessageAuthenticator`)
//! are left out; most callers only need the service.

pub use crate::{
    // Service
    Credentials, RoomPrivilege, SecretKey, SigConfig, TokenService, VerifiedSig,
    // Privilege records
    PrivilegeRecord, Room, privilege,
    // Errors
    SigError,
};
