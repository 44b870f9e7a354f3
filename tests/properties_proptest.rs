//! Property-based tests for token generation and verification.
//!
//! These tests generate random identities, lifetimes and privilege records
//! and check that every issued token verifies for exactly the identity and
//! application it was issued to.

use std::time::Duration;

use proptest::prelude::*;

use tls_sig::{
    Credentials, PrivilegeRecord, Room, RoomPrivilege, SigError, TokenService, base64_url,
    decode_token,
};

const T0: u64 = 1_700_000_000;

/// Strategies for generating token inputs.
mod strategies {
    use super::*;

    /// Identifiers, including non-ASCII and JSON-escaped characters.
    pub fn identifier() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z0-9_@.-]{1,32}",
            "\\PC{1,16}",
            Just("quote\"back\\slash/".to_string()),
            ("[a-c]{1,3}", 100usize..2_000).prop_map(|(unit, n)| unit.repeat(n)),
        ]
    }

    /// Application ids that fit the 32-bit privilege record field.
    pub fn sdkappid() -> impl Strategy<Value = u64> {
        1u64..=u64::from(u32::MAX)
    }

    /// Lifetimes from one second to ten years.
    pub fn expire() -> impl Strategy<Value = u64> {
        1u64..=315_360_000
    }

    /// Secret keys of arbitrary length, including empty.
    pub fn key() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(any::<u8>(), 0..64)
    }

    pub fn room() -> impl Strategy<Value = RoomPrivilege> {
        prop_oneof![
            (any::<u32>(), any::<u32>()).prop_map(|(id, map)| RoomPrivilege::numeric(id, map)),
            ("\\PC{0,24}", any::<u32>()).prop_map(|(name, map)| RoomPrivilege::named(name, map)),
        ]
    }
}

fn service(sdkappid: u64, key: Vec<u8>) -> TokenService {
    TokenService::new(Credentials::new(sdkappid, key))
}

proptest! {
    #[test]
    fn issued_tokens_verify(
        identifier in strategies::identifier(),
        sdkappid in strategies::sdkappid(),
        expire in strategies::expire(),
        key in strategies::key(),
    ) {
        let service = service(sdkappid, key);
        let token = service
            .generate_at(&identifier, Duration::from_secs(expire), None, T0)
            .unwrap();

        let verified = service.verify_at(&token, &identifier, T0 + expire).unwrap();

        prop_assert_eq!(verified.issued_at, T0);
        prop_assert_eq!(verified.expire, expire);
        prop_assert!(verified.userbuf.is_none());
    }

    #[test]
    fn tokens_are_url_safe(
        identifier in strategies::identifier(),
        sdkappid in strategies::sdkappid(),
    ) {
        let token = service(sdkappid, b"secret".to_vec()).generate(&identifier).unwrap();

        prop_assert!(token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'*' | b'-' | b'_')));
    }

    #[test]
    fn tokens_are_bound_to_identifier(
        identifier in strategies::identifier(),
        other in strategies::identifier(),
        sdkappid in strategies::sdkappid(),
    ) {
        prop_assume!(identifier != other);
        let service = service(sdkappid, b"secret".to_vec());
        let token = service
            .generate_at(&identifier, Duration::from_secs(60), None, T0)
            .unwrap();

        let err = service.verify_at(&token, &other, T0).unwrap_err();

        let is_identifier_mismatch = matches!(err, SigError::IdentifierMismatch { .. });
        prop_assert!(is_identifier_mismatch);
    }

    #[test]
    fn tokens_are_bound_to_key(
        key in strategies::key(),
        other in strategies::key(),
    ) {
        // HMAC zero-pads short keys, so trailing zeros do not change the key
        let trim = |k: &[u8]| k.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        prop_assume!(key[..trim(&key)] != other[..trim(&other)]);
        let token = service(1_400_000_000, key)
            .generate_at("alice", Duration::from_secs(60), None, T0)
            .unwrap();

        let err = service(1_400_000_000, other)
            .verify_at(&token, "alice", T0)
            .unwrap_err();

        prop_assert_eq!(err, SigError::SignatureMismatch);
    }

    #[test]
    fn privilege_records_round_trip(
        identifier in "[a-z0-9_]{1,24}",
        sdkappid in strategies::sdkappid(),
        expire in 1u64..=86_400,
        room in strategies::room(),
    ) {
        let service = service(sdkappid, b"secret".to_vec());
        let token = service
            .generate_at(&identifier, Duration::from_secs(expire), Some(&room), T0)
            .unwrap();

        let verified = service.verify_at(&token, &identifier, T0).unwrap();
        let record = verified.privilege().unwrap().unwrap();

        prop_assert_eq!(&record.identifier, &identifier);
        prop_assert_eq!(u64::from(record.sdkappid), sdkappid);
        prop_assert_eq!(u64::from(record.expire_at), T0 + expire);
        prop_assert_eq!(&record.room, room.room());
        prop_assert_eq!(record.privilege_map, room.privilege_map());
        prop_assert_eq!(record.account_type, 0);
    }

    #[test]
    fn privilege_record_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = PrivilegeRecord::decode(&bytes);
    }

    #[test]
    fn numeric_record_layout_is_fixed(
        identifier in "[a-z]{0,16}",
        id in any::<u32>(),
        map in any::<u32>(),
    ) {
        let record = PrivilegeRecord::new(&identifier, 1, Room::Numeric(id), 60, T0, map).unwrap();
        let bytes = record.encode().unwrap();

        prop_assert_eq!(bytes.len(), 1 + 2 + identifier.len() + 4 * 5);
        prop_assert_eq!(bytes[0], 0);
    }

    #[test]
    fn url_safe_base64_round_trips(bytes in prop::collection::vec(any::<u8>(), 1..128)) {
        let encoded = base64_url::encode(&bytes);

        prop_assert!(!encoded.contains(['+', '/', '=']));
        prop_assert_eq!(base64_url::decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn decoding_arbitrary_text_never_panics(token in "[A-Za-z0-9*_-]{0,200}") {
        let _ = decode_token(&token);
        let _ = service(1, b"k".to_vec()).verify_at(&token, "alice", T0);
    }
}
