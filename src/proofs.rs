//! Kani proof harnesses.
//!
//! # Running Proofs
//!
//! ```bash
//! cargo kani -p tls-sig
//! ```
//!
//! # Properties Verified
//!
//! | Category | Property | Harness |
//! |----------|----------|---------|
//! | Expiration | Never panics | `check_expiration_never_panics` |
//! | Expiration | Boundary second is valid | `last_second_is_valid` |
//! | Expiration | Later seconds fail | `after_expiry_always_fails` |
//! | Identifier | Matching succeeds | `matching_identifiers_succeed` |
//! | Identifier | Symmetric | `identifier_validation_symmetry` |
//! | sdkappid | Exact match only | `sdkappid_exact_match` |
//! | Userbuf | Fixed-size layout | `numeric_record_length` |
//! | Userbuf | Version byte tracks room kind | `version_byte_tracks_room` |

#![cfg(kani)]

use crate::userbuf::{PrivilegeRecord, Room};
use crate::verification::{check_expiration, validate_identifier, validate_sdkappid};

mod expiration_proofs {
    use super::*;

    #[kani::proof]
    fn check_expiration_never_panics() {
        let time: u64 = kani::any();
        let expire: u64 = kani::any();
        let now: u64 = kani::any();

        let _ = check_expiration(time, expire, now);
    }

    #[kani::proof]
    fn last_second_is_valid() {
        let time: u64 = kani::any();
        let expire: u64 = kani::any();
        kani::assume(time.checked_add(expire).is_some());

        assert!(check_expiration(time, expire, time + expire).is_ok());
    }

    #[kani::proof]
    fn after_expiry_always_fails() {
        let time: u64 = kani::any();
        let expire: u64 = kani::any();
        let late: u64 = kani::any();
        kani::assume(late > 0);

        if let Some(now) = time.checked_add(expire).and_then(|at| at.checked_add(late)) {
            assert!(check_expiration(time, expire, now).is_err());
        }
    }
}

mod identity_proofs {
    use super::*;

    #[kani::proof]
    #[kani::unwind(9)]
    fn matching_identifiers_succeed() {
        let data: [u8; 8] = kani::any();

        if let Ok(s) = std::str::from_utf8(&data) {
            assert!(validate_identifier(s, s).is_ok());
        }
    }

    #[kani::proof]
    #[kani::unwind(9)]
    fn identifier_validation_symmetry() {
        let a: [u8; 8] = kani::any();
        let b: [u8; 8] = kani::any();

        if let (Ok(str_a), Ok(str_b)) = (std::str::from_utf8(&a), std::str::from_utf8(&b)) {
            let ab = validate_identifier(str_a, str_b);
            let ba = validate_identifier(str_b, str_a);

            assert!(ab.is_ok() == ba.is_ok());
        }
    }

    #[kani::proof]
    fn sdkappid_exact_match() {
        let a: u64 = kani::any();
        let b: u64 = kani::any();

        assert!(validate_sdkappid(a, b).is_ok() == (a == b));
    }
}

mod userbuf_proofs {
    use super::*;

    #[kani::proof]
    #[kani::unwind(4)]
    fn numeric_record_length() {
        let record = PrivilegeRecord {
            identifier: "u1".to_string(),
            sdkappid: kani::any(),
            room: Room::Numeric(kani::any()),
            expire_at: kani::any(),
            privilege_map: kani::any(),
            account_type: 0,
        };

        if let Ok(bytes) = record.encode() {
            assert!(bytes.len() == 1 + 2 + 2 + 4 * 5);
            assert!(bytes[0] == 0);
        }
    }

    #[kani::proof]
    fn version_byte_tracks_room() {
        let id: u32 = kani::any();
        assert!(Room::Numeric(id).version() == 0);
        assert!(Room::Numeric(id).numeric_id() == id);
        assert!(Room::Named(String::new()).version() == 1);
        assert!(Room::Named(String::new()).numeric_id() == 0);
    }
}
