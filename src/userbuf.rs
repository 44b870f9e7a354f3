//! Binary privilege record ("userbuf") carried inside privilege map keys.
//!
//! # Layout
//!
//! All integers are big-endian.
//!
//! ```text
//! [version:1][idLen:2][idBytes][sdkappid:4][roomId:4][absExpire:4][privilegeMap:4][accountType:4]
//! version = 1 only: [roomStrLen:2][roomStrBytes]
//! ```
//!
//! Version 0 identifies the room by `roomId`. Version 1 identifies it by the
//! trailing room string and writes `roomId` as 0.

use std::fmt;

use crate::error::SigError;

/// Record version for numeric room ids.
pub const VERSION_NUMERIC_ROOM: u8 = 0;

/// Record version for string room ids.
pub const VERSION_NAMED_ROOM: u8 = 1;

/// Permission bits of the privilege map.
///
/// The map is a plain integer; these constants name the eight bits the
/// backend currently interprets.
pub mod privilege {
    /// Create the room.
    pub const CREATE_ROOM: u32 = 1;
    /// Enter the room.
    pub const ENTER_ROOM: u32 = 1 << 1;
    /// Send audio.
    pub const SEND_AUDIO: u32 = 1 << 2;
    /// Receive audio.
    pub const RECV_AUDIO: u32 = 1 << 3;
    /// Send video.
    pub const SEND_VIDEO: u32 = 1 << 4;
    /// Receive video.
    pub const RECV_VIDEO: u32 = 1 << 5;
    /// Send the auxiliary (screen sharing) video stream.
    pub const SEND_SUB_VIDEO: u32 = 1 << 6;
    /// Receive the auxiliary (screen sharing) video stream.
    pub const RECV_SUB_VIDEO: u32 = 1 << 7;
    /// Every permission above.
    pub const ALL: u32 = 0xff;
}

/// Room a privilege record applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Room {
    /// Numeric room id.
    Numeric(u32),
    /// String room id.
    Named(String),
}

impl Room {
    /// Returns the numeric id written to the `roomId` field.
    #[must_use]
    pub const fn numeric_id(&self) -> u32 {
        match self {
            Self::Numeric(id) => *id,
            Self::Named(_) => 0,
        }
    }

    /// Returns the room string, if this is a named room.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Numeric(_) => None,
            Self::Named(name) => Some(name),
        }
    }

    /// Returns the record version this room is encoded with.
    #[must_use]
    pub const fn version(&self) -> u8 {
        match self {
            Self::Numeric(_) => VERSION_NUMERIC_ROOM,
            Self::Named(_) => VERSION_NAMED_ROOM,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Named(name) => write!(f, "\"{name}\""),
        }
    }
}

/// A decoded or to-be-encoded privilege record.
///
/// # Example
///
/// ```
/// use tls_sig::{PrivilegeRecord, Room, privilege};
///
/// let record = PrivilegeRecord {
///     identifier: "user_1".into(),
///     sdkappid: 1_400_000_000,
///     room: Room::Numeric(123),
///     expire_at: 1_700_086_400,
///     privilege_map: privilege::ALL,
///     account_type: 0,
/// };
///
/// let bytes = record.encode().unwrap();
/// assert_eq!(bytes[0], 0);
/// assert_eq!(PrivilegeRecord::decode(&bytes).unwrap(), record);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegeRecord {
    /// Account the privileges are granted to
    pub identifier: String,
    /// Application id
    pub sdkappid: u32,
    /// Room the privileges apply to
    pub room: Room,
    /// Absolute unix time (seconds) at which the privileges lapse
    pub expire_at: u32,
    /// Permission bitmask, see [`privilege`]
    pub privilege_map: u32,
    /// Account type, always 0 for records built by this crate
    pub account_type: u32,
}

impl PrivilegeRecord {
    /// Builds a record whose absolute expiry is `issued_at + expire`.
    ///
    /// # Errors
    ///
    /// Returns `SigError::Encoding` if `sdkappid` or the absolute expiry does
    /// not fit in 32 bits.
    pub fn new(
        identifier: impl Into<String>,
        sdkappid: u64,
        room: Room,
        expire: u64,
        issued_at: u64,
        privilege_map: u32,
    ) -> Result<Self, SigError> {
        let sdkappid = u32::try_from(sdkappid)
            .map_err(|_| SigError::encoding(format!("sdkappid {sdkappid} exceeds 32 bits")))?;
        let expire_at = issued_at
            .checked_add(expire)
            .and_then(|at| u32::try_from(at).ok())
            .ok_or_else(|| {
                SigError::encoding(format!(
                    "privilege expiry {issued_at} + {expire} exceeds 32 bits"
                ))
            })?;

        Ok(Self {
            identifier: identifier.into(),
            sdkappid,
            room,
            expire_at,
            privilege_map,
            account_type: 0,
        })
    }

    /// Returns the record version byte.
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.room.version()
    }

    /// Serializes the record.
    ///
    /// # Errors
    ///
    /// Returns `SigError::Encoding` if the identifier or room string is
    /// longer than 65535 bytes.
    pub fn encode(&self) -> Result<Vec<u8>, SigError> {
        let mut buf = Vec::with_capacity(
            1 + 2 + self.identifier.len() + 4 * 5 + self.room.name().map_or(0, |n| 2 + n.len()),
        );

        buf.push(self.version());
        put_str(&mut buf, "identifier", &self.identifier)?;
        buf.extend_from_slice(&self.sdkappid.to_be_bytes());
        buf.extend_from_slice(&self.room.numeric_id().to_be_bytes());
        buf.extend_from_slice(&self.expire_at.to_be_bytes());
        buf.extend_from_slice(&self.privilege_map.to_be_bytes());
        buf.extend_from_slice(&self.account_type.to_be_bytes());

        if let Some(name) = self.room.name() {
            put_str(&mut buf, "room string", name)?;
        }

        Ok(buf)
    }

    /// Parses a record produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns `SigError::Decoding` if the input is truncated, has an unknown
    /// version, carries trailing bytes, or contains a non-UTF-8 string.
    pub fn decode(bytes: &[u8]) -> Result<Self, SigError> {
        let mut reader = Reader { buf: bytes };

        let version = reader.u8()?;
        let identifier = reader.string("identifier")?;
        let sdkappid = reader.u32()?;
        let room_id = reader.u32()?;
        let expire_at = reader.u32()?;
        let privilege_map = reader.u32()?;
        let account_type = reader.u32()?;

        let room = match version {
            VERSION_NUMERIC_ROOM => Room::Numeric(room_id),
            VERSION_NAMED_ROOM => Room::Named(reader.string("room string")?),
            other => {
                return Err(SigError::decoding(format!(
                    "unknown privilege record version {other}"
                )));
            }
        };

        if !reader.buf.is_empty() {
            return Err(SigError::decoding(format!(
                "{} trailing bytes after privilege record",
                reader.buf.len()
            )));
        }

        Ok(Self {
            identifier,
            sdkappid,
            room,
            expire_at,
            privilege_map,
            account_type,
        })
    }
}

fn put_str(buf: &mut Vec<u8>, field: &str, value: &str) -> Result<(), SigError> {
    let len = u16::try_from(value.len()).map_err(|_| {
        SigError::encoding(format!(
            "{field} is {} bytes, limit is {}",
            value.len(),
            u16::MAX
        ))
    })?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], SigError> {
        if self.buf.len() < n {
            return Err(SigError::decoding(format!(
                "privilege record truncated: need {n} bytes, {} left",
                self.buf.len()
            )));
        }
        let (head, rest) = self.buf.split_at(n);
        self.buf = rest;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, SigError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, SigError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self) -> Result<u32, SigError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn string(&mut self, field: &str) -> Result<String, SigError> {
        let len = self.u16()?;
        let bytes = self.take(usize::from(len))?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| SigError::decoding(format!("{field} is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_record() -> PrivilegeRecord {
        PrivilegeRecord::new("u1", 1_400_000_000, Room::Numeric(123), 300, 1_700_000_000, 255)
            .unwrap()
    }

    #[test]
    fn room_display() {
        assert_eq!(Room::Numeric(123).to_string(), "123");
        assert_eq!(Room::Named("lobby".into()).to_string(), "\"lobby\"");
    }

    #[test]
    fn numeric_room_layout() {
        let bytes = numeric_record().encode().unwrap();

        let mut expected = vec![0u8, 0, 2, b'u', b'1'];
        expected.extend_from_slice(&1_400_000_000u32.to_be_bytes());
        expected.extend_from_slice(&123u32.to_be_bytes());
        expected.extend_from_slice(&1_700_000_300u32.to_be_bytes());
        expected.extend_from_slice(&255u32.to_be_bytes());
        expected.extend_from_slice(&0u32.to_be_bytes());

        assert_eq!(bytes, expected);
    }

    #[test]
    fn named_room_layout() {
        let record = PrivilegeRecord::new(
            "u1",
            1_400_000_000,
            Room::Named("lobby".into()),
            300,
            1_700_000_000,
            42,
        )
        .unwrap();
        let bytes = record.encode().unwrap();

        assert_eq!(bytes[0], VERSION_NAMED_ROOM);
        // roomId is written as zero for named rooms
        assert_eq!(&bytes[9..13], &[0, 0, 0, 0]);
        assert_eq!(&bytes[bytes.len() - 7..], b"\x00\x05lobby");
        assert_eq!(bytes.len(), 1 + 2 + 2 + 20 + 2 + 5);
    }

    #[test]
    fn decode_recovers_numeric_record() {
        let record = numeric_record();
        let decoded = PrivilegeRecord::decode(&record.encode().unwrap()).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(decoded.room, Room::Numeric(123));
        assert_eq!(decoded.privilege_map, 255);
        assert_eq!(decoded.version(), VERSION_NUMERIC_ROOM);
    }

    #[test]
    fn decode_recovers_unicode_room_string() {
        let record = PrivilegeRecord::new(
            "用户",
            7,
            Room::Named("会议室-1".into()),
            60,
            1_000,
            privilege::ENTER_ROOM | privilege::RECV_AUDIO | privilege::RECV_VIDEO,
        )
        .unwrap();

        let decoded = PrivilegeRecord::decode(&record.encode().unwrap()).unwrap();

        assert_eq!(decoded.room.name(), Some("会议室-1"));
        assert_eq!(decoded.identifier, "用户");
        assert_eq!(decoded.privilege_map, 42);
    }

    #[test]
    fn privilege_bits_are_powers_of_two() {
        let bits = [
            privilege::CREATE_ROOM,
            privilege::ENTER_ROOM,
            privilege::SEND_AUDIO,
            privilege::RECV_AUDIO,
            privilege::SEND_VIDEO,
            privilege::RECV_VIDEO,
            privilege::SEND_SUB_VIDEO,
            privilege::RECV_SUB_VIDEO,
        ];

        assert_eq!(privilege::RECV_SUB_VIDEO, 128);
        assert_eq!(bits.iter().fold(0, |acc, b| acc | b), privilege::ALL);
    }

    #[test]
    fn oversized_identifier_is_rejected() {
        let long = "x".repeat(usize::from(u16::MAX) + 1);
        let record = PrivilegeRecord::new(long, 1, Room::Numeric(1), 1, 1, 1).unwrap();

        assert!(matches!(record.encode(), Err(SigError::Encoding { .. })));
    }

    #[test]
    fn sdkappid_over_32_bits_is_rejected() {
        let result = PrivilegeRecord::new("u1", u64::from(u32::MAX) + 1, Room::Numeric(1), 1, 1, 1);
        assert!(matches!(result, Err(SigError::Encoding { .. })));
    }

    #[test]
    fn expiry_over_32_bits_is_rejected() {
        let result = PrivilegeRecord::new("u1", 1, Room::Numeric(1), 1, u64::from(u32::MAX), 1);
        assert!(matches!(result, Err(SigError::Encoding { .. })));
    }

    #[test]
    fn decode_rejects_truncated_input() {
        let bytes = numeric_record().encode().unwrap();
        let result = PrivilegeRecord::decode(&bytes[..bytes.len() - 1]);

        assert!(matches!(result, Err(SigError::Decoding { .. })));
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut bytes = numeric_record().encode().unwrap();
        bytes.push(0);

        assert!(matches!(
            PrivilegeRecord::decode(&bytes),
            Err(SigError::Decoding { .. })
        ));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let mut bytes = numeric_record().encode().unwrap();
        bytes[0] = 2;

        assert!(matches!(
            PrivilegeRecord::decode(&bytes),
            Err(SigError::Decoding { .. })
        ));
    }
}
