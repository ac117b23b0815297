use crate::errors::RconProtocolError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::mem::size_of;

/// Bytes following the length field in a packet with an empty body:
/// request id, type and the two terminating null bytes.
pub(super) const EMPTY_REMAINING_LEN: usize = size_of::<i32>() * 2 + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RconPacketType {
    ResponseValue,
    /// Also the type of the server's reply to [`RconPacketType::Login`].
    ExecCommand,
    Login,
}

impl From<RconPacketType> for i32 {
    fn from(packet_type: RconPacketType) -> Self {
        match packet_type {
            RconPacketType::ResponseValue => 0,
            RconPacketType::ExecCommand => 2,
            RconPacketType::Login => 3,
        }
    }
}

impl TryFrom<i32> for RconPacketType {
    type Error = RconProtocolError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RconPacketType::ResponseValue),
            2 => Ok(RconPacketType::ExecCommand),
            3 => Ok(RconPacketType::Login),
            _ => Err(RconProtocolError::InvalidPacketType),
        }
    }
}

#[derive(Debug)]
pub(super) struct RconPacket {
    pub request_id: i32,
    pub packet_type: RconPacketType,
    /// Raw body. May end partway through a UTF-8 sequence when a response
    /// spans several packets.
    pub payload: Bytes,
}

impl RconPacket {
    pub fn new(request_id: i32, packet_type: RconPacketType, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();

        Self {
            request_id,
            packet_type,
            payload,
        }
    }

    pub fn bytes(self) -> Bytes {
        Bytes::from(self)
    }
}

impl TryFrom<Bytes> for RconPacket {
    type Error = RconProtocolError;

    fn try_from(mut bytes: Bytes) -> Result<Self, Self::Error> {
        if bytes.len() < size_of::<i32>() + EMPTY_REMAINING_LEN {
            return Err(RconProtocolError::InvalidRconResponse);
        }

        // length of remaining packet (not including this integer)
        let len = bytes.get_i32_le();
        if usize::try_from(len).ok() != Some(bytes.remaining()) {
            return Err(RconProtocolError::InvalidRconResponse);
        }

        let request_id = bytes.get_i32_le();
        let packet_type = bytes.get_i32_le();

        let body = bytes.split_to(bytes.remaining() - 2);
        if bytes[..] != [0u8, 0] {
            return Err(RconProtocolError::InvalidRconResponse);
        }

        Ok(Self::new(request_id, packet_type.try_into()?, body))
    }
}

impl From<RconPacket> for Bytes {
    fn from(packet: RconPacket) -> Self {
        let len = get_remaining_length(&packet.payload);
        let packet_type: i32 = packet.packet_type.into();

        let mut bytes = BytesMut::with_capacity(size_of::<i32>() + len as usize);

        bytes.put_i32_le(len);
        bytes.put_i32_le(packet.request_id);
        bytes.put_i32_le(packet_type);
        bytes.put(packet.payload);
        bytes.put_u16(0x00_00);

        bytes.freeze()
    }
}

/// Get the *remaining length* of the packet given its payload.
///
/// Remaining length here refers to the length of the packet in bytes excluding
/// the first four bytes which communicate this value: two [i32]s (request ID
/// and type), the payload, and **TWO** 0 bytes.
fn get_remaining_length(payload: &[u8]) -> i32 {
    (payload.len() + EMPTY_REMAINING_LEN) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_packet_layout() {
        let bytes = RconPacket::new(7, RconPacketType::Login, "pw").bytes();

        assert_eq!(
            bytes.as_ref(),
            b"\x0c\x00\x00\x00\x07\x00\x00\x00\x03\x00\x00\x00pw\x00\x00"
        );
    }

    #[test]
    fn decode_command_response() {
        let raw = Bytes::from_static(b"\x0c\x00\x00\x00\x07\x00\x00\x00\x00\x00\x00\x00ok\x00\x00");
        let packet = RconPacket::try_from(raw).unwrap();

        assert_eq!(packet.request_id, 7);
        assert_eq!(packet.packet_type, RconPacketType::ResponseValue);
        assert_eq!(packet.payload.as_ref(), b"ok");
    }

    #[test]
    fn decode_keeps_partial_utf8_sequence() {
        // first byte of the two byte section sign, as at the end of a full fragment
        let body = Bytes::from_static(b"xx\xc2");
        let encoded = RconPacket::new(1, RconPacketType::ResponseValue, body.clone()).bytes();
        let packet = RconPacket::try_from(encoded).unwrap();

        assert_eq!(packet.payload, body);
    }

    #[test]
    fn decode_rejects_missing_padding() {
        let raw = Bytes::from_static(b"\x0c\x00\x00\x00\x07\x00\x00\x00\x00\x00\x00\x00okok");

        assert!(matches!(
            RconPacket::try_from(raw),
            Err(RconProtocolError::InvalidRconResponse)
        ));
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        let raw = Bytes::from_static(b"\x0d\x00\x00\x00\x07\x00\x00\x00\x00\x00\x00\x00ok\x00\x00");

        assert!(matches!(
            RconPacket::try_from(raw),
            Err(RconProtocolError::InvalidRconResponse)
        ));
    }

    #[test]
    fn decode_rejects_unknown_type() {
        let raw = Bytes::from_static(b"\x0a\x00\x00\x00\x07\x00\x00\x00\x05\x00\x00\x00\x00\x00");

        assert!(matches!(
            RconPacket::try_from(raw),
            Err(RconProtocolError::InvalidPacketType)
        ));
    }

    #[test]
    fn decode_rejects_truncated_packet() {
        let raw = Bytes::from_static(b"\x0a\x00\x00\x00\x07\x00");

        assert!(RconPacket::try_from(raw).is_err());
    }
}
