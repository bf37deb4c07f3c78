//! Command record: the fixed-width unit handed from the link layer to dispatch.

/// Number of payload bytes following the opcode.
pub const PAYLOAD_LEN: usize = 5;

/// Total wire length of one command frame (opcode + payload).
pub const FRAME_LEN: usize = PAYLOAD_LEN + 1;

/// One complete command frame as received over the serial link.
///
/// Wire layout is `[opcode:1][payload:5]` with no checksum and no length
/// prefix. Multi-byte payload fields are big-endian.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandRecord {
    pub opcode: u8,
    pub payload: [u8; PAYLOAD_LEN],
}

impl CommandRecord {
    /// All-zero record (also the HALT frame).
    pub const EMPTY: Self = Self {
        opcode: 0,
        payload: [0; PAYLOAD_LEN],
    };

    #[must_use]
    pub const fn new(opcode: u8, payload: [u8; PAYLOAD_LEN]) -> Self {
        Self { opcode, payload }
    }

    /// Build a record from a raw six-byte frame.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self {
            opcode: bytes[0],
            payload: [bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]],
        }
    }

    /// Serialize back to wire order.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let p = &self.payload;
        [self.opcode, p[0], p[1], p[2], p[3], p[4]]
    }

    /// First payload byte, used as motor/servo selector or repeat count.
    #[inline]
    #[must_use]
    pub const fn selector(&self) -> u8 {
        self.payload[0]
    }

    /// Big-endian 16-bit value at payload bytes 1..=2.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u16 {
        u16::from_be_bytes([self.payload[1], self.payload[2]])
    }
}

impl From<[u8; FRAME_LEN]> for CommandRecord {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_splits_opcode_and_payload() {
        let record = CommandRecord::from_bytes([0x02, 0x01, 0x30, 0x00, 0xAA, 0xBB]);
        assert_eq!(record.opcode, 0x02);
        assert_eq!(record.payload, [0x01, 0x30, 0x00, 0xAA, 0xBB]);
        assert_eq!(record.to_bytes(), [0x02, 0x01, 0x30, 0x00, 0xAA, 0xBB]);
    }

    #[test]
    fn test_value_is_big_endian() {
        let record = CommandRecord::new(0x03, [0x02, 0x7F, 0xFF, 0, 0]);
        assert_eq!(record.selector(), 2);
        assert_eq!(record.value(), 0x7FFF);
    }

    #[test]
    fn test_empty_is_zeroed() {
        assert_eq!(CommandRecord::EMPTY, CommandRecord::default());
        assert_eq!(CommandRecord::EMPTY.to_bytes(), [0; FRAME_LEN]);
    }
}
