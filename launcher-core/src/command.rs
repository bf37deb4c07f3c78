//! Opcode table and decoded command variants.

use crate::record::{CommandRecord, PAYLOAD_LEN};

/// Wire opcodes.
///
/// These values have moved around during the project's life; treat them as
/// the current protocol revision rather than a frozen contract.
pub mod opcode {
    /// Stop all motors.
    pub const HALT: u8 = 0x00;
    /// Set spin mode and spin offset.
    pub const ADJUST_SPIN: u8 = 0x01;
    /// Set one motor's speed.
    pub const ADJUST_SPEED: u8 = 0x02;
    /// Set one servo's angle.
    pub const ADJUST_ANGLE: u8 = 0x03;
    /// Run the fire sequence.
    pub const LAUNCH: u8 = 0x04;
}

/// A decoded command frame.
///
/// Decoding never fails: unrecognized opcodes become [`Command::Unknown`].
/// Selectors are passed through unchecked; range checking belongs to the
/// actuator that receives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Stop every motor.
    Halt,
    /// Select spin mode (byte 0) and offset (bytes 1..=2).
    AdjustSpin { mode: u8, offset: u16 },
    /// Set `motor` (byte 0) to `speed` (bytes 1..=2, fraction of full scale).
    AdjustSpeed { motor: u8, speed: u16 },
    /// Set `servo` (byte 0) to `angle` (bytes 1..=2).
    AdjustAngle { servo: u8, angle: u16 },
    /// Fire `count` (byte 0) times.
    Launch { count: u8 },
    /// Opcode not in the table.
    Unknown(u8),
}

impl Command {
    /// Decode a record into a command.
    #[must_use]
    pub const fn decode(record: &CommandRecord) -> Self {
        match record.opcode {
            opcode::HALT => Command::Halt,
            opcode::ADJUST_SPIN => Command::AdjustSpin {
                mode: record.selector(),
                offset: record.value(),
            },
            opcode::ADJUST_SPEED => Command::AdjustSpeed {
                motor: record.selector(),
                speed: record.value(),
            },
            opcode::ADJUST_ANGLE => Command::AdjustAngle {
                servo: record.selector(),
                angle: record.value(),
            },
            opcode::LAUNCH => Command::Launch {
                count: record.selector(),
            },
            other => Command::Unknown(other),
        }
    }

    /// Encode into a record. Unused payload bytes are zero.
    #[must_use]
    pub const fn encode(&self) -> CommandRecord {
        let mut payload = [0u8; PAYLOAD_LEN];
        let opcode = match *self {
            Command::Halt => opcode::HALT,
            Command::AdjustSpin { mode, offset } => {
                let [hi, lo] = offset.to_be_bytes();
                payload[0] = mode;
                payload[1] = hi;
                payload[2] = lo;
                opcode::ADJUST_SPIN
            }
            Command::AdjustSpeed { motor, speed } => {
                let [hi, lo] = speed.to_be_bytes();
                payload[0] = motor;
                payload[1] = hi;
                payload[2] = lo;
                opcode::ADJUST_SPEED
            }
            Command::AdjustAngle { servo, angle } => {
                let [hi, lo] = angle.to_be_bytes();
                payload[0] = servo;
                payload[1] = hi;
                payload[2] = lo;
                opcode::ADJUST_ANGLE
            }
            Command::Launch { count } => {
                payload[0] = count;
                opcode::LAUNCH
            }
            Command::Unknown(op) => op,
        };
        CommandRecord::new(opcode, payload)
    }
}

impl From<CommandRecord> for Command {
    fn from(record: CommandRecord) -> Self {
        Self::decode(&record)
    }
}

impl From<Command> for CommandRecord {
    fn from(command: Command) -> Self {
        command.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: [u8; 6]) -> Command {
        Command::decode(&CommandRecord::from_bytes(bytes))
    }

    #[test]
    fn test_decode_halt_ignores_payload() {
        assert_eq!(decode([0x00, 0, 0, 0, 0, 0]), Command::Halt);
        assert_eq!(decode([0x00, 9, 9, 9, 9, 9]), Command::Halt);
    }

    #[test]
    fn test_decode_adjust_speed() {
        assert_eq!(
            decode([0x02, 0x01, 0x30, 0x00, 0, 0]),
            Command::AdjustSpeed { motor: 1, speed: 0x3000 }
        );
    }

    #[test]
    fn test_decode_adjust_angle() {
        assert_eq!(
            decode([0x03, 0x02, 0x7F, 0xFF, 0, 0]),
            Command::AdjustAngle { servo: 2, angle: 0x7FFF }
        );
    }

    #[test]
    fn test_decode_launch() {
        assert_eq!(decode([0x04, 0x03, 0, 0, 0, 0]), Command::Launch { count: 3 });
    }

    #[test]
    fn test_decode_adjust_spin() {
        assert_eq!(
            decode([0x01, 0x00, 0x19, 0x96, 0, 0]),
            Command::AdjustSpin { mode: 0, offset: 6550 }
        );
    }

    #[test]
    fn test_decode_unknown_opcode() {
        assert_eq!(decode([0x30, 1, 2, 3, 4, 5]), Command::Unknown(0x30));
        assert_eq!(decode([0xFF, 0, 0, 0, 0, 0]), Command::Unknown(0xFF));
    }

    #[test]
    fn test_encode_matches_wire_layout() {
        let record = Command::AdjustSpeed { motor: 1, speed: 0x3000 }.encode();
        assert_eq!(record.to_bytes(), [0x02, 0x01, 0x30, 0x00, 0, 0]);
        let record: CommandRecord = Command::Launch { count: 7 }.into();
        assert_eq!(record.to_bytes(), [0x04, 7, 0, 0, 0, 0]);
    }
}
