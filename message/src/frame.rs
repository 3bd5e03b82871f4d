use packed_struct::{
    prelude::*,
    PackingResult,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    checksum,
    Command,
    MagicValue,
};

/// Total wire size of one frame. Equals the cipher block size, so the cipher
/// layer never needs padding logic.
pub const FRAME_SIZE: usize = 16;

/// Packed size of [`FrameBody`]: magic, version, command, two speeds, sequence.
const BODY_SIZE: usize = 6;

/// The checksum covers everything before it: body plus reserved padding.
const CRC_OFFSET: usize = FRAME_SIZE - checksum::CRC_SIZE;

pub type Magic = MagicValue<0xb7>;
pub type Version = MagicValue<0x01>;

/// One decoded command frame.
///
/// Speeds are unsigned PWM magnitudes; the sign pattern comes from
/// [`Command`] on the receiving side. The codec does not clamp them, since
/// the wire type already bounds them to a byte. Serde field names follow
/// the bridge JSON (`leftSpeed`, `rightSpeed`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlFrame {
    pub command:     Command,
    pub left_speed:  u8,
    pub right_speed: u8,
    pub sequence:    u8,
}

/// Plaintext wire layout of the non-checksum, non-padding portion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PackedStruct)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "6", endian = "lsb")]
struct FrameBody {
    #[packed_field(size_bytes = "1")]
    magic:       Magic,
    #[packed_field(size_bytes = "1")]
    version:     Version,
    #[packed_field(size_bytes = "1", ty = "enum")]
    command:     Command,
    left_speed:  u8,
    right_speed: u8,
    sequence:    u8,
}

/// Why a plaintext frame was refused.
///
/// The first three variants are the protocol-mismatch class (a frame from an
/// incompatible or foreign transmitter); `Checksum` is the integrity class
/// (corruption or tampering). Decode checks run in variant order, so the
/// error names the first stage that failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("bad magic byte {got:#04x}")]
    Magic { got: u8 },

    #[error("unsupported protocol version {got:#04x}")]
    Version { got: u8 },

    #[error("unknown command byte {got:#04x}")]
    Command { got: u8 },

    #[error("checksum mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    Checksum { stored: u32, computed: u32 },
}

impl DecodeError {
    /// True for corruption/tampering, false for the protocol-mismatch class.
    #[inline]
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Checksum { .. })
    }
}

impl ControlFrame {
    /// Serialize to the fixed plaintext layout: packed body, zero padding,
    /// CRC over both, little-endian, in the trailing four bytes.
    pub fn encode(&self) -> PackingResult<[u8; FRAME_SIZE]> {
        let body = FrameBody {
            magic:       Magic::INSTANCE,
            version:     Version::INSTANCE,
            command:     self.command,
            left_speed:  self.left_speed,
            right_speed: self.right_speed,
            sequence:    self.sequence,
        };

        let mut out = [0u8; FRAME_SIZE];
        body.pack_to_slice(&mut out[..BODY_SIZE])?;

        let crc = checksum::frame_crc(&out[..CRC_OFFSET]);
        out[CRC_OFFSET..].copy_from_slice(&crc.to_le_bytes());

        Ok(out)
    }

    /// Validate and deserialize a plaintext frame.
    ///
    /// Stages, each short-circuiting: magic, version, checksum, command.
    /// Checking the markers before the CRC lets a receiver discard foreign
    /// traffic without ever touching the checksum.
    pub fn decode(raw: &[u8; FRAME_SIZE]) -> Result<Self, DecodeError> {
        Magic::unpack(&[raw[0]]).map_err(|_| DecodeError::Magic {
            got: raw[0],
        })?;
        Version::unpack(&[raw[1]]).map_err(|_| DecodeError::Version {
            got: raw[1],
        })?;

        let mut stored = [0u8; checksum::CRC_SIZE];
        stored.copy_from_slice(&raw[CRC_OFFSET..]);
        let stored = u32::from_le_bytes(stored);

        let computed = checksum::frame_crc(&raw[..CRC_OFFSET]);
        if stored != computed {
            tracing::trace!(
                frame = %hex::encode(raw),
                stored,
                computed,
                "frame failed checksum"
            );
            return Err(DecodeError::Checksum {
                stored,
                computed,
            });
        }

        // Magic and version are already validated, so the command byte is the
        // only value the body unpack can still reject.
        let body =
            FrameBody::unpack_from_slice(&raw[..BODY_SIZE]).map_err(|_| DecodeError::Command {
                got: raw[2],
            })?;

        Ok(Self {
            command:     body.command,
            left_speed:  body.left_speed,
            right_speed: body.right_speed,
            sequence:    body.sequence,
        })
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn frame(command: Command, left: u8, right: u8, seq: u8) -> ControlFrame {
        ControlFrame {
            command,
            left_speed: left,
            right_speed: right,
            sequence: seq,
        }
    }

    #[test]
    fn layout_is_wire_contract() {
        let raw = frame(Command::Left, 150, 200, 42).encode().unwrap();

        assert_eq!(raw[0], 0xb7);
        assert_eq!(raw[1], 0x01);
        assert_eq!(raw[2], 0x03);
        assert_eq!(raw[3], 150);
        assert_eq!(raw[4], 200);
        assert_eq!(raw[5], 42);
        assert_eq!(&raw[6..CRC_OFFSET], &[0u8; 6]);

        let crc = checksum::frame_crc(&raw[..CRC_OFFSET]);
        assert_eq!(&raw[CRC_OFFSET..], &crc.to_le_bytes());
    }

    #[test]
    fn bad_magic_reported_before_anything_else() {
        let mut raw = frame(Command::Forward, 10, 10, 0).encode().unwrap();
        raw[0] = 0xeb;
        // CRC is now also stale, but the magic stage runs first.
        assert_eq!(
            ControlFrame::decode(&raw),
            Err(DecodeError::Magic {
                got: 0xeb
            })
        );
    }

    #[test]
    fn bad_version_reported_before_checksum() {
        let mut raw = frame(Command::Forward, 10, 10, 0).encode().unwrap();
        raw[1] = 0x02;
        assert_eq!(
            ControlFrame::decode(&raw),
            Err(DecodeError::Version {
                got: 0x02
            })
        );
    }

    #[test]
    fn corrupt_payload_fails_checksum() {
        let mut raw = frame(Command::Forward, 10, 10, 7).encode().unwrap();
        raw[3] ^= 0x01;

        match ControlFrame::decode(&raw) {
            Err(e @ DecodeError::Checksum {
                ..
            }) => assert!(e.is_integrity()),
            other => panic!("expected checksum failure, got {other:?}"),
        }
    }

    #[test]
    fn unknown_command_with_valid_checksum() {
        // A frame some future transmitter might emit: valid CRC over a
        // command byte this version does not know.
        let mut raw = frame(Command::Stop, 0, 0, 0).encode().unwrap();
        raw[2] = 0x06;
        let crc = checksum::frame_crc(&raw[..CRC_OFFSET]);
        raw[CRC_OFFSET..].copy_from_slice(&crc.to_le_bytes());

        let err = ControlFrame::decode(&raw).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Command {
                got: 0x06
            }
        );
        assert!(!err.is_integrity());
    }

    proptest! {
        #[test]
        fn encode_decode_equivalence(
            command in command_strategy(),
            left in any::<u8>(),
            right in any::<u8>(),
            seq in any::<u8>(),
        ) {
            let original = frame(command, left, right, seq);
            let raw = original.encode().unwrap();
            let decoded = ControlFrame::decode(&raw).unwrap();

            prop_assert_eq!(original, decoded);
        }

        #[test]
        fn single_bit_flip_never_decodes_unchanged(
            bit in 0usize..(FRAME_SIZE * 8),
            left in any::<u8>(),
            right in any::<u8>(),
            seq in any::<u8>(),
        ) {
            let original = frame(Command::Forward, left, right, seq);
            let mut raw = original.encode().unwrap();
            raw[bit / 8] ^= 1 << (bit % 8);

            // Either a marker stage rejects the frame outright, or (for a
            // flip in the payload or padding) the checksum catches it.
            prop_assert!(ControlFrame::decode(&raw).is_err());
        }
    }

    fn command_strategy() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::Stop),
            Just(Command::Forward),
            Just(Command::Backward),
            Just(Command::Left),
            Just(Command::Right),
            Just(Command::SetSpeed),
        ]
    }
}
