//! Binary framing of the i-PI protocol.
//!
//! Every message starts with a 12-byte ASCII header, space padded. Payload
//! layouts are implied by the header; only INIT and the GETFORCE trailer carry
//! an explicit length. All numbers are little-endian: `f64` for reals and `i32`
//! for counts and lengths.

use super::error::{EngineError, FramingError, ProtocolViolation};
use phf::phf_map;
use std::io::{ErrorKind, Read, Write};

pub const HEADER_LEN: usize = 12;

/// Filler that closes every GETFORCE response.
pub const FORCE_TRAILER: &[u8; 7] = b"nothing";

/// Upper bound on the INIT payload length accepted from the peer.
pub const MAX_INIT_PAYLOAD: usize = 1 << 20;

const F64_LEN: usize = 8;
const I32_LEN: usize = 4;

/// Number of doubles buffered per read while receiving positions.
const POSITION_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Status,
    Init,
    PosData,
    GetForce,
}

static COMMANDS: phf::Map<&'static str, Command> = phf_map! {
    "STATUS" => Command::Status,
    "INIT" => Command::Init,
    "POSDATA" => Command::PosData,
    "GETFORCE" => Command::GetForce,
};

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Status => "STATUS",
            Command::Init => "INIT",
            Command::PosData => "POSDATA",
            Command::GetForce => "GETFORCE",
        }
    }
}

/// A header as read from the wire, with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToken(String);

impl CommandToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The command this token names, if it is one the driver understands.
    pub fn command(&self) -> Option<Command> {
        COMMANDS.get(self.0.as_str()).copied()
    }
}

impl std::fmt::Display for CommandToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three replies to STATUS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReply {
    NeedInit,
    HaveData,
    Ready,
}

impl StatusReply {
    pub fn token(&self) -> &'static [u8; HEADER_LEN] {
        match self {
            StatusReply::NeedInit => b"NEEDINIT    ",
            StatusReply::HaveData => b"HAVEDATA    ",
            StatusReply::Ready => b"READY       ",
        }
    }
}

const FORCE_READY: &[u8; HEADER_LEN] = b"FORCEREADY  ";

/// Decoded POSDATA payload, still in wire units and wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct PosData {
    /// Cell basis, row-major, in bohr.
    pub cell: [f64; 9],
    /// Inverse cell basis, row-major, in 1/bohr.
    pub inverse: [f64; 9],
    pub atom_count: usize,
    /// Flat positions `[x0, y0, z0, x1, ...]` in bohr.
    pub positions: Vec<f64>,
}

/// Fills `buf` completely, telling a close at offset zero apart from a truncated read.
fn fill(reader: &mut impl Read, buf: &mut [u8], at_boundary: bool) -> Result<(), FramingError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 && at_boundary => return Err(FramingError::ChannelClosed),
            Ok(0) => {
                return Err(FramingError::Truncated {
                    expected: buf.len(),
                    received: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(FramingError::Io(e)),
        }
    }
    Ok(())
}

fn read_i32(reader: &mut impl Read) -> Result<i32, FramingError> {
    let mut buf = [0u8; I32_LEN];
    fill(reader, &mut buf, false)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_f64s(reader: &mut impl Read, out: &mut [f64]) -> Result<(), FramingError> {
    let mut buf = vec![0u8; out.len() * F64_LEN];
    fill(reader, &mut buf, false)?;
    for (value, chunk) in out.iter_mut().zip(buf.chunks_exact(F64_LEN)) {
        let mut bytes = [0u8; F64_LEN];
        bytes.copy_from_slice(chunk);
        *value = f64::from_le_bytes(bytes);
    }
    Ok(())
}

/// Reads `len` doubles, growing the buffer only as data actually arrives.
fn read_f64_vec(reader: &mut impl Read, len: usize) -> Result<Vec<f64>, FramingError> {
    let mut values = Vec::with_capacity(len.min(POSITION_CHUNK));
    let mut chunk = [0.0; POSITION_CHUNK];
    while values.len() < len {
        let n = (len - values.len()).min(POSITION_CHUNK);
        match read_f64s(reader, &mut chunk[..n]) {
            Ok(()) => values.extend_from_slice(&chunk[..n]),
            Err(FramingError::Truncated { received, .. }) => {
                return Err(FramingError::Truncated {
                    expected: len.saturating_mul(F64_LEN),
                    received: values.len() * F64_LEN + received,
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(values)
}

fn read_count(reader: &mut impl Read, field: &'static str) -> Result<usize, EngineError> {
    let value = read_i32(reader)?;
    usize::try_from(value).map_err(|_| ProtocolViolation::NegativeValue { field, value }.into())
}

fn push_f64s(buf: &mut Vec<u8>, values: &[f64]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

fn count_to_i32(count: usize, what: &str) -> Result<i32, EngineError> {
    i32::try_from(count)
        .map_err(|_| EngineError::Internal(format!("{} {} does not fit in an int32", what, count)))
}

/// Reads one 12-byte header.
///
/// A peer that closes before the first byte yields [`FramingError::ChannelClosed`];
/// one that closes mid-header yields [`FramingError::Truncated`].
pub fn read_header(reader: &mut impl Read) -> Result<CommandToken, FramingError> {
    let mut buf = [0u8; HEADER_LEN];
    fill(reader, &mut buf, true)?;
    let text = String::from_utf8_lossy(&buf);
    Ok(CommandToken(text.trim().to_string()))
}

/// Reads the POSDATA payload that follows its header.
///
/// With `known_atom_count` set, a different count on the wire is a protocol
/// violation and the positions are not read. Without it, the claimed count is
/// trusted but memory is only committed for positions that actually arrive.
pub fn read_posdata_payload(
    reader: &mut impl Read,
    known_atom_count: Option<usize>,
) -> Result<PosData, EngineError> {
    let mut cell = [0.0; 9];
    let mut inverse = [0.0; 9];
    read_f64s(reader, &mut cell)?;
    read_f64s(reader, &mut inverse)?;

    let atom_count = read_count(reader, "atom count")?;
    if let Some(expected) = known_atom_count {
        if expected != atom_count {
            return Err(ProtocolViolation::AtomCountChanged {
                expected,
                received: atom_count,
            }
            .into());
        }
    }

    let len = atom_count
        .checked_mul(3)
        .ok_or_else(|| EngineError::Internal(format!("atom count {} overflows", atom_count)))?;
    let positions = read_f64_vec(reader, len)?;

    Ok(PosData {
        cell,
        inverse,
        atom_count,
        positions,
    })
}

/// Reads the length-prefixed INIT payload. Its content is not interpreted.
pub fn read_init_payload(reader: &mut impl Read) -> Result<Vec<u8>, EngineError> {
    let len = read_count(reader, "INIT length")?;
    if len > MAX_INIT_PAYLOAD {
        return Err(ProtocolViolation::InitPayloadTooLarge {
            len,
            max: MAX_INIT_PAYLOAD,
        }
        .into());
    }
    let mut buf = vec![0u8; len];
    fill(reader, &mut buf, false)?;
    Ok(buf)
}

pub fn write_status(writer: &mut impl Write, reply: StatusReply) -> Result<(), FramingError> {
    writer.write_all(reply.token())?;
    writer.flush()?;
    Ok(())
}

/// Writes a full GETFORCE response.
///
/// `forces` is flat and in wire order; `virial` is row-major. Both must already be in wire units.
pub fn write_getforce_response(
    writer: &mut impl Write,
    energy: f64,
    forces: &[f64],
    virial: &[f64; 9],
) -> Result<(), EngineError> {
    if forces.len() % 3 != 0 {
        return Err(EngineError::Internal(format!(
            "force buffer length {} is not a multiple of 3",
            forces.len()
        )));
    }
    let atom_count = count_to_i32(forces.len() / 3, "atom count")?;
    let trailer_len = count_to_i32(FORCE_TRAILER.len(), "trailer length")?;

    let mut buf = Vec::with_capacity(
        HEADER_LEN + F64_LEN + I32_LEN + (forces.len() + 9) * F64_LEN + I32_LEN + FORCE_TRAILER.len(),
    );
    buf.extend_from_slice(FORCE_READY);
    buf.extend_from_slice(&energy.to_le_bytes());
    buf.extend_from_slice(&atom_count.to_le_bytes());
    push_f64s(&mut buf, forces);
    push_f64s(&mut buf, virial);
    buf.extend_from_slice(&trailer_len.to_le_bytes());
    buf.extend_from_slice(FORCE_TRAILER);

    writer.write_all(&buf).map_err(FramingError::Io)?;
    writer.flush().map_err(FramingError::Io)?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::wire;
    use super::*;
    use std::io::Cursor;

    const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

    #[test]
    fn header_is_trimmed_and_recognised() {
        let mut input = Cursor::new(b"  POSDATA   ".to_vec());
        let token = read_header(&mut input).unwrap();
        assert_eq!(token.as_str(), "POSDATA");
        assert_eq!(token.command(), Some(Command::PosData));
    }

    #[test]
    fn unknown_header_has_no_command() {
        let token = read_header(&mut Cursor::new(wire::header("EXIT"))).unwrap();
        assert_eq!(token.command(), None);
        assert_eq!(token.to_string(), "EXIT");
    }

    #[test]
    fn empty_channel_is_a_clean_close() {
        let err = read_header(&mut Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, FramingError::ChannelClosed));
    }

    #[test]
    fn partial_header_is_truncation() {
        let err = read_header(&mut Cursor::new(b"STAT".to_vec())).unwrap_err();
        assert!(matches!(
            err,
            FramingError::Truncated {
                expected: 12,
                received: 4
            }
        ));
    }

    #[test]
    fn posdata_payload_decodes_in_order() {
        let positions = [1.0, 2.0, 3.0, -4.0, -5.0, -6.0];
        let cell = [2.0, 0.0, 0.0, 0.5, 3.0, 0.0, 0.0, 0.0, 4.0];
        let bytes = wire::posdata(&cell, &IDENTITY, &positions);
        let mut input = Cursor::new(bytes[HEADER_LEN..].to_vec());

        let data = read_posdata_payload(&mut input, None).unwrap();
        assert_eq!(data.cell, cell);
        assert_eq!(data.inverse, IDENTITY);
        assert_eq!(data.atom_count, 2);
        assert_eq!(data.positions, positions);
    }

    #[test]
    fn posdata_with_changed_count_is_rejected() {
        let bytes = wire::posdata(&IDENTITY, &IDENTITY, &[0.0; 6]);
        let mut input = Cursor::new(bytes[HEADER_LEN..].to_vec());
        let err = read_posdata_payload(&mut input, Some(3)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Protocol(ProtocolViolation::AtomCountChanged {
                expected: 3,
                received: 2
            })
        ));
    }

    #[test]
    fn posdata_with_negative_count_is_rejected() {
        let mut bytes = Vec::new();
        push_f64s(&mut bytes, &IDENTITY);
        push_f64s(&mut bytes, &IDENTITY);
        bytes.extend_from_slice(&(-1i32).to_le_bytes());
        let err = read_posdata_payload(&mut Cursor::new(bytes), None).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Protocol(ProtocolViolation::NegativeValue { value: -1, .. })
        ));
    }

    #[test]
    fn truncated_positions_are_a_framing_error() {
        let mut bytes = wire::posdata(&IDENTITY, &IDENTITY, &[0.0; 6]);
        bytes.truncate(bytes.len() - 5);
        let mut input = Cursor::new(bytes[HEADER_LEN..].to_vec());
        let err = read_posdata_payload(&mut input, None).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Framing(FramingError::Truncated {
                expected: 48,
                received: 43
            })
        ));
    }

    #[test]
    fn huge_claimed_count_fails_as_truncation_without_reserving_it() {
        let bytes = wire::posdata_claiming(&IDENTITY, &IDENTITY, i32::MAX, &[0.0; 6]);
        let mut input = Cursor::new(bytes[HEADER_LEN..].to_vec());
        let err = read_posdata_payload(&mut input, None).unwrap_err();
        match err {
            EngineError::Framing(FramingError::Truncated { expected, received }) => {
                assert_eq!(expected, i32::MAX as usize * 3 * 8);
                assert_eq!(received, 48);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn huge_count_against_a_known_count_reads_no_positions() {
        let bytes = wire::posdata_claiming(&IDENTITY, &IDENTITY, i32::MAX, &[]);
        let mut input = Cursor::new(bytes[HEADER_LEN..].to_vec());
        let err = read_posdata_payload(&mut input, Some(3)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Protocol(ProtocolViolation::AtomCountChanged { expected: 3, .. })
        ));
    }

    #[test]
    fn positions_spanning_several_chunks_decode_in_order() {
        let positions: Vec<f64> = (0..3 * 3000).map(|i| i as f64 * 0.5).collect();
        let bytes = wire::posdata(&IDENTITY, &IDENTITY, &positions);
        let mut input = Cursor::new(bytes[HEADER_LEN..].to_vec());
        let data = read_posdata_payload(&mut input, Some(3000)).unwrap();
        assert_eq!(data.positions, positions);
    }

    #[test]
    fn init_payload_is_length_prefixed() {
        let bytes = wire::init(b"<bead 0>");
        let mut input = Cursor::new(bytes[HEADER_LEN..].to_vec());
        assert_eq!(read_init_payload(&mut input).unwrap(), b"<bead 0>");
        assert_eq!(input.position() as usize, bytes.len() - HEADER_LEN);
    }

    #[test]
    fn oversized_init_payload_is_rejected() {
        let bytes = ((MAX_INIT_PAYLOAD + 1) as i32).to_le_bytes();
        let err = read_init_payload(&mut Cursor::new(bytes.to_vec())).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Protocol(ProtocolViolation::InitPayloadTooLarge { .. })
        ));
    }

    #[test]
    fn status_tokens_are_twelve_bytes() {
        for (reply, text) in [
            (StatusReply::NeedInit, "NEEDINIT"),
            (StatusReply::HaveData, "HAVEDATA"),
            (StatusReply::Ready, "READY"),
        ] {
            let mut out = Vec::new();
            write_status(&mut out, reply).unwrap();
            assert_eq!(out.len(), HEADER_LEN);
            assert_eq!(String::from_utf8(out).unwrap().trim_end(), text);
        }
    }

    #[test]
    fn getforce_response_layout_is_byte_exact() {
        let forces = [0.5, -0.25, 1.0, 2.0, 3.0, 4.0];
        let virial = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let mut out = Vec::new();
        write_getforce_response(&mut out, -1.5, &forces, &virial).unwrap();

        assert_eq!(out.len(), 12 + 8 + 4 + 6 * 8 + 9 * 8 + 4 + 7);
        assert_eq!(&out[..12], b"FORCEREADY  ");
        assert_eq!(&out[20..24], &2i32.to_le_bytes());
        assert_eq!(&out[out.len() - 11..out.len() - 7], &7i32.to_le_bytes());
        assert_eq!(&out[out.len() - 7..], b"nothing");

        let decoded = wire::read_force_response(&mut Cursor::new(out));
        assert_eq!(decoded.energy, -1.5);
        assert_eq!(decoded.forces, forces);
        assert_eq!(decoded.virial, virial);
        assert_eq!(decoded.trailer, b"nothing");
    }

    #[test]
    fn getforce_rejects_ragged_force_buffers() {
        let mut out = Vec::new();
        let err = write_getforce_response(&mut out, 0.0, &[1.0, 2.0], &[0.0; 9]).unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));
        assert!(out.is_empty());
    }
}
