//! Wire format.
//!
//! Client to server: one direction token per line (`UP`, `DOWN`, `LEFT`, `RIGHT`).
//! Server to client: a big-endian `u32` byte length followed by a bincode
//! encoded [`Snapshot`].
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Read, Write};
use std::net::SocketAddr;
use std::str::FromStr;

use bincode::{Decode, Encode};

use crate::error::{Error, Result};

/// Frames larger than this are rejected before allocating.
pub const MAX_FRAME: u32 = 1 << 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn token(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            "LEFT" => Ok(Direction::Left),
            "RIGHT" => Ok(Direction::Right),
            other => Err(Error::Protocol(format!("unknown direction {other:?}"))),
        }
    }
}

/// Every connected player's position, keyed by the peer address the server sees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct Snapshot {
    pub players: BTreeMap<SocketAddr, (i32, i32)>,
}

pub fn write_token<W: Write>(w: &mut W, dir: Direction) -> Result<()> {
    writeln!(w, "{}", dir.token())?;
    w.flush()?;
    Ok(())
}

/// Next token, or `None` at end of stream. Blank lines are skipped.
pub fn read_token<R: BufRead>(r: &mut R) -> Result<Option<Direction>> {
    let mut line = String::new();
    loop {
        line.clear();
        if r.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            return line.parse().map(Some);
        }
    }
}

pub fn encode_frame(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let body = bincode::encode_to_vec(snapshot, bincode::config::standard())
        .map_err(|e| Error::Protocol(format!("encode: {e}")))?;
    let len = u32::try_from(body.len())
        .ok()
        .filter(|&n| n <= MAX_FRAME)
        .ok_or_else(|| Error::Protocol(format!("frame of {} bytes is too large", body.len())))?;
    let mut out = Vec::with_capacity(4 + body.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn write_frame<W: Write>(w: &mut W, snapshot: &Snapshot) -> Result<()> {
    w.write_all(&encode_frame(snapshot)?)?;
    w.flush()?;
    Ok(())
}

/// Next frame, or `None` when the stream ends cleanly between frames.
pub fn read_frame<R: Read>(r: &mut R) -> Result<Option<Snapshot>> {
    let mut header = [0u8; 4];
    match r.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let len = u32::from_be_bytes(header);
    if len > MAX_FRAME {
        return Err(Error::Protocol(format!("frame of {len} bytes is too large")));
    }
    let mut body = vec![0u8; len as usize];
    r.read_exact(&mut body)?;
    let (snapshot, _) = bincode::decode_from_slice(&body, bincode::config::standard())
        .map_err(|e| Error::Protocol(format!("decode: {e}")))?;
    Ok(Some(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn snapshot() -> Snapshot {
        let mut players = BTreeMap::new();
        players.insert("10.0.0.1:4000".parse().unwrap(), (20, 20));
        players.insert("10.0.0.2:4001".parse().unwrap(), (780, 580));
        Snapshot { players }
    }

    #[test]
    fn frames_are_length_prefixed() {
        let bytes = encode_frame(&snapshot()).unwrap();
        let len = u32::from_be_bytes(bytes[..4].try_into().unwrap()) as usize;
        assert_eq!(len, bytes.len() - 4);
    }

    #[test]
    fn consecutive_frames_then_clean_eof() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &snapshot()).unwrap();
        write_frame(&mut buf, &Snapshot::default()).unwrap();
        let mut r = Cursor::new(buf);
        assert_eq!(read_frame(&mut r).unwrap(), Some(snapshot()));
        assert_eq!(read_frame(&mut r).unwrap(), Some(Snapshot::default()));
        assert_eq!(read_frame(&mut r).unwrap(), None);
    }

    #[test]
    fn truncated_body_is_an_error() {
        let mut bytes = encode_frame(&snapshot()).unwrap();
        bytes.truncate(bytes.len() - 2);
        assert!(read_frame(&mut Cursor::new(bytes)).is_err());
    }

    #[test]
    fn oversized_header_is_rejected() {
        let bytes = (MAX_FRAME + 1).to_be_bytes().to_vec();
        assert!(matches!(read_frame(&mut Cursor::new(bytes)), Err(Error::Protocol(_))));
    }

    #[test]
    fn tokens_parse_per_line() {
        let mut r = Cursor::new(b"UP\n\nLEFT\r\nJUMP\n".to_vec());
        assert_eq!(read_token(&mut r).unwrap(), Some(Direction::Up));
        assert_eq!(read_token(&mut r).unwrap(), Some(Direction::Left));
        assert!(read_token(&mut r).is_err());
        assert_eq!(read_token(&mut r).unwrap(), None);
    }
}
