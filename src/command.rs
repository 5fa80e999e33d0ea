//! Command definitions
//!
//! A command is a one-byte CID optionally followed by a payload. What the
//! CID means depends on the direction of the frame carrying it, so decoding
//! always takes a [`Direction`] and resolves the payload shape through the
//! protocol's direction tables ([`CommandSet::lookup`]).
//!
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ CID (1)  │   Payload (shape by CID)    │
//! └──────────┴─────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::{LengthError, PayloadLen};
use crate::error::{CodecError, Result};

// =============================================================================
// Direction and CID
// =============================================================================

/// Transmission direction of the frame carrying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Device to network server
    Uplink,

    /// Network server to device
    Downlink,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Uplink, Direction::Downlink];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Uplink => f.write_str("uplink"),
            Direction::Downlink => f.write_str("downlink"),
        }
    }
}

impl FromStr for Direction {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "uplink" | "up" => Ok(Direction::Uplink),
            "downlink" | "down" => Ok(Direction::Downlink),
            other => Err(CodecError::Config(format!(
                "unknown direction '{}' (expected uplink or downlink)",
                other
            ))),
        }
    }
}

/// Command identifier
///
/// The same value names different commands uplink and downlink, so the
/// protocol modules expose their CIDs as plain constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(pub u8);

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

impl From<u8> for Cid {
    fn from(byte: u8) -> Self {
        Cid(byte)
    }
}

// =============================================================================
// Payload Registry
// =============================================================================

/// What a protocol does with a CID missing from its direction table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownCid {
    /// Decode as a payload-less command occupying only the CID byte
    Tolerate,

    /// Fail with [`CodecError::UnknownCommand`]
    Reject,
}

/// One row of a direction table
pub struct Entry<P: 'static> {
    /// Command name, for logs
    pub name: &'static str,

    /// Wire length class of the payload
    pub len: PayloadLen,

    /// Decode a length-checked payload; `None` for payload-less commands
    pub decode: fn(&[u8]) -> std::result::Result<Option<P>, LengthError>,
}

impl<P: 'static> Entry<P> {
    /// Row for a command that carries no payload
    pub const fn empty(name: &'static str) -> Self {
        Self {
            name,
            len: PayloadLen::NONE,
            decode: decode_empty::<P>,
        }
    }

    /// Whether this row describes a payload-less command
    pub fn is_empty(&self) -> bool {
        matches!(self.len, PayloadLen::Fixed(0))
    }
}

/// Row for a payload variant: `table_entry!(Payload::Variant, Type)`
macro_rules! table_entry {
    ($payload:ident :: $variant:ident, $ty:ty) => {
        $crate::command::Entry {
            name: stringify!($variant),
            len: <$ty as $crate::codec::PayloadCodec>::LEN,
            decode: |bytes| {
                let payload = <$ty as $crate::codec::PayloadCodec>::decode(bytes)?;
                Ok(Some($payload::$variant(payload)))
            },
        }
    };
}

pub(crate) use table_entry;

fn decode_empty<P>(bytes: &[u8]) -> std::result::Result<Option<P>, LengthError> {
    PayloadLen::NONE.check(bytes)?;
    Ok(None)
}

/// A closed set of payload variants plus the tables resolving them
///
/// Implemented by each protocol's payload enum.
pub trait CommandSet: Sized + 'static {
    /// Protocol name used as error prefix
    const NAME: &'static str;

    /// Policy for CIDs absent from the direction tables
    const UNKNOWN_CID: UnknownCid;

    /// Resolve the table row for `cid` in `direction`
    fn lookup(direction: Direction, cid: Cid) -> Option<&'static Entry<Self>>;

    /// CID this payload variant is sent under
    fn cid(&self) -> Cid;

    /// Direction this payload variant travels in
    fn direction(&self) -> Direction;

    /// Append the encoded payload (without CID)
    fn encode(&self, buf: &mut Vec<u8>);

    /// Reject field values that would not decode back to `self`
    fn check(&self) -> std::result::Result<(), &'static str> {
        Ok(())
    }

    /// Whether this payload swallows the rest of the buffer when decoded
    fn is_tail(&self) -> bool {
        Self::lookup(self.direction(), self.cid()).map_or(false, |entry| entry.len.is_tail())
    }
}

/// Resolve a row, applying the protocol's unknown-CID policy
///
/// `Ok(None)` means "tolerated unknown CID".
fn resolve<P: CommandSet>(direction: Direction, cid: Cid) -> Result<Option<&'static Entry<P>>> {
    match P::lookup(direction, cid) {
        Some(entry) => Ok(Some(entry)),
        None => match P::UNKNOWN_CID {
            UnknownCid::Tolerate => Ok(None),
            UnknownCid::Reject => Err(CodecError::UnknownCommand {
                protocol: P::NAME,
                direction,
                cid,
            }),
        },
    }
}

// =============================================================================
// Command
// =============================================================================

/// A single command: CID plus optional payload
///
/// Payload-less commands hold `None`, never a zero-valued payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command<P> {
    pub cid: Cid,

    /// Omitted in YAML input for payload-less commands
    pub payload: Option<P>,
}

impl<P: CommandSet> From<P> for Command<P> {
    fn from(payload: P) -> Self {
        Command {
            cid: payload.cid(),
            payload: Some(payload),
        }
    }
}

impl<P: CommandSet> Command<P> {
    /// A payload-less command
    pub fn empty(cid: Cid) -> Self {
        Command { cid, payload: None }
    }

    /// Encode to a fresh buffer
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_to(&mut buf)?;
        Ok(buf)
    }

    /// Append the CID byte and payload to `buf`
    ///
    /// Fails when the payload variant belongs to another CID, or when no
    /// payload is given for a CID that needs one in every direction.
    pub fn encode_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.validate()?;

        let start = buf.len();
        buf.push(self.cid.0);
        if let Some(payload) = &self.payload {
            payload.encode(buf);
        }

        tracing::trace!(
            protocol = P::NAME,
            cid = %self.cid,
            len = buf.len() - start,
            "encoded command"
        );
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let malformed = |reason: &'static str| CodecError::MalformedCommand {
            protocol: P::NAME,
            cid: self.cid,
            reason,
        };

        match &self.payload {
            Some(payload) if payload.cid() != self.cid => {
                Err(malformed("payload belongs to another command identifier"))
            }
            Some(payload) => payload.check().map_err(malformed),
            None => {
                // Valid when some direction reads this CID without a payload.
                let allowed = Direction::ALL.iter().any(|&direction| {
                    match P::lookup(direction, self.cid) {
                        Some(entry) => entry.is_empty(),
                        None => P::UNKNOWN_CID == UnknownCid::Tolerate,
                    }
                });

                if allowed {
                    Ok(())
                } else if Direction::ALL
                    .iter()
                    .all(|&direction| P::lookup(direction, self.cid).is_none())
                {
                    Err(malformed("no payload shape is registered for this identifier"))
                } else {
                    Err(malformed("payload is required"))
                }
            }
        }
    }

    /// Decode a buffer holding exactly one command
    pub fn decode(direction: Direction, bytes: &[u8]) -> Result<Self> {
        let (cid, rest) = split_cid::<P>(bytes)?;

        let payload = match resolve::<P>(direction, cid)? {
            Some(entry) => (entry.decode)(rest),
            None => PayloadLen::NONE.check(rest).map(|_| None),
        }
        .map_err(|e| CodecError::length(P::NAME, e))?;

        Ok(Command { cid, payload })
    }

    /// Decode the command at the front of `bytes`
    ///
    /// Returns the command and the number of bytes it occupied. A
    /// tail-consuming payload takes every remaining byte.
    pub fn decode_prefix(direction: Direction, bytes: &[u8]) -> Result<(Self, usize)> {
        let (cid, rest) = split_cid::<P>(bytes)?;

        let entry = match resolve::<P>(direction, cid)? {
            Some(entry) => entry,
            None => {
                tracing::trace!(protocol = P::NAME, %direction, %cid, "tolerated unknown command");
                return Ok((Command::empty(cid), 1));
            }
        };

        let take = entry.len.wire_len(rest).min(rest.len());
        let payload = (entry.decode)(&rest[..take]).map_err(|e| CodecError::length(P::NAME, e))?;

        tracing::trace!(
            protocol = P::NAME,
            %direction,
            %cid,
            command = entry.name,
            len = 1 + take,
            "decoded command"
        );
        Ok((Command { cid, payload }, 1 + take))
    }

    /// Whether decoding this command would swallow the rest of the buffer
    pub fn is_tail(&self) -> bool {
        self.payload.as_ref().map_or(false, P::is_tail)
    }
}

fn split_cid<P: CommandSet>(bytes: &[u8]) -> Result<(Cid, &[u8])> {
    match bytes.split_first() {
        Some((&cid, rest)) => Ok((Cid(cid), rest)),
        None => Err(CodecError::length(P::NAME, LengthError::new(1))),
    }
}
