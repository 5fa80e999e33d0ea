//! Payload codec contract
//!
//! Every payload variant knows its own wire size and bit layout. The
//! command layer only sees this trait and the [`PayloadLen`] class of each
//! registered shape.
//!
//! ## Length classes
//! ```text
//! Fixed(n)      exactly n bytes
//! AtLeast(n)    n header bytes + tail consuming the rest of the buffer
//! Extended      base bytes, or `extended` bytes when the first byte says so
//! ```
//!
//! All multi-byte integers are little-endian.

pub mod bits;

use std::fmt;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Length Validation
// =============================================================================

/// Byte count rendered with the grammatical number the count needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteCount(pub usize);

impl fmt::Display for ByteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => write!(f, "1 byte is"),
            n => write!(f, "{} bytes are", n),
        }
    }
}

/// Payload slice does not have the length its shape requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{expected} expected")]
pub struct LengthError {
    expected: ByteCount,
}

impl LengthError {
    pub fn new(expected: usize) -> Self {
        Self {
            expected: ByteCount(expected),
        }
    }

    /// Exact (or minimum, for tail-consuming shapes) byte count required
    pub fn expected(&self) -> usize {
        self.expected.0
    }
}

/// How many bytes a payload shape occupies on the wire
#[derive(Debug, Clone, Copy)]
pub enum PayloadLen {
    /// Exactly this many bytes
    Fixed(usize),

    /// A fixed header of this many bytes followed by a tail that consumes
    /// every remaining byte
    AtLeast(usize),

    /// `base` bytes, or `extended` bytes when `extends` holds for the
    /// payload bytes (inspected from the first byte onwards)
    Extended {
        base: usize,
        extended: usize,
        extends: fn(&[u8]) -> bool,
    },
}

impl PayloadLen {
    /// Shape of a command that carries no payload
    pub const NONE: PayloadLen = PayloadLen::Fixed(0);

    /// Bytes this shape occupies at the front of `rest`
    ///
    /// May exceed `rest.len()`, in which case decoding `rest` fails with the
    /// returned count.
    pub fn wire_len(&self, rest: &[u8]) -> usize {
        match *self {
            PayloadLen::Fixed(n) => n,
            PayloadLen::AtLeast(n) => rest.len().max(n),
            PayloadLen::Extended {
                base,
                extended,
                extends,
            } => {
                if rest.len() >= base && extends(rest) {
                    extended
                } else {
                    base
                }
            }
        }
    }

    /// Whether the shape ends with a tail that swallows the rest of the buffer
    pub fn is_tail(&self) -> bool {
        matches!(self, PayloadLen::AtLeast(_))
    }

    /// Validate a complete payload slice against this shape
    pub fn check(&self, bytes: &[u8]) -> Result<(), LengthError> {
        let expected = self.wire_len(bytes);
        let ok = match *self {
            PayloadLen::AtLeast(n) => bytes.len() >= n,
            _ => bytes.len() == expected,
        };

        if ok {
            Ok(())
        } else {
            Err(LengthError::new(expected))
        }
    }
}

// =============================================================================
// Payload Codec Trait
// =============================================================================

/// Encode/decode pair for a single payload variant
pub trait PayloadCodec: Sized {
    /// Wire length class of this payload
    const LEN: PayloadLen;

    /// Append the encoded payload to `buf`
    ///
    /// Never fails: out-of-range sub-byte fields are masked to their width.
    fn encode<B: BufMut>(&self, buf: &mut B);

    /// Decode from a slice holding exactly this payload
    ///
    /// `bytes` has already passed [`PayloadLen::check`].
    fn decode_unchecked(bytes: &[u8]) -> Self;

    /// Validate the length of `bytes`, then decode
    fn decode(bytes: &[u8]) -> Result<Self, LengthError> {
        Self::LEN.check(bytes)?;
        Ok(Self::decode_unchecked(bytes))
    }

    /// Encode into a fresh buffer
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

// =============================================================================
// Shared Payloads
// =============================================================================

/// PackageVersionAns, identical in every application-layer package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageVersionAns {
    /// Package identifier (3 = fragmentation, 4 = firmware management)
    pub package_identifier: u8,

    /// Version of the package implemented by the device
    pub package_version: u8,
}

impl PayloadCodec for PackageVersionAns {
    const LEN: PayloadLen = PayloadLen::Fixed(2);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.package_identifier);
        buf.put_u8(self.package_version);
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            package_identifier: bytes.get_u8(),
            package_version: bytes.get_u8(),
        }
    }
}

/// Read the remainder of `bytes` as little-endian `u16` values
///
/// A dangling odd byte at the end is not part of any value and is dropped.
pub(crate) fn get_u16_list(mut bytes: &[u8]) -> Vec<u16> {
    let mut values = Vec::with_capacity(bytes.len() / 2);
    while bytes.remaining() >= 2 {
        values.push(bytes.get_u16_le());
    }
    values
}
