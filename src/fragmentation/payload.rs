//! Fragmentation transport payloads
//!
//! Single-byte bitfields convert to and from `u8`, index words to and from
//! `u16`, so each layout can be checked on its own.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::bits;
use crate::codec::{get_u16_list, PackageVersionAns, PayloadCodec, PayloadLen};

/// Payloads of the fragmentation transport package, one variant per
/// (direction, CID) pair that carries data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    // Uplink
    PackageVersionAns(PackageVersionAns),
    FragSessionStatusAns(FragSessionStatusAns),
    FragSessionSetupAns(FragSessionSetupAns),
    FragSessionDeleteAns(FragSessionDeleteAns),
    FragSessionMissingListAns(FragSessionMissingListAns),
    FragSessionMissingBitAns(FragSessionMissingBitAns),

    // Downlink
    FragSessionStatusReq(FragSessionStatusReq),
    FragSessionSetupReq(FragSessionSetupReq),
    FragSessionDeleteReq(FragSessionDeleteReq),
    RetransmitDataFragment(DataFragment),
    FragSessionMissingReq(FragSessionMissingReq),
    DataFragment(DataFragment),
}

// =============================================================================
// Session Status
// =============================================================================

/// FragSessionStatusReq: bit 0 participants, bits 1-2 session index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionStatusReq {
    /// Every device answers when set, only devices missing fragments otherwise
    pub participants: bool,
    pub frag_index: u8,
}

impl From<u8> for FragSessionStatusReq {
    fn from(byte: u8) -> Self {
        Self {
            participants: bits::flag(byte, 0),
            frag_index: bits::get(byte, 1, 2),
        }
    }
}

impl From<FragSessionStatusReq> for u8 {
    fn from(param: FragSessionStatusReq) -> u8 {
        bits::set(param.participants, 0) | bits::put(param.frag_index, 1, 2)
    }
}

impl PayloadCodec for FragSessionStatusReq {
    const LEN: PayloadLen = PayloadLen::Fixed(1);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn decode_unchecked(bytes: &[u8]) -> Self {
        Self::from(bytes[0])
    }
}

/// Index word of FragSessionStatusAns: bits 0-13 fragments received,
/// bits 14-15 session index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceivedAndIndex {
    pub frag_index: u8,
    pub nb_frag_received: u16,
}

impl From<u16> for ReceivedAndIndex {
    fn from(word: u16) -> Self {
        let (frag_index, nb_frag_received) = bits::split_index_word(word);
        Self {
            frag_index,
            nb_frag_received,
        }
    }
}

impl From<ReceivedAndIndex> for u16 {
    fn from(value: ReceivedAndIndex) -> u16 {
        bits::join_index_word(value.frag_index, value.nb_frag_received)
    }
}

/// FragSessionStatusAns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionStatusAns {
    pub received_and_index: ReceivedAndIndex,

    /// Fragments still missing (saturates at 255)
    pub missing_frag: u8,

    /// Status byte, bit 0
    pub not_enough_matrix_memory: bool,
}

impl PayloadCodec for FragSessionStatusAns {
    const LEN: PayloadLen = PayloadLen::Fixed(4);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16_le(u16::from(self.received_and_index));
        buf.put_u8(self.missing_frag);
        buf.put_u8(bits::set(self.not_enough_matrix_memory, 0));
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            received_and_index: ReceivedAndIndex::from(bytes.get_u16_le()),
            missing_frag: bytes.get_u8(),
            not_enough_matrix_memory: bits::flag(bytes.get_u8(), 0),
        }
    }
}

// =============================================================================
// Session Setup
// =============================================================================

/// FragSession byte: bits 0-3 multicast group mask, bits 4-5 session index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSession {
    pub frag_index: u8,

    /// Multicast groups the session is bound to, group 0 in bit 0
    pub mc_group_bit_mask: [bool; 4],
}

impl From<u8> for FragSession {
    fn from(byte: u8) -> Self {
        Self {
            frag_index: bits::get(byte, 4, 2),
            mc_group_bit_mask: bits::unpack_mask(byte),
        }
    }
}

impl From<FragSession> for u8 {
    fn from(session: FragSession) -> u8 {
        bits::put(session.frag_index, 4, 2) | bits::pack_mask(&session.mc_group_bit_mask)
    }
}

/// Control byte: bits 0-2 block ack delay, bits 3-5 fragmentation matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragControl {
    pub fragmentation_matrix: u8,
    pub block_ack_delay: u8,
}

impl From<u8> for FragControl {
    fn from(byte: u8) -> Self {
        Self {
            fragmentation_matrix: bits::get(byte, 3, 3),
            block_ack_delay: bits::get(byte, 0, 3),
        }
    }
}

impl From<FragControl> for u8 {
    fn from(control: FragControl) -> u8 {
        bits::put(control.fragmentation_matrix, 3, 3) | bits::put(control.block_ack_delay, 0, 3)
    }
}

/// FragSessionSetupReq
///
/// ```text
/// ┌──────────────┬────────────┬──────────────┬─────────────┬─────────────┬────────────────┐
/// │FragSession(1)│ NbFrag (2) │ FragSize (1) │ Control (1) │ Padding (1) │ Descriptor (4) │
/// └──────────────┴────────────┴──────────────┴─────────────┴─────────────┴────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionSetupReq {
    pub frag_session: FragSession,
    pub nb_frag: u16,
    pub frag_size: u8,
    pub control: FragControl,
    pub padding: u8,

    /// Opaque file descriptor, copied verbatim
    pub descriptor: [u8; 4],
}

impl PayloadCodec for FragSessionSetupReq {
    const LEN: PayloadLen = PayloadLen::Fixed(10);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(self.frag_session));
        buf.put_u16_le(self.nb_frag);
        buf.put_u8(self.frag_size);
        buf.put_u8(u8::from(self.control));
        buf.put_u8(self.padding);
        buf.put_slice(&self.descriptor);
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        let frag_session = FragSession::from(bytes.get_u8());
        let nb_frag = bytes.get_u16_le();
        let frag_size = bytes.get_u8();
        let control = FragControl::from(bytes.get_u8());
        let padding = bytes.get_u8();
        let mut descriptor = [0u8; 4];
        bytes.copy_to_slice(&mut descriptor);

        Self {
            frag_session,
            nb_frag,
            frag_size,
            control,
            padding,
            descriptor,
        }
    }
}

/// FragSessionSetupAns status byte
///
/// Bits 0-3 are error flags, bits 6-7 the session index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionSetupAns {
    pub frag_index: u8,
    pub wrong_descriptor: bool,
    pub frag_session_index_not_supported: bool,
    pub not_enough_memory: bool,
    pub encoding_unsupported: bool,
}

impl FragSessionSetupAns {
    /// True when the device accepted the session
    pub fn is_ok(&self) -> bool {
        !(self.wrong_descriptor
            || self.frag_session_index_not_supported
            || self.not_enough_memory
            || self.encoding_unsupported)
    }
}

impl From<u8> for FragSessionSetupAns {
    fn from(byte: u8) -> Self {
        Self {
            frag_index: bits::get(byte, 6, 2),
            wrong_descriptor: bits::flag(byte, 3),
            frag_session_index_not_supported: bits::flag(byte, 2),
            not_enough_memory: bits::flag(byte, 1),
            encoding_unsupported: bits::flag(byte, 0),
        }
    }
}

impl From<FragSessionSetupAns> for u8 {
    fn from(status: FragSessionSetupAns) -> u8 {
        bits::put(status.frag_index, 6, 2)
            | bits::set(status.wrong_descriptor, 3)
            | bits::set(status.frag_session_index_not_supported, 2)
            | bits::set(status.not_enough_memory, 1)
            | bits::set(status.encoding_unsupported, 0)
    }
}

impl PayloadCodec for FragSessionSetupAns {
    const LEN: PayloadLen = PayloadLen::Fixed(1);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn decode_unchecked(bytes: &[u8]) -> Self {
        Self::from(bytes[0])
    }
}

// =============================================================================
// Session Delete
// =============================================================================

/// FragSessionDeleteReq: bits 0-1 session index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionDeleteReq {
    pub frag_index: u8,
}

impl PayloadCodec for FragSessionDeleteReq {
    const LEN: PayloadLen = PayloadLen::Fixed(1);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(bits::put(self.frag_index, 0, 2));
    }

    fn decode_unchecked(bytes: &[u8]) -> Self {
        Self {
            frag_index: bits::get(bytes[0], 0, 2),
        }
    }
}

/// FragSessionDeleteAns: bits 0-1 session index, bit 2 session does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionDeleteAns {
    pub frag_index: u8,
    pub session_does_not_exist: bool,
}

impl From<u8> for FragSessionDeleteAns {
    fn from(byte: u8) -> Self {
        Self {
            frag_index: bits::get(byte, 0, 2),
            session_does_not_exist: bits::flag(byte, 2),
        }
    }
}

impl From<FragSessionDeleteAns> for u8 {
    fn from(status: FragSessionDeleteAns) -> u8 {
        bits::put(status.frag_index, 0, 2) | bits::set(status.session_does_not_exist, 2)
    }
}

impl PayloadCodec for FragSessionDeleteAns {
    const LEN: PayloadLen = PayloadLen::Fixed(1);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn decode_unchecked(bytes: &[u8]) -> Self {
        Self::from(bytes[0])
    }
}

// =============================================================================
// Fragments
// =============================================================================

/// Index word of a fragment: bits 0-13 fragment number, bits 14-15 session index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexAndN {
    pub frag_index: u8,
    pub n: u16,
}

impl From<u16> for IndexAndN {
    fn from(word: u16) -> Self {
        let (frag_index, n) = bits::split_index_word(word);
        Self { frag_index, n }
    }
}

impl From<IndexAndN> for u16 {
    fn from(value: IndexAndN) -> u16 {
        bits::join_index_word(value.frag_index, value.n)
    }
}

/// DataFragment / RetransmitDataFragment: index word plus fragment bytes
///
/// The fragment bytes run to the end of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataFragment {
    pub index_and_n: IndexAndN,
    pub data: Vec<u8>,
}

impl PayloadCodec for DataFragment {
    const LEN: PayloadLen = PayloadLen::AtLeast(2);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16_le(u16::from(self.index_and_n));
        buf.put_slice(&self.data);
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            index_and_n: IndexAndN::from(bytes.get_u16_le()),
            data: bytes.to_vec(),
        }
    }
}

// =============================================================================
// Missing Fragments
// =============================================================================

/// FragSessionMissingReq: bit 0 participants, bits 1-2 session index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionMissingReq {
    pub participants: bool,
    pub frag_index: u8,
}

impl From<u8> for FragSessionMissingReq {
    fn from(byte: u8) -> Self {
        Self {
            participants: bits::flag(byte, 0),
            frag_index: bits::get(byte, 1, 2),
        }
    }
}

impl From<FragSessionMissingReq> for u8 {
    fn from(param: FragSessionMissingReq) -> u8 {
        bits::set(param.participants, 0) | bits::put(param.frag_index, 1, 2)
    }
}

impl PayloadCodec for FragSessionMissingReq {
    const LEN: PayloadLen = PayloadLen::Fixed(1);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn decode_unchecked(bytes: &[u8]) -> Self {
        Self::from(bytes[0])
    }
}

/// Header word of FragSessionMissingBitAns: bits 0-13 first fragment covered
/// by the bit array, bits 14-15 session index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MissingBitHeader {
    pub frag_index: u8,
    pub bit_array_start_index: u16,
}

impl From<u16> for MissingBitHeader {
    fn from(word: u16) -> Self {
        let (frag_index, bit_array_start_index) = bits::split_index_word(word);
        Self {
            frag_index,
            bit_array_start_index,
        }
    }
}

impl From<MissingBitHeader> for u16 {
    fn from(header: MissingBitHeader) -> u16 {
        bits::join_index_word(header.frag_index, header.bit_array_start_index)
    }
}

/// FragSessionMissingBitAns: missing fragments as a received-bit array
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionMissingBitAns {
    pub header: MissingBitHeader,
    pub num_missing_ans: u8,

    /// One bit per fragment from `bit_array_start_index`; runs to the end
    /// of the buffer
    pub received_bit_array: Vec<u8>,
}

impl PayloadCodec for FragSessionMissingBitAns {
    const LEN: PayloadLen = PayloadLen::AtLeast(3);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16_le(u16::from(self.header));
        buf.put_u8(self.num_missing_ans);
        buf.put_slice(&self.received_bit_array);
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            header: MissingBitHeader::from(bytes.get_u16_le()),
            num_missing_ans: bytes.get_u8(),
            received_bit_array: bytes.to_vec(),
        }
    }
}

/// FragSessionMissingListAns: missing fragments as an explicit list
///
/// The list is little-endian u16 values up to the end of the buffer; its
/// length is never transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragSessionMissingListAns {
    /// Header byte, bits 0-1
    pub frag_index: u8,
    pub num_missing_ans: u8,
    /// Little-endian u16 values filling the rest of the payload. On decode
    /// an odd trailing byte belongs to no value and is dropped, so such a
    /// buffer re-encodes one byte shorter.
    pub missing_list: Vec<u16>,
}

impl PayloadCodec for FragSessionMissingListAns {
    const LEN: PayloadLen = PayloadLen::AtLeast(2);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(bits::put(self.frag_index, 0, 2));
        buf.put_u8(self.num_missing_ans);
        for &fragment in &self.missing_list {
            buf.put_u16_le(fragment);
        }
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            frag_index: bits::get(bytes.get_u8(), 0, 2),
            num_missing_ans: bytes.get_u8(),
            missing_list: get_u16_list(bytes),
        }
    }
}
