//! Bit-packing helpers
//!
//! Sub-byte fields are described by a bit offset (`shift`) and a width.
//! Values are masked to their width on encode and unused bits are ignored
//! on decode.

/// Mask covering the low `width` bits
const fn mask(width: u32) -> u8 {
    if width >= 8 {
        u8::MAX
    } else {
        (1u8 << width) - 1
    }
}

/// Extract the `width`-bit field at `shift`
pub const fn get(byte: u8, shift: u32, width: u32) -> u8 {
    (byte >> shift) & mask(width)
}

/// Position `value` as the `width`-bit field at `shift`
pub const fn put(value: u8, shift: u32, width: u32) -> u8 {
    (value & mask(width)) << shift
}

/// Read the single-bit flag at `bit`
pub const fn flag(byte: u8, bit: u32) -> bool {
    (byte >> bit) & 1 == 1
}

/// Position a single-bit flag at `bit`
pub const fn set(flag: bool, bit: u32) -> u8 {
    (flag as u8) << bit
}

/// Pack booleans one bit per element, element 0 in bit 0
pub fn pack_mask<const N: usize>(bits: &[bool; N]) -> u8 {
    bits.iter()
        .take(8)
        .enumerate()
        .fold(0, |byte, (i, &bit)| byte | set(bit, i as u32))
}

/// Unpack the low `N` bits of `byte`, bit 0 into element 0
pub fn unpack_mask<const N: usize>(byte: u8) -> [bool; N] {
    let mut bits = [false; N];
    for (i, bit) in bits.iter_mut().enumerate().take(8) {
        *bit = flag(byte, i as u32);
    }
    bits
}

// =============================================================================
// Index Words
// =============================================================================
//
// Several fragmentation payloads open with a little-endian u16 holding a
// 14-bit counter in bits 0-13 and a 2-bit session index in bits 14-15.

const COUNTER_MASK: u16 = 0x3fff;

/// Split an index word into `(index, counter)`
pub const fn split_index_word(word: u16) -> (u8, u16) {
    ((word >> 14) as u8, word & COUNTER_MASK)
}

/// Join a 2-bit index and a 14-bit counter into one word
pub const fn join_index_word(index: u8, counter: u16) -> u16 {
    ((index as u16 & 0x03) << 14) | (counter & COUNTER_MASK)
}
