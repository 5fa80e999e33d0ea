//! Firmware management payloads

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::bits;
use crate::codec::{PackageVersionAns, PayloadCodec, PayloadLen};

/// Payloads of the firmware management package, one variant per
/// (direction, CID) pair that carries data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    // Uplink
    PackageVersionAns(PackageVersionAns),
    DevVersionAns(DevVersionAns),
    DevRebootTimeAns(DevRebootTime),
    DevRebootCountdownAns(DevRebootCountdown),
    DevUpgradeImageAns(DevUpgradeImageAns),
    DevDeleteImageAns(DevDeleteImageAns),

    // Downlink
    DevRebootTimeReq(DevRebootTime),
    DevRebootCountdownReq(DevRebootCountdown),
    DevDeleteImageReq(DevDeleteImageReq),
}

// =============================================================================
// Version
// =============================================================================

/// DevVersionAns: running firmware and hardware versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DevVersionAns {
    pub fw_version: u32,
    pub hw_version: u32,
}

impl PayloadCodec for DevVersionAns {
    const LEN: PayloadLen = PayloadLen::Fixed(8);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.fw_version);
        buf.put_u32_le(self.hw_version);
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            fw_version: bytes.get_u32_le(),
            hw_version: bytes.get_u32_le(),
        }
    }
}

// =============================================================================
// Reboot Scheduling
// =============================================================================

/// DevRebootTimeReq / DevRebootTimeAns: reboot at a GPS epoch time (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DevRebootTime {
    pub reboot_time: u32,
}

impl DevRebootTime {
    /// Reboot immediately
    pub const NOW: u32 = 0;

    /// Cancel any pending reboot
    pub const CANCEL: u32 = u32::MAX;

    pub fn is_cancel(&self) -> bool {
        self.reboot_time == Self::CANCEL
    }
}

impl PayloadCodec for DevRebootTime {
    const LEN: PayloadLen = PayloadLen::Fixed(4);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.reboot_time);
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            reboot_time: bytes.get_u32_le(),
        }
    }
}

/// DevRebootCountdownReq / DevRebootCountdownAns: reboot after a countdown
///
/// The countdown is a 24-bit value; higher bits are dropped on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DevRebootCountdown {
    pub countdown: u32,
}

impl DevRebootCountdown {
    /// Reboot immediately
    pub const NOW: u32 = 0;

    /// Cancel any pending reboot
    pub const CANCEL: u32 = 0x00ff_ffff;

    pub fn is_cancel(&self) -> bool {
        self.countdown == Self::CANCEL
    }
}

impl PayloadCodec for DevRebootCountdown {
    const LEN: PayloadLen = PayloadLen::Fixed(3);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_uint_le(u64::from(self.countdown & Self::CANCEL), 3);
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            countdown: bytes.get_uint_le(3) as u32,
        }
    }
}

// =============================================================================
// Image Management
// =============================================================================

const UP_IMAGE_VALID: u8 = 3;

/// Status reported in DevUpgradeImageAns (bits 0-2 of the status byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeImageStatus {
    NoImage,
    CorruptImage,
    IncompatibleImage,
    /// Valid image present; carries the version it will install
    ValidImage { next_firmware_image_version: u32 },
    /// Status value not defined by the package (4..=7)
    Reserved(u8),
}

impl UpgradeImageStatus {
    /// Codes carried by [`UpgradeImageStatus::Reserved`]
    pub const RESERVED: std::ops::RangeInclusive<u8> = 4..=7;

    /// Reserved codes outside 4..=7 alias a defined status on the wire.
    pub fn check(&self) -> Result<(), &'static str> {
        match *self {
            UpgradeImageStatus::Reserved(code) if !Self::RESERVED.contains(&code) => {
                Err("reserved upgrade image status must be in 4..=7")
            }
            _ => Ok(()),
        }
    }

    fn code(&self) -> u8 {
        match *self {
            UpgradeImageStatus::NoImage => 0,
            UpgradeImageStatus::CorruptImage => 1,
            UpgradeImageStatus::IncompatibleImage => 2,
            UpgradeImageStatus::ValidImage { .. } => UP_IMAGE_VALID,
            UpgradeImageStatus::Reserved(code) => code,
        }
    }
}

/// DevUpgradeImageAns: 1 status byte, plus the next firmware version
/// (u32) only when the image is valid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevUpgradeImageAns {
    pub status: UpgradeImageStatus,
}

fn has_next_version(bytes: &[u8]) -> bool {
    bytes
        .first()
        .map_or(false, |&status| bits::get(status, 0, 3) == UP_IMAGE_VALID)
}

impl PayloadCodec for DevUpgradeImageAns {
    const LEN: PayloadLen = PayloadLen::Extended {
        base: 1,
        extended: 5,
        extends: has_next_version,
    };

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(bits::put(self.status.code(), 0, 3));
        if let UpgradeImageStatus::ValidImage {
            next_firmware_image_version,
        } = self.status
        {
            buf.put_u32_le(next_firmware_image_version);
        }
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        let status = match bits::get(bytes.get_u8(), 0, 3) {
            0 => UpgradeImageStatus::NoImage,
            1 => UpgradeImageStatus::CorruptImage,
            2 => UpgradeImageStatus::IncompatibleImage,
            UP_IMAGE_VALID => UpgradeImageStatus::ValidImage {
                next_firmware_image_version: bytes.get_u32_le(),
            },
            code => UpgradeImageStatus::Reserved(code),
        };
        Self { status }
    }
}

/// DevDeleteImageReq: version of the stored image to delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DevDeleteImageReq {
    pub firmware_to_delete_version: u32,
}

impl PayloadCodec for DevDeleteImageReq {
    const LEN: PayloadLen = PayloadLen::Fixed(4);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.firmware_to_delete_version);
    }

    fn decode_unchecked(mut bytes: &[u8]) -> Self {
        Self {
            firmware_to_delete_version: bytes.get_u32_le(),
        }
    }
}

/// DevDeleteImageAns status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DevDeleteImageAns {
    /// bit 0
    pub error_no_valid_image: bool,
    /// bit 1
    pub error_invalid_version: bool,
}

impl From<u8> for DevDeleteImageAns {
    fn from(byte: u8) -> Self {
        Self {
            error_no_valid_image: bits::flag(byte, 0),
            error_invalid_version: bits::flag(byte, 1),
        }
    }
}

impl From<DevDeleteImageAns> for u8 {
    fn from(status: DevDeleteImageAns) -> u8 {
        bits::set(status.error_no_valid_image, 0) | bits::set(status.error_invalid_version, 1)
    }
}

impl PayloadCodec for DevDeleteImageAns {
    const LEN: PayloadLen = PayloadLen::Fixed(1);

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn decode_unchecked(bytes: &[u8]) -> Self {
        Self::from(bytes[0])
    }
}
