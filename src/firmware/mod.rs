//! Firmware Management Module
//!
//! Commands of the LoRaWAN firmware management package (TS006): version
//! queries, reboot scheduling and stored image management.
//!
//! ## Commands
//! ```text
//! CID   Downlink (server -> device)     Uplink (device -> server)
//! 0x00  PackageVersionReq  (0)          PackageVersionAns     (2)
//! 0x01  DevVersionReq      (0)          DevVersionAns         (8)
//! 0x02  DevRebootTimeReq   (4)          DevRebootTimeAns      (4)
//! 0x03  DevRebootCountdownReq (3)       DevRebootCountdownAns (3)
//! 0x04  DevUpgradeImageReq (0)          DevUpgradeImageAns    (1 or 5)
//! 0x05  DevDeleteImageReq  (4)          DevDeleteImageAns     (1)
//! ```

mod payload;
mod registry;

use crate::command::Cid;

pub use payload::{
    DevDeleteImageAns, DevDeleteImageReq, DevRebootCountdown, DevRebootTime, DevUpgradeImageAns,
    DevVersionAns, Payload, UpgradeImageStatus,
};
pub use crate::codec::PackageVersionAns;

/// Error prefix for this package
pub const PROTOCOL: &str = "lorawan/applayer/firmwaremanagement";

/// Package identifier reported in PackageVersionAns
pub const PACKAGE_IDENTIFIER: u8 = 4;

/// Firmware management command
pub type Command = crate::command::Command<Payload>;

pub const PACKAGE_VERSION_REQ: Cid = Cid(0x00);
pub const PACKAGE_VERSION_ANS: Cid = Cid(0x00);
pub const DEV_VERSION_REQ: Cid = Cid(0x01);
pub const DEV_VERSION_ANS: Cid = Cid(0x01);
pub const DEV_REBOOT_TIME_REQ: Cid = Cid(0x02);
pub const DEV_REBOOT_TIME_ANS: Cid = Cid(0x02);
pub const DEV_REBOOT_COUNTDOWN_REQ: Cid = Cid(0x03);
pub const DEV_REBOOT_COUNTDOWN_ANS: Cid = Cid(0x03);
pub const DEV_UPGRADE_IMAGE_REQ: Cid = Cid(0x04);
pub const DEV_UPGRADE_IMAGE_ANS: Cid = Cid(0x04);
pub const DEV_DELETE_IMAGE_REQ: Cid = Cid(0x05);
pub const DEV_DELETE_IMAGE_ANS: Cid = Cid(0x05);
