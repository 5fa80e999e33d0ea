//! Fragmentation Transport Module
//!
//! Commands of the LoRaWAN fragmented data block transport package (TS004):
//! session setup, status and deletion, missing-fragment reports and the
//! fragments themselves.
//!
//! ## Commands
//! ```text
//! CID   Downlink (server -> device)      Uplink (device -> server)
//! 0x00  PackageVersionReq     (0)        PackageVersionAns          (2)
//! 0x01  FragSessionStatusReq  (1)        FragSessionStatusAns       (4)
//! 0x02  FragSessionSetupReq   (10)       FragSessionSetupAns        (1)
//! 0x03  FragSessionDeleteReq  (1)        FragSessionDeleteAns       (1)
//! 0x05  RetransmitDataFragment (2+tail)
//! 0x06  FragSessionMissingReq (1)        FragSessionMissingListAns  (2+tail)
//! 0x07                                   FragSessionMissingBitAns   (3+tail)
//! 0x08  DataFragment          (2+tail)
//! ```
//!
//! Tail-consuming commands take every remaining byte of the frame payload
//! and must come last.

mod payload;
mod registry;

use crate::command::Cid;

pub use payload::{
    DataFragment, FragControl, FragSession, FragSessionDeleteAns, FragSessionDeleteReq,
    FragSessionMissingBitAns, FragSessionMissingListAns, FragSessionMissingReq,
    FragSessionSetupAns, FragSessionSetupReq, FragSessionStatusAns, FragSessionStatusReq,
    IndexAndN, MissingBitHeader, Payload, ReceivedAndIndex,
};
pub use crate::codec::PackageVersionAns;

/// Error prefix for this package
pub const PROTOCOL: &str = "lorawan/applayer/fragmentation";

/// Package identifier reported in PackageVersionAns
pub const PACKAGE_IDENTIFIER: u8 = 3;

/// Fragmentation transport command
pub type Command = crate::command::Command<Payload>;

pub const PACKAGE_VERSION_REQ: Cid = Cid(0x00);
pub const PACKAGE_VERSION_ANS: Cid = Cid(0x00);
pub const FRAG_SESSION_STATUS_REQ: Cid = Cid(0x01);
pub const FRAG_SESSION_STATUS_ANS: Cid = Cid(0x01);
pub const FRAG_SESSION_SETUP_REQ: Cid = Cid(0x02);
pub const FRAG_SESSION_SETUP_ANS: Cid = Cid(0x02);
pub const FRAG_SESSION_DELETE_REQ: Cid = Cid(0x03);
pub const FRAG_SESSION_DELETE_ANS: Cid = Cid(0x03);
pub const RETRANSMIT_DATA_FRAGMENT: Cid = Cid(0x05);
pub const FRAG_SESSION_MISSING_REQ: Cid = Cid(0x06);
pub const FRAG_SESSION_MISSING_LIST_ANS: Cid = Cid(0x06);
pub const FRAG_SESSION_MISSING_BIT_ANS: Cid = Cid(0x07);
pub const DATA_FRAGMENT: Cid = Cid(0x08);
