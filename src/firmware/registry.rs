//! Firmware management direction tables
//!
//! Indexed by CID. Unknown CIDs are tolerated and decode as payload-less
//! commands.

use super::payload::*;
use super::PROTOCOL;
use crate::codec::{PackageVersionAns, PayloadCodec};
use crate::command::{table_entry, Cid, CommandSet, Direction, Entry, UnknownCid};

static UPLINK: [Option<Entry<Payload>>; 6] = [
    Some(table_entry!(Payload::PackageVersionAns, PackageVersionAns)),
    Some(table_entry!(Payload::DevVersionAns, DevVersionAns)),
    Some(table_entry!(Payload::DevRebootTimeAns, DevRebootTime)),
    Some(table_entry!(Payload::DevRebootCountdownAns, DevRebootCountdown)),
    Some(table_entry!(Payload::DevUpgradeImageAns, DevUpgradeImageAns)),
    Some(table_entry!(Payload::DevDeleteImageAns, DevDeleteImageAns)),
];

static DOWNLINK: [Option<Entry<Payload>>; 6] = [
    Some(Entry::empty("PackageVersionReq")),
    Some(Entry::empty("DevVersionReq")),
    Some(table_entry!(Payload::DevRebootTimeReq, DevRebootTime)),
    Some(table_entry!(Payload::DevRebootCountdownReq, DevRebootCountdown)),
    Some(Entry::empty("DevUpgradeImageReq")),
    Some(table_entry!(Payload::DevDeleteImageReq, DevDeleteImageReq)),
];

impl CommandSet for Payload {
    const NAME: &'static str = PROTOCOL;
    const UNKNOWN_CID: UnknownCid = UnknownCid::Tolerate;

    fn lookup(direction: Direction, cid: Cid) -> Option<&'static Entry<Self>> {
        let table: &'static [Option<Entry<Payload>>] = match direction {
            Direction::Uplink => &UPLINK,
            Direction::Downlink => &DOWNLINK,
        };
        table.get(usize::from(cid.0))?.as_ref()
    }

    fn cid(&self) -> Cid {
        match self {
            Payload::PackageVersionAns(_) => super::PACKAGE_VERSION_ANS,
            Payload::DevVersionAns(_) => super::DEV_VERSION_ANS,
            Payload::DevRebootTimeAns(_) => super::DEV_REBOOT_TIME_ANS,
            Payload::DevRebootCountdownAns(_) => super::DEV_REBOOT_COUNTDOWN_ANS,
            Payload::DevUpgradeImageAns(_) => super::DEV_UPGRADE_IMAGE_ANS,
            Payload::DevDeleteImageAns(_) => super::DEV_DELETE_IMAGE_ANS,
            Payload::DevRebootTimeReq(_) => super::DEV_REBOOT_TIME_REQ,
            Payload::DevRebootCountdownReq(_) => super::DEV_REBOOT_COUNTDOWN_REQ,
            Payload::DevDeleteImageReq(_) => super::DEV_DELETE_IMAGE_REQ,
        }
    }

    fn direction(&self) -> Direction {
        match self {
            Payload::DevRebootTimeReq(_)
            | Payload::DevRebootCountdownReq(_)
            | Payload::DevDeleteImageReq(_) => Direction::Downlink,
            _ => Direction::Uplink,
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Payload::PackageVersionAns(p) => p.encode(buf),
            Payload::DevVersionAns(p) => p.encode(buf),
            Payload::DevRebootTimeAns(p) => p.encode(buf),
            Payload::DevRebootCountdownAns(p) => p.encode(buf),
            Payload::DevUpgradeImageAns(p) => p.encode(buf),
            Payload::DevDeleteImageAns(p) => p.encode(buf),
            Payload::DevRebootTimeReq(p) => p.encode(buf),
            Payload::DevRebootCountdownReq(p) => p.encode(buf),
            Payload::DevDeleteImageReq(p) => p.encode(buf),
        }
    }

    fn check(&self) -> std::result::Result<(), &'static str> {
        match self {
            Payload::DevUpgradeImageAns(p) => p.status.check(),
            _ => Ok(()),
        }
    }
}
