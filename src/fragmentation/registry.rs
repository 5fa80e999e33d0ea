//! Fragmentation transport direction tables
//!
//! Indexed by CID. Unknown CIDs are rejected: a data stream cannot be
//! framed past a command whose length is unknown.

use super::payload::*;
use super::PROTOCOL;
use crate::codec::{PackageVersionAns, PayloadCodec};
use crate::command::{table_entry, Cid, CommandSet, Direction, Entry, UnknownCid};

static UPLINK: [Option<Entry<Payload>>; 8] = [
    Some(table_entry!(Payload::PackageVersionAns, PackageVersionAns)),
    Some(table_entry!(Payload::FragSessionStatusAns, FragSessionStatusAns)),
    Some(table_entry!(Payload::FragSessionSetupAns, FragSessionSetupAns)),
    Some(table_entry!(Payload::FragSessionDeleteAns, FragSessionDeleteAns)),
    None,
    None,
    Some(table_entry!(Payload::FragSessionMissingListAns, FragSessionMissingListAns)),
    Some(table_entry!(Payload::FragSessionMissingBitAns, FragSessionMissingBitAns)),
];

static DOWNLINK: [Option<Entry<Payload>>; 9] = [
    Some(Entry::empty("PackageVersionReq")),
    Some(table_entry!(Payload::FragSessionStatusReq, FragSessionStatusReq)),
    Some(table_entry!(Payload::FragSessionSetupReq, FragSessionSetupReq)),
    Some(table_entry!(Payload::FragSessionDeleteReq, FragSessionDeleteReq)),
    None,
    Some(table_entry!(Payload::RetransmitDataFragment, DataFragment)),
    Some(table_entry!(Payload::FragSessionMissingReq, FragSessionMissingReq)),
    None,
    Some(table_entry!(Payload::DataFragment, DataFragment)),
];

impl CommandSet for Payload {
    const NAME: &'static str = PROTOCOL;
    const UNKNOWN_CID: UnknownCid = UnknownCid::Reject;

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
            Payload::FragSessionStatusAns(_) => super::FRAG_SESSION_STATUS_ANS,
            Payload::FragSessionSetupAns(_) => super::FRAG_SESSION_SETUP_ANS,
            Payload::FragSessionDeleteAns(_) => super::FRAG_SESSION_DELETE_ANS,
            Payload::FragSessionMissingListAns(_) => super::FRAG_SESSION_MISSING_LIST_ANS,
            Payload::FragSessionMissingBitAns(_) => super::FRAG_SESSION_MISSING_BIT_ANS,
            Payload::FragSessionStatusReq(_) => super::FRAG_SESSION_STATUS_REQ,
            Payload::FragSessionSetupReq(_) => super::FRAG_SESSION_SETUP_REQ,
            Payload::FragSessionDeleteReq(_) => super::FRAG_SESSION_DELETE_REQ,
            Payload::RetransmitDataFragment(_) => super::RETRANSMIT_DATA_FRAGMENT,
            Payload::FragSessionMissingReq(_) => super::FRAG_SESSION_MISSING_REQ,
            Payload::DataFragment(_) => super::DATA_FRAGMENT,
        }
    }

    fn direction(&self) -> Direction {
        match self {
            Payload::PackageVersionAns(_)
            | Payload::FragSessionStatusAns(_)
            | Payload::FragSessionSetupAns(_)
            | Payload::FragSessionDeleteAns(_)
            | Payload::FragSessionMissingListAns(_)
            | Payload::FragSessionMissingBitAns(_) => Direction::Uplink,
            _ => Direction::Downlink,
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Payload::PackageVersionAns(p) => p.encode(buf),
            Payload::FragSessionStatusAns(p) => p.encode(buf),
            Payload::FragSessionSetupAns(p) => p.encode(buf),
            Payload::FragSessionDeleteAns(p) => p.encode(buf),
            Payload::FragSessionMissingListAns(p) => p.encode(buf),
            Payload::FragSessionMissingBitAns(p) => p.encode(buf),
            Payload::FragSessionStatusReq(p) => p.encode(buf),
            Payload::FragSessionSetupReq(p) => p.encode(buf),
            Payload::FragSessionDeleteReq(p) => p.encode(buf),
            Payload::RetransmitDataFragment(p) | Payload::DataFragment(p) => p.encode(buf),
            Payload::FragSessionMissingReq(p) => p.encode(buf),
        }
    }
}
