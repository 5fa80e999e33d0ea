//! Command Sequence Tests
//!
//! These tests verify:
//! - Encoding is the in-order concatenation of command encodings
//! - Decoding K = 0, 1, many commands back to the same sequence
//! - Fail-closed decoding (no partial results)
//! - Placement of tail-consuming commands
//! - Parallel use from independent threads

use lorawan_applayer::fragmentation::{
    self, DataFragment, FragSessionDeleteAns, FragSessionSetupAns, FragSessionStatusReq,
    IndexAndN, Payload,
};
use lorawan_applayer::{
    decode_commands, encode_commands, firmware, Cid, CodecError, Command, Direction,
};

// =============================================================================
// Helpers
// =============================================================================

fn fragment(n: u16, data: &[u8]) -> Command<Payload> {
    Command::from(Payload::DataFragment(DataFragment {
        index_and_n: IndexAndN { frag_index: 1, n },
        data: data.to_vec(),
    }))
}

fn uplink_answers() -> Vec<Command<Payload>> {
    vec![
        Command::from(Payload::FragSessionSetupAns(FragSessionSetupAns {
            frag_index: 3,
            wrong_descriptor: true,
            frag_session_index_not_supported: true,
            not_enough_memory: true,
            encoding_unsupported: true,
        })),
        Command::from(Payload::FragSessionDeleteAns(FragSessionDeleteAns {
            frag_index: 1,
            session_does_not_exist: false,
        })),
        Command::from(Payload::FragSessionSetupAns(FragSessionSetupAns::default())),
    ]
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn test_empty_sequence() {
    let bytes = encode_commands::<Payload>(&[]).unwrap();
    assert!(bytes.is_empty());

    let commands = decode_commands::<Payload>(Direction::Uplink, &[]).unwrap();
    assert!(commands.is_empty());
}

#[test]
fn test_sequence_is_concatenation() {
    let commands = uplink_answers();

    let expected: Vec<u8> = commands
        .iter()
        .flat_map(|command| command.encode().unwrap())
        .collect();
    let bytes = encode_commands(&commands).unwrap();

    assert_eq!(bytes, expected);
    assert_eq!(bytes, [0x02, 0xcf, 0x03, 0x01, 0x02, 0x00]);
}

#[test]
fn test_sequence_round_trip() {
    let commands = uplink_answers();
    let bytes = encode_commands(&commands).unwrap();

    let decoded = decode_commands::<Payload>(Direction::Uplink, &bytes).unwrap();
    assert_eq!(decoded, commands);
    assert_eq!(encode_commands(&decoded).unwrap(), bytes);
}

#[test]
fn test_sequence_is_deterministic() {
    let commands = uplink_answers();
    assert_eq!(
        encode_commands(&commands).unwrap(),
        encode_commands(&commands).unwrap()
    );
}

#[test]
fn test_repeated_cids_allowed() {
    let commands = vec![
        Command::from(Payload::FragSessionStatusReq(FragSessionStatusReq {
            participants: false,
            frag_index: 1,
        })),
        Command::from(Payload::FragSessionStatusReq(FragSessionStatusReq {
            participants: true,
            frag_index: 2,
        })),
        Command::empty(fragmentation::PACKAGE_VERSION_REQ),
        fragment(7, &[0xaa, 0xbb]),
    ];

    let bytes = encode_commands(&commands).unwrap();
    assert_eq!(bytes, [0x01, 0x02, 0x01, 0x05, 0x00, 0x08, 0x07, 0x40, 0xaa, 0xbb]);

    let decoded = decode_commands::<Payload>(Direction::Downlink, &bytes).unwrap();
    assert_eq!(decoded, commands);
}

#[test]
fn test_firmware_sequence() {
    let bytes = [0x00, 0x01, 0x03, 0x10, 0x0e, 0x00];
    let commands = decode_commands::<firmware::Payload>(Direction::Downlink, &bytes).unwrap();

    assert_eq!(
        commands,
        vec![
            firmware::Command::empty(firmware::PACKAGE_VERSION_REQ),
            firmware::Command::empty(firmware::DEV_VERSION_REQ),
            firmware::Command::from(firmware::Payload::DevRebootCountdownReq(
                firmware::DevRebootCountdown { countdown: 3600 }
            )),
        ]
    );
    assert_eq!(encode_commands(&commands).unwrap(), bytes);
}

// =============================================================================
// Tail-Consuming Commands
// =============================================================================

#[test]
fn test_tail_command_consumes_rest() {
    // A second DataFragment CID inside the tail is data, not a command
    let bytes = [0x08, 0x01, 0x40, 0x08, 0x02, 0x40];
    let commands = decode_commands::<Payload>(Direction::Downlink, &bytes).unwrap();

    assert_eq!(commands, vec![fragment(1, &[0x08, 0x02, 0x40])]);
}

#[test]
fn test_tail_command_must_be_last() {
    let commands = vec![fragment(1, &[0x01]), fragment(2, &[0x02])];

    let err = encode_commands(&commands).unwrap_err();
    assert!(matches!(
        err,
        CodecError::MalformedCommand {
            cid: Cid(0x08),
            ..
        }
    ));
}

#[test]
fn test_tail_command_last_is_valid() {
    let commands = vec![
        Command::empty(fragmentation::PACKAGE_VERSION_REQ),
        fragment(9, &[0x01, 0x02]),
    ];

    let bytes = encode_commands(&commands).unwrap();
    let decoded = decode_commands::<Payload>(Direction::Downlink, &bytes).unwrap();
    assert_eq!(decoded, commands);
}

// =============================================================================
// Failure
// =============================================================================

#[test]
fn test_truncated_command_fails_whole_sequence() {
    // SetupAns, then a DeleteAns CID with no status byte
    let err = decode_commands::<Payload>(Direction::Uplink, &[0x02, 0xcf, 0x03]).unwrap_err();

    assert_eq!(err.expected_len(), Some(1));
    assert_eq!(
        err.to_string(),
        "lorawan/applayer/fragmentation: 1 byte is expected"
    );
}

#[test]
fn test_truncated_fixed_payload_reports_full_length() {
    // FragSessionSetupReq needs 10 payload bytes, only 4 remain
    let err =
        decode_commands::<Payload>(Direction::Downlink, &[0x02, 0x35, 0x01, 0x02, 0xff])
            .unwrap_err();
    assert_eq!(err.expected_len(), Some(10));
}

#[test]
fn test_unknown_cid_mid_sequence_fails() {
    let err = decode_commands::<Payload>(Direction::Uplink, &[0x02, 0xcf, 0x05, 0x00]).unwrap_err();
    assert_eq!(
        err,
        CodecError::UnknownCommand {
            protocol: fragmentation::PROTOCOL,
            direction: Direction::Uplink,
            cid: Cid(0x05),
        }
    );
}

#[test]
fn test_decode_is_repeatable() {
    let bytes = [0x02, 0xcf, 0x03];
    let first = decode_commands::<Payload>(Direction::Uplink, &bytes).unwrap_err();
    let second = decode_commands::<Payload>(Direction::Uplink, &bytes).unwrap_err();
    assert_eq!(first, second);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_parallel_decode() {
    let commands = uplink_answers();
    let bytes = encode_commands(&commands).unwrap();

    crossbeam::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|_| decode_commands::<Payload>(Direction::Uplink, &bytes)))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), commands);
        }
    })
    .unwrap();
}
