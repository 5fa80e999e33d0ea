//! Firmware Management Tests
//!
//! These tests verify:
//! - Exact byte layout of every command in both directions
//! - Length rejection with the expected byte count
//! - Unknown CIDs decoding as payload-less commands
//! - Construction errors on encode

use lorawan_applayer::firmware::{
    self, Command, DevDeleteImageAns, DevDeleteImageReq, DevRebootCountdown, DevRebootTime,
    DevUpgradeImageAns, DevVersionAns, PackageVersionAns, Payload, UpgradeImageStatus,
};
use lorawan_applayer::{decode_commands, encode_commands, Cid, CodecError, Direction};

// =============================================================================
// Helpers
// =============================================================================

/// Encode as a one-command sequence, compare bytes, decode back
fn assert_wire(direction: Direction, command: Command, bytes: &[u8]) {
    let encoded = encode_commands(&[command.clone()]).unwrap();
    assert_eq!(encoded, bytes);

    let decoded = decode_commands::<Payload>(direction, bytes).unwrap();
    assert_eq!(decoded, vec![command.clone()]);

    assert_eq!(Command::decode(direction, bytes).unwrap(), command);
}

/// Decode a single command and return the error message
fn decode_error(direction: Direction, bytes: &[u8]) -> String {
    Command::decode(direction, bytes).unwrap_err().to_string()
}

// =============================================================================
// Package Version
// =============================================================================

#[test]
fn test_package_version_req() {
    assert_wire(
        Direction::Downlink,
        Command::empty(firmware::PACKAGE_VERSION_REQ),
        &[0x00],
    );
}

#[test]
fn test_package_version_ans() {
    let command = Command::from(Payload::PackageVersionAns(PackageVersionAns {
        package_identifier: 1,
        package_version: 1,
    }));
    assert_wire(Direction::Uplink, command, &[0x00, 0x01, 0x01]);
}

#[test]
fn test_package_version_ans_invalid_bytes() {
    assert_eq!(
        decode_error(Direction::Uplink, &[0x00, 0x01]),
        "lorawan/applayer/firmwaremanagement: 2 bytes are expected"
    );
}

// =============================================================================
// Device Version
// =============================================================================

#[test]
fn test_dev_version_req() {
    let command = Command::empty(firmware::DEV_VERSION_REQ);
    assert_wire(Direction::Downlink, command.clone(), &[0x01]);

    // Payload-less, not a zero-valued payload
    assert!(command.payload.is_none());
}

#[test]
fn test_dev_version_req_invalid_bytes() {
    assert_eq!(
        decode_error(Direction::Downlink, &[0x01, 0x02]),
        "lorawan/applayer/firmwaremanagement: 0 bytes are expected"
    );
}

#[test]
fn test_dev_version_ans() {
    let command = Command::from(Payload::DevVersionAns(DevVersionAns {
        fw_version: 513,
        hw_version: 1264,
    }));
    assert_wire(
        Direction::Uplink,
        command,
        &[0x01, 0x01, 0x02, 0x00, 0x00, 0xf0, 0x04, 0x00, 0x00],
    );
}

#[test]
fn test_dev_version_ans_invalid_bytes() {
    assert_eq!(
        decode_error(Direction::Uplink, &[0x01, 0x02, 0x01, 0x04]),
        "lorawan/applayer/firmwaremanagement: 8 bytes are expected"
    );
}

// =============================================================================
// Reboot Scheduling
// =============================================================================

#[test]
fn test_dev_reboot_time_req() {
    let command = Command::from(Payload::DevRebootTimeReq(DevRebootTime {
        reboot_time: 134480385,
    }));
    assert_wire(Direction::Downlink, command, &[0x02, 0x01, 0x02, 0x04, 0x08]);
}

#[test]
fn test_dev_reboot_time_ans() {
    let command = Command::from(Payload::DevRebootTimeAns(DevRebootTime {
        reboot_time: 134480385,
    }));
    assert_wire(Direction::Uplink, command, &[0x02, 0x01, 0x02, 0x04, 0x08]);
}

#[test]
fn test_dev_reboot_time_invalid_bytes() {
    for direction in Direction::ALL {
        assert_eq!(
            decode_error(direction, &[0x02, 0x01, 0x02, 0x04]),
            "lorawan/applayer/firmwaremanagement: 4 bytes are expected"
        );
    }
}

#[test]
fn test_dev_reboot_time_cancel() {
    let reboot = DevRebootTime {
        reboot_time: DevRebootTime::CANCEL,
    };
    assert!(reboot.is_cancel());

    let bytes = encode_commands(&[Command::from(Payload::DevRebootTimeReq(reboot))]).unwrap();
    assert_eq!(bytes, [0x02, 0xff, 0xff, 0xff, 0xff]);
}

#[test]
fn test_dev_reboot_countdown_req() {
    let command = Command::from(Payload::DevRebootCountdownReq(DevRebootCountdown {
        countdown: 262657,
    }));
    assert_wire(Direction::Downlink, command, &[0x03, 0x01, 0x02, 0x04]);
}

#[test]
fn test_dev_reboot_countdown_ans() {
    let command = Command::from(Payload::DevRebootCountdownAns(DevRebootCountdown {
        countdown: 262657,
    }));
    assert_wire(Direction::Uplink, command, &[0x03, 0x01, 0x02, 0x04]);
}

#[test]
fn test_dev_reboot_countdown_invalid_bytes() {
    for direction in Direction::ALL {
        assert_eq!(
            decode_error(direction, &[0x03, 0x01, 0x02]),
            "lorawan/applayer/firmwaremanagement: 3 bytes are expected"
        );
    }
}

#[test]
fn test_dev_reboot_countdown_masks_to_24_bits() {
    let command = Command::from(Payload::DevRebootCountdownReq(DevRebootCountdown {
        countdown: 0x0a01_0203,
    }));
    assert_eq!(command.encode().unwrap(), [0x03, 0x03, 0x02, 0x01]);

    let cancel = DevRebootCountdown {
        countdown: DevRebootCountdown::CANCEL,
    };
    assert!(cancel.is_cancel());
}

// =============================================================================
// Image Management
// =============================================================================

#[test]
fn test_dev_upgrade_image_req() {
    assert_wire(
        Direction::Downlink,
        Command::empty(firmware::DEV_UPGRADE_IMAGE_REQ),
        &[0x04],
    );
}

#[test]
fn test_dev_upgrade_image_ans_without_image() {
    let command = Command::from(Payload::DevUpgradeImageAns(DevUpgradeImageAns {
        status: UpgradeImageStatus::IncompatibleImage,
    }));
    assert_wire(Direction::Uplink, command, &[0x04, 0x02]);
}

#[test]
fn test_dev_upgrade_image_ans_valid_image() {
    let command = Command::from(Payload::DevUpgradeImageAns(DevUpgradeImageAns {
        status: UpgradeImageStatus::ValidImage {
            next_firmware_image_version: 0x0403_0201,
        },
    }));
    assert_wire(
        Direction::Uplink,
        command,
        &[0x04, 0x03, 0x01, 0x02, 0x03, 0x04],
    );
}

#[test]
fn test_dev_upgrade_image_ans_invalid_bytes() {
    // Valid status announces the 4-byte version
    assert_eq!(
        decode_error(Direction::Uplink, &[0x04, 0x03, 0x01]),
        "lorawan/applayer/firmwaremanagement: 5 bytes are expected"
    );
    // Other statuses carry nothing after the status byte
    assert_eq!(
        decode_error(Direction::Uplink, &[0x04, 0x00, 0x01]),
        "lorawan/applayer/firmwaremanagement: 1 byte is expected"
    );
    assert_eq!(
        decode_error(Direction::Uplink, &[0x04]),
        "lorawan/applayer/firmwaremanagement: 1 byte is expected"
    );
}

#[test]
fn test_dev_upgrade_image_ans_reserved_status() {
    let decoded = Command::decode(Direction::Uplink, &[0x04, 0x06]).unwrap();
    assert_eq!(
        decoded.payload,
        Some(Payload::DevUpgradeImageAns(DevUpgradeImageAns {
            status: UpgradeImageStatus::Reserved(6),
        }))
    );
    assert_eq!(decoded.encode().unwrap(), [0x04, 0x06]);
}

#[test]
fn test_dev_upgrade_image_ans_reserved_status_out_of_range() {
    // 1 and 9 alias CorruptImage on the wire, 3 would announce a version
    for code in [0, 1, 3, 9] {
        let command = Command::from(Payload::DevUpgradeImageAns(DevUpgradeImageAns {
            status: UpgradeImageStatus::Reserved(code),
        }));
        let err = encode_commands(&[command, Command::from(Payload::DevDeleteImageAns(
            DevDeleteImageAns::default(),
        ))])
        .unwrap_err();

        assert!(
            matches!(err, CodecError::MalformedCommand { cid: Cid(0x04), .. }),
            "code {} gave {:?}",
            code,
            err
        );
    }

    for code in UpgradeImageStatus::RESERVED {
        let command = Command::from(Payload::DevUpgradeImageAns(DevUpgradeImageAns {
            status: UpgradeImageStatus::Reserved(code),
        }));
        assert_wire(Direction::Uplink, command, &[0x04, code]);
    }
}

#[test]
fn test_dev_upgrade_image_ans_in_sequence() {
    // The status byte decides how far the next command starts
    let bytes = [0x04, 0x03, 0x01, 0x00, 0x00, 0x00, 0x04, 0x00];
    let commands = decode_commands::<Payload>(Direction::Uplink, &bytes).unwrap();

    assert_eq!(commands.len(), 2);
    assert_eq!(
        commands[1].payload,
        Some(Payload::DevUpgradeImageAns(DevUpgradeImageAns {
            status: UpgradeImageStatus::NoImage,
        }))
    );
    assert_eq!(encode_commands(&commands).unwrap(), bytes);
}

#[test]
fn test_dev_delete_image_req() {
    let command = Command::from(Payload::DevDeleteImageReq(DevDeleteImageReq {
        firmware_to_delete_version: 134480385,
    }));
    assert_wire(Direction::Downlink, command, &[0x05, 0x01, 0x02, 0x04, 0x08]);
}

#[test]
fn test_dev_delete_image_ans() {
    let command = Command::from(Payload::DevDeleteImageAns(DevDeleteImageAns {
        error_no_valid_image: false,
        error_invalid_version: true,
    }));
    assert_wire(Direction::Uplink, command, &[0x05, 0x02]);

    let status = DevDeleteImageAns::from(0xfd);
    assert!(status.error_no_valid_image);
    assert!(!status.error_invalid_version);
}

// =============================================================================
// Unknown CIDs
// =============================================================================

#[test]
fn test_unknown_cid_is_payload_less() {
    let command = Command::decode(Direction::Uplink, &[0x7f]).unwrap();
    assert_eq!(command, Command::empty(Cid(0x7f)));
    assert_eq!(command.encode().unwrap(), [0x7f]);
}

#[test]
fn test_unknown_cid_occupies_one_byte_in_sequence() {
    let commands = decode_commands::<Payload>(Direction::Downlink, &[0x7f, 0x01]).unwrap();
    assert_eq!(
        commands,
        vec![
            Command::empty(Cid(0x7f)),
            Command::empty(firmware::DEV_VERSION_REQ),
        ]
    );
}

#[test]
fn test_unknown_cid_with_trailing_bytes() {
    assert_eq!(
        decode_error(Direction::Uplink, &[0x7f, 0x00]),
        "lorawan/applayer/firmwaremanagement: 0 bytes are expected"
    );
}

// =============================================================================
// Construction Errors
// =============================================================================

#[test]
fn test_missing_payload_is_malformed() {
    let err = Command::empty(firmware::DEV_REBOOT_TIME_REQ)
        .encode()
        .unwrap_err();

    assert!(matches!(
        err,
        CodecError::MalformedCommand { cid: Cid(0x02), .. }
    ));
}

#[test]
fn test_mismatched_payload_is_malformed() {
    let command = Command {
        cid: firmware::DEV_VERSION_ANS,
        payload: Some(Payload::DevRebootTimeAns(DevRebootTime { reboot_time: 1 })),
    };

    let err = encode_commands(&[command]).unwrap_err();
    assert!(matches!(err, CodecError::MalformedCommand { .. }));
}

#[test]
fn test_empty_buffer_single_command() {
    assert_eq!(
        decode_error(Direction::Downlink, &[]),
        "lorawan/applayer/firmwaremanagement: 1 byte is expected"
    );
}
