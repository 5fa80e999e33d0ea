//! # lorawan-applayer
//!
//! Codec for two LoRaWAN application-layer command packages:
//! - Firmware Management (TS006)
//! - Fragmented Data Block Transport (TS004)
//!
//! A frame payload carries commands back to back. Each command is a one-byte
//! CID followed by a payload whose shape depends on the CID and on the
//! direction of the frame.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Command Sequence (sequence.rs)                  │
//! │          encode_commands / decode_commands                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Command (command.rs)                        │
//! │        CID byte + payload resolved via direction tables      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────┐
//!   │  firmware   │          │ fragmentation │
//!   │  (tables)   │          │   (tables)    │
//!   └──────┬──────┘          └───────┬───────┘
//!          └────────────┬────────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │  codec / bits │
//!               └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use lorawan_applayer::{decode_commands, encode_commands, Direction};
//! use lorawan_applayer::fragmentation::{self, FragSessionSetupAns, Payload};
//!
//! let bytes = [0x02, 0xcf];
//! let commands = decode_commands::<Payload>(Direction::Uplink, &bytes).unwrap();
//! assert_eq!(
//!     commands,
//!     vec![fragmentation::Command::from(Payload::FragSessionSetupAns(FragSessionSetupAns {
//!         frag_index: 3,
//!         wrong_descriptor: true,
//!         frag_session_index_not_supported: true,
//!         not_enough_memory: true,
//!         encoding_unsupported: true,
//!     }))]
//! );
//! assert_eq!(encode_commands(&commands).unwrap(), bytes);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod command;
pub mod sequence;

pub mod firmware;
pub mod fragmentation;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CodecError, Result};
pub use config::{Config, Protocol};
pub use codec::{LengthError, PayloadCodec, PayloadLen};
pub use command::{Cid, Command, CommandSet, Direction, UnknownCid};
pub use sequence::{decode_commands, encode_commands};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of lorawan-applayer
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
