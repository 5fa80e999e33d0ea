//! Command sequence codec
//!
//! Encoding and decoding of the command stream carried in one frame payload.
//!
//! ## Wire Format
//! ```text
//! ┌─────┬─────────┬─────┬─────────┬─────┬──────────────────┐
//! │ CID │ Payload │ CID │ Payload │ ... │ CID │ Tail ...   │
//! └─────┴─────────┴─────┴─────────┴─────┴──────────────────┘
//! ```
//!
//! No separators, no count prefix, no length prefix. Each payload length is
//! implied by its CID; a tail-consuming payload takes every remaining byte
//! and can therefore only be the last command of a buffer.

use crate::command::{Command, CommandSet, Direction};
use crate::error::{CodecError, Result};

/// Encode commands back to back
///
/// Fails when any command is malformed, or when a tail-consuming command is
/// followed by another command (the buffer would not decode back to the same
/// sequence).
pub fn encode_commands<P: CommandSet>(commands: &[Command<P>]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    for (i, command) in commands.iter().enumerate() {
        if command.is_tail() && i + 1 < commands.len() {
            return Err(CodecError::MalformedCommand {
                protocol: P::NAME,
                cid: command.cid,
                reason: "tail-consuming command must be the last in a sequence",
            });
        }
        command.encode_to(&mut buf)?;
    }

    tracing::debug!(
        protocol = P::NAME,
        commands = commands.len(),
        len = buf.len(),
        "encoded command sequence"
    );
    Ok(buf)
}

/// Decode a buffer into its commands
///
/// Strictly sequential: the first failing command aborts the whole decode and
/// no partial sequence is returned.
pub fn decode_commands<P: CommandSet>(direction: Direction, bytes: &[u8]) -> Result<Vec<Command<P>>> {
    let mut commands = Vec::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let (command, consumed) = Command::decode_prefix(direction, &bytes[cursor..])?;
        cursor += consumed;
        commands.push(command);
    }

    tracing::debug!(
        protocol = P::NAME,
        %direction,
        commands = commands.len(),
        len = bytes.len(),
        "decoded command sequence"
    );
    Ok(commands)
}
