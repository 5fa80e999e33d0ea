//! Configuration for the codec tooling
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::str::FromStr;

use crate::command::Direction;
use crate::error::{CodecError, Result};

/// Largest FRMPayload any LoRaWAN regional data rate allows
pub const MAX_FRM_PAYLOAD: usize = 242;

/// Application-layer package a buffer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Firmware management (TS006)
    FirmwareManagement,

    /// Fragmented data block transport (TS004)
    Fragmentation,
}

impl Protocol {
    /// Error prefix used by this protocol's codec
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::FirmwareManagement => crate::firmware::PROTOCOL,
            Protocol::Fragmentation => crate::fragmentation::PROTOCOL,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::FirmwareManagement => f.write_str("firmware"),
            Protocol::Fragmentation => f.write_str("fragmentation"),
        }
    }
}

impl FromStr for Protocol {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "firmware" | "firmwaremanagement" | "fmp" => Ok(Protocol::FirmwareManagement),
            "fragmentation" | "frag" => Ok(Protocol::Fragmentation),
            other => Err(CodecError::Config(format!(
                "unknown protocol '{}' (expected firmware or fragmentation)",
                other
            ))),
        }
    }
}

/// Main configuration for the `applayer` tool
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Codec Selection
    // -------------------------------------------------------------------------
    /// Package whose direction tables are used
    pub protocol: Protocol,

    /// Direction of the frame being decoded
    pub direction: Direction,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Frames longer than this are refused (bytes)
    pub max_frame_len: usize,

    // -------------------------------------------------------------------------
    // Logging
    // -------------------------------------------------------------------------
    /// Filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: Protocol::Fragmentation,
            direction: Direction::Downlink,
            max_frame_len: MAX_FRM_PAYLOAD,
            log_filter: "info,lorawan_applayer=debug".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Refuse frames longer than the configured maximum
    pub fn check_frame_len(&self, len: usize) -> Result<()> {
        if len > self.max_frame_len {
            return Err(CodecError::Config(format!(
                "frame of {} bytes exceeds maximum of {} bytes",
                len, self.max_frame_len
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the protocol
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.config.protocol = protocol;
        self
    }

    /// Set the frame direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    /// Set the maximum frame length (in bytes)
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.config.max_frame_len = len;
        self
    }

    /// Set the fallback log filter
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
