//! Core types for S7 data access
//!
//! Endpoint coordinates, connection states, address spaces and the
//! three-kind value union shared across the crate.

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on a single raw transfer, in bytes.
///
/// Generous compared to any real S7 PDU; requests above it are rejected
/// locally as `Validation` before touching the transport.
pub const MAX_TRANSFER_BYTES: usize = 8192;

/// Default CPU rack (S7-1200/1500 typically sit in rack 0)
pub const DEFAULT_RACK: u16 = 0;

/// Default CPU slot (S7-1200/1500 typically use slot 1)
pub const DEFAULT_SLOT: u16 = 1;

/// Physical coordinates of the controller to dial.
///
/// Immutable for the lifetime of a client instance. An absent `host`
/// forces permanent simulated mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Device host address. `None` means "no device configured".
    #[serde(default)]
    pub host: Option<String>,
    /// Backplane rack of the CPU module
    #[serde(default = "default_rack")]
    pub rack: u16,
    /// Backplane slot of the CPU module
    #[serde(default = "default_slot")]
    pub slot: u16,
}

fn default_rack() -> u16 {
    DEFAULT_RACK
}

fn default_slot() -> u16 {
    DEFAULT_SLOT
}

impl Endpoint {
    /// Create an endpoint for a real device
    pub fn new(host: impl Into<String>, rack: u16, slot: u16) -> Self {
        Self {
            host: Some(host.into()),
            rack,
            slot,
        }
    }

    /// Create an endpoint with no device configured (permanent simulation)
    pub fn simulated() -> Self {
        Self {
            host: None,
            rack: DEFAULT_RACK,
            slot: DEFAULT_SLOT,
        }
    }

    /// Build an endpoint from `PLC_HOST`, `PLC_RACK` and `PLC_SLOT`.
    ///
    /// Missing or unparsable rack/slot fall back to the defaults; a
    /// missing host yields a simulated endpoint.
    pub fn from_env() -> Self {
        let host = env::var("PLC_HOST").ok().filter(|h| !h.is_empty());
        let rack = env::var("PLC_RACK")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RACK);
        let slot = env::var("PLC_SLOT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SLOT);
        Self { host, rack, slot }
    }

    /// Check whether a device host is configured
    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::simulated()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "{} (rack {}, slot {})", host, self.rack, self.slot),
            None => write!(f, "<simulated>"),
        }
    }
}

/// Connection state of the client. Exactly one state holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No transport session exists
    #[default]
    Disconnected,
    /// A real transport session is live
    Connected,
    /// Operations run against the simulated transport
    Simulated,
}

impl ConnectionState {
    /// Returns `true` if data operations can proceed without dialing
    #[inline]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Connected | Self::Simulated)
    }

    /// Returns `true` if a real transport session is live
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns `true` if operations run against synthetic data
    #[inline]
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
            Self::Simulated => write!(f, "Simulated"),
        }
    }
}

/// A named controller memory area.
///
/// Data Blocks carry a block number; the flat bit memory (Merker) area
/// does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressSpace {
    /// Numbered Data Block, addressed by byte offset within the block
    DataBlock(u16),
    /// Flat bit-addressable scratch memory (M area)
    BitMemory,
}

impl AddressSpace {
    /// Render an address within this space for diagnostics, e.g. `DB5.10`
    pub fn render(&self, byte_offset: u32) -> String {
        match self {
            Self::DataBlock(db) => format!("DB{db}.{byte_offset}"),
            Self::BitMemory => format!("M{byte_offset}"),
        }
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataBlock(db) => write!(f, "DB{db}"),
            Self::BitMemory => write!(f, "M"),
        }
    }
}

/// The only value kinds this layer understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Single bit within a byte
    Bool(bool),
    /// Big-endian two's-complement 16-bit integer
    Int16(i16),
    /// Big-endian IEEE-754 single-precision float
    Float32(f32),
}

impl Value {
    /// Width of the encoded value in bytes
    pub fn width(&self) -> usize {
        match self {
            Self::Bool(_) => 1,
            Self::Int16(_) => 2,
            Self::Float32(_) => 4,
        }
    }

    /// Attempt to view the value as a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempt to view the value as an i16
    pub fn as_int16(&self) -> Option<i16> {
        match self {
            Self::Int16(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempt to view the value as an f32
    pub fn as_float32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
        }
    }
}
