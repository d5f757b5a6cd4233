//! Transport abstraction
//!
//! The lower-level S7 session (ISO-on-TCP framing, PDU negotiation) is a
//! given primitive supplied by the host: it implements [`TransportClient`]
//! for a live session and [`TransportConnector`] for dialing one. The
//! crate ships [`SimulatedTransport`], the built-in client used whenever
//! no device or no connector is configured.
//!
//! The connector is selected once at construction; there is no runtime
//! probing for an optionally-present library.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::types::{AddressSpace, Endpoint};

/// A live transport session against one controller.
///
/// Implementations move raw bytes to and from a named address space
/// without interpreting them. Faults must be reported as errors, never
/// panics; the caller decides how to classify them.
#[async_trait]
pub trait TransportClient: Send {
    /// Read `size` bytes from `space` starting at `byte_offset`
    async fn read_area(
        &mut self,
        space: AddressSpace,
        byte_offset: u32,
        size: usize,
    ) -> Result<Vec<u8>>;

    /// Write `data` verbatim to `space` starting at `byte_offset`
    async fn write_area(&mut self, space: AddressSpace, byte_offset: u32, data: &[u8])
        -> Result<()>;

    /// Tear down the session. Called once, on disconnect.
    async fn close(&mut self) -> Result<()>;

    /// Transport display name for logging
    fn display_name(&self) -> &'static str;
}

/// Dials an endpoint and yields a live session.
///
/// A deployment without the real transport capability simply constructs
/// the client without a connector; such a client runs simulated for its
/// whole lifetime.
#[async_trait]
pub trait TransportConnector: Send + Sync {
    /// Open a session against `{host, rack, slot}`.
    ///
    /// # Errors
    ///
    /// Returns `Connection` when the device is unreachable, refuses the
    /// session, or the rack/slot coordinates are wrong.
    async fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn TransportClient>>;
}

/// Fallback transport: every read returns zeros, every write succeeds.
///
/// From the caller's point of view this is indistinguishable from a real
/// always-succeeding device holding default values, which keeps headless
/// tests and demos working without a physical controller. It never
/// returns an error.
#[derive(Debug, Default)]
pub struct SimulatedTransport;

impl SimulatedTransport {
    /// Create a simulated transport
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransportClient for SimulatedTransport {
    async fn read_area(
        &mut self,
        space: AddressSpace,
        byte_offset: u32,
        size: usize,
    ) -> Result<Vec<u8>> {
        debug!("SIM read: {} {}B", space.render(byte_offset), size);
        Ok(vec![0; size])
    }

    async fn write_area(
        &mut self,
        space: AddressSpace,
        byte_offset: u32,
        data: &[u8],
    ) -> Result<()> {
        debug!(
            "SIM write: {} data={}",
            space.render(byte_offset),
            hex::encode(data)
        );
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        debug!("SIM close");
        Ok(())
    }

    fn display_name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_read_returns_zeros() {
        let mut sim = SimulatedTransport::new();
        let buf = sim
            .read_area(AddressSpace::DataBlock(1), 0, 16)
            .await
            .unwrap();
        assert_eq!(buf, vec![0u8; 16]);
    }

    #[tokio::test]
    async fn test_simulated_write_always_succeeds() {
        let mut sim = SimulatedTransport::new();
        sim.write_area(AddressSpace::BitMemory, 4, &[0xDE, 0xAD])
            .await
            .unwrap();
        sim.close().await.unwrap();
    }
}
