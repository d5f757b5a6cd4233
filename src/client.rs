//! S7 client façade
//!
//! The single integration point collaborators use: typed BOOL/INT/REAL
//! operations plus raw Data-Block and bit-memory access, composed from
//! the connection manager, the area accessor and the value codec.
//!
//! Address validation happens here, before any transport or codec call.
//! A per-instance lock serializes the whole public surface, so the
//! read-modify-write inside [`S7Client::write_bool`] is atomic with
//! respect to other operations on the same client. No operation retries
//! beyond the single connect attempt its connectivity guard performs.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::accessor::AreaAccessor;
use crate::codec;
use crate::connection::ConnectionManager;
use crate::error::{Result, S7LinkError};
use crate::transport::TransportConnector;
use crate::types::{AddressSpace, ConnectionState, Endpoint};

/// Client for typed reads and writes against one S7 controller.
///
/// Owns exactly one connection. Construct it once and pass it by
/// reference to whichever component needs it; there is no global
/// instance. Cheap to share behind an `Arc` — the internal lock keeps
/// concurrent callers serialized.
#[derive(Debug)]
pub struct S7Client {
    inner: Mutex<ConnectionManager>,
}

impl S7Client {
    /// Create a client without a real-transport capability.
    ///
    /// Such a client runs simulated for its entire lifetime, as does any
    /// client whose endpoint has no host.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            inner: Mutex::new(ConnectionManager::new(endpoint, None)),
        }
    }

    /// Create a client that dials real devices through `connector`.
    pub fn with_connector(endpoint: Endpoint, connector: Arc<dyn TransportConnector>) -> Self {
        Self {
            inner: Mutex::new(ConnectionManager::new(endpoint, Some(connector))),
        }
    }

    /// Current connection state
    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.state()
    }

    /// Establish connectivity. Idempotent; falls back to simulation when
    /// no host or no connector is configured.
    ///
    /// # Errors
    ///
    /// `Connection` when dialing the real device fails.
    pub async fn connect(&self) -> Result<bool> {
        self.inner.lock().await.connect().await
    }

    /// Tear down the connection. Idempotent and safe from any state.
    pub async fn disconnect(&self) {
        self.inner.lock().await.disconnect().await;
    }

    // ========================================================================
    // Typed Data-Block operations
    // ========================================================================

    /// Read a single bit of the byte at `DB<db>.DBX<byte_offset>.<bit_offset>`
    pub async fn read_bool(&self, db: u16, byte_offset: u32, bit_offset: u8) -> Result<bool> {
        validate_bit_offset(bit_offset)?;
        validate_region(byte_offset, 1)?;

        let space = AddressSpace::DataBlock(db);
        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        let buf = AreaAccessor::new(mgr.transport_mut()?)
            .read(space, byte_offset, 1)
            .await?;
        Ok(codec::decode_bool(&buf, bit_offset))
    }

    /// Write a single bit, leaving the other seven bits of its byte
    /// unchanged.
    ///
    /// Reads the current byte, patches the targeted bit and writes the
    /// byte back. The two steps run under the instance lock, but they are
    /// still two transport round trips: a concurrent writer to the same
    /// byte through a *different* client can interleave between them.
    pub async fn write_bool(
        &self,
        db: u16,
        byte_offset: u32,
        bit_offset: u8,
        value: bool,
    ) -> Result<bool> {
        validate_bit_offset(bit_offset)?;
        validate_region(byte_offset, 1)?;

        let space = AddressSpace::DataBlock(db);
        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;

        let mut accessor = AreaAccessor::new(mgr.transport_mut()?);
        let mut buf = accessor.read(space, byte_offset, 1).await?;
        codec::encode_bool_into(&mut buf, bit_offset, value);
        accessor.write(space, byte_offset, &buf).await?;

        debug!("write_bool {}.{} = {}", space.render(byte_offset), bit_offset, value);
        Ok(true)
    }

    /// Read a big-endian INT at `DB<db>.DBW<byte_offset>`
    pub async fn read_int16(&self, db: u16, byte_offset: u32) -> Result<i16> {
        validate_region(byte_offset, 2)?;

        let space = AddressSpace::DataBlock(db);
        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        let buf = AreaAccessor::new(mgr.transport_mut()?)
            .read(space, byte_offset, 2)
            .await?;
        codec::decode_int16(&buf)
    }

    /// Write a big-endian INT at `DB<db>.DBW<byte_offset>`
    pub async fn write_int16(&self, db: u16, byte_offset: u32, value: i16) -> Result<bool> {
        validate_region(byte_offset, 2)?;

        let space = AddressSpace::DataBlock(db);
        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        AreaAccessor::new(mgr.transport_mut()?)
            .write(space, byte_offset, &codec::encode_int16(value))
            .await?;
        Ok(true)
    }

    /// Read a big-endian REAL at `DB<db>.DBD<byte_offset>`
    pub async fn read_float32(&self, db: u16, byte_offset: u32) -> Result<f32> {
        validate_region(byte_offset, 4)?;

        let space = AddressSpace::DataBlock(db);
        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        let buf = AreaAccessor::new(mgr.transport_mut()?)
            .read(space, byte_offset, 4)
            .await?;
        codec::decode_float32(&buf)
    }

    /// Write a big-endian REAL at `DB<db>.DBD<byte_offset>`
    pub async fn write_float32(&self, db: u16, byte_offset: u32, value: f32) -> Result<bool> {
        validate_region(byte_offset, 4)?;

        let space = AddressSpace::DataBlock(db);
        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        AreaAccessor::new(mgr.transport_mut()?)
            .write(space, byte_offset, &codec::encode_float32(value))
            .await?;
        Ok(true)
    }

    // ========================================================================
    // Raw Data-Block operations
    // ========================================================================

    /// Read `size` raw bytes from Data Block `db`
    pub async fn read_db(&self, db: u16, byte_offset: u32, size: usize) -> Result<Vec<u8>> {
        validate_region(byte_offset, size as u32)?;

        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        AreaAccessor::new(mgr.transport_mut()?)
            .read(AddressSpace::DataBlock(db), byte_offset, size)
            .await
    }

    /// Write raw bytes into Data Block `db`
    pub async fn write_db(&self, db: u16, byte_offset: u32, data: &[u8]) -> Result<bool> {
        validate_region(byte_offset, data.len() as u32)?;

        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        AreaAccessor::new(mgr.transport_mut()?)
            .write(AddressSpace::DataBlock(db), byte_offset, data)
            .await?;
        Ok(true)
    }

    // ========================================================================
    // Bit-memory (M area) operations
    // ========================================================================

    /// Read `size` raw bytes from the flat bit-memory area
    pub async fn read_bit_memory(&self, byte_offset: u32, size: usize) -> Result<Vec<u8>> {
        validate_region(byte_offset, size as u32)?;

        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        AreaAccessor::new(mgr.transport_mut()?)
            .read(AddressSpace::BitMemory, byte_offset, size)
            .await
    }

    /// Write raw bytes into the flat bit-memory area
    pub async fn write_bit_memory(&self, byte_offset: u32, data: &[u8]) -> Result<bool> {
        validate_region(byte_offset, data.len() as u32)?;

        let mut mgr = self.inner.lock().await;
        mgr.ensure_connected().await?;
        AreaAccessor::new(mgr.transport_mut()?)
            .write(AddressSpace::BitMemory, byte_offset, data)
            .await?;
        Ok(true)
    }
}

fn validate_bit_offset(bit_offset: u8) -> Result<()> {
    if bit_offset > 7 {
        return Err(S7LinkError::validation(format!(
            "bit offset {bit_offset} out of range 0..=7"
        )));
    }
    Ok(())
}

/// The value must occupy a whole region inside the address space:
/// `byte_offset + width` must not overflow. Size bounds themselves are
/// checked by the accessor.
fn validate_region(byte_offset: u32, width: u32) -> Result<()> {
    if width > 0 && byte_offset.checked_add(width - 1).is_none() {
        return Err(S7LinkError::validation(format!(
            "region of {width} bytes at offset {byte_offset} overflows the address space"
        )));
    }
    Ok(())
}
