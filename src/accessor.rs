//! Raw address-space access
//!
//! Moves raw byte ranges to and from a named address space on top of the
//! active transport, without interpreting their meaning. Size bounds are
//! checked here, before any transport call; transport faults are wrapped
//! as read/write errors carrying the failing address.

use tracing::debug;

use crate::error::{Result, S7LinkError};
use crate::transport::TransportClient;
use crate::types::{AddressSpace, MAX_TRANSFER_BYTES};

/// Byte-range reader/writer over one transport session.
///
/// Borrowed per operation; holds no state of its own.
pub struct AreaAccessor<'a> {
    transport: &'a mut dyn TransportClient,
}

impl<'a> AreaAccessor<'a> {
    /// Wrap the active transport
    pub fn new(transport: &'a mut dyn TransportClient) -> Self {
        Self { transport }
    }

    /// Read `size` bytes from `space` starting at `byte_offset`.
    ///
    /// # Errors
    ///
    /// `Validation` for a zero or oversized `size`; `ReadWrite` carrying
    /// the failing address when the transport rejects the operation.
    pub async fn read(
        &mut self,
        space: AddressSpace,
        byte_offset: u32,
        size: usize,
    ) -> Result<Vec<u8>> {
        validate_size(size)?;

        let data = self
            .transport
            .read_area(space, byte_offset, size)
            .await
            .map_err(|e| S7LinkError::read_write(space.render(byte_offset), e.to_string()))?;

        debug!("read {} {}B", space.render(byte_offset), data.len());
        Ok(data)
    }

    /// Write `data` verbatim to `space` starting at `byte_offset`.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty or oversized buffer; `ReadWrite`
    /// carrying the failing address when the transport rejects it.
    pub async fn write(
        &mut self,
        space: AddressSpace,
        byte_offset: u32,
        data: &[u8],
    ) -> Result<()> {
        validate_size(data.len())?;

        self.transport
            .write_area(space, byte_offset, data)
            .await
            .map_err(|e| S7LinkError::read_write(space.render(byte_offset), e.to_string()))?;

        debug!(
            "write {} data={}",
            space.render(byte_offset),
            hex::encode(data)
        );
        Ok(())
    }
}

fn validate_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(S7LinkError::validation("transfer size must be positive"));
    }
    if size > MAX_TRANSFER_BYTES {
        return Err(S7LinkError::validation(format!(
            "transfer size {size} exceeds limit of {MAX_TRANSFER_BYTES} bytes"
        )));
    }
    Ok(())
}
