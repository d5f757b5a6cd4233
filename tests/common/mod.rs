//! Test doubles for driving `S7Client` without a device
//!
//! `MemoryTransport` backs each address space with a growable byte page,
//! records call counts, and supports one-shot fault injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use s7link::{AddressSpace, Endpoint, Result, S7LinkError, TransportClient, TransportConnector};

/// Shared state between a connector and the sessions it hands out,
/// so memory survives disconnect/reconnect and tests can inspect it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub pages: Mutex<HashMap<AddressSpace, Vec<u8>>>,
    pub read_count: AtomicU64,
    pub write_count: AtomicU64,
    pub fail_next_read: AtomicBool,
    pub fail_next_write: AtomicBool,
}

impl MemoryStore {
    pub fn reads(&self) -> u64 {
        self.read_count.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }
}

/// In-memory transport session over a shared store
#[derive(Debug)]
pub struct MemoryTransport {
    store: Arc<MemoryStore>,
}

impl MemoryTransport {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TransportClient for MemoryTransport {
    async fn read_area(
        &mut self,
        space: AddressSpace,
        byte_offset: u32,
        size: usize,
    ) -> Result<Vec<u8>> {
        self.store.read_count.fetch_add(1, Ordering::SeqCst);
        if self.store.fail_next_read.swap(false, Ordering::SeqCst) {
            return Err(S7LinkError::connection("injected read fault"));
        }

        let mut pages = self.store.pages.lock().unwrap();
        let page = pages.entry(space).or_default();
        let end = byte_offset as usize + size;
        if page.len() < end {
            page.resize(end, 0);
        }
        Ok(page[byte_offset as usize..end].to_vec())
    }

    async fn write_area(
        &mut self,
        space: AddressSpace,
        byte_offset: u32,
        data: &[u8],
    ) -> Result<()> {
        self.store.write_count.fetch_add(1, Ordering::SeqCst);
        if self.store.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(S7LinkError::connection("injected write fault"));
        }

        let mut pages = self.store.pages.lock().unwrap();
        let page = pages.entry(space).or_default();
        let end = byte_offset as usize + data.len();
        if page.len() < end {
            page.resize(end, 0);
        }
        page[byte_offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn display_name(&self) -> &'static str {
        "memory"
    }
}

/// Connector handing out sessions over one shared store
#[derive(Debug, Default)]
pub struct MemoryConnector {
    pub store: Arc<MemoryStore>,
    pub open_count: AtomicU64,
    pub fail_connect: AtomicBool,
}

impl MemoryConnector {
    pub fn opens(&self) -> u64 {
        self.open_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportConnector for MemoryConnector {
    async fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn TransportClient>> {
        self.open_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(S7LinkError::connection(format!(
                "device at {endpoint} refused the session"
            )));
        }
        Ok(Box::new(MemoryTransport::new(Arc::clone(&self.store))))
    }
}
