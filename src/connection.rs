//! Connection lifecycle management
//!
//! Owns the transport session and tracks whether the client talks to a
//! real device or runs in simulation. Every data operation is gated
//! behind [`ConnectionManager::ensure_connected`].
//!
//! State machine:
//!
//! ```text
//! Disconnected --connect (real ok)-----------> Connected
//! Disconnected --connect (no host/connector)-> Simulated
//! Connected    --disconnect-----------------> Disconnected
//! Simulated    --disconnect-----------------> Disconnected
//! ```
//!
//! A transport fault during a data operation while `Connected` surfaces
//! as a read/write error but does not demote the state; recovery is the
//! caller's explicit `disconnect()`/`connect()`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Result, S7LinkError};
use crate::transport::{SimulatedTransport, TransportClient, TransportConnector};
use crate::types::{ConnectionState, Endpoint};

/// Owns the transport session's lifecycle and the connection state flag.
pub struct ConnectionManager {
    endpoint: Endpoint,
    connector: Option<Arc<dyn TransportConnector>>,
    state: ConnectionState,
    transport: Option<Box<dyn TransportClient>>,
}

impl ConnectionManager {
    /// Create a manager for `endpoint`.
    ///
    /// `connector` is the real-transport capability; pass `None` in
    /// deployments without one, which forces simulated mode.
    pub fn new(endpoint: Endpoint, connector: Option<Arc<dyn TransportConnector>>) -> Self {
        Self {
            endpoint,
            connector,
            state: ConnectionState::Disconnected,
            transport: None,
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Endpoint this manager dials
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Establish connectivity. Idempotent.
    ///
    /// Already `Connected` or `Simulated` returns `true` immediately.
    /// Without a host or a connector the manager transitions to
    /// `Simulated` and returns `true`; this branch never fails. Otherwise
    /// the real transport is dialed; on failure the manager stays
    /// `Disconnected` with no partial resource retained.
    ///
    /// # Errors
    ///
    /// `Connection` when the real dial fails.
    pub async fn connect(&mut self) -> Result<bool> {
        if self.state.is_online() {
            return Ok(true);
        }

        let connector = match (&self.endpoint.host, &self.connector) {
            (Some(_), Some(connector)) => Arc::clone(connector),
            _ => {
                info!("No host or transport configured, running simulated");
                self.transport = Some(Box::new(SimulatedTransport::new()));
                self.state = ConnectionState::Simulated;
                return Ok(true);
            },
        };

        match connector.open(&self.endpoint).await {
            Ok(transport) => {
                info!("Connected to PLC at {}", self.endpoint);
                self.transport = Some(transport);
                self.state = ConnectionState::Connected;
                Ok(true)
            },
            Err(e) => {
                self.transport = None;
                self.state = ConnectionState::Disconnected;
                Err(S7LinkError::connection(format!(
                    "failed to connect to {}: {e}",
                    self.endpoint
                )))
            },
        }
    }

    /// Tear down any session and return to `Disconnected`. Idempotent;
    /// safe to call from any state. A close failure on the real session
    /// is logged, not propagated.
    pub async fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                warn!("Error closing {} transport: {e}", transport.display_name());
            }
            info!("Disconnected from PLC");
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Guard called before every data operation: dial on demand from
    /// `Disconnected` and propagate the connect failure unchanged.
    pub async fn ensure_connected(&mut self) -> Result<()> {
        if self.state == ConnectionState::Disconnected {
            self.connect().await?;
        }
        Ok(())
    }

    /// Access the live transport. Only valid while online.
    pub fn transport_mut(&mut self) -> Result<&mut dyn TransportClient> {
        match self.transport.as_mut() {
            Some(t) => Ok(t.as_mut()),
            None => Err(S7LinkError::connection("no transport session")),
        }
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("endpoint", &self.endpoint)
            .field("state", &self.state)
            .field("has_connector", &self.connector.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AddressSpace;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Connector that counts dials and can be told to fail
    #[derive(Default)]
    struct TestConnector {
        opens: AtomicU32,
        fail: AtomicBool,
    }

    #[async_trait]
    impl TransportConnector for TestConnector {
        async fn open(&self, _endpoint: &Endpoint) -> Result<Box<dyn TransportClient>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(S7LinkError::connection("refused"));
            }
            Ok(Box::new(NullTransport))
        }
    }

    struct NullTransport;

    #[async_trait]
    impl TransportClient for NullTransport {
        async fn read_area(
            &mut self,
            _space: AddressSpace,
            _byte_offset: u32,
            size: usize,
        ) -> Result<Vec<u8>> {
            Ok(vec![0; size])
        }

        async fn write_area(
            &mut self,
            _space: AddressSpace,
            _byte_offset: u32,
            _data: &[u8],
        ) -> Result<()> {
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn display_name(&self) -> &'static str {
            "null"
        }
    }

    #[tokio::test]
    async fn test_no_host_falls_back_to_simulated() {
        let mut mgr = ConnectionManager::new(
            Endpoint::simulated(),
            Some(Arc::new(TestConnector::default())),
        );
        assert!(mgr.connect().await.unwrap());
        assert_eq!(mgr.state(), ConnectionState::Simulated);
    }

    #[tokio::test]
    async fn test_no_connector_falls_back_to_simulated() {
        let mut mgr = ConnectionManager::new(Endpoint::new("10.0.0.5", 0, 1), None);
        assert!(mgr.connect().await.unwrap());
        assert_eq!(mgr.state(), ConnectionState::Simulated);
    }

    #[tokio::test]
    async fn test_connect_idempotent() {
        let connector = Arc::new(TestConnector::default());
        let mut mgr =
            ConnectionManager::new(Endpoint::new("10.0.0.5", 0, 1), Some(connector.clone()));

        assert!(mgr.connect().await.unwrap());
        assert!(mgr.connect().await.unwrap());
        assert_eq!(mgr.state(), ConnectionState::Connected);
        assert_eq!(connector.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_connect_stays_disconnected() {
        let connector = Arc::new(TestConnector::default());
        connector.fail.store(true, Ordering::SeqCst);
        let mut mgr =
            ConnectionManager::new(Endpoint::new("10.0.0.5", 0, 1), Some(connector.clone()));

        let err = mgr.connect().await.unwrap_err();
        assert!(err.is_connection());
        assert_eq!(mgr.state(), ConnectionState::Disconnected);
        assert!(mgr.transport_mut().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_idempotent_from_any_state() {
        let mut mgr = ConnectionManager::new(Endpoint::simulated(), None);

        // no-op from Disconnected
        mgr.disconnect().await;
        assert_eq!(mgr.state(), ConnectionState::Disconnected);

        mgr.connect().await.unwrap();
        assert_eq!(mgr.state(), ConnectionState::Simulated);
        mgr.disconnect().await;
        assert_eq!(mgr.state(), ConnectionState::Disconnected);
        mgr.disconnect().await;
        assert_eq!(mgr.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_ensure_connected_dials_on_demand() {
        let connector = Arc::new(TestConnector::default());
        let mut mgr =
            ConnectionManager::new(Endpoint::new("10.0.0.5", 0, 1), Some(connector.clone()));

        mgr.ensure_connected().await.unwrap();
        assert_eq!(connector.opens.load(Ordering::SeqCst), 1);

        // already online: no second dial
        mgr.ensure_connected().await.unwrap();
        assert_eq!(connector.opens.load(Ordering::SeqCst), 1);

        mgr.disconnect().await;
        mgr.ensure_connected().await.unwrap();
        assert_eq!(connector.opens.load(Ordering::SeqCst), 2);
    }
}
