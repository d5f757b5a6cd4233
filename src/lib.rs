//! S7 controller data-access client
//!
//! This library provides typed, byte/bit-exact reads and writes against
//! the Data-Block and bit-addressable memory spaces of Siemens S7-family
//! controllers, with a transparent simulated fallback when no real
//! transport is available.
//!
//! # Architecture
//!
//! - **Codec**: pure big-endian marshalling of BOOL/INT16/FLOAT32,
//!   including single-bit set/clear within a byte
//! - **Transport**: the lower-level S7 session is a host-supplied
//!   primitive behind [`TransportConnector`] / [`TransportClient`];
//!   [`SimulatedTransport`] is the built-in fallback
//! - **Connection**: a three-state machine (`Disconnected` / `Connected`
//!   / `Simulated`) gating every data operation
//! - **Client**: [`S7Client`], the façade collaborators call
//!
//! In simulated mode every read returns the type's zero value and every
//! write reports success; no error is ever produced purely because of
//! simulation. This keeps headless testing and demos working without a
//! physical controller.
//!
//! # Example
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use s7link::{Endpoint, S7Client};
//!
//! // No connector configured: the client runs simulated.
//! let client = S7Client::new(Endpoint::from_env());
//! client.connect().await?;
//!
//! // DB1.DBX0.0
//! client.write_bool(1, 0, 0, true).await?;
//! let motor_on = client.read_bool(1, 0, 0).await?;
//!
//! // DB1.DBW10
//! let setpoint = client.read_int16(1, 10).await?;
//!
//! client.disconnect().await;
//! # let _ = (motor_on, setpoint);
//! # Ok::<(), s7link::S7LinkError>(())
//! # });
//! ```

pub mod accessor;
pub mod codec;
pub mod connection;
pub mod error;
pub mod transport;
pub mod types;

mod client;

// Re-export core types
pub use client::S7Client;
pub use connection::ConnectionManager;
pub use error::{Result, S7LinkError};
pub use transport::{SimulatedTransport, TransportClient, TransportConnector};
pub use types::{AddressSpace, ConnectionState, Endpoint, Value, MAX_TRANSFER_BYTES};
