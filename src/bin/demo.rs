//! Simulated-mode walkthrough
//!
//! Builds an endpoint from `PLC_HOST` / `PLC_RACK` / `PLC_SLOT`, connects
//! (falling back to simulation when nothing is configured), and exercises
//! the typed operations.

use s7link::{Endpoint, Result, S7Client};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,s7link=debug".into()),
        )
        .init();

    let endpoint = Endpoint::from_env();
    info!("Endpoint: {}", endpoint);

    let client = S7Client::new(endpoint);
    client.connect().await?;
    info!("State: {}", client.state().await);

    // Toggle DB1.DBX0.0
    let current = client.read_bool(1, 0, 0).await?;
    info!("DB1.DBX0.0 = {}", current);
    client.write_bool(1, 0, 0, !current).await?;
    info!("DB1.DBX0.0 -> {}", client.read_bool(1, 0, 0).await?);

    // Round-trip an INT at DB1.DBW10
    let counter = client.read_int16(1, 10).await?;
    client.write_int16(1, 10, counter.wrapping_add(1)).await?;
    info!("DB1.DBW10 = {}", client.read_int16(1, 10).await?);

    // A REAL at DB1.DBD20
    client.write_float32(1, 20, 21.5).await?;
    info!("DB1.DBD20 = {}", client.read_float32(1, 20).await?);

    // A word of bit memory
    let mw0 = client.read_bit_memory(0, 2).await?;
    info!("MW0 = {}", hex::encode(&mw0));

    client.disconnect().await;
    info!("Done");
    Ok(())
}
