use crate::services::gateway::ExchangeApi;
use crate::types::{Contract, GatewayError, LeverageReading, PacingLimits, Session};
use futures_util::{StreamExt, stream};
use std::time::Duration;
use tracing::warn;

/// Queries current leverage for every contract with a bounded number of
/// requests in flight. Output index i always corresponds to input index i,
/// whatever order the individual requests complete in. A failed fetch
/// becomes a `Failed` reading for that symbol alone and never aborts the
/// rest of the batch.
pub async fn fetch_all_leverage<G: ExchangeApi>(
    gateway: &G,
    session: &Session,
    contracts: &[Contract],
    limits: &PacingLimits,
) -> Vec<LeverageReading> {
    let collation_pacing = Duration::from_millis(limits.collation_pacing_ms);

    let mut in_order = stream::iter(contracts)
        .map(|contract| async move {
            match gateway.get_leverage(session, &contract.canonical).await {
                Ok(value) => LeverageReading::Value(value),
                Err(GatewayError::NotFound(_)) => LeverageReading::NoData,
                Err(err) => {
                    warn!(symbol = %contract.display, error = %err, "leverage fetch failed");
                    LeverageReading::Failed(err.to_string())
                }
            }
        })
        .buffered(limits.max_in_flight.max(1));

    let mut readings = Vec::with_capacity(contracts.len());
    while let Some(reading) = in_order.next().await {
        readings.push(reading);
        // small delay between collations to smooth request bursts
        if !collation_pacing.is_zero() {
            tokio::time::sleep(collation_pacing).await;
        }
    }
    readings
}
