use crate::services::fanout::fetch_all_leverage;
use crate::services::gateway::ExchangeApi;
use crate::services::symbols::normalize;
use crate::types::{
    Contract, Credentials, GatewayError, LeverageReading, MarketType, PacingLimits, ServiceError,
    Session,
};
use std::time::Duration;
use tracing::{error, info};

/// Orchestrates listing, checking and setting leverage against one
/// session. All operations except `initialize` require a session and
/// report a usage error otherwise, without touching the network.
pub struct LeverageService<G> {
    gateway: G,
    limits: PacingLimits,
    session: Option<Session>,
}

impl<G: ExchangeApi> LeverageService<G> {
    pub fn new(gateway: G, limits: PacingLimits) -> Self {
        Self {
            gateway,
            limits,
            session: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Result<&Session, ServiceError> {
        self.session.as_ref().ok_or(ServiceError::NotInitialized)
    }

    /// Builds a fresh session, returning the number of catalog markets.
    /// On failure the previous session, if any, stays in place untouched.
    pub async fn initialize(&mut self, credentials: Credentials) -> Result<usize, ServiceError> {
        let session = self.gateway.initialize(credentials).await.map_err(|err| {
            error!(%err, "exchange initialization failed");
            err
        })?;
        let markets = session.markets.len();
        self.session = Some(session);
        Ok(markets)
    }

    /// Linear perpetuals only, in catalog order.
    pub async fn list_perpetual_contracts(&self) -> Result<Vec<Contract>, ServiceError> {
        let session = self.session()?;
        let markets = self.gateway.list_markets(session).await?;
        let contracts: Vec<Contract> = markets
            .into_iter()
            .filter(|market| market.market_type == MarketType::Swap && market.is_linear)
            .map(|market| Contract {
                display: market.symbol,
                canonical: market.canonical,
            })
            .collect();
        info!(contracts = contracts.len(), "listed perpetual contracts");
        Ok(contracts)
    }

    /// One line per contract: `SYMBOL (Leverage: ...)`.
    pub async fn list_with_leverage(&self) -> Result<Vec<String>, ServiceError> {
        let session = self.session()?;
        let contracts = self.list_perpetual_contracts().await?;
        let readings = fetch_all_leverage(&self.gateway, session, &contracts, &self.limits).await;
        Ok(contracts
            .iter()
            .zip(readings.iter())
            .map(|(contract, reading)| format!("{} (Leverage: {})", contract.display, reading))
            .collect())
    }

    /// Single leverage query for one symbol, outside the fan-out.
    pub async fn check_leverage(
        &self,
        display_symbol: &str,
    ) -> Result<LeverageReading, ServiceError> {
        let session = self.session()?;
        if display_symbol.trim().is_empty() {
            return Err(ServiceError::NoSymbol);
        }
        let canonical = normalize(display_symbol);
        info!(symbol = %canonical, "checking leverage");
        Ok(match self.gateway.get_leverage(session, &canonical).await {
            Ok(value) => LeverageReading::Value(value),
            Err(GatewayError::NotFound(_)) => LeverageReading::NoData,
            Err(err) => LeverageReading::Failed(err.to_string()),
        })
    }

    pub async fn set_one(
        &self,
        display_symbol: &str,
        leverage_text: &str,
    ) -> Result<String, ServiceError> {
        let session = self.session()?;
        if display_symbol.trim().is_empty() {
            return Err(ServiceError::NoSymbol);
        }
        let leverage = parse_leverage(leverage_text)?;
        let canonical = normalize(display_symbol);
        Ok(self
            .apply_leverage(session, &canonical, display_symbol, leverage)
            .await)
    }

    /// Re-lists the catalog and applies the leverage to every perpetual in
    /// turn. Writes stay strictly sequential; one rejected symbol never
    /// stops the sweep.
    pub async fn set_all(&self, leverage_text: &str) -> Result<Vec<String>, ServiceError> {
        let session = self.session()?;
        let leverage = parse_leverage(leverage_text)?;
        let contracts = self.list_perpetual_contracts().await?;
        let pacing = Duration::from_millis(self.limits.set_pacing_ms);
        info!(
            contracts = contracts.len(),
            leverage, "applying leverage to all perpetual contracts"
        );
        let mut messages = Vec::with_capacity(contracts.len());
        for contract in &contracts {
            messages.push(
                self.apply_leverage(session, &contract.canonical, &contract.display, leverage)
                    .await,
            );
            if !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
        }
        Ok(messages)
    }

    async fn apply_leverage(
        &self,
        session: &Session,
        canonical: &str,
        display: &str,
        leverage: u32,
    ) -> String {
        match self.gateway.set_leverage(session, canonical, leverage).await {
            Ok(()) => format!("Leverage for {} set to {}", display, leverage),
            Err(err) => {
                error!(symbol = %canonical, %err, "leverage update failed");
                format!("Failed to set leverage for {}: {}", display, err)
            }
        }
    }
}

fn parse_leverage(text: &str) -> Result<u32, ServiceError> {
    match text.trim().parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ServiceError::InvalidLeverageText(text.to_string())),
    }
}
