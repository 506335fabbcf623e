use crate::types::exchange::{
    ApiErrorBody, ExchangeInfo, FuturesBalance, FuturesSymbol, LeverageChange, PositionRisk,
};
use crate::types::{Config, Credentials, GatewayError, MarketEntry, MarketType, Session};
use anyhow::{Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode};
use sha2::Sha256;
use tracing::{debug, info};
use urlencoding::encode;

/// Margin assets that make a contract linear (stablecoin-settled).
const LINEAR_MARGIN_ASSETS: [&str; 2] = ["USDT", "USDC"];

/// Typed surface over the exchange REST API. Everything the service and
/// the fan-out need goes through this trait, so tests can swap in a stub.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Validates the credentials and eagerly loads the market catalog.
    async fn initialize(&self, credentials: Credentials) -> Result<Session, GatewayError>;

    /// Full market catalog in exchange iteration order.
    async fn list_markets(&self, session: &Session) -> Result<Vec<MarketEntry>, GatewayError>;

    /// Account leverage multiplier for one canonical symbol.
    async fn get_leverage(&self, session: &Session, symbol: &str) -> Result<f64, GatewayError>;

    /// Applies a leverage multiplier; symbol-specific bounds are enforced
    /// by the exchange.
    async fn set_leverage(
        &self,
        session: &Session,
        symbol: &str,
        leverage: u32,
    ) -> Result<(), GatewayError>;
}

#[derive(Clone)]
pub struct BinanceGateway {
    client: Client,
    config: Config,
}

impl BinanceGateway {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn sign(secret: &str, query: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn signed_request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        credentials: &Credentials,
    ) -> Result<String, GatewayError> {
        let mut query = String::new();
        for (key, value) in params {
            query.push_str(key);
            query.push('=');
            query.push_str(&encode(value));
            query.push('&');
        }
        query.push_str(&format!(
            "timestamp={}&recvWindow={}",
            Self::timestamp_ms(),
            self.config.recv_window_ms
        ));
        let signature = Self::sign(&credentials.api_secret, &query);
        let url = format!(
            "{}{}?{}&signature={}",
            self.config.rest_url, path, query, signature
        );

        let response = self
            .client
            .request(method, &url)
            .header("X-MBX-APIKEY", &credentials.api_key)
            .send()
            .await
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        Self::read_body(response).await
    }

    async fn read_body(response: reqwest::Response) -> Result<String, GatewayError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| GatewayError::Network(err.to_string()))?;
        if status.is_success() {
            return Ok(text);
        }
        Err(Self::classify(status, &text))
    }

    /// Maps the exchange's documented error codes onto the gateway error
    /// kinds. 418 is the Binance auto-ban status that follows repeated 429s.
    fn classify(status: StatusCode, body: &str) -> GatewayError {
        let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
        let code = parsed.as_ref().map(|e| e.code);
        let message = parsed.map(|e| e.msg).unwrap_or_else(|| body.to_string());

        if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 418 || code == Some(-1003)
        {
            return GatewayError::RateLimit(message);
        }
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || matches!(code, Some(-1002) | Some(-1022) | Some(-2014) | Some(-2015))
        {
            return GatewayError::Auth(message);
        }
        GatewayError::Exchange { code, message }
    }

    /// Signed balance call used purely to verify the key pair works.
    async fn probe_credentials(&self, credentials: &Credentials) -> Result<(), GatewayError> {
        let body = self
            .signed_request(Method::GET, "/fapi/v2/balance", &[], credentials)
            .await?;
        let _balances: Vec<FuturesBalance> =
            serde_json::from_str(&body).map_err(|err| GatewayError::Decode(err.to_string()))?;
        Ok(())
    }

    async fn fetch_market_catalog(&self) -> Result<Vec<MarketEntry>, GatewayError> {
        let url = format!("{}/fapi/v1/exchangeInfo", self.config.rest_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| GatewayError::Network(err.to_string()))?;
        let body = Self::read_body(response).await?;
        let info: ExchangeInfo =
            serde_json::from_str(&body).map_err(|err| GatewayError::Decode(err.to_string()))?;
        Ok(info.symbols.into_iter().map(market_entry).collect())
    }
}

fn market_entry(symbol: FuturesSymbol) -> MarketEntry {
    let margin = if symbol.margin_asset.is_empty() {
        symbol.quote_asset.clone()
    } else {
        symbol.margin_asset.clone()
    };
    MarketEntry {
        symbol: format!("{}/{}:{}", symbol.base_asset, symbol.quote_asset, margin),
        canonical: symbol.symbol,
        market_type: MarketType::from_contract_type(&symbol.contract_type),
        is_linear: LINEAR_MARGIN_ASSETS.contains(&margin.as_str()),
    }
}

#[async_trait]
impl ExchangeApi for BinanceGateway {
    async fn initialize(&self, credentials: Credentials) -> Result<Session, GatewayError> {
        info!("initializing exchange session");
        self.probe_credentials(&credentials).await?;
        let markets = self.fetch_market_catalog().await?;
        info!(markets = markets.len(), "exchange session initialized");
        Ok(Session {
            credentials,
            markets,
        })
    }

    async fn list_markets(&self, session: &Session) -> Result<Vec<MarketEntry>, GatewayError> {
        // catalog is loaded eagerly at initialize; hand back that snapshot
        Ok(session.markets.clone())
    }

    async fn get_leverage(&self, session: &Session, symbol: &str) -> Result<f64, GatewayError> {
        debug!(symbol, "querying position risk");
        let params = [("symbol", symbol.to_string())];
        let body = match self
            .signed_request(
                Method::GET,
                "/fapi/v2/positionRisk",
                &params,
                &session.credentials,
            )
            .await
        {
            Ok(body) => body,
            Err(GatewayError::Exchange {
                code: Some(-1121), ..
            }) => return Err(GatewayError::NotFound(symbol.to_string())),
            Err(err) => return Err(err),
        };
        let positions: Vec<PositionRisk> =
            serde_json::from_str(&body).map_err(|err| GatewayError::Decode(err.to_string()))?;
        let position = positions
            .iter()
            .find(|position| position.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| GatewayError::NotFound(symbol.to_string()))?;
        position.leverage.parse::<f64>().map_err(|_| {
            GatewayError::Decode(format!(
                "bad leverage value {:?} for {}",
                position.leverage, symbol
            ))
        })
    }

    async fn set_leverage(
        &self,
        session: &Session,
        symbol: &str,
        leverage: u32,
    ) -> Result<(), GatewayError> {
        info!(symbol, leverage, "setting leverage");
        let params = [
            ("symbol", symbol.to_string()),
            ("leverage", leverage.to_string()),
        ];
        match self
            .signed_request(
                Method::POST,
                "/fapi/v1/leverage",
                &params,
                &session.credentials,
            )
            .await
        {
            Ok(body) => {
                let change: LeverageChange = serde_json::from_str(&body)
                    .map_err(|err| GatewayError::Decode(err.to_string()))?;
                info!(
                    symbol = %change.symbol,
                    leverage = change.leverage,
                    "leverage updated"
                );
                Ok(())
            }
            Err(GatewayError::Exchange {
                code: Some(-4028),
                message,
            }) => Err(GatewayError::InvalidLeverage {
                symbol: symbol.to_string(),
                leverage,
                message,
            }),
            Err(GatewayError::Exchange {
                code: Some(-1121), ..
            }) => Err(GatewayError::NotFound(symbol.to_string())),
            Err(err) => Err(err),
        }
    }
}
