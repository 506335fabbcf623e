// domain types shared by the gateway, the fan-out and the shell
use std::fmt;

/// API key pair typed in at session start. Held in memory only.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Authenticated exchange handle plus the eagerly loaded market catalog.
/// Read-only once built; a re-initialize replaces it wholesale.
#[derive(Debug, Clone)]
pub struct Session {
    pub credentials: Credentials,
    pub markets: Vec<MarketEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketType {
    Swap,
    Delivery,
    Spot,
}

impl MarketType {
    /// Binance marks perpetuals with contractType "PERPETUAL"; dated
    /// futures carry a quarter tag and non-futures rows leave it empty.
    pub fn from_contract_type(contract_type: &str) -> Self {
        match contract_type {
            "PERPETUAL" => MarketType::Swap,
            "" => MarketType::Spot,
            _ => MarketType::Delivery,
        }
    }
}

/// One row of the market catalog, in exchange iteration order.
#[derive(Debug, Clone)]
pub struct MarketEntry {
    /// Display form, e.g. `BTC/USDT:USDT`.
    pub symbol: String,
    /// Exchange API form, e.g. `BTCUSDT`.
    pub canonical: String,
    pub market_type: MarketType,
    pub is_linear: bool,
}

/// A listed linear perpetual contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub display: String,
    pub canonical: String,
}

/// Outcome of one leverage fetch. Produced fresh on every fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum LeverageReading {
    Value(f64),
    NoData,
    Failed(String),
}

impl fmt::Display for LeverageReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeverageReading::Value(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            LeverageReading::Value(v) => write!(f, "{}", v),
            LeverageReading::NoData => write!(f, "no data"),
            LeverageReading::Failed(message) => write!(f, "error: {}", message),
        }
    }
}
