use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct ExchangeInfo {
    pub symbols: Vec<FuturesSymbol>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FuturesSymbol {
    pub symbol: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
    #[serde(rename = "marginAsset", default)]
    pub margin_asset: String,
    #[serde(rename = "contractType", default)]
    pub contract_type: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Deserialize, Debug)]
pub struct PositionRisk {
    pub symbol: String,
    pub leverage: String,
    #[serde(rename = "positionAmt", default)]
    pub position_amt: String,
}

/// Response of the leverage-set call.
#[derive(Deserialize, Debug)]
pub struct LeverageChange {
    pub symbol: String,
    pub leverage: u32,
    #[serde(rename = "maxNotionalValue", default)]
    pub max_notional_value: String,
}

#[derive(Deserialize, Debug)]
pub struct FuturesBalance {
    pub asset: String,
    #[serde(rename = "availableBalance")]
    pub available_balance: String,
}

/// Error envelope Binance attaches to non-2xx responses.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}
