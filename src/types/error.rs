use thiserror::Error;

/// Failures surfaced by the exchange gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("no data for symbol {0}")]
    NotFound(String),

    #[error("leverage {leverage}x rejected for {symbol}: {message}")]
    InvalidLeverage {
        symbol: String,
        leverage: u32,
        message: String,
    },

    #[error("rate limited: {0}")]
    RateLimit(String),

    #[error("unexpected exchange response: {0}")]
    Decode(String),

    #[error("exchange error (code {code:?}): {message}")]
    Exchange { code: Option<i64>, message: String },
}

/// Failures surfaced by the leverage control service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("exchange not initialized, run `init` first")]
    NotInitialized,

    #[error("invalid leverage value {0:?}, expected a positive integer")]
    InvalidLeverageText(String),

    #[error("no contract selected")]
    NoSymbol,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ServiceError {
    /// True for caller mistakes, as opposed to exchange-side failures.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ServiceError::NotInitialized
                | ServiceError::InvalidLeverageText(_)
                | ServiceError::NoSymbol
        )
    }
}
