#[derive(Debug, Clone)]
pub struct Config {
    pub rest_url: String,
    pub recv_window_ms: u64,
    pub http_timeout_secs: u64,
    pub limits: PacingLimits,
}

/// Knobs for the request pacing applied when touching many symbols at once.
#[derive(Debug, Clone)]
pub struct PacingLimits {
    /// Concurrent leverage fetches kept in flight during a listing.
    pub max_in_flight: usize,
    /// Delay between collecting consecutive fetch results, in milliseconds.
    pub collation_pacing_ms: u64,
    /// Delay between consecutive leverage writes in a set-all sweep.
    pub set_pacing_ms: u64,
}
