/// Settlement-currency tags appended to display symbols.
const SETTLEMENT_TAGS: [&str; 2] = [":USDT", ":USDC"];

/// Converts a display-form contract symbol into the exchange API form.
/// Only the text before the first space counts (list entries carry a
/// leverage annotation); the base/quote separator and settlement tags
/// are dropped. Applying it twice changes nothing.
pub fn normalize(display_symbol: &str) -> String {
    let head = display_symbol.split_whitespace().next().unwrap_or("");
    let mut canonical = head.replace('/', "");
    for tag in SETTLEMENT_TAGS {
        canonical = canonical.replace(tag, "");
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_annotation_separator_and_settlement_tag() {
        assert_eq!(normalize("BTC/USDT:USDT (Leverage: 10)"), "BTCUSDT");
        assert_eq!(normalize("BTC/USDT:USDT"), "BTCUSDT");
        assert_eq!(normalize("ETH/USDC:USDC"), "ETHUSDC");
        assert_eq!(normalize("SOLUSDT"), "SOLUSDT");
    }

    #[test]
    fn idempotent_over_display_forms() {
        let symbols = [
            "BTC/USDT:USDT (Leverage: 20)",
            "1000PEPE/USDT:USDT",
            "ETH/USDC:USDC (Leverage: no data)",
            "BTCUSDT",
            "",
        ];
        for symbol in symbols {
            let once = normalize(symbol);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {symbol:?}");
        }
    }
}
