/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! The seam between the excluded broker/REST layer and the pure
//! computation core. Not wired to any transport; exists so the core's
//! entry points can be exercised against a mock in tests without pulling
//! in networking.

use crate::model::OptionChain;

#[cfg_attr(test, mockall::automock)]
pub trait QuoteSource {
    fn snapshot(&self, underlying: &str) -> OptionChain;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_quote_source_returns_configured_chain() {
        let mut mock = MockQuoteSource::new();
        mock.expect_snapshot()
            .withf(|underlying: &str| underlying == "SPY")
            .returning(|_| OptionChain::new("SPY", 450.0, 0.04, 0.0, vec![]));

        let chain = mock.snapshot("SPY");
        assert_eq!(chain.underlying, "SPY");
        assert_eq!(chain.spot, 450.0);
    }
}
