use std::fmt;

use serde_json::Value;

use crate::base::StockRecord;

pub mod api_parser;
pub mod fmp;
pub mod http;

pub use api_parser::{TransportError, UpstreamError};
pub use fmp::FmpMetricSource;
pub use http::HttpJsonFetcher;

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// The five upstream lookups, in the order they are issued for a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lookup {
    Profile,
    Quote,
    Growth,
    Ratios,
    PriceChange,
}

impl Lookup {
    pub fn endpoint(&self) -> &'static str {
        match *self {
            Lookup::Profile => "profile",
            Lookup::Quote => "quote",
            Lookup::Growth => "financial-growth",
            Lookup::Ratios => "ratios",
            Lookup::PriceChange => "stock-price-change",
        }
    }

    /// Growth and ratios come from annual financial statements
    pub fn is_annual(&self) -> bool {
        matches!(self, Lookup::Growth | Lookup::Ratios)
    }

    /// Request path and query, without the api key
    pub fn path(&self, symbol: &str) -> String {
        if self.is_annual() {
            format!("/{}/{}?period=annual", self.endpoint(), symbol)
        } else {
            format!("/{}/{}", self.endpoint(), symbol)
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.endpoint())
    }
}

/// Blocking GET returning a decoded JSON body
pub trait JsonFetcher {
    fn get_json(&self, url: &str) -> Result<Value, TransportError>;
}

pub trait MetricSource {
    fn fetch(&self, symbol: &str) -> Result<StockRecord, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Lookup::Profile.path("AAPL"), "/profile/AAPL");
        assert_eq!(Lookup::Growth.path("AAPL"), "/financial-growth/AAPL?period=annual");
        assert_eq!(Lookup::Ratios.path("AAPL"), "/ratios/AAPL?period=annual");
        assert_eq!(Lookup::PriceChange.path("AAPL"), "/stock-price-change/AAPL");
    }
}
