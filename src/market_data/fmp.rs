use serde_json::Value;
use tracing::{debug, warn};

use crate::base::{self, MetricValue, StockRecord};
use crate::config::ApiKey;
use crate::market_data::api_parser::{self, PriceChange};
use crate::market_data::{JsonFetcher, Lookup, MetricSource, UpstreamError};

/// Financial Modeling Prep metrics, fetched with five sequential lookups
/// per symbol: profile, quote, growth, ratios, price-change.
pub struct FmpMetricSource<F: JsonFetcher> {
    fetcher: F,
    base_url: String,
    api_key: ApiKey,
}

impl<F: JsonFetcher> FmpMetricSource<F> {
    pub fn new(fetcher: F, base_url: &str, api_key: ApiKey) -> Self {
        FmpMetricSource {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    fn url(&self, lookup: Lookup, symbol: &str) -> String {
        let path = lookup.path(symbol);
        let sep = if path.contains('?') { '&' } else { '?' };
        format!("{}{}{}apikey={}", self.base_url, path, sep, self.api_key.expose())
    }

    fn get(&self, lookup: Lookup, symbol: &str) -> Result<Value, UpstreamError> {
        debug!(%symbol, %lookup, path = %lookup.path(symbol), "GET");
        self.fetcher.get_json(&self.url(lookup, symbol))
            .map_err(|source| UpstreamError::Transport { lookup, source })
    }
}

impl<F: JsonFetcher> MetricSource for FmpMetricSource<F> {
    fn fetch(&self, symbol: &str) -> Result<StockRecord, UpstreamError> {
        // The symbol is spliced into the request path unescaped
        if !base::is_valid_symbol(symbol) {
            return Err(UpstreamError::InvalidSymbol { symbol: symbol.to_owned() });
        }
        let mut record = StockRecord::builder(symbol);

        let profile = api_parser::parse_profile(&self.get(Lookup::Profile, symbol)?)?;
        record.set("name", profile.name.map_or(MetricValue::Missing, MetricValue::Text))
            .set("industry", profile.industry.map_or(MetricValue::Missing, MetricValue::Text))
            .set("year_inc", profile.ipo_year.map_or(MetricValue::Missing, |year| year.to_string().into()))
            .set("current_price", profile.price);

        // Grain: seconds, real time
        let quote = api_parser::parse_quote(&self.get(Lookup::Quote, symbol)?)?;
        record.set("year_high", quote.year_high)
            .set("year_low", quote.year_low)
            .set("market_cap", quote.market_cap)
            .set("realtime_pe_ratio", quote.pe);

        // Grain: annual, from the latest financial statement
        let growth = api_parser::parse_growth(&self.get(Lookup::Growth, symbol)?)?;
        record.set("financial_statement_date", growth.date.map_or(MetricValue::Missing, MetricValue::Text))
            .set("eps_growth", growth.eps_growth)
            .set("grossProfitGrowth", growth.gross_profit_growth);

        let ratios = api_parser::parse_ratios(&self.get(Lookup::Ratios, symbol)?)?;
        record.set("returnOnAssets", ratios.return_on_assets)
            .set("returnOnEquity", ratios.return_on_equity)
            .set("dividendYield", ratios.dividend_yield)
            .set("interestCoverage", ratios.interest_coverage)
            .set("debtEquityRatio", ratios.debt_equity_ratio)
            .set("priceToBookRatio", ratios.price_to_book_ratio);

        let change = api_parser::parse_price_change(&self.get(Lookup::PriceChange, symbol)?)?;
        let (one_year, three_year) = normalized_changes(symbol, profile.price, &change);
        record.set("1Y_change", one_year)
            .set("3Y_change", three_year);

        Ok(record.build())
    }
}

/// Price deltas relative to the current price. The 3 year delta is averaged
/// per year first. Both are `Missing` when the price is zero or unknown.
pub fn normalized_changes(symbol: &str, current_price: Option<f64>, change: &PriceChange) -> (MetricValue, MetricValue) {
    match current_price {
        Some(price) if price != 0.0 && price.is_finite() => (
            change.one_year.map(|delta| delta / price).into(),
            change.three_year.map(|delta| delta / 3.0 / price).into(),
        ),
        _ => {
            warn!(%symbol, ?current_price, "current price unusable, price change fields left empty");
            (MetricValue::Missing, MetricValue::Missing)
        }
    }
}
