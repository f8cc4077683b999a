use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use thiserror::Error;

use crate::market_data::Lookup;

type JsonMap = serde_json::map::Map<String, Value>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP status {status} {text}")]
    Status { status: u16, text: String },
    #[error("network failure: {0}")]
    Network(String),
    #[error("undecodable response body: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{lookup} lookup failed: {source}")]
    Transport {
        lookup: Lookup,
        #[source]
        source: TransportError,
    },
    #[error("{lookup} response is not a JSON array")]
    NotAnArray { lookup: Lookup },
    #[error("{lookup} response is an empty array")]
    EmptyPayload { lookup: Lookup },
    #[error("{lookup} response entry is not a JSON object")]
    NotAnObject { lookup: Lookup },
    #[error("{lookup} response has no field '{field}'")]
    FieldUnavailable { lookup: Lookup, field: String },
    #[error("{lookup} response field '{field}' has an unexpected format")]
    FieldFormat { lookup: Lookup, field: String },
    #[error("'{symbol}' is not a valid ticker symbol")]
    InvalidSymbol { symbol: String },
}

impl UpstreamError {
    /// The lookup that failed. `None` when no request was made.
    pub fn lookup(&self) -> Option<Lookup> {
        match *self {
            UpstreamError::Transport { lookup, .. }
            | UpstreamError::NotAnArray { lookup }
            | UpstreamError::EmptyPayload { lookup }
            | UpstreamError::NotAnObject { lookup }
            | UpstreamError::FieldUnavailable { lookup, .. }
            | UpstreamError::FieldFormat { lookup, .. } => Some(lookup),
            UpstreamError::InvalidSymbol { .. } => None,
        }
    }
}

/// Element 0 of a lookup response, the record of interest
pub struct LookupEntry<'a> {
    lookup: Lookup,
    map: &'a JsonMap,
}

impl<'a> LookupEntry<'a> {
    pub fn first(lookup: Lookup, payload: &'a Value) -> Result<Self, UpstreamError> {
        let entries = payload.as_array()
            .ok_or(UpstreamError::NotAnArray { lookup })?;
        let first = entries.first()
            .ok_or(UpstreamError::EmptyPayload { lookup })?;
        let map = first.as_object()
            .ok_or(UpstreamError::NotAnObject { lookup })?;
        Ok(LookupEntry { lookup, map })
    }

    fn format_error(&self, field: &str) -> UpstreamError {
        UpstreamError::FieldFormat { lookup: self.lookup, field: field.to_owned() }
    }

    fn get_field(&self, field: &str) -> Result<&'a Value, UpstreamError> {
        self.map.get(field).ok_or_else(|| UpstreamError::FieldUnavailable {
            lookup: self.lookup,
            field: field.to_owned(),
        })
    }

    /// Number, or `None` for an explicit JSON null. An absent key is an error.
    pub fn get_f64_or_null(&self, field: &str) -> Result<Option<f64>, UpstreamError> {
        match self.get_field(field)? {
            Value::Null => Ok(None),
            value => value.as_f64().map(Some).ok_or_else(|| self.format_error(field)),
        }
    }

    pub fn get_str_or_null(&self, field: &str) -> Result<Option<&'a str>, UpstreamError> {
        match self.get_field(field)? {
            Value::Null => Ok(None),
            value => value.as_str().map(Some).ok_or_else(|| self.format_error(field)),
        }
    }

    pub fn get_string_or_null(&self, field: &str) -> Result<Option<String>, UpstreamError> {
        Ok(self.get_str_or_null(field)?.map(str::to_owned))
    }

    /// Year portion of a `YYYY-MM-DD` date. Empty strings count as null.
    pub fn get_year_or_null(&self, field: &str) -> Result<Option<i32>, UpstreamError> {
        let raw = match self.get_str_or_null(field)? {
            Some(s) if !s.trim().is_empty() => s.trim(),
            _ => return Ok(None),
        };
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Some(date.year()));
        }
        raw.split('-').next()
            .and_then(|year| year.parse::<i32>().ok())
            .map(Some)
            .ok_or_else(|| self.format_error(field))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub ipo_year: Option<i32>,
    pub price: Option<f64>,
}

/// Real-time quote
#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub year_high: Option<f64>,
    pub year_low: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe: Option<f64>,
}

/// Annual financial statement growth
#[derive(Clone, Debug, PartialEq)]
pub struct Growth {
    pub date: Option<String>,
    pub eps_growth: Option<f64>,
    pub gross_profit_growth: Option<f64>,
}

/// Annual financial ratios
#[derive(Clone, Debug, PartialEq)]
pub struct Ratios {
    pub return_on_assets: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub debt_equity_ratio: Option<f64>,
    pub price_to_book_ratio: Option<f64>,
}

/// Raw price deltas, in currency units
#[derive(Clone, Debug, PartialEq)]
pub struct PriceChange {
    pub one_year: Option<f64>,
    pub three_year: Option<f64>,
}

pub fn parse_profile(payload: &Value) -> Result<Profile, UpstreamError> {
    let entry = LookupEntry::first(Lookup::Profile, payload)?;
    Ok(Profile {
        name: entry.get_string_or_null("companyName")?,
        industry: entry.get_string_or_null("industry")?,
        ipo_year: entry.get_year_or_null("ipoDate")?,
        price: entry.get_f64_or_null("price")?,
    })
}

pub fn parse_quote(payload: &Value) -> Result<Quote, UpstreamError> {
    let entry = LookupEntry::first(Lookup::Quote, payload)?;
    Ok(Quote {
        year_high: entry.get_f64_or_null("yearHigh")?,
        year_low: entry.get_f64_or_null("yearLow")?,
        market_cap: entry.get_f64_or_null("marketCap")?,
        pe: entry.get_f64_or_null("pe")?,
    })
}

pub fn parse_growth(payload: &Value) -> Result<Growth, UpstreamError> {
    let entry = LookupEntry::first(Lookup::Growth, payload)?;
    Ok(Growth {
        date: entry.get_string_or_null("date")?,
        eps_growth: entry.get_f64_or_null("epsgrowth")?,
        gross_profit_growth: entry.get_f64_or_null("grossProfitGrowth")?,
    })
}

pub fn parse_ratios(payload: &Value) -> Result<Ratios, UpstreamError> {
    let entry = LookupEntry::first(Lookup::Ratios, payload)?;
    Ok(Ratios {
        return_on_assets: entry.get_f64_or_null("returnOnAssets")?,
        return_on_equity: entry.get_f64_or_null("returnOnEquity")?,
        dividend_yield: entry.get_f64_or_null("dividendYield")?,
        interest_coverage: entry.get_f64_or_null("interestCoverage")?,
        debt_equity_ratio: entry.get_f64_or_null("debtEquityRatio")?,
        price_to_book_ratio: entry.get_f64_or_null("priceToBookRatio")?,
    })
}

pub fn parse_price_change(payload: &Value) -> Result<PriceChange, UpstreamError> {
    let entry = LookupEntry::first(Lookup::PriceChange, payload)?;
    Ok(PriceChange {
        one_year: entry.get_f64_or_null("1Y")?,
        three_year: entry.get_f64_or_null("3Y")?,
    })
}
