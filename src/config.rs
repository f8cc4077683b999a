//! Startup configuration.
//!
//! Values come from the process environment, after a `.env` file in the
//! working directory (if any) has been loaded into it.
//!
//! - `FM_PREP_API_KEY`: Financial Modeling Prep api key (required)
//! - `FM_PREP_BASE_URL`: override for the api base url

use std::fmt;

use chrono::{Datelike, Utc};
use thiserror::Error;

use crate::market_data::DEFAULT_BASE_URL;

pub const API_KEY_VAR: &str = "FM_PREP_API_KEY";
pub const BASE_URL_VAR: &str = "FM_PREP_BASE_URL";

/// Year `year_inc` is measured against unless overridden
pub const DEFAULT_REFERENCE_YEAR: i32 = 2023;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing api key: {0} is not set or empty")]
    MissingApiKey(&'static str),
    #[error("invalid reference year '{0}', expected a year or 'current'")]
    InvalidReferenceYear(String),
}

/// Api credential. Kept out of `Debug` output and logs.
#[derive(Clone, PartialEq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: &str) -> Self {
        ApiKey(key.to_owned())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: ApiKey,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine, the variables may already be exported
        dotenvy::dotenv().ok();
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Ok(Config { api_key: ApiKey(api_key), base_url })
    }
}

/// Accepts a four digit year, or `current` for this year by the system clock
pub fn parse_reference_year(s: &str) -> Result<i32, ConfigError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("current") {
        return Ok(Utc::now().year());
    }
    match s.parse::<i32>() {
        Ok(year) if (1800..=9999).contains(&year) => Ok(year),
        _ => Err(ConfigError::InvalidReferenceYear(s.to_owned())),
    }
}
