//! Fundamental stock screening against Financial Modeling Prep metrics.
//!
//! For each symbol, `market_data` collects a `StockRecord` from five
//! upstream lookups, `screening` classifies every field against the rule
//! catalog, and `report` renders the outcome. `driver` runs a watchlist
//! through that pipeline one symbol at a time.

pub mod base;
pub mod config;
pub mod driver;
pub mod market_data;
pub mod report;
pub mod screening;
pub mod watchlist;
