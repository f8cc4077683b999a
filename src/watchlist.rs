//! Curated symbol lists, grouped by sector.
//!
//! Sector groupings follow the TradingView sector and industry pages. Keep
//! the lists diverse.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Watchlist {
    /// Current holdings across tech, health, retail, food, finance and speculative picks
    Current,
    /// Uranium and nuclear names
    Exploratory,
    Gaming,
    Retail,
    Utilities,
    ProcessIndustry,
    #[default]
    ConsumerServices,
}

const CURRENT: &[&str] = &[
    "AAPL", "MSFT", "CRWD", // Tech
    "UNH", "AMGN", // Health
    "WMT", "HD", // Retail
    "ADM", // Food
    "JPM", // Finance
    "PLTR", "CGC", // Speculative
];
const EXPLORATORY: &[&str] = &["UROY", "UUUU", "LEU", "SMR", "URG", "DNN", "UEC", "SBSW", "NXE", "CCJ"];
const GAMING: &[&str] = &["UBER", "DIS", "EA", "TTWO"];
const RETAIL: &[&str] = &["HD", "COST", "PDD", "LOW", "MELI", "LULU"];
const UTILITIES: &[&str] = &["NEE", "SO", "DUK", "CEG"];
const PROCESS_INDUSTRY: &[&str] = &["LIN", "SHW", "ECL"];
const CONSUMER_SERVICES: &[&str] = &["TCOM", "CTAS"];

impl Watchlist {
    pub fn symbols(&self) -> &'static [&'static str] {
        match *self {
            Watchlist::Current => CURRENT,
            Watchlist::Exploratory => EXPLORATORY,
            Watchlist::Gaming => GAMING,
            Watchlist::Retail => RETAIL,
            Watchlist::Utilities => UTILITIES,
            Watchlist::ProcessIndustry => PROCESS_INDUSTRY,
            Watchlist::ConsumerServices => CONSUMER_SERVICES,
        }
    }
}
