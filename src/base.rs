use std::fmt;

pub const SYMBOL: &str = "symbol";

/// Ticker symbols are ASCII letters, digits, `.` and `-` (`BRK.B`, `RDS-A`).
/// Anything else would change the meaning of a request URL.
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}

/// A single metric as reported upstream. JSON `null` maps to `Missing`.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Missing,
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            MetricValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, MetricValue::Missing)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MetricValue::Number(_) => "number",
            MetricValue::Text(_) => "text",
            MetricValue::Missing => "null",
        }
    }
}

impl From<f64> for MetricValue {
    fn from(n: f64) -> Self {
        MetricValue::Number(n)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(n: Option<f64>) -> Self {
        n.map_or(MetricValue::Missing, MetricValue::Number)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_owned())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{}", s),
            MetricValue::Missing => write!(f, "null"),
        }
    }
}

/// Metrics for one symbol, in the order they were collected.
///
/// Always starts with the `symbol` entry. There is no way to mutate a record
/// once `StockRecordBuilder::build` has returned it.
#[derive(Clone, Debug, PartialEq)]
pub struct StockRecord {
    fields: Vec<(String, MetricValue)>,
}

impl StockRecord {
    pub fn builder(symbol: &str) -> StockRecordBuilder {
        StockRecordBuilder::new(symbol)
    }

    pub fn symbol(&self) -> &str {
        // Index 0 is written by the builder and never removed
        self.fields[0].1.as_str().unwrap_or_default()
    }

    pub fn get(&self, field: &str) -> Option<&MetricValue> {
        self.fields.iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[derive(Debug)]
pub struct StockRecordBuilder {
    fields: Vec<(String, MetricValue)>,
}

impl StockRecordBuilder {
    pub fn new(symbol: &str) -> Self {
        StockRecordBuilder { fields: vec![(SYMBOL.to_owned(), MetricValue::from(symbol))] }
    }

    /// Sets `field`, replacing any earlier value in place so the original
    /// position is kept.
    pub fn set<V: Into<MetricValue>>(&mut self, field: &str, value: V) -> &mut Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((field.to_owned(), value)),
        }
        self
    }

    pub fn build(self) -> StockRecord {
        StockRecord { fields: self.fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_first_and_insertion_order() {
        let mut builder = StockRecord::builder("AAPL");
        builder.set("name", "Apple Inc.")
            .set("market_cap", 2.5e12)
            .set("dividendYield", None::<f64>);
        let record = builder.build();

        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["symbol", "name", "market_cap", "dividendYield"]);
        assert_eq!(record.symbol(), "AAPL");
        assert_eq!(record.get("dividendYield"), Some(&MetricValue::Missing));
        assert_eq!(record.get("unknown"), None);
    }

    #[test]
    fn test_set_existing_field_keeps_position() {
        let mut builder = StockRecord::builder("MSFT");
        builder.set("a", 1.0).set("b", 2.0).set("a", 3.0);
        let record = builder.build();

        assert_eq!(record.len(), 3);
        let entries: Vec<(&str, &MetricValue)> = record.iter().collect();
        assert_eq!(entries[1], ("a", &MetricValue::Number(3.0)));
    }

    #[test]
    fn test_valid_symbols() {
        assert!(is_valid_symbol("AAPL"));
        assert!(is_valid_symbol("BRK.B"));
        assert!(is_valid_symbol("RDS-A"));
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("AAPL?period=quarter"));
        assert!(!is_valid_symbol("A&apikey=x"));
        assert!(!is_valid_symbol("../quote/MSFT"));
        assert!(!is_valid_symbol("A B"));
        assert!(!is_valid_symbol("ÄPL"));
    }

    #[test]
    fn test_display() {
        assert_eq!(MetricValue::Number(3000000000.0).to_string(), "3000000000");
        assert_eq!(MetricValue::Number(0.25).to_string(), "0.25");
        assert_eq!(MetricValue::from("2019").to_string(), "2019");
        assert_eq!(MetricValue::Missing.to_string(), "null");
    }
}
