use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::base::MetricValue;
use crate::config::DEFAULT_REFERENCE_YEAR;

/// Pass condition for a metric. All bounds are exclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Threshold {
    /// x > bound
    Above(f64),
    /// low < x < high
    Between(f64, f64),
    /// reference_year - x > years, for x a calendar year
    YearsBefore(i32),
}

#[derive(Debug, Error, PartialEq)]
pub enum PredicateError {
    #[error("expected a number, got {0}")]
    NotNumeric(&'static str),
    #[error("'{0}' is not a year")]
    NotAYear(String),
    #[error("year {year} is out of range against reference year {reference_year}")]
    YearOutOfRange { year: i32, reference_year: i32 },
    #[error("value is null")]
    Missing,
}

struct RuleDef {
    field: &'static str,
    threshold: Threshold,
    label: Option<&'static str>,
}

const fn rule(field: &'static str, threshold: Threshold) -> RuleDef {
    RuleDef { field, threshold, label: None }
}

const fn labelled(field: &'static str, threshold: Threshold, label: &'static str) -> RuleDef {
    RuleDef { field, threshold, label: Some(label) }
}

const SCREENING_RULES: &[RuleDef] = &[
    rule("year_inc", Threshold::YearsBefore(3)),
    rule("market_cap", Threshold::Above(100_000_000.0)),
    rule("grossProfitGrowth", Threshold::Above(0.0)),
    rule("returnOnAssets", Threshold::Above(0.08)),
    rule("returnOnEquity", Threshold::Above(0.1)),
    rule("eps_growth", Threshold::Above(0.05)),
    rule("dividendYield", Threshold::Above(0.03)),
    rule("interestCoverage", Threshold::Above(2.0)),
    rule("debtEquityRatio", Threshold::Between(0.0, 1.5)),
    rule("realtime_pe_ratio", Threshold::Between(10.0, 25.0)),
    rule("priceToBookRatio", Threshold::Between(0.0, 4.0)),
    labelled("1Y_change", Threshold::Above(0.1), "Average 1 year change > 0.1"),
    labelled("3Y_change", Threshold::Above(0.1), "Average 3 years change > 0.1"),
];

fn year_of(value: &MetricValue) -> Result<i32, PredicateError> {
    match value {
        MetricValue::Text(s) => s.trim().parse::<i32>()
            .map_err(|_err| PredicateError::NotAYear(s.clone())),
        MetricValue::Number(n) if n.fract() == 0.0 && n.abs() < i32::MAX as f64 => Ok(*n as i32),
        MetricValue::Number(n) => Err(PredicateError::NotAYear(n.to_string())),
        MetricValue::Missing => Err(PredicateError::Missing),
    }
}

fn number_of(value: &MetricValue) -> Result<f64, PredicateError> {
    match value {
        MetricValue::Number(n) => Ok(*n),
        MetricValue::Missing => Err(PredicateError::Missing),
        other => Err(PredicateError::NotNumeric(other.kind())),
    }
}

impl Threshold {
    pub fn check(&self, value: &MetricValue, reference_year: i32) -> Result<bool, PredicateError> {
        match *self {
            Threshold::Above(bound) => Ok(number_of(value)? > bound),
            Threshold::Between(low, high) => {
                let x = number_of(value)?;
                Ok(low < x && x < high)
            }
            Threshold::YearsBefore(years) => {
                let year = year_of(value)?;
                let age = reference_year.checked_sub(year)
                    .ok_or(PredicateError::YearOutOfRange { year, reference_year })?;
                Ok(age > years)
            }
        }
    }

    fn describe(&self, field: &str, reference_year: i32) -> String {
        match *self {
            Threshold::Above(bound) => format!("{} > {}", field, bound),
            Threshold::Between(low, high) => format!("{} < {} < {}", low, field, high),
            Threshold::YearsBefore(years) => format!("{} - {} > {}", reference_year, field, years),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleEntry {
    threshold: Threshold,
    reference_year: i32,
    description: String,
}

impl RuleEntry {
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn check(&self, value: &MetricValue) -> Result<bool, PredicateError> {
        self.threshold.check(value, self.reference_year)
    }
}

/// Field name to rule. Built once at startup and only read afterwards.
#[derive(Clone, Debug)]
pub struct RuleCatalog {
    reference_year: i32,
    rules: HashMap<&'static str, RuleEntry>,
}

impl RuleCatalog {
    pub fn new(reference_year: i32) -> Self {
        let rules = SCREENING_RULES.iter()
            .map(|def| {
                let description = match def.label {
                    Some(label) => label.to_owned(),
                    None => def.threshold.describe(def.field, reference_year),
                };
                (def.field, RuleEntry { threshold: def.threshold, reference_year, description })
            })
            .collect();
        RuleCatalog { reference_year, rules }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn lookup(&self, field: &str) -> Option<&RuleEntry> {
        self.rules.get(field)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        RuleCatalog::new(DEFAULT_REFERENCE_YEAR)
    }
}

impl fmt::Display for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for def in SCREENING_RULES {
            if let Some(entry) = self.rules.get(def.field) {
                writeln!(f, "{}: {}", def.field, entry.description)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passes(catalog: &RuleCatalog, field: &str, value: f64) -> bool {
        catalog.lookup(field).unwrap().check(&MetricValue::Number(value)).unwrap()
    }

    #[test]
    fn test_catalog_covers_all_rules() {
        let catalog = RuleCatalog::default();
        assert_eq!(catalog.len(), 13);
        assert_eq!(catalog.reference_year(), 2023);
        assert!(catalog.lookup("name").is_none());
        assert!(catalog.lookup("current_price").is_none());
    }

    #[test]
    fn test_year_inc() {
        let catalog = RuleCatalog::default();
        let entry = catalog.lookup("year_inc").unwrap();
        assert_eq!(entry.check(&MetricValue::from("2019")), Ok(true));
        assert_eq!(entry.check(&MetricValue::from("2020")), Ok(false));
        assert_eq!(entry.check(&MetricValue::from("2021")), Ok(false));
        assert_eq!(entry.check(&MetricValue::Number(1980.0)), Ok(true));
        assert_eq!(entry.description(), "2023 - year_inc > 3");
    }

    #[test]
    fn test_year_inc_follows_reference_year() {
        let catalog = RuleCatalog::new(2026);
        let entry = catalog.lookup("year_inc").unwrap();
        assert_eq!(entry.check(&MetricValue::from("2021")), Ok(true));
        assert_eq!(entry.check(&MetricValue::from("2023")), Ok(false));
        assert_eq!(entry.description(), "2026 - year_inc > 3");
    }

    #[test]
    fn test_lower_bound_rules_are_exclusive() {
        let catalog = RuleCatalog::default();
        let cases: &[(&str, f64)] = &[
            ("market_cap", 100_000_000.0),
            ("grossProfitGrowth", 0.0),
            ("returnOnAssets", 0.08),
            ("returnOnEquity", 0.10),
            ("eps_growth", 0.05),
            ("dividendYield", 0.03),
            ("interestCoverage", 2.0),
            ("1Y_change", 0.10),
            ("3Y_change", 0.10),
        ];
        for &(field, bound) in cases {
            assert!(!passes(&catalog, field, bound), "{} at {} should fail", field, bound);
            assert!(passes(&catalog, field, bound + 1e-6), "{} above {} should pass", field, bound);
        }
        assert!(passes(&catalog, "market_cap", 100_000_001.0));
    }

    #[test]
    fn test_range_rules_are_exclusive() {
        let catalog = RuleCatalog::default();
        let cases: &[(&str, f64, f64)] = &[
            ("debtEquityRatio", 0.0, 1.5),
            ("realtime_pe_ratio", 10.0, 25.0),
            ("priceToBookRatio", 0.0, 4.0),
        ];
        for &(field, low, high) in cases {
            assert!(!passes(&catalog, field, low), "{} at {}", field, low);
            assert!(!passes(&catalog, field, high), "{} at {}", field, high);
            assert!(passes(&catalog, field, (low + high) / 2.0), "{} midpoint", field);
        }
        assert!(!passes(&catalog, "debtEquityRatio", -0.5));
        assert!(!passes(&catalog, "realtime_pe_ratio", 40.0));
    }

    #[test]
    fn test_descriptions() {
        let catalog = RuleCatalog::default();
        let description = |field: &str| catalog.lookup(field).unwrap().description().to_owned();
        assert_eq!(description("market_cap"), "market_cap > 100000000");
        assert_eq!(description("returnOnEquity"), "returnOnEquity > 0.1");
        assert_eq!(description("debtEquityRatio"), "0 < debtEquityRatio < 1.5");
        assert_eq!(description("3Y_change"), "Average 3 years change > 0.1");
    }

    #[test]
    fn test_unexpected_input_is_error() {
        let catalog = RuleCatalog::default();
        let market_cap = catalog.lookup("market_cap").unwrap();
        assert_eq!(market_cap.check(&MetricValue::from("big")), Err(PredicateError::NotNumeric("text")));
        assert_eq!(market_cap.check(&MetricValue::Missing), Err(PredicateError::Missing));

        let year_inc = catalog.lookup("year_inc").unwrap();
        assert_eq!(year_inc.check(&MetricValue::from("19xx")), Err(PredicateError::NotAYear("19xx".to_owned())));
        assert_eq!(
            year_inc.check(&MetricValue::from("-2147483648")),
            Err(PredicateError::YearOutOfRange { year: i32::MIN, reference_year: 2023 })
        );

        let negative_reference = RuleCatalog::new(-3);
        let year_inc = negative_reference.lookup("year_inc").unwrap();
        assert_eq!(
            year_inc.check(&MetricValue::Number(2147483646.0)),
            Err(PredicateError::YearOutOfRange { year: i32::MAX - 1, reference_year: -3 })
        );
    }
}
